pub mod decimal_math;
