//! Overflow-checked decimal arithmetic.
//!
//! `rust_decimal` operators panic when a result leaves the 96-bit range.
//! Amounts come straight from user input, so every product or sum derived
//! from them goes through these helpers and an out-of-range result becomes
//! a validation error.

use rust_decimal::Decimal;

use crate::errors::ValidationError;
use crate::Result;

fn out_of_range(lhs: Decimal, op: &str, rhs: Decimal) -> crate::Error {
    ValidationError::invalid(format!(
        "Amount out of range: {} {} {} overflows",
        lhs, op, rhs
    ))
}

pub fn add(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_add(rhs).ok_or_else(|| out_of_range(lhs, "+", rhs))
}

pub fn sub(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_sub(rhs).ok_or_else(|| out_of_range(lhs, "-", rhs))
}

pub fn mul(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_mul(rhs).ok_or_else(|| out_of_range(lhs, "*", rhs))
}

/// Division; a zero divisor is reported the same way as an overflow.
pub fn div(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_div(rhs).ok_or_else(|| out_of_range(lhs, "/", rhs))
}

/// Sums `values`, failing on the first overflow.
pub fn sum<I>(values: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, add)
}
