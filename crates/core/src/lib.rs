//! XPortfoy Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for XPortfoy portfolios: the
//! position recompute rule, ledger replay, ownership checks and the
//! services that coordinate repositories. It is database-agnostic and
//! defines traits that are implemented by the `storage-sqlite` crate.

pub mod access;
pub mod constants;
pub mod errors;
pub mod events;
pub mod holdings;
pub mod portfolios;
pub mod quotes;
pub mod social;
pub mod transactions;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

pub use access::Actor;
