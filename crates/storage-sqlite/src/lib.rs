//! SQLite storage implementation for XPortfoy.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `xportfoy-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! Every write goes through the single writer actor ([`WriteHandle`]); reads
//! use the connection pool.
//!
//! ```text
//!        core (domain, traits)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!            │             │
//!        r2d2 pool     writer actor
//!            └──────┬──────┘
//!                   ▼
//!               SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod activity_log;
pub mod follows;
pub mod holdings;
pub mod portfolios;
pub mod transactions;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use activity_log::ActivityLogRepository;
pub use follows::FollowRepository;
pub use holdings::HoldingRepository;
pub use portfolios::PortfolioRepository;
pub use transactions::TransactionRepository;

// Re-export from xportfoy-core for convenience
pub use xportfoy_core::errors::{DatabaseError, Error, Result};
