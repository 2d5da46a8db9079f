//! Roster DB — SurrealDB connection management and the group registry
//! implementation.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - [`SurrealGroupRegistry`], the storage-backed implementation of
//!   [`roster_core::registry::GroupRegistry`]
//! - Error types ([`DbError`])

mod connection;
mod error;
mod registry;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use registry::SurrealGroupRegistry;
pub use schema::{run_migrations, schema_v1};
