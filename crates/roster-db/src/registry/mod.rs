//! SurrealDB registry implementations.

mod group;

pub use group::SurrealGroupRegistry;
