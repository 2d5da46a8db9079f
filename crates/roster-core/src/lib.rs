//! Roster Core — domain models, registry trait, and error types.
//!
//! This crate defines the group-membership domain:
//! - The [`Group`](models::group::Group) entity and its create/update forms
//! - The [`GroupRegistry`](registry::GroupRegistry) data-access trait
//! - The error taxonomy ([`RegistryError`](error::RegistryError))
//!
//! Storage-backed implementations live in `roster-db`.

pub mod error;
pub mod models;
pub mod registry;
