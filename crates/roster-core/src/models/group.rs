//! Group domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named collection of user identifiers with an associated permission
/// set. Membership identifiers are weak references to users owned by a
/// separate user-management subsystem; the registry never validates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    /// Identifier of the creating user. Immutable after creation.
    /// Serialized as `user_id` on the wire.
    #[serde(rename = "user_id")]
    pub owner_id: String,
    pub name: String,
    pub description: String,
    /// Opaque permission mapping, read and written wholesale.
    pub permissions: serde_json::Value,
    /// Caller-defined extension payload. Never inspected.
    pub data: serde_json::Value,
    /// Caller-defined extension payload. Never inspected.
    pub meta: serde_json::Value,
    /// Ordered, duplicate-free membership list.
    pub user_ids: Vec<String>,
    /// Epoch seconds. Equal to `updated_at` at creation.
    pub created_at: i64,
    /// Epoch seconds. Refreshed on every successful mutation.
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroup {
    pub owner_id: String,
    pub name: String,
    pub description: String,
}

/// Update form. In partial mode only `Some` fields are written; in
/// overwrite mode every field is written, with `None` resetting the
/// column to its default (empty string, `{}`, `[]`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateGroup {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<serde_json::Value>,
    pub user_ids: Option<Vec<String>>,
}

/// Outcome of a membership mutation that completed without error.
///
/// A missing group is reported separately as
/// [`RegistryError::NotFound`](crate::error::RegistryError::NotFound), so
/// callers can tell "nothing to do" apart from "no such group" and from
/// storage failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipUpdate {
    /// The membership list changed.
    Applied,
    /// The user was already (or was not) a member; nothing was written.
    Unchanged,
}
