//! Registry trait definition for group data access.
//!
//! All operations are async and acquire their storage handle for their
//! own duration only; nothing is held across operations.

use uuid::Uuid;

use crate::error::RegistryResult;
use crate::models::group::{CreateGroup, Group, MembershipUpdate, UpdateGroup};

pub trait GroupRegistry: Send + Sync {
    /// Persist a new group with a fresh id, equal creation/update
    /// timestamps, and an empty membership list.
    fn create(&self, input: CreateGroup) -> impl Future<Output = RegistryResult<Group>> + Send;

    /// All groups, most recently updated first.
    fn list_all(&self) -> impl Future<Output = RegistryResult<Vec<Group>>> + Send;

    /// Groups whose membership list contains `user_id` as a whole
    /// element, most recently updated first.
    fn list_by_member(
        &self,
        user_id: &str,
    ) -> impl Future<Output = RegistryResult<Vec<Group>>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RegistryResult<Group>> + Send;

    /// Projection of `get_by_id(id)?.user_ids`.
    fn get_member_ids(&self, id: Uuid)
    -> impl Future<Output = RegistryResult<Vec<String>>> + Send;

    /// Apply `input` to the group and return the updated row.
    /// `updated_at` is always refreshed.
    fn update(
        &self,
        id: Uuid,
        input: UpdateGroup,
        overwrite: bool,
    ) -> impl Future<Output = RegistryResult<Group>> + Send;

    /// Physical delete. Succeeds whether or not the id existed.
    fn delete(&self, id: Uuid) -> impl Future<Output = RegistryResult<()>> + Send;

    /// Unconditional wipe of every group. Administrative/test use only.
    fn delete_all(&self) -> impl Future<Output = RegistryResult<()>> + Send;

    /// Append `user_id` to the group's membership if not already present.
    fn add_member(
        &self,
        group_id: Uuid,
        user_id: &str,
    ) -> impl Future<Output = RegistryResult<MembershipUpdate>> + Send;

    /// Remove `user_id` from the group's membership if present.
    fn remove_member(
        &self,
        group_id: Uuid,
        user_id: &str,
    ) -> impl Future<Output = RegistryResult<MembershipUpdate>> + Send;

    /// Exact-name lookup. Unambiguous because group names carry a
    /// UNIQUE index.
    fn find_id_by_name(&self, name: &str) -> impl Future<Output = RegistryResult<Uuid>> + Send;
}
