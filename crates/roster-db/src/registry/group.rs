//! SurrealDB implementation of [`GroupRegistry`].
//!
//! Membership lives in a `user_ids` array column on the group row.
//! Lookups use engine-level array containment and membership mutations
//! are single conditional UPDATE statements, applied atomically per
//! record, so concurrent mutations on the same group cannot lose
//! updates.

use std::collections::HashSet;

use chrono::Utc;
use roster_core::error::RegistryResult;
use roster_core::models::group::{CreateGroup, Group, MembershipUpdate, UpdateGroup};
use roster_core::registry::GroupRegistry;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::warn;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct GroupRow {
    owner_id: String,
    name: String,
    description: String,
    permissions: serde_json::Value,
    data: serde_json::Value,
    meta: serde_json::Value,
    user_ids: Option<Vec<String>>,
    created_at: i64,
    updated_at: i64,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct GroupRowWithId {
    record_id: String,
    owner_id: String,
    name: String,
    description: String,
    permissions: serde_json::Value,
    data: serde_json::Value,
    meta: serde_json::Value,
    user_ids: Option<Vec<String>>,
    created_at: i64,
    updated_at: i64,
}

/// Row struct for the name lookup.
#[derive(Debug, SurrealValue)]
struct GroupIdRow {
    record_id: String,
}

impl GroupRow {
    fn into_group(self, id: Uuid) -> Group {
        Group {
            id,
            owner_id: self.owner_id,
            name: self.name,
            description: self.description,
            permissions: self.permissions,
            data: self.data,
            meta: self.meta,
            // Absent membership reads as the empty list.
            user_ids: self.user_ids.unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl GroupRowWithId {
    fn try_into_group(self) -> Result<Group, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        Ok(Group {
            id,
            owner_id: self.owner_id,
            name: self.name,
            description: self.description,
            permissions: self.permissions,
            data: self.data,
            meta: self.meta,
            user_ids: self.user_ids.unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the group registry.
///
/// Constructed explicitly with its connection and handed to whatever
/// owns request handling; there is no process-wide instance.
#[derive(Clone)]
pub struct SurrealGroupRegistry<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealGroupRegistry<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> GroupRegistry for SurrealGroupRegistry<C> {
    async fn create(&self, input: CreateGroup) -> RegistryResult<Group> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let now = Utc::now().timestamp();

        let result = self
            .db
            .query(
                "CREATE type::record('group', $id) SET \
                 owner_id = $owner_id, \
                 name = $name, description = $description, \
                 permissions = {}, data = {}, meta = {}, \
                 user_ids = [], \
                 created_at = $now, updated_at = $now",
            )
            .bind(("id", id_str.clone()))
            .bind(("owner_id", input.owner_id))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("now", now))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or(DbError::NotFound { id: id_str })?;

        Ok(row.into_group(id))
    }

    async fn list_all(&self) -> RegistryResult<Vec<Group>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM group \
                 ORDER BY updated_at DESC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRowWithId> = result.take(0).map_err(DbError::from)?;

        let groups = rows
            .into_iter()
            .map(|row| row.try_into_group())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(groups)
    }

    async fn list_by_member(&self, user_id: &str) -> RegistryResult<Vec<Group>> {
        let user_id = user_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM group \
                 WHERE user_ids CONTAINS $user_id \
                 ORDER BY updated_at DESC",
            )
            .bind(("user_id", user_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRowWithId> = result.take(0).map_err(DbError::from)?;

        let groups = rows
            .into_iter()
            .map(|row| row.try_into_group())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(groups)
    }

    async fn get_by_id(&self, id: Uuid) -> RegistryResult<Group> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('group', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or(DbError::NotFound { id: id_str })?;

        Ok(row.into_group(id))
    }

    async fn get_member_ids(&self, id: Uuid) -> RegistryResult<Vec<String>> {
        Ok(self.get_by_id(id).await?.user_ids)
    }

    async fn update(&self, id: Uuid, input: UpdateGroup, overwrite: bool) -> RegistryResult<Group> {
        let id_str = id.to_string();
        let now = Utc::now().timestamp();

        // Overwrite mode writes every form field; a missing field resets
        // the column to its default.
        let mut input = if overwrite {
            UpdateGroup {
                name: Some(input.name.unwrap_or_default()),
                description: Some(input.description.unwrap_or_default()),
                permissions: Some(
                    input
                        .permissions
                        .unwrap_or(serde_json::Value::Object(Default::default())),
                ),
                user_ids: Some(input.user_ids.unwrap_or_default()),
            }
        } else {
            input
        };

        // Membership lists are duplicate-free on every write path.
        if let Some(ids) = input.user_ids.as_mut() {
            let mut seen = HashSet::new();
            ids.retain(|u| seen.insert(u.clone()));
        }

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.permissions.is_some() {
            sets.push("permissions = $permissions");
        }
        if input.user_ids.is_some() {
            sets.push("user_ids = $user_ids");
        }
        sets.push("updated_at = $now");

        let query = format!(
            "UPDATE type::record('group', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("now", now));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(permissions) = input.permissions {
            builder = builder.bind(("permissions", permissions));
        }
        if let Some(user_ids) = input.user_ids {
            builder = builder.bind(("user_ids", user_ids));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or(DbError::NotFound { id: id_str })?;

        Ok(row.into_group(id))
    }

    async fn delete(&self, id: Uuid) -> RegistryResult<()> {
        let id_str = id.to_string();

        self.db
            .query("DELETE type::record('group', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn delete_all(&self) -> RegistryResult<()> {
        self.db
            .query("DELETE type::table('group')")
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn add_member(&self, group_id: Uuid, user_id: &str) -> RegistryResult<MembershipUpdate> {
        let id_str = group_id.to_string();
        let user_id = user_id.to_string();
        let now = Utc::now().timestamp();

        // Single conditional statement: the engine evaluates WHERE and
        // SET atomically per record, so concurrent adds on the same
        // group cannot lose each other's appends.
        let mut result = self
            .db
            .query(
                "UPDATE type::record('group', $id) \
                 SET user_ids += $user_id, updated_at = $now \
                 WHERE user_ids CONTAINSNOT $user_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.clone()))
            .bind(("now", now))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        if !rows.is_empty() {
            return Ok(MembershipUpdate::Applied);
        }

        // No row matched: either the group is missing or the user is
        // already a member. Propagates NotFound for the former.
        self.get_by_id(group_id).await?;
        warn!(group_id = %id_str, user_id = %user_id, "user already in group");
        Ok(MembershipUpdate::Unchanged)
    }

    async fn remove_member(
        &self,
        group_id: Uuid,
        user_id: &str,
    ) -> RegistryResult<MembershipUpdate> {
        let id_str = group_id.to_string();
        let user_id = user_id.to_string();
        let now = Utc::now().timestamp();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('group', $id) \
                 SET user_ids -= $user_id, updated_at = $now \
                 WHERE user_ids CONTAINS $user_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.clone()))
            .bind(("now", now))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        if !rows.is_empty() {
            return Ok(MembershipUpdate::Applied);
        }

        self.get_by_id(group_id).await?;
        warn!(group_id = %id_str, user_id = %user_id, "user not in group");
        Ok(MembershipUpdate::Unchanged)
    }

    async fn find_id_by_name(&self, name: &str) -> RegistryResult<Uuid> {
        let name = name.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id FROM group \
                 WHERE name = $name LIMIT 1",
            )
            .bind(("name", name.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupIdRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or(DbError::NotFound { id: name })?;

        let id = Uuid::parse_str(&row.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;

        Ok(id)
    }
}
