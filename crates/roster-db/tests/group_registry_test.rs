//! Integration tests for the group registry using in-memory SurrealDB.

use roster_core::error::RegistryError;
use roster_core::models::group::{CreateGroup, UpdateGroup};
use roster_core::registry::GroupRegistry;
use roster_db::SurrealGroupRegistry;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up an in-memory DB, run migrations, return a registry.
async fn setup() -> SurrealGroupRegistry<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    roster_db::run_migrations(&db).await.unwrap();
    SurrealGroupRegistry::new(db)
}

fn form(owner_id: &str, name: &str, description: &str) -> CreateGroup {
    CreateGroup {
        owner_id: owner_id.into(),
        name: name.into(),
        description: description.into(),
    }
}

#[tokio::test]
async fn create_and_get_group() {
    let registry = setup().await;

    let group = registry
        .create(form("user-owner", "Developers", "Software developers"))
        .await
        .unwrap();

    assert_eq!(group.owner_id, "user-owner");
    assert_eq!(group.name, "Developers");
    assert_eq!(group.description, "Software developers");
    assert!(group.user_ids.is_empty());
    assert_eq!(group.created_at, group.updated_at);

    let fetched = registry.get_by_id(group.id).await.unwrap();
    assert_eq!(fetched.id, group.id);
    assert_eq!(fetched.owner_id, group.owner_id);
    assert_eq!(fetched.name, group.name);
    assert_eq!(fetched.description, group.description);
    assert_eq!(fetched.permissions, group.permissions);
    assert_eq!(fetched.user_ids, group.user_ids);
    assert_eq!(fetched.created_at, group.created_at);
    assert_eq!(fetched.updated_at, group.updated_at);
}

#[tokio::test]
async fn get_missing_group_is_not_found() {
    let registry = setup().await;

    let result = registry.get_by_id(Uuid::new_v4()).await;
    assert!(matches!(result, Err(RegistryError::NotFound { .. })));
}

#[tokio::test]
async fn partial_update_leaves_other_fields() {
    let registry = setup().await;

    let group = registry
        .create(form("owner", "Original", "Original desc"))
        .await
        .unwrap();

    let updated = registry
        .update(
            group.id,
            UpdateGroup {
                name: Some("Renamed".into()),
                ..Default::default()
            },
            false,
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.description, "Original desc"); // unchanged
    assert_eq!(updated.created_at, group.created_at);
}

#[tokio::test]
async fn overwrite_update_resets_missing_fields() {
    let registry = setup().await;

    let group = registry
        .create(form("owner", "Original", "Original desc"))
        .await
        .unwrap();

    registry
        .update(
            group.id,
            UpdateGroup {
                user_ids: Some(vec!["user-a".into()]),
                permissions: Some(serde_json::json!({"read": true})),
                ..Default::default()
            },
            false,
        )
        .await
        .unwrap();

    let overwritten = registry
        .update(
            group.id,
            UpdateGroup {
                name: Some("Renamed".into()),
                ..Default::default()
            },
            true,
        )
        .await
        .unwrap();

    assert_eq!(overwritten.name, "Renamed");
    assert_eq!(overwritten.description, "");
    assert!(overwritten.user_ids.is_empty());
    assert!(
        overwritten
            .permissions
            .as_object()
            .is_some_and(|p| p.is_empty())
    );
}

#[tokio::test]
async fn update_refreshes_updated_at() {
    let registry = setup().await;

    let group = registry
        .create(form("owner", "Timed", "Watch the clock"))
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let updated = registry
        .update(
            group.id,
            UpdateGroup {
                description: Some("Clock watched".into()),
                ..Default::default()
            },
            false,
        )
        .await
        .unwrap();

    assert!(updated.updated_at > group.updated_at);
    assert_eq!(updated.created_at, group.created_at);
}

#[tokio::test]
async fn update_missing_group_is_not_found() {
    let registry = setup().await;

    let result = registry
        .update(
            Uuid::new_v4(),
            UpdateGroup {
                name: Some("Ghost".into()),
                ..Default::default()
            },
            false,
        )
        .await;

    assert!(matches!(result, Err(RegistryError::NotFound { .. })));
}

#[tokio::test]
async fn update_dedups_supplied_member_list() {
    let registry = setup().await;

    let group = registry
        .create(form("owner", "Dedup", "No doubles"))
        .await
        .unwrap();

    registry
        .update(
            group.id,
            UpdateGroup {
                user_ids: Some(vec![
                    "user-a".into(),
                    "user-b".into(),
                    "user-a".into(),
                ]),
                ..Default::default()
            },
            false,
        )
        .await
        .unwrap();

    let member_ids = registry.get_member_ids(group.id).await.unwrap();
    assert_eq!(member_ids, vec!["user-a".to_string(), "user-b".to_string()]);
}

#[tokio::test]
async fn delete_group() {
    let registry = setup().await;

    let group = registry
        .create(form("owner", "ToDelete", "Will be deleted"))
        .await
        .unwrap();

    registry.delete(group.id).await.unwrap();

    let result = registry.get_by_id(group.id).await;
    assert!(
        matches!(result, Err(RegistryError::NotFound { .. })),
        "deleted group should not be found"
    );
}

#[tokio::test]
async fn delete_missing_group_succeeds() {
    let registry = setup().await;

    let id = Uuid::new_v4();
    assert!(
        matches!(
            registry.get_by_id(id).await,
            Err(RegistryError::NotFound { .. })
        ),
        "group should be absent before the delete"
    );

    registry.delete(id).await.unwrap();

    assert!(matches!(
        registry.get_by_id(id).await,
        Err(RegistryError::NotFound { .. })
    ));
}

#[tokio::test]
async fn delete_all_groups() {
    let registry = setup().await;

    for i in 0..3 {
        registry
            .create(form("owner", &format!("group-{i}"), "bulk"))
            .await
            .unwrap();
    }

    registry.delete_all().await.unwrap();

    let groups = registry.list_all().await.unwrap();
    assert!(groups.is_empty());
}

#[tokio::test]
async fn list_all_orders_by_update_recency() {
    let registry = setup().await;

    let first = registry
        .create(form("owner", "First", "created first"))
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let second = registry
        .create(form("owner", "Second", "created second"))
        .await
        .unwrap();

    let groups = registry.list_all().await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].id, second.id);
    assert_eq!(groups[1].id, first.id);

    // A mutation moves the group to the front.
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    registry.add_member(first.id, "user-a").await.unwrap();

    let groups = registry.list_all().await.unwrap();
    assert_eq!(groups[0].id, first.id);
    assert_eq!(groups[1].id, second.id);
}

#[tokio::test]
async fn find_id_by_name() {
    let registry = setup().await;

    let admins = registry
        .create(form("owner", "Admins", "Administrators"))
        .await
        .unwrap();
    registry
        .create(form("owner", "Editors", "Content editors"))
        .await
        .unwrap();

    let found = registry.find_id_by_name("Admins").await.unwrap();
    assert_eq!(found, admins.id);

    let missing = registry.find_id_by_name("Nobody").await;
    assert!(matches!(missing, Err(RegistryError::NotFound { .. })));
}

#[tokio::test]
async fn duplicate_name_rejected() {
    let registry = setup().await;

    registry
        .create(form("owner", "unique-group", "first"))
        .await
        .unwrap();

    let result = registry.create(form("owner", "unique-group", "second")).await;

    assert!(
        matches!(result, Err(RegistryError::Storage(_))),
        "duplicate group name should be rejected"
    );
}
