//! Integration tests for the directory mirror using in-memory
//! SurrealDB.

use dashgrid_core::models::role::Role;
use dashgrid_core::models::user::User;
use dashgrid_core::repository::DirectoryRepository;
use dashgrid_db::repository::SurrealDirectoryRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> SurrealDirectoryRepository<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    dashgrid_db::run_migrations(&db).await.unwrap();
    SurrealDirectoryRepository::new(db)
}

#[tokio::test]
async fn upsert_and_list_users() {
    let repo = setup().await;

    repo.upsert_user(1, 11, User::new(1, "Alice", "Admin"))
        .await
        .unwrap();
    repo.upsert_user(1, 11, User::new(2, "Bob", "Viewer"))
        .await
        .unwrap();

    let users = repo.list_users(1, 11).await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id, 1);
    assert_eq!(users[0].display_name, "Alice");
    assert_eq!(users[1].profile_name, "Viewer");
}

#[tokio::test]
async fn upsert_refreshes_existing_user() {
    let repo = setup().await;

    repo.upsert_user(1, 11, User::new(1, "Alice", "Admin"))
        .await
        .unwrap();
    repo.upsert_user(1, 11, User::new(1, "Alice Z.", "Viewer"))
        .await
        .unwrap();

    let users = repo.list_users(1, 11).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].display_name, "Alice Z.");
    assert_eq!(users[0].profile_name, "Viewer");
}

#[tokio::test]
async fn roles_keep_first_insert_order() {
    let repo = setup().await;

    repo.upsert_role(1, 11, Role::new(30, "Zulu", "Operational", vec![1]))
        .await
        .unwrap();
    repo.upsert_role(1, 11, Role::new(10, "Alpha", "Operational", vec![2]))
        .await
        .unwrap();
    repo.upsert_role(1, 11, Role::new(20, "Mike", "Functional", vec![3]))
        .await
        .unwrap();

    // Re-syncing an existing role must not move it.
    repo.upsert_role(1, 11, Role::new(30, "Zulu", "Operational", vec![1, 4]))
        .await
        .unwrap();

    let roles = repo.list_roles(1, 11).await.unwrap();
    let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Zulu", "Alpha", "Mike"]);
    assert_eq!(roles[0].members, vec![1, 4]);
}

#[tokio::test]
async fn snapshot_combines_users_and_roles() {
    let repo = setup().await;

    repo.upsert_user(1, 11, User::new(1, "Alice", "Admin"))
        .await
        .unwrap();
    repo.upsert_role(1, 11, Role::new(10, "Oncall", "Operational", vec![1]))
        .await
        .unwrap();

    let snapshot = repo.snapshot(1, 11).await.unwrap();
    assert_eq!(snapshot.users.len(), 1);
    assert_eq!(snapshot.roles.len(), 1);
    assert_eq!(snapshot.roles[0].members, vec![1]);
}

#[tokio::test]
async fn scope_isolation() {
    let repo = setup().await;

    repo.upsert_user(1, 11, User::new(1, "Alice", "Admin"))
        .await
        .unwrap();
    repo.upsert_user(2, 21, User::new(2, "Eve", "Admin"))
        .await
        .unwrap();

    let scoped = repo.list_users(1, 11).await.unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].display_name, "Alice");
}
