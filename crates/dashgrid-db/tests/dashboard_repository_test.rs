//! Integration tests for the Dashboard repository using in-memory
//! SurrealDB.

use std::collections::BTreeSet;

use dashgrid_core::error::DashgridError;
use dashgrid_core::models::dashboard::{CreateDashboard, UpdateDashboard};
use dashgrid_core::models::tenant::{Subtenant, Tenant};
use dashgrid_core::repository::{DashboardRepository, Pagination, TenantRepository};
use dashgrid_db::repository::{SurrealDashboardRepository, SurrealTenantRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB, run migrations, register a tenant and
/// two subtenants.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    dashgrid_db::run_migrations(&db).await.unwrap();

    let tenant_repo = SurrealTenantRepository::new(db.clone());
    tenant_repo
        .create_tenant(Tenant {
            id: 1,
            code: "ACME".into(),
            name: "Acme Corp".into(),
        })
        .await
        .unwrap();
    tenant_repo
        .create_subtenant(Subtenant {
            id: 11,
            tenant_id: 1,
            code: "EU".into(),
            name: "Acme Europe".into(),
        })
        .await
        .unwrap();
    tenant_repo
        .create_subtenant(Subtenant {
            id: 12,
            tenant_id: 1,
            code: "US".into(),
            name: "Acme US".into(),
        })
        .await
        .unwrap();

    db
}

fn create_input(name: &str) -> CreateDashboard {
    CreateDashboard {
        tenant_id: 1,
        subtenant_id: 11,
        name: name.into(),
        description: format!("{name} description"),
        widgets: vec![],
    }
}

#[tokio::test]
async fn create_and_get_dashboard() {
    let db = setup().await;
    let repo = SurrealDashboardRepository::new(db);

    let widget_id = Uuid::new_v4();
    let dashboard = repo
        .create(CreateDashboard {
            tenant_id: 1,
            subtenant_id: 11,
            name: "Fleet Overview".into(),
            description: "Vehicle status at a glance".into(),
            widgets: vec![widget_id],
        })
        .await
        .unwrap();

    assert_eq!(dashboard.tenant_id, 1);
    assert_eq!(dashboard.subtenant_id, 11);
    assert_eq!(dashboard.name, "Fleet Overview");
    assert_eq!(dashboard.widgets, vec![widget_id]);

    let fetched = repo.get_by_id(1, 11, dashboard.id).await.unwrap();
    assert_eq!(fetched.id, dashboard.id);
    assert_eq!(fetched.description, "Vehicle status at a glance");
}

#[tokio::test]
async fn update_dashboard() {
    let db = setup().await;
    let repo = SurrealDashboardRepository::new(db);

    let dashboard = repo.create(create_input("Original")).await.unwrap();

    let updated = repo
        .update(
            1,
            11,
            dashboard.id,
            UpdateDashboard {
                name: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.description, "Original description"); // unchanged
}

#[tokio::test]
async fn delete_dashboard_removes_assignments() {
    let db = setup().await;
    let repo = SurrealDashboardRepository::new(db);

    let dashboard = repo.create(create_input("ToDelete")).await.unwrap();
    let assigned: BTreeSet<i64> = [5, 6].into_iter().collect();
    repo.set_assigned_users(1, 11, dashboard.id, &assigned)
        .await
        .unwrap();

    repo.delete(1, 11, dashboard.id).await.unwrap();

    let result = repo.get_by_id(1, 11, dashboard.id).await;
    assert!(result.is_err(), "deleted dashboard should not be found");

    let leftover = repo.get_assigned_users(1, 11, dashboard.id).await.unwrap();
    assert!(leftover.is_empty(), "assignments should be gone too");
}

#[tokio::test]
async fn list_dashboards_with_pagination() {
    let db = setup().await;
    let repo = SurrealDashboardRepository::new(db);

    for i in 0..5 {
        repo.create(create_input(&format!("dash-{i}"))).await.unwrap();
    }

    let page1 = repo
        .list(
            1,
            11,
            Pagination {
                offset: 0,
                limit: 3,
            },
        )
        .await
        .unwrap();

    assert_eq!(page1.items.len(), 3);
    assert_eq!(page1.total, 5);

    let page2 = repo
        .list(
            1,
            11,
            Pagination {
                offset: 3,
                limit: 3,
            },
        )
        .await
        .unwrap();

    assert_eq!(page2.items.len(), 2);
}

#[tokio::test]
async fn duplicate_name_rejected_within_scope() {
    let db = setup().await;
    let repo = SurrealDashboardRepository::new(db);

    repo.create(create_input("unique-dash")).await.unwrap();

    let err = repo.create(create_input("unique-dash")).await.unwrap_err();
    assert!(
        matches!(err, DashgridError::AlreadyExists { .. }),
        "duplicate dashboard name should surface as AlreadyExists, got {err:?}"
    );
}

#[tokio::test]
async fn rename_onto_existing_name_rejected() {
    let db = setup().await;
    let repo = SurrealDashboardRepository::new(db);

    repo.create(create_input("taken")).await.unwrap();
    let other = repo.create(create_input("free")).await.unwrap();

    let err = repo
        .update(
            1,
            11,
            other.id,
            UpdateDashboard {
                name: Some("taken".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DashgridError::AlreadyExists { .. }));

    // The losing rename leaves the record untouched.
    let unchanged = repo.get_by_id(1, 11, other.id).await.unwrap();
    assert_eq!(unchanged.name, "free");
}

#[tokio::test]
async fn assignment_set_replace_roundtrip() {
    let db = setup().await;
    let repo = SurrealDashboardRepository::new(db);

    let dashboard = repo.create(create_input("Access")).await.unwrap();

    let initial = repo.get_assigned_users(1, 11, dashboard.id).await.unwrap();
    assert!(initial.is_empty());

    let first: BTreeSet<i64> = [1, 2, 3].into_iter().collect();
    repo.set_assigned_users(1, 11, dashboard.id, &first)
        .await
        .unwrap();
    assert_eq!(
        repo.get_assigned_users(1, 11, dashboard.id).await.unwrap(),
        first
    );

    // Replacement is wholesale: dropped users disappear, new ones appear.
    let second: BTreeSet<i64> = [2, 4].into_iter().collect();
    repo.set_assigned_users(1, 11, dashboard.id, &second)
        .await
        .unwrap();
    assert_eq!(
        repo.get_assigned_users(1, 11, dashboard.id).await.unwrap(),
        second
    );
}

#[tokio::test]
async fn subtenant_isolation() {
    let db = setup().await;
    let repo = SurrealDashboardRepository::new(db);

    let dashboard = repo.create(create_input("Isolated")).await.unwrap();

    // Visible in its own subtenant scope.
    assert!(repo.get_by_id(1, 11, dashboard.id).await.is_ok());

    // Invisible from a sibling subtenant.
    let other = repo.get_by_id(1, 12, dashboard.id).await;
    assert!(
        other.is_err(),
        "dashboard should not be visible in another subtenant"
    );

    // Assignments are scoped the same way.
    let assigned: BTreeSet<i64> = [7].into_iter().collect();
    repo.set_assigned_users(1, 11, dashboard.id, &assigned)
        .await
        .unwrap();
    let cross = repo.get_assigned_users(1, 12, dashboard.id).await.unwrap();
    assert!(cross.is_empty());
}
