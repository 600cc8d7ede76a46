//! Integration tests for the Widget repository using in-memory
//! SurrealDB.

use dashgrid_core::error::DashgridError;
use dashgrid_core::models::widget::{CreateWidget, WidgetKind};
use dashgrid_core::repository::WidgetRepository;
use dashgrid_db::repository::SurrealWidgetRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> SurrealWidgetRepository<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    dashgrid_db::run_migrations(&db).await.unwrap();

    SurrealWidgetRepository::new(db)
}

#[tokio::test]
async fn available_widgets_mix_system_and_tenant_custom() {
    let repo = setup().await;

    repo.create_system("Line chart".into()).await.unwrap();
    repo.create_system("KPI tile".into()).await.unwrap();
    repo.create_custom(CreateWidget {
        tenant_id: 1,
        subtenant_id: 11,
        name: "Revenue by region".into(),
    })
    .await
    .unwrap();
    // Another tenant's custom widget must not leak.
    repo.create_custom(CreateWidget {
        tenant_id: 2,
        subtenant_id: 21,
        name: "Private widget".into(),
    })
    .await
    .unwrap();

    let available = repo.list_available(1, 11).await.unwrap();
    assert_eq!(available.len(), 3);
    assert_eq!(
        available
            .iter()
            .filter(|w| w.kind == WidgetKind::System)
            .count(),
        2
    );
    assert!(available.iter().any(|w| w.name == "Revenue by region"));
    assert!(!available.iter().any(|w| w.name == "Private widget"));
}

#[tokio::test]
async fn custom_widget_roundtrip_and_delete() {
    let repo = setup().await;

    let widget = repo
        .create_custom(CreateWidget {
            tenant_id: 1,
            subtenant_id: 11,
            name: "Churn funnel".into(),
        })
        .await
        .unwrap();
    assert_eq!(widget.kind, WidgetKind::Custom);

    let fetched = repo.get_by_id(1, 11, widget.id).await.unwrap();
    assert_eq!(fetched.name, "Churn funnel");

    repo.delete_custom(1, 11, widget.id).await.unwrap();
    let err = repo.get_by_id(1, 11, widget.id).await.unwrap_err();
    assert!(matches!(err, DashgridError::NotFound { .. }));
}

#[tokio::test]
async fn system_widgets_cannot_be_deleted() {
    let repo = setup().await;

    let system = repo.create_system("Line chart".into()).await.unwrap();

    // delete_custom only touches Custom rows; the system widget stays.
    repo.delete_custom(1, 11, system.id).await.unwrap();
    let fetched = repo.get_by_id(1, 11, system.id).await.unwrap();
    assert_eq!(fetched.kind, WidgetKind::System);
}
