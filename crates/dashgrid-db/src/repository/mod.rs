//! SurrealDB implementations of the `dashgrid-core` repository traits.

mod dashboard;
mod directory;
mod session;
mod tenant;
mod widget;

pub use dashboard::SurrealDashboardRepository;
pub use directory::SurrealDirectoryRepository;
pub use session::SurrealSessionRepository;
pub use tenant::SurrealTenantRepository;
pub use widget::SurrealWidgetRepository;
