//! Domain models for DASHGRID.
//!
//! Users, roles, and tenant/subtenant records carry numeric IDs assigned
//! by the upstream directory; records this system creates (dashboards,
//! widgets, sessions) are keyed by UUID.

pub mod dashboard;
pub mod role;
pub mod session;
pub mod tenant;
pub mod user;
pub mod widget;
