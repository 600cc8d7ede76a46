//! DASHGRID Core — domain models, repository trait definitions, and the
//! access-rule reconciler.
//!
//! The reconciler ([`access`]) is pure and synchronous: it derives
//! human-meaningful grouping rules (Profile, Role, User) from the flat
//! per-dashboard user-assignment set, and flattens edited rules back to
//! that set on save. Everything it needs is passed in by value; it
//! performs no I/O and cannot fail.

pub mod access;
pub mod editor;
pub mod error;
pub mod models;
pub mod repository;

pub use error::{DashgridError, DashgridResult};
