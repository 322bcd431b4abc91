//! tclub - terminal admin console for a football club
//!
//! The crate is split the same way the binary is layered:
//!
//! - [`model`] - club records and form drafts
//! - [`api`] - REST transport and the generic typed resource client
//! - [`resource`] - embedded resource definitions (columns, form fields)
//! - [`page`] - the generic resource-list page (collection, drafts, reconciliation)
//! - [`calendar`] - calendar entries, slot rounding and rescheduling
//! - [`app`], [`event`], [`ui`] - terminal application state, input and rendering

pub mod api;
pub mod app;
pub mod calendar;
pub mod config;
pub mod event;
pub mod model;
pub mod page;
pub mod resource;
pub mod theme;
pub mod ui;

/// Version injected at compile time via TCLUB_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("TCLUB_VERSION") {
    Some(v) => v,
    None => "dev",
};
