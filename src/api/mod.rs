//! Typed handler surface.
//!
//! One module per resource, mirroring the REST routes the external HTTP
//! layer exposes. Handlers take `AppState` plus the authenticated user id
//! and return serializable rows/views or `AppError`. Task mutation handlers
//! additionally publish domain events after committing.

pub mod activities;
pub mod extensions;
pub mod labels;
pub mod notifications;
pub mod projects;
pub mod tasks;
pub mod time_entries;
