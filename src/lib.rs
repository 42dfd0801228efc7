//! Kaneo backend library.
//!
//! Handler surface and domain core for the Kaneo project-management app:
//! - `api`: typed handlers the external HTTP layer calls
//! - `bus`: the domain event pipeline (publish/subscribe)
//! - `activity` / `notification`: event subscribers deriving audit entries
//!   and per-user notifications
//! - `db`: SQLite persistence for projects, tasks, and derived records
//! - `else_api`: client for the Else tenant/extension provisioning SaaS
//! - `members`: lookup seam into the external auth/membership system
//!
//! Authentication, sessions, organization membership, request validation,
//! and routing all live in external collaborators; this crate assumes an
//! authenticated user id arrives with each call.

pub mod activity;
pub mod api;
pub mod bus;
pub mod config;
pub mod db;
pub mod else_api;
pub mod members;
pub mod notification;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde::Serialize;

use bus::EventBus;
use config::Config;
use db::Database;
use else_api::ElseClient;
use members::MemberDirectory;

// ---------------------------------------------------------------------------
// Shared error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Db(#[from] db::DbError),
    #[error("{0}")]
    Else(#[from] else_api::ElseError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("{0}")]
    Invalid(String),
}

impl Serialize for AppError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub db: Arc<Database>,
    pub bus: Arc<EventBus>,
    pub members: Arc<dyn MemberDirectory>,
    pub else_client: Arc<ElseClient>,
}

impl AppState {
    /// Wire up shared state and register the event subscribers. Registration
    /// happens exactly once here; the bus is append-only afterwards.
    pub fn new(
        db: Arc<Database>,
        members: Arc<dyn MemberDirectory>,
        else_client: Arc<ElseClient>,
    ) -> Self {
        let bus = Arc::new(EventBus::new());
        activity::register(&bus, db.clone());
        notification::register(&bus, db.clone());
        Self {
            db,
            bus,
            members,
            else_client,
        }
    }

    /// Open the configured database and build state from environment
    /// configuration.
    pub fn from_config(
        config: &Config,
        members: Arc<dyn MemberDirectory>,
    ) -> Result<Self, AppError> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Invalid(format!(
                    "failed to create data directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let db = Arc::new(Database::open(&config.database_path)?);
        let else_client = Arc::new(ElseClient::new(
            config.else_base_url.clone(),
            config.else_api_key.clone(),
        ));
        Ok(Self::new(db, members, else_client))
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins when set.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kaneo=debug,info".parse().expect("valid env filter")),
        )
        .init();
}
