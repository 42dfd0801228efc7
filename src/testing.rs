//! Shared fixtures for the pipeline tests.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::db::queries::{self, ProjectRow, TaskRow};
use crate::db::Database;
use crate::else_api::ElseClient;
use crate::members::StaticMembers;
use crate::AppState;

/// Fresh in-memory state with the subscribers registered and a small member
/// directory. The Else client points at a dead address; tests that exercise
/// it spin up their own mock server instead.
pub fn test_state() -> AppState {
    let db = Arc::new(Database::open_in_memory().expect("in-memory db"));
    let members = Arc::new(
        StaticMembers::new()
            .with_member("u1", "John Smith")
            .with_member("u2", "Jane Doe"),
    );
    let else_client = Arc::new(ElseClient::new(
        "http://127.0.0.1:1",
        Some("test-key".to_string()),
    ));
    AppState::new(db, members, else_client)
}

pub fn seed_project(state: &AppState, workspace_id: &str) -> ProjectRow {
    let row = ProjectRow {
        id: Uuid::new_v4().to_string(),
        workspace_id: workspace_id.to_string(),
        name: "Test Project".to_string(),
        slug: "test-project".to_string(),
        description: None,
        icon: None,
        is_public: false,
        created_at: Utc::now().to_rfc3339(),
    };
    queries::insert_project(&state.db, &row).expect("seed project");
    row
}

pub fn seed_task(state: &AppState, project_id: &str) -> TaskRow {
    let now = Utc::now().to_rfc3339();
    let row = TaskRow {
        id: Uuid::new_v4().to_string(),
        project_id: project_id.to_string(),
        title: "Fix login flow".to_string(),
        description: "Session cookie never refreshes".to_string(),
        status: "to-do".to_string(),
        priority: "low".to_string(),
        due_date: None,
        user_id: None,
        position: 0,
        created_at: now.clone(),
        updated_at: now,
    };
    queries::insert_task(&state.db, &row).expect("seed task");
    row
}
