//! Activity feed handlers and user comments.
//!
//! System activities (status changes, assignments, ...) are written by the
//! event subscribers and are read-only here. Comments are the one activity
//! kind users create and edit directly; edits and deletes are restricted to
//! the comment's author.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries::{self, ActivityRow, FilteredActivityRow};
use crate::{AppError, AppState};

const COMMENT_KIND: &str = "comment";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityFilter {
    pub project_id: Option<String>,
    pub user_id: Option<String>,
    pub created_after: Option<String>,
}

pub fn list_activities(state: &AppState, task_id: &str) -> Result<Vec<ActivityRow>, AppError> {
    Ok(queries::list_activities(&state.db, task_id)?)
}

/// Workspace-wide feed, newest first.
pub fn list_activities_filtered(
    state: &AppState,
    workspace_id: &str,
    filter: &ActivityFilter,
) -> Result<Vec<FilteredActivityRow>, AppError> {
    Ok(queries::list_activities_filtered(
        &state.db,
        workspace_id,
        filter.project_id.as_deref(),
        filter.user_id.as_deref(),
        filter.created_after.as_deref(),
    )?)
}

pub fn create_comment(
    state: &AppState,
    actor: &str,
    task_id: &str,
    content: &str,
) -> Result<ActivityRow, AppError> {
    if queries::get_task(&state.db, task_id)?.is_none() {
        return Err(AppError::NotFound(format!("task {task_id}")));
    }
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::Invalid("comment content is required".to_string()));
    }

    let now = Utc::now().to_rfc3339();
    let row = ActivityRow {
        id: Uuid::new_v4().to_string(),
        task_id: task_id.to_string(),
        kind: COMMENT_KIND.to_string(),
        user_id: Some(actor.to_string()),
        content: Some(content.to_string()),
        created_at: now.clone(),
        updated_at: now,
    };
    queries::insert_activity(&state.db, &row)?;
    Ok(row)
}

pub fn update_comment(
    state: &AppState,
    actor: &str,
    id: &str,
    content: &str,
) -> Result<ActivityRow, AppError> {
    let comment = owned_comment(state, actor, id)?;

    let updated_at = Utc::now().to_rfc3339();
    queries::update_activity_content(&state.db, id, content, &updated_at)?;

    Ok(ActivityRow {
        content: Some(content.to_string()),
        updated_at,
        ..comment
    })
}

pub fn delete_comment(state: &AppState, actor: &str, id: &str) -> Result<(), AppError> {
    owned_comment(state, actor, id)?;
    queries::delete_activity(&state.db, id)?;
    Ok(())
}

/// Fetch an activity and check it is a comment written by `actor`.
fn owned_comment(state: &AppState, actor: &str, id: &str) -> Result<ActivityRow, AppError> {
    let activity = queries::get_activity(&state.db, id)?
        .ok_or_else(|| AppError::NotFound(format!("comment {id}")))?;
    if activity.kind != COMMENT_KIND {
        return Err(AppError::Invalid(format!(
            "activity {id} is not a comment"
        )));
    }
    if activity.user_id.as_deref() != Some(actor) {
        return Err(AppError::Forbidden(
            "only the comment author can modify it".to_string(),
        ));
    }
    Ok(activity)
}
