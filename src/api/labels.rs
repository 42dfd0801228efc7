//! Label handlers: workspace-level label definitions plus the task
//! attachment table.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries::{self, LabelRow};
use crate::{AppError, AppState};

#[derive(Debug, Clone, Deserialize)]
pub struct NewLabel {
    pub workspace_id: String,
    pub name: String,
    pub color: String,
}

pub fn create_label(state: &AppState, input: NewLabel) -> Result<LabelRow, AppError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Invalid("label name is required".to_string()));
    }

    let row = LabelRow {
        id: Uuid::new_v4().to_string(),
        workspace_id: input.workspace_id,
        name: name.to_string(),
        color: input.color,
        created_at: Utc::now().to_rfc3339(),
    };
    queries::insert_label(&state.db, &row)?;
    Ok(row)
}

pub fn list_labels(state: &AppState, workspace_id: &str) -> Result<Vec<LabelRow>, AppError> {
    Ok(queries::list_labels(&state.db, workspace_id)?)
}

pub fn delete_label(state: &AppState, id: &str) -> Result<(), AppError> {
    queries::delete_label(&state.db, id)?;
    Ok(())
}

/// Attach a label to a task. Attaching twice is a no-op.
pub fn add_label(state: &AppState, task_id: &str, label_id: &str) -> Result<(), AppError> {
    ensure_task_exists(state, task_id)?;
    queries::add_label_to_task(&state.db, task_id, label_id)?;
    Ok(())
}

pub fn remove_label(state: &AppState, task_id: &str, label_id: &str) -> Result<(), AppError> {
    queries::remove_label_from_task(&state.db, task_id, label_id)?;
    Ok(())
}

pub fn list_labels_for_task(state: &AppState, task_id: &str) -> Result<Vec<LabelRow>, AppError> {
    ensure_task_exists(state, task_id)?;
    Ok(queries::list_labels_for_task(&state.db, task_id)?)
}

fn ensure_task_exists(state: &AppState, task_id: &str) -> Result<(), AppError> {
    if queries::get_task(&state.db, task_id)?.is_none() {
        return Err(AppError::NotFound(format!("task {task_id}")));
    }
    Ok(())
}
