//! Time tracking handlers.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries::{self, TimeEntryRow};
use crate::{AppError, AppState};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTimeEntry {
    pub description: Option<String>,
}

/// Start the clock on a task. The entry stays open until `stop_entry`.
pub fn start_entry(
    state: &AppState,
    actor: &str,
    task_id: &str,
    input: NewTimeEntry,
) -> Result<TimeEntryRow, AppError> {
    if queries::get_task(&state.db, task_id)?.is_none() {
        return Err(AppError::NotFound(format!("task {task_id}")));
    }

    let now = Utc::now().to_rfc3339();
    let row = TimeEntryRow {
        id: Uuid::new_v4().to_string(),
        task_id: task_id.to_string(),
        user_id: actor.to_string(),
        description: input.description,
        start_time: now.clone(),
        end_time: None,
        duration: None,
        created_at: now,
    };
    queries::insert_time_entry(&state.db, &row)?;
    Ok(row)
}

/// Stop an open entry, recording the end time and the elapsed seconds.
pub fn stop_entry(state: &AppState, id: &str) -> Result<TimeEntryRow, AppError> {
    let entry = queries::get_time_entry(&state.db, id)?
        .ok_or_else(|| AppError::NotFound(format!("time entry {id}")))?;
    if entry.end_time.is_some() {
        return Err(AppError::Invalid(format!("time entry {id} already stopped")));
    }

    let started = DateTime::parse_from_rfc3339(&entry.start_time)
        .map_err(|e| AppError::Invalid(format!("corrupt start time on entry {id}: {e}")))?;
    let ended = Utc::now();
    let duration = (ended - started.with_timezone(&Utc)).num_seconds().max(0);
    let end_time = ended.to_rfc3339();

    queries::finish_time_entry(&state.db, id, &end_time, duration)?;

    Ok(TimeEntryRow {
        end_time: Some(end_time),
        duration: Some(duration),
        ..entry
    })
}

pub fn list_entries(state: &AppState, task_id: &str) -> Result<Vec<TimeEntryRow>, AppError> {
    Ok(queries::list_time_entries(&state.db, task_id)?)
}

pub fn delete_entry(state: &AppState, id: &str) -> Result<(), AppError> {
    queries::delete_time_entry(&state.db, id)?;
    Ok(())
}
