//! Task handlers: CRUD plus the event-publishing mutation paths.
//!
//! Every mutation follows the same shape: pre-read the old row, commit the
//! change, diff old vs. new, and publish one event per field that actually
//! changed. Idempotent updates publish nothing. Publishing happens after the
//! commit and never affects the handler's own result.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::bus::{diff_task, FieldChange, TaskEvent};
use crate::db::queries::{self, TaskColumn, TaskRow};
use crate::{AppError, AppState};

#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub user_id: Option<String>,
}

/// Full-row update, matching `PUT /task/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskUpdate {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub due_date: Option<String>,
    pub project_id: String,
    pub position: i64,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub user_id: Option<String>,
}

pub fn create_task(state: &AppState, actor: &str, input: NewTask) -> Result<TaskRow, AppError> {
    if queries::get_project(&state.db, &input.project_id)?.is_none() {
        return Err(AppError::NotFound(format!("project {}", input.project_id)));
    }

    let now = Utc::now().to_rfc3339();
    let row = TaskRow {
        id: Uuid::new_v4().to_string(),
        project_id: input.project_id.clone(),
        title: input.title,
        description: input.description,
        status: input.status.unwrap_or_else(|| "to-do".to_string()),
        priority: input.priority.unwrap_or_else(|| "low".to_string()),
        due_date: input.due_date,
        user_id: input.user_id.filter(|id| !id.trim().is_empty()),
        position: queries::next_task_position(&state.db, &input.project_id)?,
        created_at: now.clone(),
        updated_at: now,
    };
    queries::insert_task(&state.db, &row)?;

    state.bus.publish(&TaskEvent::Created {
        task_id: row.id.clone(),
        user_id: Some(actor.to_string()),
        title: row.title.clone(),
        content: "created this task".to_string(),
    });

    Ok(row)
}

pub fn get_task(state: &AppState, id: &str) -> Result<TaskRow, AppError> {
    queries::get_task(&state.db, id)?.ok_or_else(|| AppError::NotFound(format!("task {id}")))
}

pub fn list_tasks(state: &AppState, project_id: &str) -> Result<Vec<TaskRow>, AppError> {
    Ok(queries::list_tasks(&state.db, project_id)?)
}

pub fn list_tasks_by_workspace(
    state: &AppState,
    workspace_id: &str,
    status: Option<&str>,
    user_id: Option<&str>,
) -> Result<Vec<TaskRow>, AppError> {
    Ok(queries::list_tasks_by_workspace(
        &state.db,
        workspace_id,
        status,
        user_id,
    )?)
}

/// Full update. Commits the new row, then publishes one event per changed
/// field, in a fixed order: status, priority, assignee, due date, title,
/// description.
pub fn update_task(
    state: &AppState,
    actor: &str,
    id: &str,
    update: TaskUpdate,
) -> Result<TaskRow, AppError> {
    let old = get_task(state, id)?;

    let new_row = TaskRow {
        id: old.id.clone(),
        project_id: update.project_id,
        title: update.title,
        description: update.description,
        status: update.status,
        priority: update.priority,
        due_date: update.due_date,
        user_id: update.user_id.filter(|u| !u.trim().is_empty()),
        position: update.position,
        created_at: old.created_at.clone(),
        updated_at: Utc::now().to_rfc3339(),
    };
    queries::update_task(&state.db, &new_row)?;

    for change in diff_task(&old, &new_row) {
        let event = event_for_change(state, &new_row, actor, change);
        state.bus.publish(&event);
    }

    Ok(new_row)
}

pub fn update_task_status(
    state: &AppState,
    actor: &str,
    id: &str,
    status: &str,
) -> Result<TaskRow, AppError> {
    update_single_field(state, actor, id, TaskColumn::Status, Some(status), |old| {
        (old.status != status).then(|| FieldChange::Status {
            old: old.status.clone(),
            new: status.to_string(),
        })
    })
}

pub fn update_task_priority(
    state: &AppState,
    actor: &str,
    id: &str,
    priority: &str,
) -> Result<TaskRow, AppError> {
    update_single_field(state, actor, id, TaskColumn::Priority, Some(priority), |old| {
        (old.priority != priority).then(|| FieldChange::Priority {
            old: old.priority.clone(),
            new: priority.to_string(),
        })
    })
}

pub fn update_task_assignee(
    state: &AppState,
    actor: &str,
    id: &str,
    user_id: Option<&str>,
) -> Result<TaskRow, AppError> {
    let new_assignee = user_id.map(str::trim).filter(|u| !u.is_empty());
    update_single_field(state, actor, id, TaskColumn::Assignee, new_assignee, |old| {
        let old_assignee = old.user_id.as_deref().filter(|u| !u.trim().is_empty());
        (old_assignee != new_assignee).then(|| FieldChange::Assignee {
            old: old_assignee.map(str::to_string),
            new: new_assignee.map(str::to_string),
        })
    })
}

pub fn update_task_due_date(
    state: &AppState,
    actor: &str,
    id: &str,
    due_date: Option<&str>,
) -> Result<TaskRow, AppError> {
    update_single_field(state, actor, id, TaskColumn::DueDate, due_date, |old| {
        (old.due_date.as_deref() != due_date).then(|| FieldChange::DueDate {
            old: old.due_date.clone(),
            new: due_date.map(str::to_string),
        })
    })
}

pub fn update_task_title(
    state: &AppState,
    actor: &str,
    id: &str,
    title: &str,
) -> Result<TaskRow, AppError> {
    update_single_field(state, actor, id, TaskColumn::Title, Some(title), |old| {
        (old.title != title).then(|| FieldChange::Title {
            old: old.title.clone(),
            new: title.to_string(),
        })
    })
}

pub fn update_task_description(
    state: &AppState,
    actor: &str,
    id: &str,
    description: &str,
) -> Result<TaskRow, AppError> {
    update_single_field(
        state,
        actor,
        id,
        TaskColumn::Description,
        Some(description),
        |old| (old.description != description).then_some(FieldChange::Description),
    )
}

/// Shared path for the per-field endpoints: pre-read, bail out on a no-op,
/// commit the single column, publish the one event.
fn update_single_field(
    state: &AppState,
    actor: &str,
    id: &str,
    column: TaskColumn,
    value: Option<&str>,
    change_if_different: impl FnOnce(&TaskRow) -> Option<FieldChange>,
) -> Result<TaskRow, AppError> {
    let old = get_task(state, id)?;
    let Some(change) = change_if_different(&old) else {
        return Ok(old);
    };

    let updated_at = Utc::now().to_rfc3339();
    queries::update_task_field(&state.db, id, column, value, &updated_at)?;

    let mut new_row = old;
    set_column(&mut new_row, column, value);
    new_row.updated_at = updated_at;

    let event = event_for_change(state, &new_row, actor, change);
    state.bus.publish(&event);

    Ok(new_row)
}

fn set_column(row: &mut TaskRow, column: TaskColumn, value: Option<&str>) {
    match column {
        TaskColumn::Status => row.status = value.unwrap_or_default().to_string(),
        TaskColumn::Priority => row.priority = value.unwrap_or_default().to_string(),
        TaskColumn::Assignee => row.user_id = value.map(str::to_string),
        TaskColumn::DueDate => row.due_date = value.map(str::to_string),
        TaskColumn::Title => row.title = value.unwrap_or_default().to_string(),
        TaskColumn::Description => row.description = value.unwrap_or_default().to_string(),
    }
}

/// Map a detected field change to its event, resolving the new assignee's
/// display name through the member directory so subscribers never need to.
fn event_for_change(
    state: &AppState,
    task: &TaskRow,
    actor: &str,
    change: FieldChange,
) -> TaskEvent {
    let task_id = task.id.clone();
    let user_id = Some(actor.to_string());
    let title = task.title.clone();

    match change {
        FieldChange::Status { old, new } => TaskEvent::StatusChanged {
            task_id,
            user_id,
            title,
            old_status: old,
            new_status: new,
        },
        FieldChange::Priority { old, new } => TaskEvent::PriorityChanged {
            task_id,
            user_id,
            title,
            old_priority: old,
            new_priority: new,
        },
        FieldChange::Assignee {
            old,
            new: Some(new_assignee_id),
        } => {
            let new_assignee_name = state.members.display_name(&new_assignee_id);
            TaskEvent::AssigneeChanged {
                task_id,
                user_id,
                title,
                old_assignee_id: old,
                new_assignee_id,
                new_assignee_name,
            }
        }
        FieldChange::Assignee { new: None, .. } => TaskEvent::Unassigned {
            task_id,
            user_id,
            title,
        },
        FieldChange::DueDate { old, new } => TaskEvent::DueDateChanged {
            task_id,
            user_id,
            title,
            old_due_date: old,
            new_due_date: new,
        },
        FieldChange::Title { old, new } => TaskEvent::TitleChanged {
            task_id,
            user_id,
            title,
            old_title: old,
            new_title: new,
        },
        FieldChange::Description => TaskEvent::DescriptionChanged {
            task_id,
            user_id,
            title,
        },
    }
}

pub fn delete_task(state: &AppState, id: &str) -> Result<TaskRow, AppError> {
    let task = get_task(state, id)?;
    queries::delete_task(&state.db, id)?;
    Ok(task)
}

pub fn export_tasks(state: &AppState, project_id: &str) -> Result<Vec<TaskRow>, AppError> {
    if queries::get_project(&state.db, project_id)?.is_none() {
        return Err(AppError::NotFound(format!("project {project_id}")));
    }
    Ok(queries::list_tasks(&state.db, project_id)?)
}

/// Bulk import into a project. Each imported row publishes its own creation
/// event so the activity log stays complete.
pub fn import_tasks(
    state: &AppState,
    actor: &str,
    project_id: &str,
    tasks: Vec<ImportTask>,
) -> Result<usize, AppError> {
    if queries::get_project(&state.db, project_id)?.is_none() {
        return Err(AppError::NotFound(format!("project {project_id}")));
    }

    let mut imported = 0;
    for task in tasks {
        create_task(
            state,
            actor,
            NewTask {
                project_id: project_id.to_string(),
                title: task.title,
                description: task.description,
                status: Some(task.status),
                priority: task.priority,
                due_date: task.due_date,
                user_id: task.user_id,
            },
        )?;
        imported += 1;
    }
    Ok(imported)
}
