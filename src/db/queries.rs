use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::{Database, DbError};

// ---------------------------------------------------------------------------
// Row types: flat structs that map directly to table columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRow {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_public: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub due_date: Option<String>,
    pub user_id: Option<String>,
    pub position: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityRow {
    pub id: String,
    pub task_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: Option<String>,
    pub content: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Activity joined with task and project metadata for the workspace feed.
#[derive(Debug, Clone, Serialize)]
pub struct FilteredActivityRow {
    pub id: String,
    pub task_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: Option<String>,
    pub content: Option<String>,
    pub created_at: String,
    pub task_title: Option<String>,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub project_slug: Option<String>,
    pub workspace_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub resource_id: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelRow {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    pub color: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeEntryRow {
    pub id: String,
    pub task_id: String,
    pub user_id: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub duration: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElseAccountRow {
    pub user_id: String,
    pub tenant_id: Option<String>,
    pub extension_id: Option<String>,
    pub updated_at: String,
}

// ---------------------------------------------------------------------------
// Project queries
// ---------------------------------------------------------------------------

pub fn insert_project(db: &Database, row: &ProjectRow) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "INSERT INTO projects (id, workspace_id, name, slug, description, icon, is_public, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            row.id,
            row.workspace_id,
            row.name,
            row.slug,
            row.description,
            row.icon,
            row.is_public,
            row.created_at
        ],
    )?;
    Ok(())
}

fn project_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProjectRow> {
    Ok(ProjectRow {
        id: row.get(0)?,
        workspace_id: row.get(1)?,
        name: row.get(2)?,
        slug: row.get(3)?,
        description: row.get(4)?,
        icon: row.get(5)?,
        is_public: row.get(6)?,
        created_at: row.get(7)?,
    })
}

const PROJECT_COLUMNS: &str =
    "id, workspace_id, name, slug, description, icon, is_public, created_at";

pub fn get_project(db: &Database, id: &str) -> Result<Option<ProjectRow>, DbError> {
    let conn = db.conn();
    let mut stmt =
        conn.prepare(&format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"))?;
    Ok(stmt
        .query_row(params![id], |row| project_from_row(row))
        .optional()?)
}

pub fn list_projects(db: &Database, workspace_id: &str) -> Result<Vec<ProjectRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE workspace_id = ?1 ORDER BY created_at"
    ))?;
    let rows = stmt
        .query_map(params![workspace_id], |row| project_from_row(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn update_project(db: &Database, row: &ProjectRow) -> Result<(), DbError> {
    let conn = db.conn();
    let updated = conn.execute(
        "UPDATE projects SET name = ?2, slug = ?3, description = ?4, icon = ?5, is_public = ?6
         WHERE id = ?1",
        params![
            row.id,
            row.name,
            row.slug,
            row.description,
            row.icon,
            row.is_public
        ],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("project {}", row.id)));
    }
    Ok(())
}

/// Delete a project. Tasks and their derived rows go with it via foreign
/// key cascades.
pub fn delete_project(db: &Database, id: &str) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Task queries
// ---------------------------------------------------------------------------

const TASK_COLUMNS: &str = "id, project_id, title, description, status, priority, due_date, \
                            user_id, position, created_at, updated_at";

fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status: row.get(4)?,
        priority: row.get(5)?,
        due_date: row.get(6)?,
        user_id: row.get(7)?,
        position: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

pub fn insert_task(db: &Database, row: &TaskRow) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "INSERT INTO tasks (id, project_id, title, description, status, priority, due_date, user_id, position, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            row.id,
            row.project_id,
            row.title,
            row.description,
            row.status,
            row.priority,
            row.due_date,
            row.user_id,
            row.position,
            row.created_at,
            row.updated_at
        ],
    )?;
    Ok(())
}

pub fn get_task(db: &Database, id: &str) -> Result<Option<TaskRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))?;
    Ok(stmt
        .query_row(params![id], |row| task_from_row(row))
        .optional()?)
}

pub fn list_tasks(db: &Database, project_id: &str) -> Result<Vec<TaskRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = ?1 ORDER BY position, created_at"
    ))?;
    let rows = stmt
        .query_map(params![project_id], |row| task_from_row(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Tasks across every project of a workspace, optionally narrowed by status
/// or assignee.
pub fn list_tasks_by_workspace(
    db: &Database,
    workspace_id: &str,
    status: Option<&str>,
    user_id: Option<&str>,
) -> Result<Vec<TaskRow>, DbError> {
    let conn = db.conn();
    let mut sql = format!(
        "SELECT t.id, t.project_id, t.title, t.description, t.status, t.priority, t.due_date, \
                t.user_id, t.position, t.created_at, t.updated_at
         FROM tasks t
         INNER JOIN projects p ON p.id = t.project_id
         WHERE p.workspace_id = ?1"
    );
    let mut args: Vec<&dyn rusqlite::ToSql> = vec![&workspace_id];
    if let Some(status) = status.as_ref() {
        sql.push_str(&format!(" AND t.status = ?{}", args.len() + 1));
        args.push(status);
    }
    if let Some(user_id) = user_id.as_ref() {
        sql.push_str(&format!(" AND t.user_id = ?{}", args.len() + 1));
        args.push(user_id);
    }
    sql.push_str(" ORDER BY t.project_id, t.position, t.created_at");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(&args[..], |row| task_from_row(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn update_task(db: &Database, row: &TaskRow) -> Result<(), DbError> {
    let conn = db.conn();
    let updated = conn.execute(
        "UPDATE tasks SET project_id = ?2, title = ?3, description = ?4, status = ?5,
                priority = ?6, due_date = ?7, user_id = ?8, position = ?9, updated_at = ?10
         WHERE id = ?1",
        params![
            row.id,
            row.project_id,
            row.title,
            row.description,
            row.status,
            row.priority,
            row.due_date,
            row.user_id,
            row.position,
            row.updated_at
        ],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("task {}", row.id)));
    }
    Ok(())
}

pub fn update_task_field(
    db: &Database,
    id: &str,
    column: TaskColumn,
    value: Option<&str>,
    updated_at: &str,
) -> Result<(), DbError> {
    let conn = db.conn();
    let sql = format!(
        "UPDATE tasks SET {} = ?2, updated_at = ?3 WHERE id = ?1",
        column.as_str()
    );
    let updated = conn.execute(&sql, params![id, value, updated_at])?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("task {id}")));
    }
    Ok(())
}

/// Columns reachable by the per-field update endpoints. Kept as an enum so
/// the SQL is never built from caller-supplied strings.
#[derive(Debug, Clone, Copy)]
pub enum TaskColumn {
    Status,
    Priority,
    Assignee,
    DueDate,
    Title,
    Description,
}

impl TaskColumn {
    fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Assignee => "user_id",
            Self::DueDate => "due_date",
            Self::Title => "title",
            Self::Description => "description",
        }
    }
}

pub fn delete_task(db: &Database, id: &str) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    Ok(())
}

pub fn next_task_position(db: &Database, project_id: &str) -> Result<i64, DbError> {
    let conn = db.conn();
    let max: Option<i64> = conn.query_row(
        "SELECT MAX(position) FROM tasks WHERE project_id = ?1",
        params![project_id],
        |row| row.get(0),
    )?;
    Ok(max.map_or(0, |m| m + 1))
}

// ---------------------------------------------------------------------------
// Activity queries
// ---------------------------------------------------------------------------

const ACTIVITY_COLUMNS: &str = "id, task_id, type, user_id, content, created_at, updated_at";

fn activity_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ActivityRow> {
    Ok(ActivityRow {
        id: row.get(0)?,
        task_id: row.get(1)?,
        kind: row.get(2)?,
        user_id: row.get(3)?,
        content: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub fn insert_activity(db: &Database, row: &ActivityRow) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "INSERT INTO activities (id, task_id, type, user_id, content, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            row.id,
            row.task_id,
            row.kind,
            row.user_id,
            row.content,
            row.created_at,
            row.updated_at
        ],
    )?;
    Ok(())
}

pub fn get_activity(db: &Database, id: &str) -> Result<Option<ActivityRow>, DbError> {
    let conn = db.conn();
    let mut stmt =
        conn.prepare(&format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = ?1"))?;
    Ok(stmt
        .query_row(params![id], |row| activity_from_row(row))
        .optional()?)
}

pub fn list_activities(db: &Database, task_id: &str) -> Result<Vec<ActivityRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(&format!(
        "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE task_id = ?1 ORDER BY created_at"
    ))?;
    let rows = stmt
        .query_map(params![task_id], |row| activity_from_row(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Workspace-wide activity feed with optional project / acting-user /
/// recency filters, newest first.
pub fn list_activities_filtered(
    db: &Database,
    workspace_id: &str,
    project_id: Option<&str>,
    user_id: Option<&str>,
    created_after: Option<&str>,
) -> Result<Vec<FilteredActivityRow>, DbError> {
    let conn = db.conn();
    let mut sql = String::from(
        "SELECT a.id, a.task_id, a.type, a.user_id, a.content, a.created_at,
                t.title, p.id, p.name, p.slug, p.workspace_id
         FROM activities a
         INNER JOIN tasks t ON t.id = a.task_id
         INNER JOIN projects p ON p.id = t.project_id
         WHERE p.workspace_id = ?1",
    );
    let mut args: Vec<&dyn rusqlite::ToSql> = vec![&workspace_id];
    if let Some(project_id) = project_id.as_ref() {
        sql.push_str(&format!(" AND p.id = ?{}", args.len() + 1));
        args.push(project_id);
    }
    if let Some(user_id) = user_id.as_ref() {
        sql.push_str(&format!(" AND a.user_id = ?{}", args.len() + 1));
        args.push(user_id);
    }
    if let Some(created_after) = created_after.as_ref() {
        sql.push_str(&format!(" AND a.created_at > ?{}", args.len() + 1));
        args.push(created_after);
    }
    sql.push_str(" ORDER BY a.created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(&args[..], |row| {
            Ok(FilteredActivityRow {
                id: row.get(0)?,
                task_id: row.get(1)?,
                kind: row.get(2)?,
                user_id: row.get(3)?,
                content: row.get(4)?,
                created_at: row.get(5)?,
                task_title: row.get(6)?,
                project_id: row.get(7)?,
                project_name: row.get(8)?,
                project_slug: row.get(9)?,
                workspace_id: row.get(10)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn update_activity_content(
    db: &Database,
    id: &str,
    content: &str,
    updated_at: &str,
) -> Result<(), DbError> {
    let conn = db.conn();
    let updated = conn.execute(
        "UPDATE activities SET content = ?2, updated_at = ?3 WHERE id = ?1",
        params![id, content, updated_at],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("activity {id}")));
    }
    Ok(())
}

pub fn delete_activity(db: &Database, id: &str) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute("DELETE FROM activities WHERE id = ?1", params![id])?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Notification queries
// ---------------------------------------------------------------------------

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, title, content, type, resource_id, is_read, created_at";

fn notification_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<NotificationRow> {
    Ok(NotificationRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        kind: row.get(4)?,
        resource_id: row.get(5)?,
        is_read: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub fn insert_notification(db: &Database, row: &NotificationRow) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "INSERT INTO notifications (id, user_id, title, content, type, resource_id, is_read, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            row.id,
            row.user_id,
            row.title,
            row.content,
            row.kind,
            row.resource_id,
            row.is_read,
            row.created_at
        ],
    )?;
    Ok(())
}

pub fn list_notifications(db: &Database, user_id: &str) -> Result<Vec<NotificationRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(&format!(
        "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE user_id = ?1 ORDER BY created_at DESC"
    ))?;
    let rows = stmt
        .query_map(params![user_id], |row| notification_from_row(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn unread_notification_count(db: &Database, user_id: &str) -> Result<i64, DbError> {
    let conn = db.conn();
    let count = conn.query_row(
        "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND is_read = 0",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Flip the read flag on one notification. Scoped to the owning user so one
/// user can never mark another user's notification.
pub fn mark_notification_read(db: &Database, id: &str, user_id: &str) -> Result<(), DbError> {
    let conn = db.conn();
    let updated = conn.execute(
        "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("notification {id}")));
    }
    Ok(())
}

pub fn mark_all_notifications_read(db: &Database, user_id: &str) -> Result<usize, DbError> {
    let conn = db.conn();
    let updated = conn.execute(
        "UPDATE notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
        params![user_id],
    )?;
    Ok(updated)
}

pub fn clear_notifications(db: &Database, user_id: &str) -> Result<usize, DbError> {
    let conn = db.conn();
    let deleted = conn.execute(
        "DELETE FROM notifications WHERE user_id = ?1",
        params![user_id],
    )?;
    Ok(deleted)
}

// ---------------------------------------------------------------------------
// Label queries
// ---------------------------------------------------------------------------

const LABEL_COLUMNS: &str = "id, workspace_id, name, color, created_at";

fn label_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LabelRow> {
    Ok(LabelRow {
        id: row.get(0)?,
        workspace_id: row.get(1)?,
        name: row.get(2)?,
        color: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn insert_label(db: &Database, row: &LabelRow) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "INSERT INTO labels (id, workspace_id, name, color, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![row.id, row.workspace_id, row.name, row.color, row.created_at],
    )?;
    Ok(())
}

pub fn list_labels(db: &Database, workspace_id: &str) -> Result<Vec<LabelRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(&format!(
        "SELECT {LABEL_COLUMNS} FROM labels WHERE workspace_id = ?1 ORDER BY name"
    ))?;
    let rows = stmt
        .query_map(params![workspace_id], |row| label_from_row(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn delete_label(db: &Database, id: &str) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute("DELETE FROM labels WHERE id = ?1", params![id])?;
    Ok(())
}

pub fn add_label_to_task(db: &Database, task_id: &str, label_id: &str) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "INSERT OR IGNORE INTO task_labels (task_id, label_id) VALUES (?1, ?2)",
        params![task_id, label_id],
    )?;
    Ok(())
}

pub fn remove_label_from_task(db: &Database, task_id: &str, label_id: &str) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "DELETE FROM task_labels WHERE task_id = ?1 AND label_id = ?2",
        params![task_id, label_id],
    )?;
    Ok(())
}

pub fn list_labels_for_task(db: &Database, task_id: &str) -> Result<Vec<LabelRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(
        "SELECT l.id, l.workspace_id, l.name, l.color, l.created_at
         FROM labels l
         INNER JOIN task_labels tl ON tl.label_id = l.id
         WHERE tl.task_id = ?1
         ORDER BY l.name",
    )?;
    let rows = stmt
        .query_map(params![task_id], |row| label_from_row(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Time entry queries
// ---------------------------------------------------------------------------

const TIME_ENTRY_COLUMNS: &str =
    "id, task_id, user_id, description, start_time, end_time, duration, created_at";

fn time_entry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TimeEntryRow> {
    Ok(TimeEntryRow {
        id: row.get(0)?,
        task_id: row.get(1)?,
        user_id: row.get(2)?,
        description: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        duration: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub fn insert_time_entry(db: &Database, row: &TimeEntryRow) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "INSERT INTO time_entries (id, task_id, user_id, description, start_time, end_time, duration, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            row.id,
            row.task_id,
            row.user_id,
            row.description,
            row.start_time,
            row.end_time,
            row.duration,
            row.created_at
        ],
    )?;
    Ok(())
}

pub fn get_time_entry(db: &Database, id: &str) -> Result<Option<TimeEntryRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(&format!(
        "SELECT {TIME_ENTRY_COLUMNS} FROM time_entries WHERE id = ?1"
    ))?;
    Ok(stmt
        .query_row(params![id], |row| time_entry_from_row(row))
        .optional()?)
}

pub fn list_time_entries(db: &Database, task_id: &str) -> Result<Vec<TimeEntryRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(&format!(
        "SELECT {TIME_ENTRY_COLUMNS} FROM time_entries WHERE task_id = ?1 ORDER BY start_time"
    ))?;
    let rows = stmt
        .query_map(params![task_id], |row| time_entry_from_row(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn finish_time_entry(
    db: &Database,
    id: &str,
    end_time: &str,
    duration: i64,
) -> Result<(), DbError> {
    let conn = db.conn();
    let updated = conn.execute(
        "UPDATE time_entries SET end_time = ?2, duration = ?3 WHERE id = ?1",
        params![id, end_time, duration],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("time entry {id}")));
    }
    Ok(())
}

pub fn delete_time_entry(db: &Database, id: &str) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute("DELETE FROM time_entries WHERE id = ?1", params![id])?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Else account queries
// ---------------------------------------------------------------------------

pub fn get_else_account(db: &Database, user_id: &str) -> Result<Option<ElseAccountRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(
        "SELECT user_id, tenant_id, extension_id, updated_at FROM else_accounts WHERE user_id = ?1",
    )?;
    Ok(stmt
        .query_row(params![user_id], |row| {
            Ok(ElseAccountRow {
                user_id: row.get(0)?,
                tenant_id: row.get(1)?,
                extension_id: row.get(2)?,
                updated_at: row.get(3)?,
            })
        })
        .optional()?)
}

pub fn upsert_else_account(db: &Database, row: &ElseAccountRow) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "INSERT INTO else_accounts (user_id, tenant_id, extension_id, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id) DO UPDATE SET
            tenant_id = excluded.tenant_id,
            extension_id = excluded.extension_id,
            updated_at = excluded.updated_at",
        params![row.user_id, row.tenant_id, row.extension_id, row.updated_at],
    )?;
    Ok(())
}
