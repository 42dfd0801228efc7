use serde::Serialize;

// ---------------------------------------------------------------------------
// Event names (the internal wire contract)
// ---------------------------------------------------------------------------

pub const TASK_CREATED: &str = "task.created";
pub const TASK_STATUS_CHANGED: &str = "task.status_changed";
pub const TASK_PRIORITY_CHANGED: &str = "task.priority_changed";
pub const TASK_ASSIGNEE_CHANGED: &str = "task.assignee_changed";
pub const TASK_UNASSIGNED: &str = "task.unassigned";
pub const TASK_DUE_DATE_CHANGED: &str = "task.due_date_changed";
pub const TASK_TITLE_CHANGED: &str = "task.title_changed";
pub const TASK_DESCRIPTION_CHANGED: &str = "task.description_changed";

/// A completed task state change, published after the row is committed.
///
/// Events are ephemeral: they are never persisted themselves, only the
/// records the subscribers derive from them. Every variant carries the task
/// id, the acting user (None for system actions) and the task title for
/// display, plus the old/new values specific to the change.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    Created {
        task_id: String,
        user_id: Option<String>,
        title: String,
        /// Pre-rendered activity content, e.g. "created this task".
        content: String,
    },
    StatusChanged {
        task_id: String,
        user_id: Option<String>,
        title: String,
        old_status: String,
        new_status: String,
    },
    PriorityChanged {
        task_id: String,
        user_id: Option<String>,
        title: String,
        old_priority: String,
        new_priority: String,
    },
    AssigneeChanged {
        task_id: String,
        user_id: Option<String>,
        title: String,
        old_assignee_id: Option<String>,
        new_assignee_id: String,
        /// Display name resolved via the member directory before publishing,
        /// so subscribers never need a second lookup.
        new_assignee_name: Option<String>,
    },
    Unassigned {
        task_id: String,
        user_id: Option<String>,
        title: String,
    },
    DueDateChanged {
        task_id: String,
        user_id: Option<String>,
        title: String,
        old_due_date: Option<String>,
        new_due_date: Option<String>,
    },
    TitleChanged {
        task_id: String,
        user_id: Option<String>,
        title: String,
        old_title: String,
        new_title: String,
    },
    DescriptionChanged {
        task_id: String,
        user_id: Option<String>,
        title: String,
    },
}

impl TaskEvent {
    /// The event name handlers subscribe under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => TASK_CREATED,
            Self::StatusChanged { .. } => TASK_STATUS_CHANGED,
            Self::PriorityChanged { .. } => TASK_PRIORITY_CHANGED,
            Self::AssigneeChanged { .. } => TASK_ASSIGNEE_CHANGED,
            Self::Unassigned { .. } => TASK_UNASSIGNED,
            Self::DueDateChanged { .. } => TASK_DUE_DATE_CHANGED,
            Self::TitleChanged { .. } => TASK_TITLE_CHANGED,
            Self::DescriptionChanged { .. } => TASK_DESCRIPTION_CHANGED,
        }
    }

    /// The `type` discriminator stored on derived activity rows. Mirrors the
    /// event name without the `task.` prefix.
    pub fn activity_type(&self) -> &'static str {
        self.name()
            .strip_prefix("task.")
            .unwrap_or_else(|| self.name())
    }

    pub fn task_id(&self) -> &str {
        match self {
            Self::Created { task_id, .. }
            | Self::StatusChanged { task_id, .. }
            | Self::PriorityChanged { task_id, .. }
            | Self::AssigneeChanged { task_id, .. }
            | Self::Unassigned { task_id, .. }
            | Self::DueDateChanged { task_id, .. }
            | Self::TitleChanged { task_id, .. }
            | Self::DescriptionChanged { task_id, .. } => task_id,
        }
    }

    /// The acting user, if the change was made by a user rather than the
    /// system.
    pub fn actor(&self) -> Option<&str> {
        match self {
            Self::Created { user_id, .. }
            | Self::StatusChanged { user_id, .. }
            | Self::PriorityChanged { user_id, .. }
            | Self::AssigneeChanged { user_id, .. }
            | Self::Unassigned { user_id, .. }
            | Self::DueDateChanged { user_id, .. }
            | Self::TitleChanged { user_id, .. }
            | Self::DescriptionChanged { user_id, .. } => user_id.as_deref(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Created { title, .. }
            | Self::StatusChanged { title, .. }
            | Self::PriorityChanged { title, .. }
            | Self::AssigneeChanged { title, .. }
            | Self::Unassigned { title, .. }
            | Self::DueDateChanged { title, .. }
            | Self::TitleChanged { title, .. }
            | Self::DescriptionChanged { title, .. } => title,
        }
    }
}
