//! Domain event pipeline.
//!
//! Task mutation handlers commit their change, then publish a typed
//! [`TaskEvent`] onto the [`EventBus`]. The activity log and notification
//! subscribers each derive their own record from the event:
//!
//! - `EventBus`: event name → registration-ordered handler list
//! - `events`: the exhaustive set of task events (the internal wire contract)
//! - `diff`: old-vs-new task comparison producing tagged field changes
//!
//! Publish runs in-band with the request and is best-effort: a failing
//! subscriber is logged and skipped, never surfaced to the caller.

mod diff;
mod event_bus;
mod events;

pub use diff::{diff_task, FieldChange};
pub use event_bus::{EventBus, SubscriberError};
pub use events::TaskEvent;
pub use events::{
    TASK_ASSIGNEE_CHANGED, TASK_CREATED, TASK_DESCRIPTION_CHANGED, TASK_DUE_DATE_CHANGED,
    TASK_PRIORITY_CHANGED, TASK_STATUS_CHANGED, TASK_TITLE_CHANGED, TASK_UNASSIGNED,
};
