//! Notification subscriber.
//!
//! Only assignment events notify: the new assignee gets one persisted,
//! unread notification referencing the task. Reading and clearing are plain
//! CRUD operations in `api::notifications`, outside the bus.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::bus::{EventBus, TaskEvent, TASK_ASSIGNEE_CHANGED};
use crate::db::{queries, Database};

/// Register the notification dispatcher. Called once at startup.
pub fn register(bus: &EventBus, db: Arc<Database>) {
    bus.subscribe(TASK_ASSIGNEE_CHANGED, move |event| {
        let TaskEvent::AssigneeChanged {
            task_id,
            user_id,
            title,
            new_assignee_id,
            ..
        } = event
        else {
            return Ok(());
        };

        // Assigning a task to yourself is not news.
        if user_id.as_deref() == Some(new_assignee_id.as_str()) {
            return Ok(());
        }

        queries::insert_notification(
            &db,
            &queries::NotificationRow {
                id: Uuid::new_v4().to_string(),
                user_id: new_assignee_id.clone(),
                title: title.clone(),
                content: format!("You were assigned to \"{title}\""),
                kind: event.activity_type().to_string(),
                resource_id: Some(task_id.clone()),
                is_read: false,
                created_at: Utc::now().to_rfc3339(),
            },
        )?;
        Ok(())
    });
}
