//! Activity-log subscriber.
//!
//! Turns every task lifecycle event into one persisted, human-readable audit
//! entry ("changed the status from To Do to In Progress"). Comments share the
//! same table with `type = "comment"` but are written by their own handlers
//! in `api::activities`, not through the bus.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::bus::{EventBus, TaskEvent};
use crate::db::{queries, Database};

const SUBSCRIBED_EVENTS: &[&str] = &[
    crate::bus::TASK_CREATED,
    crate::bus::TASK_STATUS_CHANGED,
    crate::bus::TASK_PRIORITY_CHANGED,
    crate::bus::TASK_ASSIGNEE_CHANGED,
    crate::bus::TASK_UNASSIGNED,
    crate::bus::TASK_DUE_DATE_CHANGED,
    crate::bus::TASK_TITLE_CHANGED,
    crate::bus::TASK_DESCRIPTION_CHANGED,
];

/// Register the activity writer for every task lifecycle event. Called once
/// at startup.
pub fn register(bus: &EventBus, db: Arc<Database>) {
    for event_name in SUBSCRIBED_EVENTS {
        let db = db.clone();
        bus.subscribe(event_name, move |event| {
            record_activity(&db, event)?;
            Ok(())
        });
    }
}

fn record_activity(db: &Database, event: &TaskEvent) -> Result<(), crate::db::DbError> {
    let now = Utc::now().to_rfc3339();
    queries::insert_activity(
        db,
        &queries::ActivityRow {
            id: Uuid::new_v4().to_string(),
            task_id: event.task_id().to_string(),
            kind: event.activity_type().to_string(),
            user_id: event.actor().map(str::to_string),
            content: Some(render_content(event)),
            created_at: now.clone(),
            updated_at: now,
        },
    )
}

/// The audit sentence for an event. Enumerated status/priority slugs are
/// normalized to title case before interpolation.
pub fn render_content(event: &TaskEvent) -> String {
    match event {
        TaskEvent::Created { content, .. } => content.clone(),
        TaskEvent::StatusChanged {
            old_status,
            new_status,
            ..
        } => format!(
            "changed the status from {} to {}",
            normal_case(old_status),
            normal_case(new_status)
        ),
        TaskEvent::PriorityChanged {
            old_priority,
            new_priority,
            ..
        } => format!(
            "changed the priority from {} to {}",
            normal_case(old_priority),
            normal_case(new_priority)
        ),
        TaskEvent::AssigneeChanged {
            new_assignee_id,
            new_assignee_name,
            ..
        } => {
            let name = new_assignee_name.as_deref().unwrap_or(new_assignee_id);
            format!("assigned the task to {name}")
        }
        TaskEvent::Unassigned { .. } => "unassigned the task".to_string(),
        TaskEvent::DueDateChanged { new_due_date, .. } => match new_due_date {
            Some(date) => format!("changed the due date to {}", short_date(date)),
            None => "removed the due date".to_string(),
        },
        TaskEvent::TitleChanged {
            old_title,
            new_title,
            ..
        } => format!("changed the title from {old_title} to {new_title}"),
        TaskEvent::DescriptionChanged { .. } => "updated the description".to_string(),
    }
}

/// "to-do" → "To Do", "in_progress" → "In Progress".
pub fn normal_case(slug: &str) -> String {
    slug.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// "2025-09-12T00:00:00+00:00" → "Sep 12". Unparseable input is shown as-is.
fn short_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.format("%b %-d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normal_case_title_cases_slugs() {
        assert_eq!(normal_case("to-do"), "To Do");
        assert_eq!(normal_case("in-progress"), "In Progress");
        assert_eq!(normal_case("in_review"), "In Review");
        assert_eq!(normal_case("done"), "Done");
        assert_eq!(normal_case(""), "");
    }

    #[test]
    fn status_change_renders_title_cased_sentence() {
        let event = TaskEvent::StatusChanged {
            task_id: "t1".into(),
            user_id: Some("u1".into()),
            title: "Fix login".into(),
            old_status: "to-do".into(),
            new_status: "in-progress".into(),
        };
        assert_eq!(
            render_content(&event),
            "changed the status from To Do to In Progress"
        );
    }

    #[test]
    fn priority_change_normalizes_slugs_too() {
        let event = TaskEvent::PriorityChanged {
            task_id: "t1".into(),
            user_id: Some("u1".into()),
            title: "Fix login".into(),
            old_priority: "low".into(),
            new_priority: "high".into(),
        };
        assert_eq!(render_content(&event), "changed the priority from Low to High");
    }

    #[test]
    fn assignee_sentence_prefers_display_name_over_id() {
        let named = TaskEvent::AssigneeChanged {
            task_id: "t1".into(),
            user_id: Some("u1".into()),
            title: "Fix login".into(),
            old_assignee_id: None,
            new_assignee_id: "u2".into(),
            new_assignee_name: Some("Jane Doe".into()),
        };
        assert_eq!(render_content(&named), "assigned the task to Jane Doe");

        let unnamed = TaskEvent::AssigneeChanged {
            task_id: "t1".into(),
            user_id: Some("u1".into()),
            title: "Fix login".into(),
            old_assignee_id: None,
            new_assignee_id: "u2".into(),
            new_assignee_name: None,
        };
        assert_eq!(render_content(&unnamed), "assigned the task to u2");
    }

    #[test]
    fn due_date_renders_short_date_or_removal() {
        let set = TaskEvent::DueDateChanged {
            task_id: "t1".into(),
            user_id: Some("u1".into()),
            title: "Fix login".into(),
            old_due_date: None,
            new_due_date: Some("2025-09-12T00:00:00+00:00".into()),
        };
        assert_eq!(render_content(&set), "changed the due date to Sep 12");

        let removed = TaskEvent::DueDateChanged {
            task_id: "t1".into(),
            user_id: Some("u1".into()),
            title: "Fix login".into(),
            old_due_date: Some("2025-09-12T00:00:00+00:00".into()),
            new_due_date: None,
        };
        assert_eq!(render_content(&removed), "removed the due date");
    }
}
