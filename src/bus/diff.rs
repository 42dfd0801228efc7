use crate::db::queries::TaskRow;

/// A single field-level difference between two revisions of a task.
///
/// The set of variants is the exhaustive list of changes the pipeline can
/// report; every variant maps to exactly one event name (with assignee
/// branching into reassignment vs. unassignment downstream).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Status { old: String, new: String },
    Priority { old: String, new: String },
    Assignee { old: Option<String>, new: Option<String> },
    DueDate { old: Option<String>, new: Option<String> },
    Title { old: String, new: String },
    Description,
}

/// Compare the pre-mutation row against the committed row and return one
/// tagged change per field that actually differs. An idempotent update
/// yields an empty list and therefore publishes nothing.
pub fn diff_task(old: &TaskRow, new: &TaskRow) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    if old.status != new.status {
        changes.push(FieldChange::Status {
            old: old.status.clone(),
            new: new.status.clone(),
        });
    }
    if old.priority != new.priority {
        changes.push(FieldChange::Priority {
            old: old.priority.clone(),
            new: new.priority.clone(),
        });
    }

    // Empty string and null both mean "no assignee".
    let old_assignee = normalize_user(&old.user_id);
    let new_assignee = normalize_user(&new.user_id);
    if old_assignee != new_assignee {
        changes.push(FieldChange::Assignee {
            old: old_assignee,
            new: new_assignee,
        });
    }

    if old.due_date != new.due_date {
        changes.push(FieldChange::DueDate {
            old: old.due_date.clone(),
            new: new.due_date.clone(),
        });
    }
    if old.title != new.title {
        changes.push(FieldChange::Title {
            old: old.title.clone(),
            new: new.title.clone(),
        });
    }
    if old.description != new.description {
        changes.push(FieldChange::Description);
    }

    changes
}

fn normalize_user(user_id: &Option<String>) -> Option<String> {
    user_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> TaskRow {
        TaskRow {
            id: "t1".into(),
            project_id: "p1".into(),
            title: "Ship it".into(),
            description: "".into(),
            status: "to-do".into(),
            priority: "low".into(),
            due_date: None,
            user_id: None,
            position: 0,
            created_at: "2025-01-01T00:00:00+00:00".into(),
            updated_at: "2025-01-01T00:00:00+00:00".into(),
        }
    }

    #[test]
    fn identical_rows_produce_no_changes() {
        let old = task();
        assert!(diff_task(&old, &old.clone()).is_empty());
    }

    #[test]
    fn each_changed_field_is_reported_once() {
        let old = task();
        let mut new = task();
        new.status = "in-progress".into();
        new.priority = "high".into();
        new.title = "Ship it now".into();

        let changes = diff_task(&old, &new);
        assert_eq!(
            changes,
            vec![
                FieldChange::Status {
                    old: "to-do".into(),
                    new: "in-progress".into()
                },
                FieldChange::Priority {
                    old: "low".into(),
                    new: "high".into()
                },
                FieldChange::Title {
                    old: "Ship it".into(),
                    new: "Ship it now".into()
                },
            ]
        );
    }

    #[test]
    fn empty_string_assignee_equals_none() {
        let mut old = task();
        old.user_id = Some("".into());
        let new = task();
        assert!(diff_task(&old, &new).is_empty());
    }

    #[test]
    fn assignment_and_unassignment_are_both_assignee_changes() {
        let old = task();
        let mut new = task();
        new.user_id = Some("u2".into());
        assert_eq!(
            diff_task(&old, &new),
            vec![FieldChange::Assignee {
                old: None,
                new: Some("u2".into())
            }]
        );

        assert_eq!(
            diff_task(&new, &old),
            vec![FieldChange::Assignee {
                old: Some("u2".into()),
                new: None
            }]
        );
    }
}
