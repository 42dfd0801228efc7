use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::api::{activities, notifications, tasks};
use crate::bus::TaskEvent;
use crate::testing::{seed_project, seed_task, test_state};

#[test]
fn creating_a_task_records_a_creation_activity() {
    let state = test_state();
    let project = seed_project(&state, "w1");

    let task = tasks::create_task(
        &state,
        "u1",
        tasks::NewTask {
            project_id: project.id.clone(),
            title: "Write onboarding docs".to_string(),
            description: String::new(),
            status: None,
            priority: None,
            due_date: None,
            user_id: None,
        },
    )
    .unwrap();

    let log = activities::list_activities(&state, &task.id).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, "created");
    assert_eq!(log[0].content.as_deref(), Some("created this task"));
    assert_eq!(log[0].user_id.as_deref(), Some("u1"));
}

#[test]
fn idempotent_field_update_publishes_nothing() {
    let state = test_state();
    let project = seed_project(&state, "w1");
    let task = seed_task(&state, &project.id);

    let row = tasks::update_task_status(&state, "u1", &task.id, "to-do").unwrap();
    assert_eq!(row.status, "to-do");
    assert_eq!(row.updated_at, task.updated_at);

    assert!(activities::list_activities(&state, &task.id)
        .unwrap()
        .is_empty());
}

#[test]
fn status_change_writes_one_activity_and_no_notification() {
    let state = test_state();
    let project = seed_project(&state, "w1");
    let task = seed_task(&state, &project.id);

    tasks::update_task_status(&state, "u1", &task.id, "done").unwrap();

    let log = activities::list_activities(&state, &task.id).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, "status_changed");
    assert_eq!(
        log[0].content.as_deref(),
        Some("changed the status from To Do to Done")
    );

    assert!(notifications::list_notifications(&state, "u1")
        .unwrap()
        .is_empty());
}

#[test]
fn assignment_writes_activity_and_notifies_the_assignee() {
    let state = test_state();
    let project = seed_project(&state, "w1");
    let task = seed_task(&state, &project.id);

    let row = tasks::update_task_assignee(&state, "u1", &task.id, Some("u2")).unwrap();
    assert_eq!(row.user_id.as_deref(), Some("u2"));

    let log = activities::list_activities(&state, &task.id).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, "assignee_changed");
    assert_eq!(
        log[0].content.as_deref(),
        Some("assigned the task to Jane Doe")
    );

    let inbox = notifications::list_notifications(&state, "u2").unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].content, "You were assigned to \"Fix login flow\"");
    assert_eq!(inbox[0].resource_id.as_deref(), Some(task.id.as_str()));
    assert!(!inbox[0].is_read);
    assert_eq!(notifications::unread_count(&state, "u2").unwrap(), 1);
}

#[test]
fn self_assignment_skips_the_notification() {
    let state = test_state();
    let project = seed_project(&state, "w1");
    let task = seed_task(&state, &project.id);

    tasks::update_task_assignee(&state, "u2", &task.id, Some("u2")).unwrap();

    assert_eq!(activities::list_activities(&state, &task.id).unwrap().len(), 1);
    assert!(notifications::list_notifications(&state, "u2")
        .unwrap()
        .is_empty());
}

#[test]
fn clearing_the_assignee_publishes_unassigned() {
    let state = test_state();
    let project = seed_project(&state, "w1");
    let task = seed_task(&state, &project.id);

    tasks::update_task_assignee(&state, "u1", &task.id, Some("u2")).unwrap();
    let row = tasks::update_task_assignee(&state, "u1", &task.id, None).unwrap();
    assert_eq!(row.user_id, None);

    let log = activities::list_activities(&state, &task.id).unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].kind, "unassigned");
    assert_eq!(log[1].content.as_deref(), Some("unassigned the task"));

    // Only the original assignment notified.
    assert_eq!(notifications::list_notifications(&state, "u2").unwrap().len(), 1);
}

#[test]
fn blank_assignee_string_counts_as_unassigned() {
    let state = test_state();
    let project = seed_project(&state, "w1");
    let task = seed_task(&state, &project.id);

    let row = tasks::update_task_assignee(&state, "u1", &task.id, Some("  ")).unwrap();
    assert_eq!(row.user_id, None);
    assert!(activities::list_activities(&state, &task.id)
        .unwrap()
        .is_empty());
}

#[test]
fn full_update_publishes_one_event_per_changed_field_in_order() {
    let state = test_state();
    let project = seed_project(&state, "w1");
    let task = seed_task(&state, &project.id);

    tasks::update_task(
        &state,
        "u1",
        &task.id,
        tasks::TaskUpdate {
            title: "Fix session refresh".to_string(),
            description: task.description.clone(),
            status: "in-progress".to_string(),
            priority: "high".to_string(),
            due_date: None,
            project_id: task.project_id.clone(),
            position: task.position,
            user_id: Some("u2".to_string()),
        },
    )
    .unwrap();

    let kinds: Vec<_> = activities::list_activities(&state, &task.id)
        .unwrap()
        .into_iter()
        .map(|a| a.kind)
        .collect();
    assert_eq!(
        kinds,
        vec!["status_changed", "priority_changed", "assignee_changed", "title_changed"]
    );
}

#[test]
fn description_update_persists_the_text_and_publishes_once() {
    let state = test_state();
    let project = seed_project(&state, "w1");
    let task = seed_task(&state, &project.id);

    let row =
        tasks::update_task_description(&state, "u1", &task.id, "New reproduction steps").unwrap();
    assert_eq!(row.description, "New reproduction steps");

    let stored = tasks::get_task(&state, &task.id).unwrap();
    assert_eq!(stored.description, "New reproduction steps");

    let log = activities::list_activities(&state, &task.id).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, "description_changed");
    assert_eq!(log[0].content.as_deref(), Some("updated the description"));
}

#[test]
fn failing_subscriber_never_fails_the_mutation() {
    let state = test_state();
    let project = seed_project(&state, "w1");
    let task = seed_task(&state, &project.id);

    state.bus.subscribe(crate::bus::TASK_STATUS_CHANGED, |_| {
        Err("webhook endpoint unreachable".into())
    });

    let row = tasks::update_task_status(&state, "u1", &task.id, "done").unwrap();
    assert_eq!(row.status, "done");

    // The activity subscriber, registered before the failing one, still ran.
    assert_eq!(activities::list_activities(&state, &task.id).unwrap().len(), 1);
}

#[test]
fn concurrent_writers_both_report_the_same_stale_old_value() {
    // Two request handlers read the same snapshot before either commits.
    // Both diffs are computed against priority "low", so both audit entries
    // claim "from Low" and the row ends on whichever wrote last. That is the
    // accepted last-write-wins behavior; nothing deduplicates the log.
    let state = test_state();
    let project = seed_project(&state, "w1");
    let task = seed_task(&state, &project.id);

    for new_priority in ["high", "urgent"] {
        state.bus.publish(&TaskEvent::PriorityChanged {
            task_id: task.id.clone(),
            user_id: Some("u1".to_string()),
            title: task.title.clone(),
            old_priority: "low".to_string(),
            new_priority: new_priority.to_string(),
        });
    }

    let contents: Vec<_> = activities::list_activities(&state, &task.id)
        .unwrap()
        .into_iter()
        .filter_map(|a| a.content)
        .collect();
    assert_eq!(
        contents,
        vec![
            "changed the priority from Low to High",
            "changed the priority from Low to Urgent"
        ]
    );
}

#[test]
fn parallel_field_updates_do_not_poison_anything() {
    let state = Arc::new(test_state());
    let project = seed_project(&state, "w1");
    let task = seed_task(&state, &project.id);

    std::thread::scope(|scope| {
        for priority in ["medium", "high", "urgent"] {
            let state = state.clone();
            let task_id = task.id.clone();
            scope.spawn(move || {
                tasks::update_task_priority(&state, "u1", &task_id, priority).unwrap();
            });
        }
    });

    let stored = tasks::get_task(&state, &task.id).unwrap();
    assert!(["medium", "high", "urgent"].contains(&stored.priority.as_str()));
    // Every writer that saw a different value logged an activity.
    assert!(!activities::list_activities(&state, &task.id)
        .unwrap()
        .is_empty());
}

#[test]
fn comment_edits_are_restricted_to_the_author() {
    let state = test_state();
    let project = seed_project(&state, "w1");
    let task = seed_task(&state, &project.id);

    let comment = activities::create_comment(&state, "u1", &task.id, "Can repro on staging").unwrap();

    let err = activities::update_comment(&state, "u2", &comment.id, "edited").unwrap_err();
    assert!(matches!(err, crate::AppError::Forbidden(_)));

    let updated = activities::update_comment(&state, "u1", &comment.id, "Repro confirmed").unwrap();
    assert_eq!(updated.content.as_deref(), Some("Repro confirmed"));

    // System activities are not editable as comments.
    tasks::update_task_status(&state, "u1", &task.id, "done").unwrap();
    let system = activities::list_activities(&state, &task.id)
        .unwrap()
        .into_iter()
        .find(|a| a.kind == "status_changed")
        .unwrap();
    let err = activities::update_comment(&state, "u1", &system.id, "nope").unwrap_err();
    assert!(matches!(err, crate::AppError::Invalid(_)));
}

#[test]
fn deleting_a_task_takes_its_activities_and_entries_with_it() {
    let state = test_state();
    let project = seed_project(&state, "w1");
    let task = seed_task(&state, &project.id);

    tasks::update_task_status(&state, "u1", &task.id, "done").unwrap();
    tasks::delete_task(&state, &task.id).unwrap();

    assert!(activities::list_activities(&state, &task.id)
        .unwrap()
        .is_empty());
    assert!(matches!(
        tasks::get_task(&state, &task.id),
        Err(crate::AppError::NotFound(_))
    ));
}

#[test]
fn workspace_feed_includes_project_context() {
    let state = test_state();
    let project = seed_project(&state, "w1");
    let task = seed_task(&state, &project.id);

    tasks::update_task_status(&state, "u1", &task.id, "in-progress").unwrap();

    let feed = activities::list_activities_filtered(
        &state,
        "w1",
        &activities::ActivityFilter::default(),
    )
    .unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].task_title.as_deref(), Some("Fix login flow"));
    assert_eq!(feed[0].project_name.as_deref(), Some("Test Project"));
    assert_eq!(feed[0].workspace_id.as_deref(), Some("w1"));

    let filtered = activities::list_activities_filtered(
        &state,
        "w1",
        &activities::ActivityFilter {
            user_id: Some("someone-else".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(filtered.is_empty());
}

#[test]
fn import_recreates_tasks_with_creation_events() {
    let state = test_state();
    let project = seed_project(&state, "w1");

    let imported = tasks::import_tasks(
        &state,
        "u1",
        &project.id,
        vec![
            tasks::ImportTask {
                title: "First".to_string(),
                description: String::new(),
                status: "to-do".to_string(),
                priority: None,
                due_date: None,
                user_id: None,
            },
            tasks::ImportTask {
                title: "Second".to_string(),
                description: String::new(),
                status: "done".to_string(),
                priority: Some("high".to_string()),
                due_date: None,
                user_id: None,
            },
        ],
    )
    .unwrap();
    assert_eq!(imported, 2);

    let exported = tasks::export_tasks(&state, &project.id).unwrap();
    assert_eq!(exported.len(), 2);
    assert_eq!(exported[0].position, 0);
    assert_eq!(exported[1].position, 1);

    // Each import published its own creation event.
    let feed = activities::list_activities_filtered(
        &state,
        "w1",
        &activities::ActivityFilter::default(),
    )
    .unwrap();
    assert_eq!(feed.iter().filter(|a| a.kind == "created").count(), 2);
}

#[test]
fn notification_lifecycle_marks_and_clears() {
    let state = test_state();
    let project = seed_project(&state, "w1");
    let task = seed_task(&state, &project.id);

    tasks::update_task_assignee(&state, "u1", &task.id, Some("u2")).unwrap();
    let inbox = notifications::list_notifications(&state, "u2").unwrap();
    assert_eq!(inbox.len(), 1);

    // Another user cannot touch it.
    assert!(matches!(
        notifications::mark_read(&state, "u1", &inbox[0].id),
        Err(crate::AppError::NotFound(_))
    ));

    notifications::mark_read(&state, "u2", &inbox[0].id).unwrap();
    assert_eq!(notifications::unread_count(&state, "u2").unwrap(), 0);

    assert_eq!(notifications::clear_all(&state, "u2").unwrap(), 1);
    assert!(notifications::list_notifications(&state, "u2")
        .unwrap()
        .is_empty());
}

#[test]
fn mutations_on_missing_tasks_are_not_found() {
    let state = test_state();
    seed_project(&state, "w1");

    assert!(matches!(
        tasks::update_task_status(&state, "u1", "no-such-task", "done"),
        Err(crate::AppError::NotFound(_))
    ));
    assert!(matches!(
        activities::create_comment(&state, "u1", "no-such-task", "hi"),
        Err(crate::AppError::NotFound(_))
    ));

    // Failed mutations publish nothing.
    let feed = activities::list_activities_filtered(
        &state,
        "w1",
        &activities::ActivityFilter::default(),
    )
    .unwrap();
    assert!(feed.is_empty());
}
