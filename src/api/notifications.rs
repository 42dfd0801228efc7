//! Notification handlers. Everything is scoped to the calling user.

use crate::db::queries::{self, NotificationRow};
use crate::db::DbError;
use crate::{AppError, AppState};

pub fn list_notifications(state: &AppState, user_id: &str) -> Result<Vec<NotificationRow>, AppError> {
    Ok(queries::list_notifications(&state.db, user_id)?)
}

pub fn unread_count(state: &AppState, user_id: &str) -> Result<i64, AppError> {
    Ok(queries::unread_notification_count(&state.db, user_id)?)
}

pub fn mark_read(state: &AppState, user_id: &str, id: &str) -> Result<(), AppError> {
    match queries::mark_notification_read(&state.db, id, user_id) {
        Ok(()) => Ok(()),
        // Another user's notification looks the same as a missing one.
        Err(DbError::NotFound(what)) => Err(AppError::NotFound(what)),
        Err(e) => Err(e.into()),
    }
}

/// Mark every unread notification read. Returns how many flipped.
pub fn mark_all_read(state: &AppState, user_id: &str) -> Result<usize, AppError> {
    Ok(queries::mark_all_notifications_read(&state.db, user_id)?)
}

pub fn clear_all(state: &AppState, user_id: &str) -> Result<usize, AppError> {
    Ok(queries::clear_notifications(&state.db, user_id)?)
}
