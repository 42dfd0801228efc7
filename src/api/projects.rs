//! Project handlers.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries::{self, ProjectRow};
use crate::{AppError, AppState};

#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub workspace_id: String,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectUpdate {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_public: bool,
}

pub fn create_project(state: &AppState, input: NewProject) -> Result<ProjectRow, AppError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Invalid("project name is required".to_string()));
    }

    let row = ProjectRow {
        id: Uuid::new_v4().to_string(),
        workspace_id: input.workspace_id,
        name: name.to_string(),
        slug: input
            .slug
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| slugify(name)),
        description: input.description,
        icon: input.icon,
        is_public: input.is_public,
        created_at: Utc::now().to_rfc3339(),
    };
    queries::insert_project(&state.db, &row)?;
    Ok(row)
}

pub fn get_project(state: &AppState, id: &str) -> Result<ProjectRow, AppError> {
    queries::get_project(&state.db, id)?.ok_or_else(|| AppError::NotFound(format!("project {id}")))
}

pub fn list_projects(state: &AppState, workspace_id: &str) -> Result<Vec<ProjectRow>, AppError> {
    Ok(queries::list_projects(&state.db, workspace_id)?)
}

pub fn update_project(
    state: &AppState,
    id: &str,
    update: ProjectUpdate,
) -> Result<ProjectRow, AppError> {
    let old = get_project(state, id)?;

    let row = ProjectRow {
        id: old.id,
        workspace_id: old.workspace_id,
        name: update.name,
        slug: update.slug.filter(|s| !s.trim().is_empty()).unwrap_or(old.slug),
        description: update.description,
        icon: update.icon,
        is_public: update.is_public,
        created_at: old.created_at,
    };
    queries::update_project(&state.db, &row)?;
    Ok(row)
}

/// Delete a project and, via cascades, every task and derived record in it.
pub fn delete_project(state: &AppState, id: &str) -> Result<ProjectRow, AppError> {
    let project = get_project(state, id)?;
    queries::delete_project(&state.db, id)?;
    Ok(project)
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}
