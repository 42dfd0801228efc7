//! Else extension handlers: per-user sandbox provisioning and lifecycle.
//!
//! The only state kept locally is the `else_accounts` mapping from user id to
//! the tenant and extension Else provisioned for them. Everything else is
//! read live from the Else API.

use chrono::Utc;
use serde::Serialize;

use crate::db::queries::{self, ElseAccountRow};
use crate::else_api::{BundleResponse, ElseError, ExtensionInfo};
use crate::{AppError, AppState};

/// Combined view of a user's sandbox, shaped for the frontend status panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionStatus {
    pub is_initialized: bool,
    pub is_running: bool,
    pub workspace_url: Option<String>,
    pub status: Option<String>,
    pub extension_name: Option<String>,
}

impl ExtensionStatus {
    fn uninitialized() -> Self {
        Self {
            is_initialized: false,
            is_running: false,
            workspace_url: None,
            status: None,
            extension_name: None,
        }
    }
}

/// Provision a tenant and a prototyping extension for a user. Idempotent:
/// a user who already has both gets their existing account back.
pub async fn initialize_extension(
    state: &AppState,
    user_id: &str,
    display_name: &str,
) -> Result<ElseAccountRow, AppError> {
    if let Some(account) = queries::get_else_account(&state.db, user_id)? {
        if account.tenant_id.is_some() && account.extension_id.is_some() {
            tracing::debug!(user = user_id, "extension already initialized");
            return Ok(account);
        }
    }

    let tenant = state.else_client.create_tenant(user_id, display_name).await?;
    let extension = state.else_client.create_extension(&tenant.external_id).await?;
    tracing::info!(
        user = user_id,
        tenant = %tenant.external_id,
        extension = %extension.id,
        "provisioned sandbox"
    );

    let account = ElseAccountRow {
        user_id: user_id.to_string(),
        tenant_id: Some(tenant.external_id),
        extension_id: Some(extension.id),
        updated_at: Utc::now().to_rfc3339(),
    };
    queries::upsert_else_account(&state.db, &account)?;
    Ok(account)
}

/// Current sandbox state for a user. An uninitialized user gets an empty
/// status rather than an error so the frontend can offer setup.
pub async fn workspace_status(state: &AppState, user_id: &str) -> Result<ExtensionStatus, AppError> {
    let Some((tenant_id, extension_id)) = provisioned_ids(state, user_id)? else {
        return Ok(ExtensionStatus::uninitialized());
    };

    let extensions = state.else_client.list_extensions(&tenant_id).await?;
    let Some(extension) = extensions.into_iter().find(|e| e.id == extension_id) else {
        // Provisioned on our side but gone on Else's. Report as initialized
        // so the mismatch is visible instead of silently re-provisioning.
        return Ok(ExtensionStatus {
            is_initialized: true,
            is_running: false,
            workspace_url: None,
            status: Some("not_found".to_string()),
            extension_name: None,
        });
    };

    Ok(status_from(extension))
}

fn status_from(extension: ExtensionInfo) -> ExtensionStatus {
    ExtensionStatus {
        is_initialized: true,
        is_running: extension.is_running,
        workspace_url: extension.dev_env_url,
        status: extension.status,
        extension_name: extension.name,
    }
}

/// Boot the dev environment backing the user's extension.
pub async fn start_workspace(state: &AppState, user_id: &str) -> Result<(), AppError> {
    let Some((tenant_id, extension_id)) = provisioned_ids(state, user_id)? else {
        return Err(AppError::Invalid(format!(
            "user {user_id} has no initialized extension"
        )));
    };
    state
        .else_client
        .start_workspace(&tenant_id, &extension_id)
        .await?;
    Ok(())
}

/// Resolve the bundle for an extension identifier, for the embed page.
pub async fn get_bundle(
    state: &AppState,
    extension_identifier: &str,
) -> Result<BundleResponse, AppError> {
    match state.else_client.get_extension_bundle(extension_identifier).await {
        Ok(bundle) => Ok(bundle),
        Err(ElseError::Api { status: 404, .. }) => Err(AppError::NotFound(format!(
            "extension {extension_identifier}"
        ))),
        Err(e) => Err(e.into()),
    }
}

fn provisioned_ids(state: &AppState, user_id: &str) -> Result<Option<(String, String)>, AppError> {
    let Some(account) = queries::get_else_account(&state.db, user_id)? else {
        return Ok(None);
    };
    Ok(account.tenant_id.zip(account.extension_id))
}
