//! Environment-driven configuration.

use std::path::PathBuf;

use serde::Serialize;

pub const ELSE_PRODUCT_SLUG: &str = "kaneo";

const DEFAULT_ELSE_BASE_URL: &str = "http://localhost:8001/vendor-api";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub else_base_url: String,
    pub else_api_key: Option<String>,
}

impl Config {
    /// Load configuration from the environment, reading a `.env` file first
    /// when one is present (deploy targets provide real env vars instead).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let database_path = non_empty_var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("kaneo.db"));

        Self {
            database_path,
            else_base_url: non_empty_var("ELSE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ELSE_BASE_URL.to_string()),
            else_api_key: non_empty_var("ELSE_API_KEY"),
        }
    }
}

fn data_dir() -> PathBuf {
    if let Some(path) = non_empty_var("KANEO_DATA_DIR") {
        return PathBuf::from(path);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".kaneo");
    }

    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".kaneo");
    }

    PathBuf::from(".kaneo")
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Feature flags the frontend reads from the `/config` endpoint. Derived
/// entirely from the environment; nothing here is persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub disable_registration: bool,
    pub is_demo_mode: bool,
    pub has_smtp: bool,
    pub has_github_sign_in: bool,
    pub has_google_sign_in: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            disable_registration: flag("DISABLE_REGISTRATION"),
            is_demo_mode: flag("DEMO_MODE"),
            has_smtp: ["SMTP_HOST", "SMTP_PORT", "SMTP_USER", "SMTP_PASSWORD"]
                .iter()
                .all(|key| non_empty_var(key).is_some()),
            has_github_sign_in: non_empty_var("GITHUB_CLIENT_ID").is_some()
                && non_empty_var("GITHUB_CLIENT_SECRET").is_some(),
            has_google_sign_in: non_empty_var("GOOGLE_CLIENT_ID").is_some()
                && non_empty_var("GOOGLE_CLIENT_SECRET").is_some(),
        }
    }
}

fn flag(key: &str) -> bool {
    non_empty_var(key).is_some_and(|value| value == "true")
}
