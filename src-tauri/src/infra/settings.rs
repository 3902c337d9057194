//! Usage: Persisted shell settings (schema + read/write helpers).

use crate::app_paths;
use crate::infra::environment::AppEnvironment;
use crate::shared::fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SCHEMA_VERSION: u32 = 2;
const SCHEMA_VERSION_ADD_ATTENTION_DEBOUNCE: u32 = 2;
pub const DEFAULT_NOTIFICATION_TIMEOUT_SECONDS: u32 = 30;
pub const DEFAULT_ATTENTION_DEBOUNCE_SECONDS: u32 = 8;
const DEFAULT_LOG_RETENTION_DAYS: u32 = 14;
const MIN_NOTIFICATION_TIMEOUT_SECONDS: u32 = 1;
const MAX_NOTIFICATION_TIMEOUT_SECONDS: u32 = 5 * 60;
const MAX_ATTENTION_DEBOUNCE_SECONDS: u32 = 2 * 60;
const MAX_LOG_RETENTION_DAYS: u32 = 365;
const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub schema_version: u32,
    // Empty means "use the environment preset".
    pub server_url: String,
    pub tray_enabled: bool,
    pub background_notice_enabled: bool,
    pub notification_timeout_seconds: u32,
    pub attention_debounce_seconds: u32,
    pub log_retention_days: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            server_url: String::new(),
            tray_enabled: true,
            background_notice_enabled: true,
            notification_timeout_seconds: DEFAULT_NOTIFICATION_TIMEOUT_SECONDS,
            attention_debounce_seconds: DEFAULT_ATTENTION_DEBOUNCE_SECONDS,
            log_retention_days: DEFAULT_LOG_RETENTION_DAYS,
        }
    }
}

impl AppSettings {
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.notification_timeout_seconds))
    }

    pub fn attention_debounce(&self) -> Duration {
        Duration::from_secs(u64::from(self.attention_debounce_seconds))
    }

    pub fn log_retention(&self) -> Duration {
        Duration::from_secs(u64::from(self.log_retention_days) * 24 * 60 * 60)
    }

    pub fn effective_server_url(&self, env: AppEnvironment) -> String {
        let trimmed = self.server_url.trim();
        if trimmed.is_empty() {
            env.preset().server_url.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

fn validate_server_url(raw: &str) -> Result<(), String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(());
    }
    let url = reqwest::Url::parse(raw).map_err(|e| format!("invalid server_url={raw}: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("server_url scheme must be http or https, got {other}")),
    }
}

fn migrate_add_attention_debounce(settings: &mut AppSettings, schema_version_present: bool) -> bool {
    // v2: attention_debounce_seconds added; older files get the default via `serde(default)`.
    if schema_version_present && settings.schema_version >= SCHEMA_VERSION_ADD_ATTENTION_DEBOUNCE {
        return false;
    }
    settings.schema_version = SCHEMA_VERSION_ADD_ATTENTION_DEBOUNCE;
    true
}

fn sanitize(settings: &mut AppSettings) -> bool {
    let mut changed = false;

    if settings.notification_timeout_seconds < MIN_NOTIFICATION_TIMEOUT_SECONDS {
        settings.notification_timeout_seconds = DEFAULT_NOTIFICATION_TIMEOUT_SECONDS;
        changed = true;
    }
    if settings.notification_timeout_seconds > MAX_NOTIFICATION_TIMEOUT_SECONDS {
        settings.notification_timeout_seconds = MAX_NOTIFICATION_TIMEOUT_SECONDS;
        changed = true;
    }
    if settings.attention_debounce_seconds > MAX_ATTENTION_DEBOUNCE_SECONDS {
        settings.attention_debounce_seconds = MAX_ATTENTION_DEBOUNCE_SECONDS;
        changed = true;
    }
    if settings.log_retention_days == 0 {
        settings.log_retention_days = DEFAULT_LOG_RETENTION_DAYS;
        changed = true;
    }
    if settings.log_retention_days > MAX_LOG_RETENTION_DAYS {
        settings.log_retention_days = MAX_LOG_RETENTION_DAYS;
        changed = true;
    }
    if validate_server_url(&settings.server_url).is_err() {
        tracing::warn!(server_url = %settings.server_url, "ignoring invalid server_url override");
        settings.server_url.clear();
        changed = true;
    }

    changed
}

pub fn validate(settings: &AppSettings) -> Result<(), String> {
    if settings.notification_timeout_seconds < MIN_NOTIFICATION_TIMEOUT_SECONDS
        || settings.notification_timeout_seconds > MAX_NOTIFICATION_TIMEOUT_SECONDS
    {
        return Err(format!(
            "notification_timeout_seconds must be between {MIN_NOTIFICATION_TIMEOUT_SECONDS} and {MAX_NOTIFICATION_TIMEOUT_SECONDS}"
        ));
    }
    if settings.attention_debounce_seconds > MAX_ATTENTION_DEBOUNCE_SECONDS {
        return Err(format!(
            "attention_debounce_seconds must be <= {MAX_ATTENTION_DEBOUNCE_SECONDS}"
        ));
    }
    if settings.log_retention_days == 0 {
        return Err("log_retention_days must be >= 1".to_string());
    }
    if settings.log_retention_days > MAX_LOG_RETENTION_DAYS {
        return Err(format!(
            "log_retention_days must be <= {MAX_LOG_RETENTION_DAYS}"
        ));
    }
    validate_server_url(&settings.server_url)
}

fn parse_settings_json(content: &str) -> Result<(AppSettings, bool), String> {
    let raw: serde_json::Value =
        serde_json::from_str(content).map_err(|e| format!("failed to parse settings.json: {e}"))?;
    let schema_version_present = raw.get("schema_version").is_some();
    let settings: AppSettings =
        serde_json::from_value(raw).map_err(|e| format!("failed to parse settings.json: {e}"))?;
    Ok((settings, schema_version_present))
}

pub(crate) fn read_from(path: &Path) -> Result<AppSettings, String> {
    let Some(content) = fs::read_optional_to_string(path)? else {
        let settings = AppSettings::default();
        // Best-effort: create default settings.json on first read to make the config discoverable/editable.
        let _ = write_to(path, &settings);
        return Ok(settings);
    };

    let (mut settings, schema_version_present) = parse_settings_json(&content)?;

    let mut repaired = false;
    repaired |= migrate_add_attention_debounce(&mut settings, schema_version_present);
    repaired |= sanitize(&mut settings);
    if repaired {
        // Best-effort: persist repaired values while keeping read semantics.
        let _ = write_to(path, &settings);
    }

    Ok(settings)
}

pub(crate) fn write_to(path: &Path, settings: &AppSettings) -> Result<AppSettings, String> {
    validate(settings).map_err(|e| format!("SETTINGS_INVALID: {e}"))?;

    let mut settings = settings.clone();
    settings.server_url = settings.server_url.trim().to_string();
    settings.schema_version = SCHEMA_VERSION;

    let content = serde_json::to_vec_pretty(&settings)
        .map_err(|e| format!("SETTINGS_WRITE: failed to serialize settings: {e}"))?;
    fs::write_file_atomic(path, &content).map_err(|e| format!("SETTINGS_WRITE: {e}"))?;

    Ok(settings)
}

fn settings_path(app: &tauri::AppHandle) -> Result<PathBuf, String> {
    Ok(app_paths::app_data_dir(app)?.join(SETTINGS_FILE_NAME))
}

pub fn read(app: &tauri::AppHandle) -> Result<AppSettings, String> {
    read_from(&settings_path(app)?)
}
