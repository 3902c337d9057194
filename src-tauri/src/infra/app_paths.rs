//! Usage: Resolve per-user app data directory and related path helpers.

use crate::infra::environment::AppEnvironment;
use std::path::{Path, PathBuf};
use tauri::Manager;

const APP_DOTDIR_NAME_ENV: &str = "CELYAVOX_DOTDIR_NAME";
const LOGS_DIR_NAME: &str = "logs";

fn is_safe_dotdir_name(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    if !name.starts_with('.') {
        return false;
    }
    if name.contains('/') || name.contains('\\') {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
}

fn dotdir_name(env: AppEnvironment, override_value: Option<&str>) -> String {
    override_value
        .map(str::trim)
        .filter(|v| is_safe_dotdir_name(v))
        .map(str::to_string)
        .unwrap_or_else(|| env.preset().dotdir_name.to_string())
}

pub fn app_data_dir(app: &tauri::AppHandle) -> Result<PathBuf, String> {
    let home_dir = app
        .path()
        .home_dir()
        .map_err(|e| format!("failed to resolve home dir: {e}"))?;

    let override_value = std::env::var(APP_DOTDIR_NAME_ENV).ok();
    let dir = home_dir.join(dotdir_name(
        AppEnvironment::detect(),
        override_value.as_deref(),
    ));
    std::fs::create_dir_all(&dir).map_err(|e| format!("failed to create app dir: {e}"))?;

    Ok(dir)
}

pub fn logs_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(LOGS_DIR_NAME)
}
