//! Usage: App-level Tauri commands (app info for the hosted page).

use crate::app::bridge;
use crate::app_state::ShellConfigState;
use crate::shared::mutex_ext::MutexExt;

#[derive(Debug, Clone, serde::Serialize)]
pub(crate) struct AppInfo {
    name: String,
    product_name: String,
    app_id: String,
    version: String,
    environment: String,
    server_url: String,
    is_rdp: bool,
    os: String,
    arch: String,
    profile: String,
}

#[tauri::command]
pub(crate) fn app_info_get(shell: tauri::State<'_, ShellConfigState>) -> AppInfo {
    let (preset, environment, server_url) = {
        let cfg = shell.0.lock_or_recover();
        (cfg.preset(), cfg.env.as_str().to_string(), cfg.server_url())
    };

    AppInfo {
        name: preset.app_name.to_string(),
        product_name: preset.product_name.to_string(),
        app_id: preset.app_id.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment,
        server_url,
        is_rdp: bridge::is_rdp_session(),
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        profile: if cfg!(debug_assertions) {
            "debug".to_string()
        } else {
            "release".to_string()
        },
    }
}
