//! Usage: Main window (hosted phone UI) creation and its remote IPC capability.

use crate::app::{bridge, connectivity};
use crate::app_state::ShellConfigState;
use crate::domain::signals::MAIN_WINDOW_LABEL;
use crate::infra::connectivity_probe;
use crate::shared::mutex_ext::MutexExt;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tauri::ipc::CapabilityBuilder;
use tauri::webview::PageLoadEvent;
use tauri::Manager;

const REMOTE_CAPABILITY_PREFIX: &str = "remote-content-";
/// App command permissions come from the `AppManifest` in build.rs.
pub(crate) const REMOTE_PERMISSIONS: [&str; 3] = [
    "core:event:default",
    "allow-signal-send",
    "allow-app-info-get",
];
const MAIN_WIDTH: f64 = 1280.0;
const MAIN_HEIGHT: f64 = 820.0;
const MAIN_MIN_WIDTH: f64 = 900.0;
const MAIN_MIN_HEIGHT: f64 = 600.0;

fn shell_target(app: &tauri::AppHandle) -> (&'static str, String) {
    let cfg = app.state::<ShellConfigState>();
    let cfg = cfg.0.lock_or_recover();
    (cfg.app_name(), cfg.server_url())
}

/// `https://host:port/*` for the configured server.
pub(crate) fn remote_url_pattern(server_url: &str) -> Result<String, String> {
    let url = connectivity_probe::parse_server_url(server_url)?;
    match url.scheme() {
        "http" | "https" => Ok(format!("{}/*", url.origin().ascii_serialization())),
        scheme => Err(format!(
            "SEC_INVALID_INPUT: unsupported server_url scheme={scheme}"
        )),
    }
}

/// Remote origins already granted; one capability per origin so a changed server URL gets its own.
#[derive(Default)]
pub(crate) struct RemoteCapabilityState {
    registered: Mutex<HashSet<String>>,
}

impl RemoteCapabilityState {
    pub(crate) fn is_registered(&self, pattern: &str) -> bool {
        self.registered.lock_or_recover().contains(pattern)
    }

    pub(crate) fn mark_registered(&self, pattern: &str) {
        self.registered.lock_or_recover().insert(pattern.to_string());
    }
}

pub(crate) fn capability_id(pattern: &str) -> String {
    let suffix: String = pattern
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("{REMOTE_CAPABILITY_PREFIX}{suffix}")
}

/// Lets the hosted page call `signal_send` / `app_info_get` and listen to forwarded events.
fn register_remote_capability(app: &tauri::AppHandle, server_url: &str) -> Result<(), String> {
    let pattern = remote_url_pattern(server_url)?;
    let state = app.state::<RemoteCapabilityState>();
    if state.is_registered(&pattern) {
        return Ok(());
    }

    let mut capability = CapabilityBuilder::new(capability_id(&pattern))
        .remote(pattern.clone())
        .window(MAIN_WINDOW_LABEL);
    for permission in REMOTE_PERMISSIONS {
        capability = capability.permission(permission);
    }
    app.add_capability(capability)
        .map_err(|e| format!("CAPABILITY_REGISTER: {e}"))?;
    state.mark_registered(&pattern);

    tracing::info!(pattern = %pattern, "remote capability registered");
    Ok(())
}

pub(crate) fn create(app: &tauri::AppHandle) -> Result<tauri::WebviewWindow, String> {
    let (app_name, server_url) = shell_target(app);
    let url = connectivity_probe::parse_server_url(&server_url)?;
    let init_script = bridge::init_script(&bridge::BridgeEnv::current())?;
    if let Err(err) = register_remote_capability(app, &server_url) {
        tracing::error!("remote capability registration failed: {}", err);
    }

    let first_load = AtomicBool::new(true);
    let window = tauri::WebviewWindowBuilder::new(
        app,
        MAIN_WINDOW_LABEL,
        tauri::WebviewUrl::External(url),
    )
    .title(app_name)
    .inner_size(MAIN_WIDTH, MAIN_HEIGHT)
    .min_inner_size(MAIN_MIN_WIDTH, MAIN_MIN_HEIGHT)
    .visible(false)
    .initialization_script(&init_script)
    .on_page_load(move |window, payload| {
        if !matches!(payload.event(), PageLoadEvent::Finished) {
            return;
        }
        // Later reloads must not pull a window hidden in the tray back on screen.
        if first_load.swap(false, Ordering::SeqCst) {
            let _ = window.show();
        }
    })
    .build()
    .map_err(|e| format!("MAIN_WINDOW_CREATE: {e}"))?;

    tracing::info!(server_url = %server_url, "main window created");
    connectivity::spawn_probe(app);
    Ok(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_pattern_covers_whole_origin() {
        assert_eq!(
            remote_url_pattern("https://celyavox.celya.fr/phone").expect("pattern"),
            "https://celyavox.celya.fr/*"
        );
        assert_eq!(
            remote_url_pattern("http://localhost:8080/celyavox/").expect("pattern"),
            "http://localhost:8080/*"
        );
    }

    #[test]
    fn changed_server_url_gets_its_own_capability() {
        let old = remote_url_pattern("https://celyavox.celya.fr/phone").expect("old");
        let new = remote_url_pattern("https://pbx.example.org:8443/celyavox").expect("new");
        assert_eq!(new, "https://pbx.example.org:8443/*");
        assert_ne!(capability_id(&old), capability_id(&new));

        let same_origin = remote_url_pattern("https://celyavox.celya.fr/other").expect("same");
        assert_eq!(capability_id(&old), capability_id(&same_origin));

        let state = RemoteCapabilityState::default();
        state.mark_registered(&old);
        assert!(state.is_registered(&same_origin));
        assert!(!state.is_registered(&new));
    }

    #[test]
    fn capability_id_is_a_plain_identifier() {
        let id = capability_id("https://celyavox.celya.fr/*");
        assert_eq!(id, "remote-content-https---celyavox-celya-fr--");
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
    }

    #[test]
    fn remote_content_gets_signalling_permissions_only() {
        assert_eq!(
            REMOTE_PERMISSIONS,
            ["core:event:default", "allow-signal-send", "allow-app-info-get"]
        );

        let build_script = include_str!("../../build.rs");
        for command in ["signal_send", "app_info_get"] {
            assert!(build_script.contains(&format!("\"{command}\"")), "{command}");
        }
        for command in ["settings_set", "app_exit"] {
            assert!(!build_script.contains(command), "{command}");
        }
    }

    #[test]
    fn remote_pattern_rejects_non_http() {
        assert!(remote_url_pattern("file:///tmp/index.html")
            .unwrap_err()
            .starts_with("SEC_INVALID_INPUT: unsupported server_url scheme=file"));
        assert!(remote_url_pattern("").is_err());
    }
}
