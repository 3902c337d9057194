//! Usage: Connectivity gate for the hosted content (startup probe + one error dialog at most).

use crate::app_state::ShellConfigState;
use crate::infra::connectivity_probe::{self, PROBE_TIMEOUT};
use crate::shared::mutex_ext::MutexExt;
use std::sync::atomic::{AtomicBool, Ordering};
use tauri::Manager;

pub(crate) const DIALOG_TITLE: &str = "Connexion Internet requise";
pub(crate) const DIALOG_MESSAGE: &str = "Impossible de charger l'application.\n\n\
Veuillez contrôler la connectivité internet puis relancer l'application.";

#[derive(Default)]
pub(crate) struct ConnectivityState {
    dialog_shown: AtomicBool,
}

impl ConnectivityState {
    /// True only for the first failure; later ones stay in the log.
    pub(crate) fn should_show_dialog(&self) -> bool {
        !self.dialog_shown.swap(true, Ordering::SeqCst)
    }
}

pub(crate) fn spawn_probe(app: &tauri::AppHandle) {
    let server_url = app
        .state::<ShellConfigState>()
        .0
        .lock_or_recover()
        .server_url();

    let app = app.clone();
    tauri::async_runtime::spawn(async move {
        let client = match connectivity_probe::build_client() {
            Ok(client) => client,
            Err(err) => {
                tracing::warn!("connectivity probe skipped: {}", err);
                return;
            }
        };

        match connectivity_probe::probe_server_ms(&client, &server_url, PROBE_TIMEOUT).await {
            Ok(ms) => tracing::info!(server_url = %server_url, ms, "server reachable"),
            Err(err) => report_failure(&app, &err),
        }
    });
}

pub(crate) fn report_failure(app: &tauri::AppHandle, details: &str) {
    tracing::error!("hosted content unreachable: {}", details);
    if !app.state::<ConnectivityState>().should_show_dialog() {
        return;
    }
    show_dialog(app);
}

#[cfg(desktop)]
fn show_dialog(app: &tauri::AppHandle) {
    use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

    let builder = app
        .dialog()
        .message(DIALOG_MESSAGE)
        .title(DIALOG_TITLE)
        .kind(MessageDialogKind::Error);
    let builder = match app.get_webview_window(crate::domain::signals::MAIN_WINDOW_LABEL) {
        Some(window) => builder.parent(&window),
        None => builder,
    };
    builder.show(|_| {});
}

#[cfg(not(desktop))]
fn show_dialog(_app: &tauri::AppHandle) {}
