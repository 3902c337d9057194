//! Usage: Call signalling entry point for the hosted page and the notification surface.

use crate::app::call_windows;
use crate::domain::signals::{InboundSignal, SignalSender};

/// Async so that window creation runs off the main thread (sync commands there deadlock on Windows).
#[tauri::command]
pub(crate) async fn signal_send(
    app: tauri::AppHandle,
    webview_window: tauri::WebviewWindow,
    signal: String,
    caller_info: Option<String>,
) -> Result<(), String> {
    let sender = SignalSender::from_label(webview_window.label());
    let signal = InboundSignal::parse(&signal, caller_info)?;
    call_windows::dispatch(&app, signal, sender)
}
