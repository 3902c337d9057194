//! Notice (system notification) module.
//!
//! Only used for the "keeps running in the background" hint shown when the main window is
//! closed to the tray. Best-effort: an unavailable notification service is logged and ignored.

pub const BACKGROUND_NOTICE_BODY: &str =
    "L'application continue de s'exécuter dans la barre d'état système.";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NoticePayload {
    pub title: String,
    pub body: String,
}

pub fn background_notice(app_name: &str) -> NoticePayload {
    NoticePayload {
        title: format!("{app_name} reste active"),
        body: BACKGROUND_NOTICE_BODY.to_string(),
    }
}

#[cfg(desktop)]
pub fn show(app: &tauri::AppHandle, payload: &NoticePayload) -> Result<(), String> {
    use tauri_plugin_notification::NotificationExt;

    app.notification()
        .builder()
        .title(&payload.title)
        .body(&payload.body)
        .show()
        .map_err(|e| format!("NOTICE_SHOW: {e}"))
}

#[cfg(not(desktop))]
pub fn show(_app: &tauri::AppHandle, _payload: &NoticePayload) -> Result<(), String> {
    Ok(())
}
