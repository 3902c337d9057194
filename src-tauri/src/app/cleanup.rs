//! Usage: Best-effort cleanup before the process exits (tray quit, OS shutdown).

use std::sync::atomic::{AtomicBool, Ordering};

static CLEANUP_STARTED: AtomicBool = AtomicBool::new(false);

pub(crate) fn cleanup_before_exit(app: &tauri::AppHandle) {
    if CLEANUP_STARTED.swap(true, Ordering::SeqCst) {
        return;
    }

    crate::app::call_windows::shutdown(app);
    tracing::info!("exit cleanup done");
}
