//! Usage: Application layer (Tauri-managed state, window lifecycle, call relay host, startup wiring).

pub(crate) mod app_state;
pub(crate) mod bridge;
pub(crate) mod call_windows;
pub(crate) mod cleanup;
pub(crate) mod connectivity;
pub(crate) mod logging;
pub(crate) mod main_window;
pub(crate) mod notice;
pub(crate) mod resident;
