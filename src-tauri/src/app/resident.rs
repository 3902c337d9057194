//! Usage: Window lifecycle coordinator (tray icon, close-to-background, attention, quit).

use crate::app_state::ShellConfigState;
use crate::domain::signals::{notification_id_from_label, MAIN_WINDOW_LABEL};
use crate::shared::mutex_ext::MutexExt;
use std::sync::atomic::{AtomicBool, Ordering};

const TRAY_ID: &str = "main-tray";
const TRAY_MENU_SHOW_ID: &str = "tray.show";
const TRAY_MENU_QUIT_ID: &str = "tray.quit";

/// Platform features resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub supports_dock: bool,
    pub supports_tray: bool,
}

impl Capabilities {
    pub fn detect() -> Self {
        Self {
            supports_dock: cfg!(target_os = "macos"),
            supports_tray: cfg!(desktop),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CloseAction {
    /// Quit in progress: let the window go.
    Allow,
    HideToBackground,
    /// No tray to come back from: keep the window reachable in the taskbar.
    Minimize,
}

pub(crate) fn close_action(quitting: bool, tray_enabled: bool, caps: Capabilities) -> CloseAction {
    if quitting {
        return CloseAction::Allow;
    }
    if (caps.supports_tray && tray_enabled) || caps.supports_dock {
        CloseAction::HideToBackground
    } else {
        CloseAction::Minimize
    }
}

/// `code == None` means the last window went away on its own; the tray keeps the process alive.
pub(crate) fn keep_running_on_exit_request(quitting: bool, code: Option<i32>) -> bool {
    !quitting && code.is_none()
}

pub struct ResidentState {
    tray_enabled: AtomicBool,
    quitting: AtomicBool,
    caps: Capabilities,
}

impl Default for ResidentState {
    fn default() -> Self {
        Self {
            tray_enabled: AtomicBool::new(true),
            quitting: AtomicBool::new(false),
            caps: Capabilities::detect(),
        }
    }
}

impl ResidentState {
    pub fn set_tray_enabled(&self, enabled: bool) {
        self.tray_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn tray_enabled(&self) -> bool {
        self.tray_enabled.load(Ordering::Relaxed)
    }

    pub fn mark_quitting(&self) {
        self.quitting.store(true, Ordering::SeqCst);
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting.load(Ordering::SeqCst)
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }
}

#[cfg(not(desktop))]
pub fn setup_tray(_app: &tauri::AppHandle) -> Result<(), String> {
    Ok(())
}

#[cfg(desktop)]
use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
#[cfg(desktop)]
use tauri::tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent};
use tauri::Manager;

#[cfg(desktop)]
pub fn setup_tray(app: &tauri::AppHandle) -> Result<(), String> {
    let show_item =
        MenuItem::with_id(app, TRAY_MENU_SHOW_ID, "Afficher la fenêtre", true, None::<&str>)
            .map_err(|e| format!("failed to create tray show menu item: {e}"))?;
    let quit_item = MenuItem::with_id(app, TRAY_MENU_QUIT_ID, "Quitter", true, None::<&str>)
        .map_err(|e| format!("failed to create tray quit menu item: {e}"))?;
    let separator = PredefinedMenuItem::separator(app)
        .map_err(|e| format!("failed to create tray menu separator: {e}"))?;

    let menu = Menu::with_items(app, &[&show_item, &separator, &quit_item])
        .map_err(|e| format!("failed to create tray menu: {e}"))?;

    let show_id = show_item.id().clone();
    let quit_id = quit_item.id().clone();

    #[cfg(target_os = "macos")]
    let icon_bytes = include_bytes!("../../icons/trayTemplate.png");
    #[cfg(not(target_os = "macos"))]
    let icon_bytes = include_bytes!("../../icons/32x32.png");

    let icon = tauri::image::Image::from_bytes(icon_bytes)
        .map_err(|e| format!("failed to load tray icon: {e}"))?;

    let app_name = app
        .state::<ShellConfigState>()
        .0
        .lock_or_recover()
        .app_name();

    let tray_builder = TrayIconBuilder::with_id(TRAY_ID)
        .icon(icon)
        .tooltip(app_name)
        .menu(&menu);

    #[cfg(target_os = "macos")]
    let tray_builder = tray_builder.icon_as_template(true);

    tray_builder
        .show_menu_on_left_click(false)
        .on_menu_event(move |app, event| {
            if event.id == quit_id {
                quit(app);
                return;
            }
            if event.id == show_id {
                show_main_window(app);
            }
        })
        .on_tray_icon_event(|tray, event| match event {
            TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } => toggle_main_window(tray.app_handle()),
            TrayIconEvent::DoubleClick {
                button: MouseButton::Left,
                ..
            } => show_main_window(tray.app_handle()),
            _ => {}
        })
        .build(app)
        .map_err(|e| format!("failed to build tray icon: {e}"))?;

    Ok(())
}

/// Records the tray preference and shows/hides the icon accordingly.
pub(crate) fn apply_tray_enabled(app: &tauri::AppHandle, enabled: bool) {
    app.state::<ResidentState>().set_tray_enabled(enabled);
    #[cfg(desktop)]
    if let Some(tray) = app.tray_by_id(TRAY_ID) {
        if let Err(err) = tray.set_visible(enabled) {
            tracing::warn!("tray visibility update failed: {}", err);
        }
    }
}

fn set_dock_visible(app: &tauri::AppHandle, visible: bool) {
    #[cfg(target_os = "macos")]
    {
        let _ = app.set_dock_visibility(visible);
    }
    #[cfg(not(target_os = "macos"))]
    {
        let _ = (app, visible);
    }
}

/// Tray, second instance, dock reopen: bring the main window back (recreating it if needed).
pub fn show_main_window(app: &tauri::AppHandle) {
    set_dock_visible(app, true);

    if app.get_webview_window(MAIN_WINDOW_LABEL).is_none() {
        if let Err(err) = crate::app::main_window::create(app) {
            tracing::error!("main window recreate failed: {}", err);
        }
        return;
    }

    focus_main_window(app);
}

/// Tray left click: hide a visible main window, bring back a hidden one.
pub(crate) fn toggle_main_window(app: &tauri::AppHandle) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        show_main_window(app);
        return;
    };
    let visible = window.is_visible().unwrap_or(false);
    let minimized = window.is_minimized().unwrap_or(false);
    if visible && !minimized {
        let _ = window.hide();
        set_dock_visible(app, false);
        return;
    }
    show_main_window(app);
}

/// Answer path: restore and focus the main window.
pub(crate) fn focus_main_window(app: &tauri::AppHandle) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        return;
    };

    let _ = window.unminimize();
    let _ = window.set_skip_taskbar(false);
    let _ = window.show();
    let _ = window.set_focus();
}

/// Restore + show + ask the OS for attention (taskbar flash / dock bounce) without taking focus.
pub(crate) fn bring_to_front(app: &tauri::AppHandle) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        return;
    };

    if window.is_minimized().unwrap_or(false) {
        let _ = window.unminimize();
    }
    if !window.is_visible().unwrap_or(true) {
        set_dock_visible(app, true);
        let _ = window.show();
    }
    if let Err(err) =
        window.request_user_attention(Some(tauri::UserAttentionType::Informational))
    {
        tracing::debug!("attention request unavailable: {}", err);
    }
}

pub(crate) fn clear_attention(app: &tauri::AppHandle) {
    if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        let _ = window.request_user_attention(None);
    }
}

fn hide_to_background(window: &tauri::Window) {
    let app = window.app_handle();
    let _ = window.hide();
    set_dock_visible(app, false);

    let (app_name, notice_enabled) = {
        let state = app.state::<ShellConfigState>();
        let cfg = state.0.lock_or_recover();
        (cfg.app_name(), cfg.settings.background_notice_enabled)
    };
    if !notice_enabled {
        return;
    }
    let payload = crate::notice::background_notice(app_name);
    if let Err(err) = crate::notice::show(app, &payload) {
        tracing::warn!("background notice unavailable: {}", err);
    }
}

/// Explicit termination from the tray "Quitter" item.
pub fn quit(app: &tauri::AppHandle) {
    app.state::<ResidentState>().mark_quitting();
    tracing::info!("quit requested");
    crate::app::cleanup::cleanup_before_exit(app);
    app.exit(0);
}

pub fn on_window_event(window: &tauri::Window, event: &tauri::WindowEvent) {
    if let Some(id) = notification_id_from_label(window.label()) {
        if let tauri::WindowEvent::Destroyed = event {
            crate::app::call_windows::on_surface_destroyed(window.app_handle(), id);
        }
        return;
    }

    if window.label() != MAIN_WINDOW_LABEL {
        return;
    }

    match event {
        tauri::WindowEvent::CloseRequested { api, .. } => {
            let resident = window.state::<ResidentState>();
            match close_action(
                resident.is_quitting(),
                resident.tray_enabled(),
                resident.capabilities(),
            ) {
                CloseAction::Allow => {}
                CloseAction::HideToBackground => {
                    api.prevent_close();
                    hide_to_background(window);
                }
                CloseAction::Minimize => {
                    api.prevent_close();
                    let _ = window.minimize();
                }
            }
        }
        tauri::WindowEvent::Focused(true) => {
            crate::app::call_windows::on_main_focused(window.app_handle());
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP: Capabilities = Capabilities {
        supports_dock: false,
        supports_tray: true,
    };
    const MAC: Capabilities = Capabilities {
        supports_dock: true,
        supports_tray: true,
    };

    #[test]
    fn close_hides_while_not_quitting() {
        assert_eq!(close_action(false, true, DESKTOP), CloseAction::HideToBackground);
        assert_eq!(close_action(false, true, MAC), CloseAction::HideToBackground);
    }

    #[test]
    fn close_is_allowed_once_quitting() {
        assert_eq!(close_action(true, true, DESKTOP), CloseAction::Allow);
        assert_eq!(close_action(true, false, MAC), CloseAction::Allow);
    }

    #[test]
    fn close_without_tray_minimizes_except_on_dock_platforms() {
        assert_eq!(close_action(false, false, DESKTOP), CloseAction::Minimize);
        assert_eq!(close_action(false, false, MAC), CloseAction::HideToBackground);
    }

    #[test]
    fn exit_request_policy() {
        assert!(keep_running_on_exit_request(false, None));
        assert!(!keep_running_on_exit_request(true, None));
        assert!(!keep_running_on_exit_request(false, Some(0)));
    }

    #[test]
    fn resident_state_flags() {
        let state = ResidentState::default();
        assert!(state.tray_enabled());
        assert!(!state.is_quitting());
        state.set_tray_enabled(false);
        state.mark_quitting();
        assert!(!state.tray_enabled());
        assert!(state.is_quitting());
    }
}
