//! Usage: Applies call relay actions to real windows (notification surface, main window, expiry tasks).
//!
//! The relay lock is never held while touching windows: actions are collected first, then applied.

use crate::app_state::CallCenterState;
use crate::domain::call_center::CallCenter;
use crate::domain::call_relay::RelayAction;
use crate::domain::geometry::{self, WorkArea, NOTIFICATION_HEIGHT, NOTIFICATION_WIDTH};
use crate::domain::signals::{
    notification_id_from_label, notification_label, ContentSignal, InboundSignal, SignalSender,
    MAIN_WINDOW_LABEL,
};
use crate::resident;
use crate::shared::mutex_ext::MutexExt;
use std::time::{Duration, Instant};
use tauri::webview::PageLoadEvent;
use tauri::{Emitter, Manager};

const NOTIFICATION_PAGE: &str = "notification.html";
const NOTIFICATION_TITLE: &str = "Appel entrant";
const FALLBACK_WORK_AREA: WorkArea = WorkArea {
    x: 0.0,
    y: 0.0,
    width: 1280.0,
};

/// Window, timer and event side effects of the relay. `TauriHost` is the real one.
pub(crate) trait SurfaceHost {
    fn with_center<T>(&self, f: impl FnOnce(&mut CallCenter) -> T) -> T;
    fn open_notification(&self, id: u64, caller: &str) -> Result<(), String>;
    fn show_notification(&self, id: u64);
    fn close_notification(&self, id: u64, hide_first: bool);
    fn destroy_notification(&self, id: u64);
    fn arm_expiry(&self, id: u64, after: Duration);
    fn cancel_expiry(&self, id: u64);
    fn raise_attention(&self);
    fn focus_main(&self);
    fn forward(&self, signal: ContentSignal);
}

fn is_active<H: SurfaceHost>(host: &H, id: u64) -> bool {
    host.with_center(|center| center.relay().active_id() == Some(id))
}

/// Actions of concurrent signals may be applied out of order, so anything created for an
/// instance is checked against the relay once it exists.
pub(crate) fn apply_actions<H: SurfaceHost>(host: &H, actions: Vec<RelayAction>) {
    for action in actions {
        match action {
            RelayAction::OpenNotification { id, caller } => {
                if let Err(err) = host.open_notification(id, &caller) {
                    tracing::error!(notification_id = id, "notification window failed: {}", err);
                    let follow_up = host.with_center(|center| center.surface_destroyed(id));
                    apply_actions(host, follow_up);
                    continue;
                }
                // A newer call replaced this one while the window was being built; its close
                // found nothing to close.
                if !is_active(host, id) {
                    tracing::info!(notification_id = id, "notification replaced while opening");
                    host.destroy_notification(id);
                }
            }
            RelayAction::ShowNotificationInactive { id } => host.show_notification(id),
            RelayAction::CloseNotification { id, hide_first } => {
                host.close_notification(id, hide_first)
            }
            RelayAction::ArmExpiry { id, after } => {
                if is_active(host, id) {
                    host.arm_expiry(id, after);
                }
            }
            RelayAction::CancelExpiry { id } => host.cancel_expiry(id),
            RelayAction::RaiseAttention => host.raise_attention(),
            RelayAction::FocusMain => host.focus_main(),
            RelayAction::Forward(signal) => host.forward(signal),
        }
    }
}

pub(crate) struct TauriHost<'a> {
    app: &'a tauri::AppHandle,
}

impl<'a> TauriHost<'a> {
    pub(crate) fn new(app: &'a tauri::AppHandle) -> Self {
        Self { app }
    }
}

impl SurfaceHost for TauriHost<'_> {
    fn with_center<T>(&self, f: impl FnOnce(&mut CallCenter) -> T) -> T {
        let state = self.app.state::<CallCenterState>();
        let mut center = state.center.lock_or_recover();
        f(&mut center)
    }

    fn open_notification(&self, id: u64, caller: &str) -> Result<(), String> {
        open_notification(self.app, id, caller)
    }

    fn show_notification(&self, id: u64) {
        if let Some(window) = self.app.get_webview_window(&notification_label(id)) {
            let _ = window.show();
        }
    }

    fn close_notification(&self, id: u64, hide_first: bool) {
        let Some(window) = self.app.get_webview_window(&notification_label(id)) else {
            return;
        };
        if hide_first {
            let _ = window.hide();
        }
        if let Err(err) = window.close() {
            tracing::debug!(notification_id = id, "notification close failed: {}", err);
        }
    }

    fn destroy_notification(&self, id: u64) {
        if let Some(window) = self.app.get_webview_window(&notification_label(id)) {
            if let Err(err) = window.destroy() {
                tracing::warn!(notification_id = id, "notification destroy failed: {}", err);
            }
        }
    }

    fn arm_expiry(&self, id: u64, after: Duration) {
        let timer_app = self.app.clone();
        let task = tauri::async_runtime::spawn(async move {
            tokio::time::sleep(after).await;
            tracing::info!(notification_id = id, "notification expired");
            on_expired(&timer_app, id);
        });

        let previous = self
            .app
            .state::<CallCenterState>()
            .expiry_tasks
            .lock_or_recover()
            .insert(id, task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn cancel_expiry(&self, id: u64) {
        let task = self
            .app
            .state::<CallCenterState>()
            .expiry_tasks
            .lock_or_recover()
            .remove(&id);
        if let Some(task) = task {
            task.abort();
        }
    }

    fn raise_attention(&self) {
        resident::bring_to_front(self.app);
    }

    fn focus_main(&self) {
        resident::focus_main_window(self.app);
    }

    fn forward(&self, signal: ContentSignal) {
        forward_to_content(self.app, signal);
    }
}

fn with_center<T>(app: &tauri::AppHandle, f: impl FnOnce(&mut CallCenter) -> T) -> T {
    TauriHost::new(app).with_center(f)
}

fn apply(app: &tauri::AppHandle, actions: Vec<RelayAction>) {
    apply_actions(&TauriHost::new(app), actions);
}

pub(crate) fn dispatch(
    app: &tauri::AppHandle,
    signal: InboundSignal,
    sender: SignalSender,
) -> Result<(), String> {
    let actions = with_center(app, |center| center.dispatch(signal, sender, Instant::now()))?;
    apply(app, actions);
    Ok(())
}

pub(crate) fn on_surface_ready(app: &tauri::AppHandle, id: u64) {
    let actions = with_center(app, |center| center.surface_ready(id));
    apply(app, actions);
}

pub(crate) fn on_surface_destroyed(app: &tauri::AppHandle, id: u64) {
    let actions = with_center(app, |center| center.surface_destroyed(id));
    apply(app, actions);
}

pub(crate) fn on_main_focused(app: &tauri::AppHandle) {
    if with_center(app, |center| center.main_focused()) {
        resident::clear_attention(app);
    }
}

fn on_expired(app: &tauri::AppHandle, id: u64) {
    app.state::<CallCenterState>()
        .expiry_tasks
        .lock_or_recover()
        .remove(&id);
    let actions = with_center(app, |center| center.expire(id));
    apply(app, actions);
}

/// Exit path: drop every expiry task and any notification window still around.
pub(crate) fn shutdown(app: &tauri::AppHandle) {
    let tasks: Vec<_> = {
        let state = app.state::<CallCenterState>();
        let mut tasks = state.expiry_tasks.lock_or_recover();
        tasks.drain().map(|(_, task)| task).collect()
    };
    for task in tasks {
        task.abort();
    }

    for (label, window) in app.webview_windows() {
        if notification_id_from_label(&label).is_some() {
            let _ = window.destroy();
        }
    }
}

fn primary_work_area(app: &tauri::AppHandle) -> WorkArea {
    let Ok(Some(monitor)) = app.primary_monitor() else {
        return FALLBACK_WORK_AREA;
    };
    let area = monitor.work_area();
    WorkArea::from_physical(
        area.position.x,
        area.position.y,
        area.size.width,
        monitor.scale_factor(),
    )
}

fn open_notification(app: &tauri::AppHandle, id: u64, caller: &str) -> Result<(), String> {
    let label = notification_label(id);
    let (x, y) = geometry::notification_position(primary_work_area(app));

    let caller_json =
        serde_json::to_string(caller).map_err(|e| format!("NOTIFICATION_OPEN: {e}"))?;
    let init_script = format!("window.__CELYAVOX_CALL__ = {{ id: {id}, caller: {caller_json} }};");

    let ready_app = app.clone();
    let builder = tauri::WebviewWindowBuilder::new(
        app,
        &label,
        tauri::WebviewUrl::App(NOTIFICATION_PAGE.into()),
    )
    .title(NOTIFICATION_TITLE)
    .inner_size(NOTIFICATION_WIDTH, NOTIFICATION_HEIGHT)
    .position(x, y)
    .decorations(false)
    .resizable(false)
    .maximizable(false)
    .always_on_top(true)
    .skip_taskbar(true)
    .focused(false)
    .visible(false)
    .shadow(false)
    .initialization_script(&init_script)
    .on_page_load(move |_window, payload| {
        if matches!(payload.event(), PageLoadEvent::Finished) {
            on_surface_ready(&ready_app, id);
        }
    });

    #[cfg(not(target_os = "macos"))]
    let builder = builder.transparent(true);

    builder
        .build()
        .map(|_| ())
        .map_err(|e| format!("NOTIFICATION_OPEN: {e}"))
}

fn forward_to_content(app: &tauri::AppHandle, signal: ContentSignal) {
    if app.get_webview_window(MAIN_WINDOW_LABEL).is_none() {
        tracing::warn!(event = signal.event_name(), "main window gone; signal dropped");
        return;
    }
    match app.emit_to(MAIN_WINDOW_LABEL, signal.event_name(), ()) {
        Ok(()) => tracing::info!(event = signal.event_name(), "signal forwarded to content"),
        Err(err) => tracing::warn!(event = signal.event_name(), "forward failed: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryHost {
        center: Mutex<CallCenter>,
        windows: RefCell<BTreeSet<u64>>,
        timers: RefCell<BTreeSet<u64>>,
        forwarded: RefCell<Vec<ContentSignal>>,
    }

    impl SurfaceHost for MemoryHost {
        fn with_center<T>(&self, f: impl FnOnce(&mut CallCenter) -> T) -> T {
            let mut center = self.center.lock().expect("center lock");
            f(&mut center)
        }

        fn open_notification(&self, id: u64, _caller: &str) -> Result<(), String> {
            self.windows.borrow_mut().insert(id);
            Ok(())
        }

        fn show_notification(&self, _id: u64) {}

        fn close_notification(&self, id: u64, _hide_first: bool) {
            self.windows.borrow_mut().remove(&id);
        }

        fn destroy_notification(&self, id: u64) {
            self.windows.borrow_mut().remove(&id);
        }

        fn arm_expiry(&self, id: u64, _after: Duration) {
            self.timers.borrow_mut().insert(id);
        }

        fn cancel_expiry(&self, id: u64) {
            self.timers.borrow_mut().remove(&id);
        }

        fn raise_attention(&self) {}

        fn focus_main(&self) {}

        fn forward(&self, signal: ContentSignal) {
            self.forwarded.borrow_mut().push(signal);
        }
    }

    impl MemoryHost {
        fn incoming(&self, caller: &str) -> Vec<RelayAction> {
            let signal = InboundSignal::IncomingCall {
                caller_info: Some(caller.to_string()),
            };
            self.with_center(|center| center.dispatch(signal, SignalSender::Main, Instant::now()))
                .expect("dispatch")
        }

        fn open_windows(&self) -> Vec<u64> {
            self.windows.borrow().iter().copied().collect()
        }

        fn fire_timers(&self) {
            let armed: Vec<u64> = std::mem::take(&mut *self.timers.borrow_mut())
                .into_iter()
                .collect();
            for id in armed {
                let actions = self.with_center(|center| center.expire(id));
                apply_actions(self, actions);
            }
        }
    }

    #[test]
    fn out_of_order_apply_leaves_only_the_newest_notification() {
        let host = MemoryHost::default();
        let alice = host.incoming("Alice");
        let bob = host.incoming("Bob");

        apply_actions(&host, bob);
        apply_actions(&host, alice);

        assert_eq!(host.open_windows(), vec![2]);
        assert_eq!(host.timers.borrow().iter().copied().collect::<Vec<_>>(), vec![2]);

        host.fire_timers();
        assert!(host.open_windows().is_empty());
        assert!(host.forwarded.borrow().is_empty());
    }

    #[test]
    fn in_order_apply_replaces_the_previous_notification() {
        let host = MemoryHost::default();
        let alice = host.incoming("Alice");
        apply_actions(&host, alice);
        let bob = host.incoming("Bob");
        apply_actions(&host, bob);

        assert_eq!(host.open_windows(), vec![2]);
    }

    #[test]
    fn answer_from_current_notification_closes_and_forwards() {
        let host = MemoryHost::default();
        let alice = host.incoming("Alice");
        apply_actions(&host, alice);
        let ready = host.with_center(|center| center.surface_ready(1));
        apply_actions(&host, ready);

        let answer = host
            .with_center(|center| {
                center.dispatch(
                    InboundSignal::NotificationAnswer,
                    SignalSender::Notification(1),
                    Instant::now(),
                )
            })
            .expect("dispatch");
        apply_actions(&host, answer);

        assert!(host.open_windows().is_empty());
        assert!(host.timers.borrow().is_empty());
        assert_eq!(*host.forwarded.borrow(), vec![ContentSignal::AnswerCall]);
    }
}
