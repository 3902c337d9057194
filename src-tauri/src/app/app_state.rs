//! Usage: Tauri-managed state shared by commands, window hooks and timers.

use crate::domain::call_center::CallCenter;
use crate::infra::environment::{AppEnvironment, EnvironmentPreset};
use crate::settings::AppSettings;
use std::collections::HashMap;
use std::sync::Mutex;
use tauri::Manager;

#[derive(Debug, Clone)]
pub(crate) struct ShellConfig {
    pub(crate) env: AppEnvironment,
    pub(crate) settings: AppSettings,
}

impl ShellConfig {
    pub(crate) fn new(env: AppEnvironment, settings: AppSettings) -> Self {
        Self { env, settings }
    }

    pub(crate) fn preset(&self) -> &'static EnvironmentPreset {
        self.env.preset()
    }

    pub(crate) fn app_name(&self) -> &'static str {
        self.preset().app_name
    }

    pub(crate) fn server_url(&self) -> String {
        self.settings.effective_server_url(self.env)
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::new(AppEnvironment::detect(), AppSettings::default())
    }
}

#[derive(Default)]
pub(crate) struct ShellConfigState(pub(crate) Mutex<ShellConfig>);

/// Relay + attention state, and the expiry task of each live notification.
#[derive(Default)]
pub(crate) struct CallCenterState {
    pub(crate) center: Mutex<CallCenter>,
    pub(crate) expiry_tasks: Mutex<HashMap<u64, tauri::async_runtime::JoinHandle<()>>>,
}

impl CallCenterState {
    pub(crate) fn configure(&self, settings: &AppSettings) {
        use crate::shared::mutex_ext::MutexExt;

        self.center.lock_or_recover().configure(
            settings.notification_timeout(),
            settings.attention_debounce(),
        );
    }
}

/// Pushes persisted settings into the live state holders that outlive `ShellConfig` setup.
pub(crate) fn apply_settings(app: &tauri::AppHandle, settings: &AppSettings) {
    app.state::<CallCenterState>().configure(settings);
    crate::resident::apply_tray_enabled(app, settings.tray_enabled);
}
