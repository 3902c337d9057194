mod app;
mod commands;
mod domain;
mod infra;
mod shared;

pub(crate) use app::{app_state, notice, resident};
pub(crate) use infra::{app_paths, settings};

use app::{connectivity, main_window};
use app_state::{CallCenterState, ShellConfig, ShellConfigState};
use commands::*;
use infra::environment::AppEnvironment;
use shared::mutex_ext::MutexExt;
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let builder = tauri::Builder::default()
        .manage(ShellConfigState::default())
        .manage(CallCenterState::default())
        .manage(resident::ResidentState::default())
        .manage(connectivity::ConnectivityState::default())
        .manage(main_window::RemoteCapabilityState::default());

    // single-instance must be registered first so a second launch exits before any other setup.
    #[cfg(desktop)]
    let builder = builder
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            tracing::info!("second instance launched; raising main window");
            resident::show_main_window(app);
        }))
        .plugin(tauri_plugin_notification::init())
        .plugin(tauri_plugin_dialog::init());

    let app = builder
        .on_window_event(resident::on_window_event)
        .setup(|app| {
            let handle = app.handle();
            crate::app::logging::init(handle);

            let env = AppEnvironment::detect();
            let settings = match settings::read(handle) {
                Ok(settings) => settings,
                Err(err) => {
                    tracing::warn!("settings read failed, using defaults: {}", err);
                    settings::AppSettings::default()
                }
            };

            {
                let state = handle.state::<ShellConfigState>();
                let mut cfg = state.0.lock_or_recover();
                *cfg = ShellConfig::new(env, settings.clone());
                tracing::info!(
                    environment = env.as_str(),
                    server_url = %cfg.server_url(),
                    "shell configured"
                );
            }

            crate::app::logging::prune_old_logs(handle, settings.log_retention());

            if let Err(err) = resident::setup_tray(handle) {
                tracing::error!("tray setup failed: {}", err);
            }
            app_state::apply_settings(handle, &settings);

            if let Err(err) = main_window::create(handle) {
                connectivity::report_failure(handle, &err);
            }

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            signal_send,
            app_info_get
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| {
        if let tauri::RunEvent::ExitRequested { api, code, .. } = &event {
            let resident = app_handle.state::<resident::ResidentState>();
            if resident::keep_running_on_exit_request(resident.is_quitting(), *code) {
                api.prevent_exit();
                return;
            }

            tracing::info!(code = ?code, "exit requested, cleaning up");
            resident.mark_quitting();
            crate::app::cleanup::cleanup_before_exit(app_handle);
            return;
        }

        #[cfg(target_os = "macos")]
        if let tauri::RunEvent::Reopen {
            has_visible_windows,
            ..
        } = event
        {
            if !has_visible_windows {
                resident::show_main_window(app_handle);
            }
        }
    });
}
