//! Usage: Tracing setup (stderr + daily rolling file under `<app data>/logs`) and log retention.

use crate::app_paths;
use crate::shared::fs;
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILTER_ENV: &str = "CELYAVOX_LOG";
const LOG_FILE_PREFIX: &str = "celyavox.log";

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn default_directive() -> &'static str {
    if cfg!(debug_assertions) {
        "info,celyavox_lib=debug"
    } else {
        "info"
    }
}

pub(crate) fn init(app: &tauri::AppHandle) {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive()));

    let file_layer = match app_paths::app_data_dir(app) {
        Ok(dir) => {
            let appender =
                tracing_appender::rolling::daily(app_paths::logs_dir(&dir), LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().with_ansi(false).with_writer(writer))
        }
        Err(err) => {
            eprintln!("file logging disabled: {err}");
            None
        }
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer);

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return;
    }
    // Plugins log through the `log` facade.
    let _ = tracing_log::LogTracer::init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        os = std::env::consts::OS,
        "logging initialized"
    );
}

pub(crate) fn prune_old_logs(app: &tauri::AppHandle, retention: Duration) {
    let dir = match app_paths::app_data_dir(app) {
        Ok(dir) => app_paths::logs_dir(&dir),
        Err(err) => {
            tracing::warn!("log retention skipped: {}", err);
            return;
        }
    };

    match fs::prune_files_older_than(&dir, LOG_FILE_PREFIX, retention, SystemTime::now()) {
        Ok(0) => {}
        Ok(removed) => tracing::info!(removed, "old log files removed"),
        Err(err) => tracing::warn!("log retention failed: {}", err),
    }
}
