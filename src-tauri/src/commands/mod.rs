//! Usage: Tauri command surface (thin wrappers over `app`, `domain` and `infra`).

mod app;
mod signals;

pub(crate) use app::*;
pub(crate) use signals::*;
