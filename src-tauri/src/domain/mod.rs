//! Usage: Call-notification domain (pure state machines, no Tauri types).

pub(crate) mod attention;
pub(crate) mod call_center;
pub(crate) mod call_relay;
pub(crate) mod geometry;
pub(crate) mod signals;
