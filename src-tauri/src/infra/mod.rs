//! Usage: Infrastructure adapters (filesystem paths, persistence, environment, network probe).

pub(crate) mod app_paths;
pub(crate) mod connectivity_probe;
pub(crate) mod environment;
pub(crate) mod settings;
