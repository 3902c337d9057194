//! Usage: Deployment environment presets (dev / prod), selected by `APP_ENV`.

use serde::Serialize;

pub const APP_ENV_VAR: &str = "APP_ENV";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Dev,
    Prod,
}

#[derive(Debug)]
pub struct EnvironmentPreset {
    pub server_url: &'static str,
    pub app_name: &'static str,
    pub product_name: &'static str,
    pub app_id: &'static str,
    /// Per-user data dir; dev and prod never share state.
    pub dotdir_name: &'static str,
}

const DEV_PRESET: EnvironmentPreset = EnvironmentPreset {
    server_url: "https://freepbx17-dev.celya.fr/celyavox",
    app_name: "CelyaVox Dev",
    product_name: "celyavox-dev",
    app_id: "fr.celya.celyavox.dev",
    dotdir_name: ".celyavox-dev",
};

const PROD_PRESET: EnvironmentPreset = EnvironmentPreset {
    server_url: "https://celyavox.celya.fr/phone",
    app_name: "CelyaVox",
    product_name: "celyavox",
    app_id: "fr.celya.celyavox",
    dotdir_name: ".celyavox",
};

impl AppEnvironment {
    /// Unknown or missing values fall back to `Dev`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("prod") | Some("production") => Self::Prod,
            _ => Self::Dev,
        }
    }

    /// Runtime `APP_ENV` wins over the build-time `CELYAVOX_DEFAULT_ENV`.
    pub fn detect() -> Self {
        let runtime = std::env::var(APP_ENV_VAR).ok();
        let raw = runtime
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .or(option_env!("CELYAVOX_DEFAULT_ENV"));
        Self::parse(raw)
    }

    pub fn preset(self) -> &'static EnvironmentPreset {
        match self {
            Self::Dev => &DEV_PRESET,
            Self::Prod => &PROD_PRESET,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Prod => "prod",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_prod_aliases() {
        assert_eq!(AppEnvironment::parse(Some("prod")), AppEnvironment::Prod);
        assert_eq!(AppEnvironment::parse(Some(" PRODUCTION ")), AppEnvironment::Prod);
    }

    #[test]
    fn parse_defaults_to_dev() {
        assert_eq!(AppEnvironment::parse(None), AppEnvironment::Dev);
        assert_eq!(AppEnvironment::parse(Some("staging")), AppEnvironment::Dev);
        assert_eq!(AppEnvironment::parse(Some("")), AppEnvironment::Dev);
    }

    #[test]
    fn presets_keep_user_data_apart() {
        let dev = AppEnvironment::Dev.preset();
        let prod = AppEnvironment::Prod.preset();
        assert_ne!(dev.dotdir_name, prod.dotdir_name);
        assert_ne!(dev.server_url, prod.server_url);
        assert!(prod.server_url.starts_with("https://"));
    }
}
