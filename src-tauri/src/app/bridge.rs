//! Usage: Initialization script injected into the main (remote) webview.
//!
//! Exposes the call signalling helpers (over the `signal_send` command and Tauri events) as
//! `window.celyavox`, and under `window.electron` as well since the hosted phone UI detects its
//! desktop shell through that name and `window.env.isElectron`.

use serde::Serialize;

const SESSION_NAME_ENV: &str = "SESSIONNAME";

/// Text selection is re-enabled everywhere except clickable controls; the hosted phone UI
/// disables it for a touch layout.
const SELECTION_CSS: &str = "\
body, body *, .NoSelect, .chatHistory, .tags li, div, span, p, td, th, li {\
 -webkit-user-select: text !important; user-select: text !important;\
 -webkit-touch-callout: default !important; }\
input, textarea, [contenteditable=\"true\"], .messageText {\
 -webkit-user-select: text !important; user-select: text !important; cursor: text !important; }\
button, a, [role=\"button\"], .roundButtons, .toolBarButtons, [onclick],\
 input[type=\"button\"], input[type=\"submit\"] {\
 -webkit-user-select: none !important; user-select: none !important; cursor: pointer !important; }";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BridgeVersions {
    pub(crate) app: String,
    pub(crate) tauri: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BridgeEnv {
    pub(crate) is_desktop_shell: bool,
    pub(crate) is_electron: bool,
    #[serde(rename = "isRDP")]
    pub(crate) is_rdp: bool,
    pub(crate) versions: BridgeVersions,
}

impl BridgeEnv {
    pub(crate) fn current() -> Self {
        Self {
            is_desktop_shell: true,
            is_electron: true,
            is_rdp: is_rdp_session(),
            versions: BridgeVersions {
                app: env!("CARGO_PKG_VERSION").to_string(),
                tauri: tauri::VERSION.to_string(),
            },
        }
    }
}

pub(crate) fn is_rdp_session_name(value: Option<&str>) -> bool {
    value.is_some_and(|name| name.contains("RDP"))
}

pub(crate) fn is_rdp_session() -> bool {
    is_rdp_session_name(std::env::var(SESSION_NAME_ENV).ok().as_deref())
}

pub(crate) fn init_script(env: &BridgeEnv) -> Result<String, String> {
    let env_json = serde_json::to_string(env).map_err(|e| format!("BRIDGE_SCRIPT: {e}"))?;
    let css_json = serde_json::to_string(SELECTION_CSS).map_err(|e| format!("BRIDGE_SCRIPT: {e}"))?;

    Ok(format!(
        r#"(function () {{
  if (window.celyavox) return;
  var invoke = function (cmd, args) {{
    var tauri = window.__TAURI__;
    if (tauri && tauri.core) return tauri.core.invoke(cmd, args);
    return window.__TAURI_INTERNALS__.invoke(cmd, args);
  }};
  var send = function (signal, callerInfo) {{
    return invoke("signal_send", {{ signal: signal, callerInfo: callerInfo == null ? null : String(callerInfo) }});
  }};
  window.env = {env_json};
  var api = {{
    incomingCall: function (callerInfo) {{ return send("incoming-call", callerInfo); }},
    bringToFront: function () {{ return send("incoming-call"); }},
    send: function (channel) {{ return send(channel); }},
    on: function (channel, cb) {{
      return window.__TAURI__.event.listen(channel, function (event) {{ cb(event.payload); }});
    }},
    getAppInfo: function () {{ return invoke("app_info_get"); }}
  }};
  window.celyavox = api;
  window.electron = api;
  var injectCss = function () {{
    var style = document.createElement("style");
    style.setAttribute("data-celyavox", "selection");
    style.textContent = {css_json};
    document.head.appendChild(style);
  }};
  if (document.readyState === "loading") {{
    document.addEventListener("DOMContentLoaded", injectCss);
  }} else {{
    injectCss();
  }}
}})();
"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_env(is_rdp: bool) -> BridgeEnv {
        BridgeEnv {
            is_desktop_shell: true,
            is_electron: true,
            is_rdp,
            versions: BridgeVersions {
                app: "1.0.4".to_string(),
                tauri: "2.0.0".to_string(),
            },
        }
    }

    #[test]
    fn rdp_detection_matches_session_name() {
        assert!(is_rdp_session_name(Some("RDP-Tcp#3")));
        assert!(!is_rdp_session_name(Some("Console")));
        assert!(!is_rdp_session_name(None));
    }

    #[test]
    fn env_serializes_with_page_field_names() {
        let value = serde_json::to_value(sample_env(true)).expect("serialize env");
        assert_eq!(value["isDesktopShell"], true);
        assert_eq!(value["isRDP"], true);
        assert_eq!(value["isElectron"], true);
        assert_eq!(value["versions"]["app"], "1.0.4");
    }

    #[test]
    fn script_exposes_call_helpers() {
        let script = init_script(&sample_env(false)).expect("script");
        assert!(script.contains("window.celyavox = api;"));
        assert!(script.contains("window.electron = api;"));
        assert!(script.contains("\"isElectron\":true"));
        assert!(script.contains("\"signal_send\""));
        assert!(script.contains("incomingCall:"));
        assert!(script.contains("\"isRDP\":false"));
        assert!(script.contains("user-select: text !important"));
    }
}
