//! Usage: Signal names crossing the host/content boundary (single dispatch table).

use crate::domain::call_relay::RemoteOutcome;

pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const NOTIFICATION_LABEL_PREFIX: &str = "call-notification-";

const DEFAULT_CALLER_INFO: &str = "Nouvel appel entrant";

/// Signals the host accepts from a content context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InboundSignal {
    IncomingCall { caller_info: Option<String> },
    CallAnsweredFromApp,
    CallRejectedFromApp,
    CallCancelled,
    NotificationAnswer,
    NotificationReject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignalKind {
    IncomingCall,
    CallAnsweredFromApp,
    CallRejectedFromApp,
    CallCancelled,
    NotificationAnswer,
    NotificationReject,
}

const INBOUND_SIGNALS: [(&str, SignalKind); 6] = [
    ("incoming-call", SignalKind::IncomingCall),
    ("call-answered-from-app", SignalKind::CallAnsweredFromApp),
    ("call-rejected-from-app", SignalKind::CallRejectedFromApp),
    ("call-cancelled", SignalKind::CallCancelled),
    ("notification-answer", SignalKind::NotificationAnswer),
    ("notification-reject", SignalKind::NotificationReject),
];

impl InboundSignal {
    pub(crate) fn parse(name: &str, caller_info: Option<String>) -> Result<Self, String> {
        let name = name.trim();
        let kind = INBOUND_SIGNALS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| format!("SEC_INVALID_INPUT: unknown signal={name}"))?;

        Ok(match kind {
            SignalKind::IncomingCall => Self::IncomingCall { caller_info },
            SignalKind::CallAnsweredFromApp => Self::CallAnsweredFromApp,
            SignalKind::CallRejectedFromApp => Self::CallRejectedFromApp,
            SignalKind::CallCancelled => Self::CallCancelled,
            SignalKind::NotificationAnswer => Self::NotificationAnswer,
            SignalKind::NotificationReject => Self::NotificationReject,
        })
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::IncomingCall { .. } => "incoming-call",
            Self::CallAnsweredFromApp => "call-answered-from-app",
            Self::CallRejectedFromApp => "call-rejected-from-app",
            Self::CallCancelled => "call-cancelled",
            Self::NotificationAnswer => "notification-answer",
            Self::NotificationReject => "notification-reject",
        }
    }

    pub(crate) fn remote_outcome(&self) -> Option<RemoteOutcome> {
        match self {
            Self::CallAnsweredFromApp => Some(RemoteOutcome::Answered),
            Self::CallRejectedFromApp => Some(RemoteOutcome::Rejected),
            Self::CallCancelled => Some(RemoteOutcome::Cancelled),
            _ => None,
        }
    }
}

/// Signals the host forwards to the hosted content in the main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContentSignal {
    AnswerCall,
    RejectCall,
}

impl ContentSignal {
    pub(crate) fn event_name(self) -> &'static str {
        match self {
            Self::AnswerCall => "answer-call",
            Self::RejectCall => "reject-call",
        }
    }
}

/// Which webview sent a signal, derived from its window label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignalSender {
    Main,
    Notification(u64),
    Other,
}

impl SignalSender {
    pub(crate) fn from_label(label: &str) -> Self {
        if label == MAIN_WINDOW_LABEL {
            return Self::Main;
        }
        notification_id_from_label(label)
            .map(Self::Notification)
            .unwrap_or(Self::Other)
    }
}

pub(crate) fn notification_label(id: u64) -> String {
    format!("{NOTIFICATION_LABEL_PREFIX}{id}")
}

pub(crate) fn notification_id_from_label(label: &str) -> Option<u64> {
    label
        .strip_prefix(NOTIFICATION_LABEL_PREFIX)
        .and_then(|rest| rest.parse::<u64>().ok())
}

pub(crate) fn normalize_caller_info(caller_info: Option<&str>) -> String {
    caller_info
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_CALLER_INFO)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_every_name_in_the_table() {
        for (name, _) in INBOUND_SIGNALS {
            let signal = InboundSignal::parse(name, None).expect("known signal");
            assert_eq!(signal.name(), name);
        }
    }

    #[test]
    fn parse_keeps_caller_info_for_incoming_call_only() {
        let signal = InboundSignal::parse("incoming-call", Some("Alice".to_string()))
            .expect("incoming-call");
        assert_eq!(
            signal,
            InboundSignal::IncomingCall {
                caller_info: Some("Alice".to_string())
            }
        );

        let signal = InboundSignal::parse("call-cancelled", Some("ignored".to_string()))
            .expect("call-cancelled");
        assert_eq!(signal, InboundSignal::CallCancelled);
    }

    #[test]
    fn parse_rejects_unknown_signal() {
        assert_eq!(
            InboundSignal::parse("db-get", None).unwrap_err(),
            "SEC_INVALID_INPUT: unknown signal=db-get"
        );
    }

    #[test]
    fn remote_outcome_only_for_app_side_resolutions() {
        assert_eq!(
            InboundSignal::CallCancelled.remote_outcome(),
            Some(RemoteOutcome::Cancelled)
        );
        assert_eq!(InboundSignal::NotificationAnswer.remote_outcome(), None);
    }

    #[test]
    fn sender_from_label() {
        assert_eq!(SignalSender::from_label("main"), SignalSender::Main);
        assert_eq!(
            SignalSender::from_label(&notification_label(42)),
            SignalSender::Notification(42)
        );
        assert_eq!(
            SignalSender::from_label("call-notification-x"),
            SignalSender::Other
        );
        assert_eq!(SignalSender::from_label("settings"), SignalSender::Other);
    }

    #[test]
    fn normalize_caller_info_falls_back_to_default() {
        assert_eq!(normalize_caller_info(Some("  Bob ")), "Bob");
        assert_eq!(normalize_caller_info(Some("   ")), DEFAULT_CALLER_INFO);
        assert_eq!(normalize_caller_info(None), DEFAULT_CALLER_INFO);
    }
}
