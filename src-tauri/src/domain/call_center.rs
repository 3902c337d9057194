//! Usage: Typed dispatch of inbound signals onto the call relay + attention gate.

use crate::domain::attention::{AttentionGate, ATTENTION_DEBOUNCE};
use crate::domain::call_relay::{CallRelay, RelayAction, NOTIFICATION_EXPIRY};
use crate::domain::signals::{InboundSignal, SignalSender};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub(crate) struct CallCenter {
    relay: CallRelay,
    attention: AttentionGate,
}

impl Default for CallCenter {
    fn default() -> Self {
        Self::new(NOTIFICATION_EXPIRY, ATTENTION_DEBOUNCE)
    }
}

impl CallCenter {
    pub(crate) fn new(expiry: Duration, attention_debounce: Duration) -> Self {
        Self {
            relay: CallRelay::new(expiry),
            attention: AttentionGate::new(attention_debounce),
        }
    }

    pub(crate) fn configure(&mut self, expiry: Duration, attention_debounce: Duration) {
        self.relay.set_expiry(expiry);
        self.attention.set_debounce(attention_debounce);
    }

    pub(crate) fn relay(&self) -> &CallRelay {
        &self.relay
    }

    pub(crate) fn dispatch(
        &mut self,
        signal: InboundSignal,
        sender: SignalSender,
        now: Instant,
    ) -> Result<Vec<RelayAction>, String> {
        tracing::debug!(signal = signal.name(), sender = ?sender, "signal received");

        if let Some(outcome) = signal.remote_outcome() {
            return Ok(self.relay.resolved_in_app(outcome));
        }

        match signal {
            InboundSignal::IncomingCall { caller_info } => {
                let mut actions = Vec::new();
                if self.attention.request(now) {
                    actions.push(RelayAction::RaiseAttention);
                }
                actions.extend(self.relay.incoming_call(caller_info.as_deref()));
                Ok(actions)
            }
            InboundSignal::NotificationAnswer => {
                let id = notification_sender(sender, "notification-answer")?;
                Ok(self.relay.answer_from_surface(id))
            }
            InboundSignal::NotificationReject => {
                let id = notification_sender(sender, "notification-reject")?;
                Ok(self.relay.reject_from_surface(id))
            }
            // Handled above through `remote_outcome`.
            InboundSignal::CallAnsweredFromApp
            | InboundSignal::CallRejectedFromApp
            | InboundSignal::CallCancelled => Ok(Vec::new()),
        }
    }

    pub(crate) fn surface_ready(&mut self, id: u64) -> Vec<RelayAction> {
        self.relay.surface_ready(id)
    }

    pub(crate) fn expire(&mut self, id: u64) -> Vec<RelayAction> {
        self.relay.expire(id)
    }

    pub(crate) fn surface_destroyed(&mut self, id: u64) -> Vec<RelayAction> {
        self.relay.surface_destroyed(id)
    }

    /// Main window focused: clear any pending attention request.
    pub(crate) fn main_focused(&mut self) -> bool {
        self.attention.acknowledge()
    }
}

fn notification_sender(sender: SignalSender, signal: &str) -> Result<u64, String> {
    match sender {
        SignalSender::Notification(id) => Ok(id),
        _ => Err(format!(
            "SEC_INVALID_INPUT: {signal} must come from a notification window"
        )),
    }
}
