//! Usage: Incoming-call notification relay.
//!
//! Pure state machine: every transition returns the [`RelayAction`]s the host must apply
//! (`app::call_windows` does that against real webview windows). At most one notification
//! instance exists at a time; every instance gets a fresh id so stale timers, late button
//! presses and `Destroyed` events for a replaced window can be recognized and dropped.

use crate::domain::signals::{normalize_caller_info, ContentSignal};
use std::time::Duration;

pub(crate) const NOTIFICATION_EXPIRY: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RelayPhase {
    Idle,
    /// Window requested, page not loaded yet.
    Pending { id: u64, caller: String },
    /// Shown without taking focus.
    Visible { id: u64, caller: String },
}

/// The call was handled from the main surface or by the remote party.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RemoteOutcome {
    Answered,
    Rejected,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    Answered,
    Rejected,
    Remote(RemoteOutcome),
    Expired,
    ClosedByUser,
    Replaced,
}

impl Resolution {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Answered => "answered",
            Self::Rejected => "rejected",
            Self::Remote(RemoteOutcome::Answered) => "answered_from_app",
            Self::Remote(RemoteOutcome::Rejected) => "rejected_from_app",
            Self::Remote(RemoteOutcome::Cancelled) => "cancelled",
            Self::Expired => "expired",
            Self::ClosedByUser => "closed_by_user",
            Self::Replaced => "replaced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RelayAction {
    OpenNotification { id: u64, caller: String },
    ShowNotificationInactive { id: u64 },
    /// `hide_first` avoids a visible flash while the window tears down.
    CloseNotification { id: u64, hide_first: bool },
    ArmExpiry { id: u64, after: Duration },
    CancelExpiry { id: u64 },
    /// Flash / bounce the main window without taking focus.
    RaiseAttention,
    FocusMain,
    Forward(ContentSignal),
}

#[derive(Debug)]
pub(crate) struct CallRelay {
    phase: RelayPhase,
    next_id: u64,
    expiry: Duration,
}

impl Default for CallRelay {
    fn default() -> Self {
        Self::new(NOTIFICATION_EXPIRY)
    }
}

impl CallRelay {
    pub(crate) fn new(expiry: Duration) -> Self {
        Self {
            phase: RelayPhase::Idle,
            next_id: 1,
            expiry,
        }
    }

    pub(crate) fn set_expiry(&mut self, expiry: Duration) {
        self.expiry = expiry;
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> &RelayPhase {
        &self.phase
    }

    pub(crate) fn active_id(&self) -> Option<u64> {
        match &self.phase {
            RelayPhase::Idle => None,
            RelayPhase::Pending { id, .. } | RelayPhase::Visible { id, .. } => Some(*id),
        }
    }

    pub(crate) fn incoming_call(&mut self, caller_info: Option<&str>) -> Vec<RelayAction> {
        let mut actions = Vec::new();

        if let Some(previous) = self.take_active(Resolution::Replaced) {
            actions.push(RelayAction::CancelExpiry { id: previous });
            actions.push(RelayAction::CloseNotification {
                id: previous,
                hide_first: true,
            });
        }

        let id = self.next_id;
        self.next_id += 1;
        let caller = normalize_caller_info(caller_info);
        tracing::info!(notification_id = id, caller = %caller, "incoming call: opening notification");

        self.phase = RelayPhase::Pending {
            id,
            caller: caller.clone(),
        };
        actions.push(RelayAction::OpenNotification { id, caller });
        actions.push(RelayAction::ArmExpiry {
            id,
            after: self.expiry,
        });
        actions
    }

    pub(crate) fn surface_ready(&mut self, id: u64) -> Vec<RelayAction> {
        let RelayPhase::Pending { id: pending, caller } = &self.phase else {
            return Vec::new();
        };
        if *pending != id {
            return Vec::new();
        }

        self.phase = RelayPhase::Visible {
            id,
            caller: caller.clone(),
        };
        vec![RelayAction::ShowNotificationInactive { id }]
    }

    /// User pressed "answer" inside notification `id`.
    pub(crate) fn answer_from_surface(&mut self, id: u64) -> Vec<RelayAction> {
        if self.active_id() != Some(id) {
            tracing::debug!(notification_id = id, "answer from stale notification ignored");
            return Vec::new();
        }
        self.take_active(Resolution::Answered);
        vec![
            RelayAction::CancelExpiry { id },
            RelayAction::CloseNotification {
                id,
                hide_first: true,
            },
            RelayAction::FocusMain,
            RelayAction::Forward(ContentSignal::AnswerCall),
        ]
    }

    /// User pressed "reject" inside notification `id`; the main window stays where it is.
    pub(crate) fn reject_from_surface(&mut self, id: u64) -> Vec<RelayAction> {
        if self.active_id() != Some(id) {
            tracing::debug!(notification_id = id, "reject from stale notification ignored");
            return Vec::new();
        }
        self.take_active(Resolution::Rejected);
        vec![
            RelayAction::CancelExpiry { id },
            RelayAction::CloseNotification {
                id,
                hide_first: true,
            },
            RelayAction::Forward(ContentSignal::RejectCall),
        ]
    }

    /// Call handled by the hosted content itself: close without forwarding anything back.
    pub(crate) fn resolved_in_app(&mut self, outcome: RemoteOutcome) -> Vec<RelayAction> {
        let Some(id) = self.take_active(Resolution::Remote(outcome)) else {
            return Vec::new();
        };
        vec![
            RelayAction::CancelExpiry { id },
            RelayAction::CloseNotification {
                id,
                hide_first: false,
            },
        ]
    }

    /// Expiry timer for `id` fired.
    pub(crate) fn expire(&mut self, id: u64) -> Vec<RelayAction> {
        if self.active_id() != Some(id) {
            return Vec::new();
        }
        self.take_active(Resolution::Expired);
        vec![RelayAction::CloseNotification {
            id,
            hide_first: false,
        }]
    }

    /// Window `id` is gone (closed through OS chrome, or our own close completing).
    pub(crate) fn surface_destroyed(&mut self, id: u64) -> Vec<RelayAction> {
        if self.active_id() != Some(id) {
            return Vec::new();
        }
        self.take_active(Resolution::ClosedByUser);
        vec![RelayAction::CancelExpiry { id }]
    }

    fn take_active(&mut self, resolution: Resolution) -> Option<u64> {
        let id = self.active_id()?;
        self.phase = RelayPhase::Idle;
        tracing::info!(
            notification_id = id,
            resolution = resolution.as_str(),
            "call notification resolved"
        );
        Some(id)
    }
}
