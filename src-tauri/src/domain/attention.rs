//! Usage: Debounce gate for attention raising (taskbar flash / dock bounce).

use std::time::{Duration, Instant};

pub(crate) const ATTENTION_DEBOUNCE: Duration = Duration::from_secs(8);

#[derive(Debug)]
pub(crate) struct AttentionGate {
    debounce: Duration,
    last_auto_focus: Option<Instant>,
    flashing: bool,
}

impl Default for AttentionGate {
    fn default() -> Self {
        Self::new(ATTENTION_DEBOUNCE)
    }
}

impl AttentionGate {
    pub(crate) fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            last_auto_focus: None,
            flashing: false,
        }
    }

    pub(crate) fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    /// Returns `true` when the caller should actually raise attention.
    pub(crate) fn request(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_auto_focus {
            if now.saturating_duration_since(last) < self.debounce {
                return false;
            }
        }
        self.last_auto_focus = Some(now);
        self.flashing = true;
        true
    }

    /// Main window got focus; returns whether a pending flash should be cleared.
    pub(crate) fn acknowledge(&mut self) -> bool {
        std::mem::replace(&mut self.flashing, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_within_debounce_collapse_to_one() {
        let mut gate = AttentionGate::new(Duration::from_secs(8));
        let t0 = Instant::now();
        assert!(gate.request(t0));
        assert!(!gate.request(t0 + Duration::from_secs(5)));
        assert!(gate.request(t0 + Duration::from_secs(9)));
    }

    #[test]
    fn suppressed_request_does_not_extend_the_window() {
        let mut gate = AttentionGate::new(Duration::from_secs(8));
        let t0 = Instant::now();
        assert!(gate.request(t0));
        assert!(!gate.request(t0 + Duration::from_secs(7)));
        assert!(gate.request(t0 + Duration::from_secs(8)));
    }

    #[test]
    fn zero_debounce_always_allows() {
        let mut gate = AttentionGate::new(Duration::ZERO);
        let t0 = Instant::now();
        assert!(gate.request(t0));
        assert!(gate.request(t0));
    }

    #[test]
    fn acknowledge_clears_flashing_once() {
        let mut gate = AttentionGate::default();
        assert!(!gate.acknowledge());
        gate.request(Instant::now());
        assert!(gate.acknowledge());
        assert!(!gate.acknowledge());
    }
}
