//! "Waypoint found" notice
//!
//! Raised when the player reaches a waypoint and shown for a fixed time.
//! Time is measured on the fix clock (`PositionFix::timestamp_ms`), so the
//! notice expires as the player keeps moving and stays deterministic under
//! replay.

/// A transient notice naming the waypoint just found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundNotice {
    duration_ms: u64,
    active: Option<ActiveNotice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveNotice {
    waypoint: String,
    raised_at_ms: u64,
}

impl FoundNotice {
    /// Create an idle notice that stays up for `duration_ms` once raised
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            active: None,
        }
    }

    /// Raise the notice for `waypoint`, replacing any notice still showing
    pub fn raise(&mut self, waypoint: &str, now_ms: u64) {
        self.active = Some(ActiveNotice {
            waypoint: waypoint.to_string(),
            raised_at_ms: now_ms,
        });
    }

    /// Name of the waypoint to announce at `now_ms`, if still showing
    pub fn visible(&self, now_ms: u64) -> Option<&str> {
        let notice = self.active.as_ref()?;
        if now_ms.saturating_sub(notice.raised_at_ms) < self.duration_ms {
            Some(&notice.waypoint)
        } else {
            None
        }
    }

    /// Drop the notice once expired at `now_ms`
    pub fn expire(&mut self, now_ms: u64) {
        if self.visible(now_ms).is_none() {
            self.active = None;
        }
    }

    /// Hide immediately
    pub fn clear(&mut self) {
        self.active = None;
    }
}
