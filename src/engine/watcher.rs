//! Mutation & navigation watcher.
//!
//! Two states: `Idle` and `PendingRefresh`. Every trigger arms the single
//! debounce slot, cancelling whatever was armed before, so a burst of
//! events produces one refresh `delay` after the last of them. When the
//! slot fires, a changed location turns the refresh into a forced one.

use std::time::{Duration, Instant};

use crate::dom::{MutationKind, MutationRecord};

/// Notifications the host delivers to the watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Subtree mutation (child list or character data)
    Mutation,
    /// Back/forward traversal
    PopState,
    HashChange,
    /// Intercepted `history.pushState`
    PushState,
    /// Intercepted `history.replaceState`
    ReplaceState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    PendingRefresh { due: Instant },
}

/// A due refresh handed back to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshRequest {
    /// Bypass change detection (the location changed)
    pub force: bool,
}

pub struct Watcher {
    delay: Duration,
    state: WatcherState,
    last_known_url: String,
}

impl Watcher {
    pub fn new(delay: Duration, location: impl Into<String>) -> Self {
        Self {
            delay,
            state: WatcherState::Idle,
            last_known_url: location.into(),
        }
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, WatcherState::PendingRefresh { .. })
    }

    pub fn last_known_url(&self) -> &str {
        &self.last_known_url
    }

    /// Arm (or re-arm) the debounce slot.
    pub fn notify(&mut self, event: HostEvent, now: Instant) {
        let due = now + self.delay;
        if let WatcherState::PendingRefresh { due: previous } = self.state {
            log::trace!("{:?} re-arms refresh ({:?} -> {:?})", event, previous, due);
        } else {
            log::trace!("{:?} arms refresh", event);
        }
        self.state = WatcherState::PendingRefresh { due };
    }

    /// Feed drained mutation records. Attribute writes are not watched.
    /// Returns whether any record armed the slot.
    pub fn observe_mutations(&mut self, records: &[MutationRecord], now: Instant) -> bool {
        let relevant = records
            .iter()
            .any(|r| matches!(r.kind, MutationKind::ChildList | MutationKind::CharacterData));
        if relevant {
            self.notify(HostEvent::Mutation, now);
        }
        relevant
    }

    /// Fire the slot if it is due. `location` is the host's current URL.
    pub fn poll(&mut self, now: Instant, location: &str) -> Option<RefreshRequest> {
        let WatcherState::PendingRefresh { due } = self.state else {
            return None;
        };
        if now < due {
            return None;
        }

        self.state = WatcherState::Idle;
        let force = location != self.last_known_url;
        if force {
            log::info!("Navigation {} -> {}", self.last_known_url, location);
            self.last_known_url = location.to_string();
        }
        Some(RefreshRequest { force })
    }

    pub fn cancel(&mut self) {
        self.state = WatcherState::Idle;
    }

    /// Adopt `location` without forcing a refresh, e.g. after a forced pass.
    pub fn reset_location(&mut self, location: impl Into<String>) {
        self.last_known_url = location.into();
    }
}
