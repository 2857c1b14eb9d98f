//! Transient "added" acknowledgment on a product card's add control.
//!
//! The acknowledgment is a deadline rather than a background task: the
//! widget stays synchronous and whoever drives the event loop schedules a
//! timer for [`Acknowledgment::next_deadline`] and hands the trigger's
//! [`AckToken`] back to [`Acknowledgment::revert`] when it fires. Each
//! trigger supersedes the previous one, so a stale timer can never cut a
//! newer acknowledgment short.

use std::time::{Duration, Instant};

/// Label of the add control at rest.
pub const ADD_LABEL: &str = "Add to Cart";
/// Label of the add control while acknowledging.
pub const ADDED_LABEL: &str = "Added ✓";

/// How long the acknowledgment stays up by default.
pub const DEFAULT_ACK_DELAY: Duration = Duration::from_millis(1200);

/// Handle for one trigger of an [`Acknowledgment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AckToken(u64);

/// Acknowledgment state for one add control.
#[derive(Debug, Clone)]
pub struct Acknowledgment {
    delay: Duration,
    generation: u64,
    shown_until: Option<Instant>,
}

impl Acknowledgment {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            shown_until: None,
        }
    }

    /// Show the acknowledgment until `now + delay`, cancelling any earlier one.
    pub fn trigger(&mut self, now: Instant) -> AckToken {
        self.generation = self.generation.wrapping_add(1);
        self.shown_until = Some(now + self.delay);
        AckToken(self.generation)
    }

    /// Revert early if `token` is still the current trigger.
    ///
    /// Returns `true` if the acknowledgment was reverted.
    pub fn revert(&mut self, token: AckToken) -> bool {
        if self.shown_until.is_some() && token.0 == self.generation {
            self.shown_until = None;
            return true;
        }
        false
    }

    /// Whether the acknowledgment is showing.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.shown_until.is_some()
    }

    /// When the current acknowledgment reverts, if one is showing.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.shown_until
    }

    /// The add control's current label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        if self.is_active() {
            ADDED_LABEL
        } else {
            ADD_LABEL
        }
    }
}

impl Default for Acknowledgment {
    fn default() -> Self {
        Self::new(DEFAULT_ACK_DELAY)
    }
}
