//! Session-ID to touch-ID allocation.
//!
//! The host's touch-injection API only accepts a small, fixed number of
//! distinct pointer identifiers (configured once at startup), while TUIO
//! session IDs grow without bound.  The allocator folds one space onto the
//! other with a plain modulo.
//!
//! # Collisions
//!
//! The mapping is lossy on purpose: two contacts that are live at the same
//! time and whose session IDs are congruent modulo `max_touch_points` get the
//! same touch ID, and the host treats their events as updates to a single
//! touch point.  No free-list or reuse scheme is applied.  Collisions are
//! counted by the pipeline (see [`crate::domain::batch::find_collisions`])
//! instead of being resolved here.

use std::num::NonZeroU32;

use super::{cursor::SessionId, TouchCoreError};

/// Number of simultaneous touch points requested from the host by default.
pub const DEFAULT_MAX_TOUCH_POINTS: u32 = 24;

/// Maps session IDs to touch IDs in `[0, max_touch_points)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchIdAllocator {
    max_touch_points: NonZeroU32,
}

impl TouchIdAllocator {
    /// Creates an allocator for the given touch-point budget.
    pub fn new(max_touch_points: NonZeroU32) -> Self {
        Self { max_touch_points }
    }

    /// Creates an allocator from an unchecked configuration value.
    ///
    /// # Errors
    ///
    /// Returns [`TouchCoreError::ZeroTouchPoints`] when `max_touch_points` is 0.
    pub fn try_new(max_touch_points: u32) -> Result<Self, TouchCoreError> {
        NonZeroU32::new(max_touch_points)
            .map(Self::new)
            .ok_or(TouchCoreError::ZeroTouchPoints)
    }

    /// The configured touch-point budget.
    pub fn max_touch_points(&self) -> u32 {
        self.max_touch_points.get()
    }

    /// Returns the touch ID for `session_id`.
    ///
    /// Uses the Euclidean remainder so a negative session ID still yields a
    /// value in `[0, max_touch_points)`.
    pub fn allocate(&self, session_id: SessionId) -> u32 {
        let max = i64::from(self.max_touch_points.get());
        // rem_euclid with a positive divisor is always in [0, max), which fits u32.
        session_id.rem_euclid(max) as u32
    }
}

impl Default for TouchIdAllocator {
    fn default() -> Self {
        Self {
            max_touch_points: NonZeroU32::new(DEFAULT_MAX_TOUCH_POINTS)
                .unwrap_or(NonZeroU32::MIN),
        }
    }
}
