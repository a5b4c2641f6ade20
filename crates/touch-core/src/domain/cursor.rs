//! The tracked cursor record.

use serde::{Deserialize, Serialize};

/// Session identifier assigned by the TUIO source to one physical contact.
///
/// Unique for the whole lifetime of the contact and never reused while the
/// contact is live.  Sources are expected to send non-negative values, but
/// nothing downstream relies on that.
pub type SessionId = i64;

/// Status of a cursor since the previous refresh.
///
/// The receiver overwrites the tag every refresh in which the cursor is
/// reported, so it never describes more than one refresh worth of history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    /// The contact appeared since the last refresh.
    New,
    /// The contact was already known and is still down.
    Updated,
    /// The contact was lifted; it must be reported as released once.
    Removed,
}

/// One tracked contact point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub session_id: SessionId,
    /// Normalized X, nominally in `[0, 1]`; not clamped by the source.
    pub x: f32,
    /// Normalized Y, nominally in `[0, 1]`; not clamped by the source.
    pub y: f32,
    pub lifecycle: Lifecycle,
}

impl Cursor {
    /// Creates a cursor record.
    pub fn new(session_id: SessionId, x: f32, y: f32, lifecycle: Lifecycle) -> Self {
        Self {
            session_id,
            x,
            y,
            lifecycle,
        }
    }

    /// Returns `true` if the cursor is waiting for its release to be delivered.
    pub fn is_removed(&self) -> bool {
        self.lifecycle == Lifecycle::Removed
    }

    /// Returns `true` if the position lies outside the unit square or the
    /// session ID is negative.
    ///
    /// Such cursors are still translated as-is; this only feeds diagnostics.
    pub fn is_malformed(&self) -> bool {
        self.session_id < 0
            || !(0.0..=1.0).contains(&self.x)
            || !(0.0..=1.0).contains(&self.y)
    }
}
