//! Touch batch builder.
//!
//! Converts a snapshot of the session table into the batch of
//! [`TouchPointDescriptor`]s submitted to the host in a single call.
//!
//! # Lifecycle to flags
//!
//! | lifecycle | flags                          |
//! |-----------|--------------------------------|
//! | `New`     | `DOWN | IN_RANGE | IN_CONTACT` |
//! | `Updated` | `UPDATE | IN_RANGE | IN_CONTACT` |
//! | `Removed` | `UP`                           |
//!
//! The builder is stateless between calls: the same cursors with the same
//! parameters always yield the same batch.

use std::collections::HashSet;

use tracing::trace;

use super::{
    allocator::TouchIdAllocator,
    cursor::{Cursor, Lifecycle},
    descriptor::{ContactRect, PointerFlags, TouchPointDescriptor},
    geometry::{map_to_pixels, TargetArea},
};

/// Pressure reported for every contact.  TUIO carries no pressure signal.
pub const DEFAULT_PRESSURE: u32 = 32000;

/// Builds touch batches from cursor snapshots.
#[derive(Debug, Clone, Copy)]
pub struct BatchBuilder {
    allocator: TouchIdAllocator,
    pressure: u32,
}

impl BatchBuilder {
    pub fn new(allocator: TouchIdAllocator, pressure: u32) -> Self {
        Self {
            allocator,
            pressure,
        }
    }

    pub fn allocator(&self) -> &TouchIdAllocator {
        &self.allocator
    }

    /// Produces exactly one descriptor per cursor, in input order.
    ///
    /// No filtering and no de-duplication by touch ID: colliding sessions
    /// are passed through as-is.
    pub fn build(
        &self,
        cursors: &[Cursor],
        area: &TargetArea,
        radius: u32,
    ) -> Vec<TouchPointDescriptor> {
        cursors
            .iter()
            .map(|cursor| self.describe(cursor, area, radius))
            .collect()
    }

    fn describe(&self, cursor: &Cursor, area: &TargetArea, radius: u32) -> TouchPointDescriptor {
        if cursor.is_malformed() {
            trace!(
                session_id = cursor.session_id,
                x = cursor.x,
                y = cursor.y,
                "cursor outside normalized range; passing through unclamped"
            );
        }

        let pixel = map_to_pixels(cursor.x, cursor.y, area);
        TouchPointDescriptor {
            touch_id: self.allocator.allocate(cursor.session_id),
            session_id: cursor.session_id,
            pixel,
            contact_area: ContactRect::around(pixel, radius),
            pressure: self.pressure,
            flags: flags_for(cursor.lifecycle),
        }
    }
}

impl Default for BatchBuilder {
    fn default() -> Self {
        Self::new(TouchIdAllocator::default(), DEFAULT_PRESSURE)
    }
}

/// Maps a lifecycle tag to the pointer flags sent to the host.
pub fn flags_for(lifecycle: Lifecycle) -> PointerFlags {
    match lifecycle {
        Lifecycle::New => PointerFlags::pressed(),
        Lifecycle::Updated => PointerFlags::moved(),
        Lifecycle::Removed => PointerFlags::released(),
    }
}

/// Counts descriptors whose touch ID was already used earlier in the batch.
///
/// A batch with sessions 1, 25 and 49 under a budget of 24 reports 2.
pub fn find_collisions(batch: &[TouchPointDescriptor]) -> usize {
    let mut seen = HashSet::with_capacity(batch.len());
    batch.iter().filter(|d| !seen.insert(d.touch_id)).count()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
