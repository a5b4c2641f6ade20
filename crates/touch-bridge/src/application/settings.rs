//! Runtime-tunable touch settings.
//!
//! The contact radius is the only knob a user changes while the bridge runs
//! (through the radius slider of the host UI).  It is stored in an atomic so
//! the slider can write it from the UI thread while the refresh loop reads it
//! on every pass, without a lock.

use std::sync::atomic::{AtomicU32, Ordering};

/// Half-width / half-height of the reported contact rectangle, in pixels.
pub const DEFAULT_AREA_RADIUS: u32 = 10;

#[derive(Debug)]
pub struct TouchSettings {
    area_radius: AtomicU32,
}

impl TouchSettings {
    pub fn new(area_radius: u32) -> Self {
        Self {
            area_radius: AtomicU32::new(area_radius),
        }
    }

    pub fn area_radius(&self) -> u32 {
        self.area_radius.load(Ordering::Relaxed)
    }

    /// Sets the contact radius.  Takes effect on the next refresh.
    ///
    /// Returns the value stored.  Any radius is accepted; 0 gives point
    /// contacts.
    pub fn set_area_radius(&self, radius: u32) -> u32 {
        self.area_radius.store(radius, Ordering::Relaxed);
        radius
    }
}

impl Default for TouchSettings {
    fn default() -> Self {
        Self::new(DEFAULT_AREA_RADIUS)
    }
}
