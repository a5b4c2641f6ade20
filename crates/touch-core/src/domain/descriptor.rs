//! Synthetic touch event descriptors.
//!
//! A [`TouchPointDescriptor`] is the platform-independent form of one entry in
//! a touch injection batch.  Infrastructure adapters translate it into the
//! host's native structure (e.g. `POINTER_TOUCH_INFO` on Windows).

use serde::{Deserialize, Serialize};

use super::{cursor::SessionId, geometry::PixelPoint};

/// Pointer state bits carried by a touch descriptor.
///
/// The bit values are internal; adapters map each bit to the host constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PointerFlags(pub u8);

impl PointerFlags {
    pub const DOWN: u8 = 1 << 0;
    pub const UPDATE: u8 = 1 << 1;
    pub const UP: u8 = 1 << 2;
    pub const IN_RANGE: u8 = 1 << 3;
    pub const IN_CONTACT: u8 = 1 << 4;

    /// Flags for a contact that just touched down.
    pub fn pressed() -> Self {
        Self(Self::DOWN | Self::IN_RANGE | Self::IN_CONTACT)
    }

    /// Flags for a contact that is still down and may have moved.
    pub fn moved() -> Self {
        Self(Self::UPDATE | Self::IN_RANGE | Self::IN_CONTACT)
    }

    /// Flags for a contact that was lifted.
    pub fn released() -> Self {
        Self(Self::UP)
    }

    pub fn contains(&self, bits: u8) -> bool {
        self.0 & bits == bits
    }

    pub fn is_down(&self) -> bool {
        self.contains(Self::DOWN)
    }

    pub fn is_update(&self) -> bool {
        self.contains(Self::UPDATE)
    }

    pub fn is_up(&self) -> bool {
        self.contains(Self::UP)
    }
}

/// Contact footprint reported to the host, in desktop pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ContactRect {
    /// Square of half-size `radius` centred on `center`.
    pub fn around(center: PixelPoint, radius: u32) -> Self {
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        Self {
            left: center.x.saturating_sub(r),
            top: center.y.saturating_sub(r),
            right: center.x.saturating_add(r),
            bottom: center.y.saturating_add(r),
        }
    }
}

/// One synthetic touch event unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TouchPointDescriptor {
    /// Host pointer identifier, in `[0, max_touch_points)`.
    pub touch_id: u32,
    /// TUIO session that produced this event.  Not sent to the host.
    pub session_id: SessionId,
    pub pixel: PixelPoint,
    pub contact_area: ContactRect,
    pub pressure: u32,
    pub flags: PointerFlags,
}
