//! Windows touch injection via `InitializeTouchInjection` / `InjectTouchInput`.
//!
//! Each [`TouchPointDescriptor`] becomes one `POINTER_TOUCH_INFO`.  The whole
//! batch goes to the OS in a single `InjectTouchInput` call, which either
//! applies every contact or fails as a unit.
//!
//! The number of distinct pointer IDs the OS accepts is fixed by the
//! `InitializeTouchInjection` call made once per process.

#![cfg(target_os = "windows")]

use std::num::NonZeroU32;
use std::sync::Arc;

use touch_core::{PointerFlags, TouchPointDescriptor};
use tracing::debug;
use windows::Win32::Foundation::{POINT, RECT};
use windows::Win32::UI::Input::Pointer::{
    InitializeTouchInjection, InjectTouchInput, POINTER_FLAGS, POINTER_FLAG_DOWN,
    POINTER_FLAG_INCONTACT, POINTER_FLAG_INRANGE, POINTER_FLAG_NONE, POINTER_FLAG_UP,
    POINTER_FLAG_UPDATE, POINTER_INFO, POINTER_TOUCH_INFO, TOUCH_FEEDBACK_DEFAULT,
    TOUCH_FEEDBACK_INDIRECT, TOUCH_FEEDBACK_MODE, TOUCH_FEEDBACK_NONE,
};
use windows::Win32::UI::WindowsAndMessaging::{
    PT_TOUCH, TOUCH_FLAG_NONE, TOUCH_MASK_CONTACTAREA, TOUCH_MASK_ORIENTATION,
    TOUCH_MASK_PRESSURE,
};

use crate::application::inject_touch::{
    InjectionError, TouchCapability, TouchFeedback, TouchInjector,
};

/// Windows implementation of [`TouchCapability`].
pub struct WindowsTouchCapability;

impl WindowsTouchCapability {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsTouchCapability {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchCapability for WindowsTouchCapability {
    fn initialize(
        &self,
        max_touch_points: NonZeroU32,
        feedback: TouchFeedback,
    ) -> Result<Arc<dyn TouchInjector>, InjectionError> {
        // SAFETY: plain value arguments; the call has no pointer parameters.
        unsafe { InitializeTouchInjection(max_touch_points.get(), feedback_mode(feedback)) }
            .map_err(|e| InjectionError::Unavailable(e.to_string()))?;
        debug!(max_touch_points = max_touch_points.get(), "InitializeTouchInjection succeeded");
        Ok(Arc::new(WindowsTouchInjector))
    }
}

/// Windows implementation of [`TouchInjector`] using `InjectTouchInput`.
///
/// Only obtainable through [`WindowsTouchCapability::initialize`], so the
/// process is always initialized for touch injection before the first call.
pub struct WindowsTouchInjector;

impl TouchInjector for WindowsTouchInjector {
    fn inject(&self, batch: &[TouchPointDescriptor]) -> Result<(), InjectionError> {
        let contacts: Vec<POINTER_TOUCH_INFO> = batch.iter().map(to_pointer_touch_info).collect();
        // SAFETY: `contacts` is a valid, initialized slice that outlives the call.
        unsafe { InjectTouchInput(&contacts) }.map_err(|e| InjectionError::Rejected {
            count: batch.len(),
            reason: e.to_string(),
        })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn feedback_mode(feedback: TouchFeedback) -> TOUCH_FEEDBACK_MODE {
    match feedback {
        TouchFeedback::Default => TOUCH_FEEDBACK_DEFAULT,
        TouchFeedback::Indirect => TOUCH_FEEDBACK_INDIRECT,
        TouchFeedback::None => TOUCH_FEEDBACK_NONE,
    }
}

fn pointer_flags(flags: PointerFlags) -> POINTER_FLAGS {
    let mut out = POINTER_FLAG_NONE;
    if flags.contains(PointerFlags::DOWN) {
        out |= POINTER_FLAG_DOWN;
    }
    if flags.contains(PointerFlags::UPDATE) {
        out |= POINTER_FLAG_UPDATE;
    }
    if flags.contains(PointerFlags::UP) {
        out |= POINTER_FLAG_UP;
    }
    if flags.contains(PointerFlags::IN_RANGE) {
        out |= POINTER_FLAG_INRANGE;
    }
    if flags.contains(PointerFlags::IN_CONTACT) {
        out |= POINTER_FLAG_INCONTACT;
    }
    out
}

fn to_pointer_touch_info(d: &TouchPointDescriptor) -> POINTER_TOUCH_INFO {
    POINTER_TOUCH_INFO {
        pointerInfo: POINTER_INFO {
            pointerType: PT_TOUCH,
            pointerId: d.touch_id,
            pointerFlags: pointer_flags(d.flags),
            ptPixelLocation: POINT {
                x: d.pixel.x,
                y: d.pixel.y,
            },
            ..Default::default()
        },
        touchFlags: TOUCH_FLAG_NONE,
        touchMask: TOUCH_MASK_CONTACTAREA | TOUCH_MASK_ORIENTATION | TOUCH_MASK_PRESSURE,
        rcContact: RECT {
            left: d.contact_area.left,
            top: d.contact_area.top,
            right: d.contact_area.right,
            bottom: d.contact_area.bottom,
        },
        orientation: 0,
        pressure: d.pressure,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touch_core::{ContactRect, PixelPoint};

    fn descriptor(flags: PointerFlags) -> TouchPointDescriptor {
        let pixel = PixelPoint { x: 600, y: 250 };
        TouchPointDescriptor {
            touch_id: 3,
            session_id: 27,
            pixel,
            contact_area: ContactRect::around(pixel, 10),
            pressure: 32000,
            flags,
        }
    }

    #[test]
    fn test_pointer_flags_for_pressed_contact() {
        let expected = POINTER_FLAG_DOWN | POINTER_FLAG_INRANGE | POINTER_FLAG_INCONTACT;
        assert_eq!(pointer_flags(PointerFlags::pressed()), expected);
    }

    #[test]
    fn test_pointer_flags_for_released_contact() {
        assert_eq!(pointer_flags(PointerFlags::released()), POINTER_FLAG_UP);
    }

    #[test]
    fn test_to_pointer_touch_info_copies_geometry() {
        let info = to_pointer_touch_info(&descriptor(PointerFlags::moved()));

        assert_eq!(info.pointerInfo.pointerId, 3);
        assert_eq!(info.pointerInfo.ptPixelLocation.x, 600);
        assert_eq!(info.pointerInfo.ptPixelLocation.y, 250);
        assert_eq!(info.rcContact.left, 590);
        assert_eq!(info.rcContact.bottom, 260);
        assert_eq!(info.pressure, 32000);
    }
}
