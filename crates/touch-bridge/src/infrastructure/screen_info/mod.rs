//! Platform-specific display enumeration.
//!
//! Detects the connected displays and their bounds so the bridge can stretch
//! normalized TUIO coordinates over the configured one.
//!
//! # Platform implementations
//!
//! | Module    | OS      | API used                                  |
//! |-----------|---------|-------------------------------------------|
//! | `windows` | Windows | `EnumDisplayMonitors` + `GetMonitorInfoW` |
//!
//! The Windows enumerator is re-exported as `NativeDisplayEnumerator`.  Other
//! platforms have no touch injection to drive, so they get the
//! [`MockDisplayEnumerator`] under the same name.
//!
//! A [`MockDisplayEnumerator`] is always compiled (not guarded by `#[cfg]`)
//! so tests on any platform can use it without a physical display.

use touch_core::TargetArea;

use crate::application::select_display::{DisplayEnumerator, ScreenInfoError};

// ── Windows implementation ────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::WindowsDisplayEnumerator as NativeDisplayEnumerator;

#[cfg(not(target_os = "windows"))]
pub use MockDisplayEnumerator as NativeDisplayEnumerator;

// ── Mock implementation (always compiled for tests) ───────────────────────────

/// A mock display enumerator that returns a fixed list of displays.
///
/// # Example
///
/// ```ignore
/// let displays = MockDisplayEnumerator::dual_1440p();
/// let area = select_target_area(&displays, 1)?;
/// assert_eq!(area.x, 2560);
/// ```
#[derive(Debug, Clone)]
pub struct MockDisplayEnumerator {
    /// The fixed list this enumerator always returns, primary first.
    pub displays: Vec<TargetArea>,
}

impl MockDisplayEnumerator {
    /// A single 1920×1080 primary display.
    pub fn single_1080p() -> Self {
        Self {
            displays: vec![TargetArea::new(0, 0, 1920, 1080)],
        }
    }

    /// Two 2560×1440 displays side by side, primary on the left.
    pub fn dual_1440p() -> Self {
        Self {
            displays: vec![
                TargetArea::new(0, 0, 2560, 1440),
                TargetArea::new(2560, 0, 2560, 1440),
            ],
        }
    }

    /// Creates an enumerator that reports no displays at all.
    pub fn headless() -> Self {
        Self {
            displays: Vec::new(),
        }
    }

    /// Same as [`MockDisplayEnumerator::single_1080p`]; lets the mock stand in
    /// for the native enumerator.
    pub fn new() -> Self {
        Self::single_1080p()
    }
}

impl Default for MockDisplayEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayEnumerator for MockDisplayEnumerator {
    /// Returns the displays provided at construction time (never fails).
    fn enumerate_displays(&self) -> Result<Vec<TargetArea>, ScreenInfoError> {
        Ok(self.displays.clone())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
