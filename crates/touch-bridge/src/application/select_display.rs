//! Target display selection.
//!
//! All normalized TUIO coordinates are stretched over one display.  Which one
//! is a configuration value (`display_index`, 0 = primary); the monitor list
//! itself comes from a [`DisplayEnumerator`] implemented per platform in the
//! infrastructure layer.

use thiserror::Error;
use tracing::warn;
use touch_core::TargetArea;

/// Error type for display enumeration.
#[derive(Debug, Error)]
pub enum ScreenInfoError {
    /// The platform API call to enumerate monitors failed.
    #[error("platform API error while enumerating displays: {0}")]
    PlatformError(String),
    /// The platform reported no displays at all.
    #[error("no displays found")]
    NoDisplays,
}

/// Trait for enumerating displays on the current platform.
pub trait DisplayEnumerator: Send + Sync {
    /// Returns the bounds of every connected display, primary first.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenInfoError`] if display information cannot be retrieved.
    fn enumerate_displays(&self) -> Result<Vec<TargetArea>, ScreenInfoError>;
}

/// Picks the display at `index`, falling back to the primary display.
///
/// # Errors
///
/// Returns [`ScreenInfoError::NoDisplays`] if the enumerator returns an empty
/// list, or propagates the enumerator's own error.
pub fn select_target_area(
    enumerator: &dyn DisplayEnumerator,
    index: usize,
) -> Result<TargetArea, ScreenInfoError> {
    let displays = enumerator.enumerate_displays()?;
    let primary = *displays.first().ok_or(ScreenInfoError::NoDisplays)?;

    match displays.get(index) {
        Some(area) => Ok(*area),
        None => {
            warn!(
                index,
                available = displays.len(),
                "configured display not found; using primary display"
            );
            Ok(primary)
        }
    }
}
