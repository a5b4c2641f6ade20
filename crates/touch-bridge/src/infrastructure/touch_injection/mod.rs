//! Platform-specific touch injection implementations.
//!
//! The correct implementation is selected at compile time via
//! `#[cfg(target_os = ...)]` and re-exported as `NativeTouchCapability`.
//! Only Windows exposes a synthetic touch API the bridge can drive; every
//! other platform falls back to the recording mock.

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::WindowsTouchCapability as NativeTouchCapability;

#[cfg(not(target_os = "windows"))]
pub use mock::MockTouchCapability as NativeTouchCapability;
