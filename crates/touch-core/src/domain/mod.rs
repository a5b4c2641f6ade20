//! Domain entities for the touch bridge.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! The innermost layer of the bridge is the **domain**.  Domain code has no
//! imports from OS APIs, async runtimes or UI frameworks, and can be compiled
//! and tested on any platform without a touch screen attached.  The
//! application and infrastructure layers in `touch-bridge` depend on it; it
//! never depends on them.

use thiserror::Error;

pub mod allocator;
pub mod batch;
pub mod cursor;
pub mod descriptor;
pub mod geometry;
pub mod session_table;

/// Errors raised when constructing domain objects from configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TouchCoreError {
    /// The host needs at least one touch point to inject anything.
    #[error("max_touch_points must be greater than zero")]
    ZeroTouchPoints,
}
