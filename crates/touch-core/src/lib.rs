//! # touch-core
//!
//! Shared library for the TUIO touch bridge containing the cursor session
//! model, the touch-ID allocator, the coordinate mapper and the touch batch
//! builder.
//!
//! This crate has zero dependencies on OS APIs, async runtimes or UI
//! frameworks.  Everything in it can be unit-tested on any platform.
//!
//! # Architecture overview (for beginners)
//!
//! A TUIO tracker (a camera table, a radar sensor, a touch frame) reports
//! every finger it sees as a *cursor*: a session ID that stays the same for as
//! long as the finger is down, a normalized position in `[0, 1]`, and a tag
//! saying whether the cursor is new, still moving, or gone.
//!
//! The bridge turns those cursors into synthetic touch events for the host
//! OS.  This crate holds the pure part of that translation:
//!
//! - **`domain::cursor`** – the `Cursor` record and its `Lifecycle` tag.
//! - **`domain::session_table`** – the mutex-guarded table of live cursors,
//!   written by the protocol receiver and read/pruned by the pipeline.
//! - **`domain::allocator`** – maps unbounded session IDs onto the small
//!   touch-ID space the host accepts.
//! - **`domain::geometry`** – maps normalized positions into pixels inside the
//!   target display area.
//! - **`domain::batch`** – builds one `TouchPointDescriptor` per cursor.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `touch_core::Cursor` instead of `touch_core::domain::cursor::Cursor`.
pub use domain::allocator::{TouchIdAllocator, DEFAULT_MAX_TOUCH_POINTS};
pub use domain::batch::{find_collisions, BatchBuilder, DEFAULT_PRESSURE};
pub use domain::cursor::{Cursor, Lifecycle, SessionId};
pub use domain::descriptor::{ContactRect, PointerFlags, TouchPointDescriptor};
pub use domain::geometry::{map_to_pixels, PixelPoint, TargetArea};
pub use domain::session_table::CursorSessionTable;
pub use domain::TouchCoreError;
