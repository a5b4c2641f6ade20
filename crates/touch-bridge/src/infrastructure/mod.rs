//! Infrastructure layer for the touch bridge.
//!
//! Contains OS-facing adapters and everything that talks to the outside
//! world.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `touch_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`touch_injection`** – `TouchCapability` / `TouchInjector`
//!   implementations.  On Windows they call `InitializeTouchInjection` and
//!   `InjectTouchInput`.  A recording mock is always compiled for tests and
//!   for platforms without touch injection.
//!
//! - **`screen_info`** – `DisplayEnumerator` implementations.  On Windows it
//!   calls `EnumDisplayMonitors`; elsewhere a fixed mock is used.
//!
//! - **`receiver`** – The `CursorFeed` handle given to the TUIO decoder and
//!   the in-process `LocalChannel` carrying refresh notifications.
//!
//! - **`storage`** – TOML configuration file.
//!
//! - **`ui_bridge`** – Status snapshot and setters exposed to the host UI
//!   (radius slider, statistics display).

pub mod receiver;
pub mod screen_info;
pub mod storage;
pub mod touch_injection;
pub mod ui_bridge;
