//! touch-bridge library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does touch-bridge do? (for beginners)
//!
//! A TUIO tracker reports fingers as *cursors* with normalized positions.
//! Most desktop applications know nothing about TUIO, but they all understand
//! the operating system's own touch input.  The bridge sits in between:
//!
//! 1. An external protocol receiver decodes TUIO and writes every reported
//!    cursor into the shared `CursorSessionTable` through a `CursorFeed`.
//! 2. On each TUIO refresh the receiver sends a `RefreshTick`.
//! 3. The refresh loop runs the `TouchPipeline`: it converts every cursor to
//!    a touch descriptor, injects the whole batch in one host call, and drops
//!    cursors whose release the host has accepted.
//!
//! The pure translation rules live in the `touch-core` crate; this crate
//! holds the pipeline, its startup sequence and the OS adapters.

/// Application layer: the refresh pipeline and its startup sequence.
pub mod application;

/// Infrastructure layer: OS adapters, protocol feed, config file, UI bridge.
pub mod infrastructure;
