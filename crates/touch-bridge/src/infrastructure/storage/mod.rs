//! Storage infrastructure: the bridge's configuration file.
//!
//! The `config` sub-module reads the TOML file from the platform config
//! directory and falls back to built-in defaults on first run.  Runtime state
//! (live cursors, the slider-adjusted radius) is never written back.

pub mod config;
