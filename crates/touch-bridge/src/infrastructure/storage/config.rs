//! TOML configuration for the touch bridge.
//!
//! Read from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\TouchBridge\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/touchbridge/config.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/TouchBridge/config.toml`
//!
//! Every key is optional.  A missing file, a missing section, or a missing
//! field all fall back to the same defaults:
//!
//! ```toml
//! [touch]
//! max_touch_points = 24
//! area_radius = 10
//! pressure = 32000
//! feedback = "default"     # "default" | "indirect" | "none"
//!
//! [display]
//! index = 0
//!
//! [runtime]
//! tick_queue_depth = 64
//! slow_dispatch_ms = 50
//! log_level = "info"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use touch_core::{DEFAULT_MAX_TOUCH_POINTS, DEFAULT_PRESSURE};

use crate::application::{
    inject_touch::{TouchFeedback, DEFAULT_SLOW_DISPATCH},
    settings::DEFAULT_AREA_RADIUS,
    startup::StartupConfig,
};
use crate::infrastructure::receiver::DEFAULT_TICK_QUEUE_DEPTH;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub touch: TouchConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Touch-injection parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TouchConfig {
    /// Pointer-ID space announced to the host; session IDs wrap modulo this.
    #[serde(default = "default_max_touch_points")]
    pub max_touch_points: u32,
    /// Initial half-width of each contact rectangle, in pixels.
    #[serde(default = "default_area_radius")]
    pub area_radius: u32,
    #[serde(default = "default_pressure")]
    pub pressure: u32,
    #[serde(default)]
    pub feedback: TouchFeedback,
}

/// Which display receives the touches.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Index into the enumerated displays, primary first.
    #[serde(default)]
    pub index: usize,
}

/// Refresh-loop and logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    /// Capacity of the refresh-tick queue.
    #[serde(default = "default_tick_queue_depth")]
    pub tick_queue_depth: usize,
    /// Dispatches slower than this many milliseconds are logged and counted.
    #[serde(default = "default_slow_dispatch_ms")]
    pub slow_dispatch_ms: u64,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_max_touch_points() -> u32 {
    DEFAULT_MAX_TOUCH_POINTS
}
fn default_area_radius() -> u32 {
    DEFAULT_AREA_RADIUS
}
fn default_pressure() -> u32 {
    DEFAULT_PRESSURE
}
fn default_tick_queue_depth() -> usize {
    DEFAULT_TICK_QUEUE_DEPTH
}
fn default_slow_dispatch_ms() -> u64 {
    DEFAULT_SLOW_DISPATCH.as_millis() as u64
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            max_touch_points: default_max_touch_points(),
            area_radius: default_area_radius(),
            pressure: default_pressure(),
            feedback: TouchFeedback::default(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_queue_depth: default_tick_queue_depth(),
            slow_dispatch_ms: default_slow_dispatch_ms(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// The subset of the file [`start_bridge`](crate::application::startup::start_bridge) needs.
    pub fn to_startup_config(&self) -> StartupConfig {
        StartupConfig {
            max_touch_points: self.touch.max_touch_points,
            feedback: self.touch.feedback,
            display_index: self.display.index,
            area_radius: self.touch.area_radius,
            pressure: self.touch.pressure,
            slow_dispatch: Duration::from_millis(self.runtime.slow_dispatch_ms),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the config from the platform path, or defaults if the file does not
/// exist yet.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads the config from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("TouchBridge"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("touchbridge"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("TouchBridge")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
