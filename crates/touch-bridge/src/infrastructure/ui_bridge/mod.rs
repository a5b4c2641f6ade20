//! Command bridge between the running pipeline and the host UI.
//!
//! The bridge has no widgets of its own.  A tray menu or settings window
//! calls the functions in this module and renders what they return:
//!
//! ```text
//! UI                              Rust backend
//! ────────────────────────────────────────────────────────────
//! poll status every second  ───>  get_bridge_status()  -> BridgeStatusDto
//! radius slider moved       ───>  set_area_radius(r)   -> applied radius
//! ```
//!
//! # `CommandResult<T>`
//!
//! All commands return the same envelope:
//! ```json
//! { "success": true,  "data": {...}, "error": null  }
//! { "success": false, "data": null,  "error": "..."  }
//! ```
//!
//! The shared state is made of atomics and the session table's own lock,
//! so commands are plain synchronous functions that never block the refresh
//! loop for longer than one table snapshot.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use touch_core::{CursorSessionTable, TargetArea};
use tracing::info;

use crate::application::{
    inject_touch::TouchPipeline,
    settings::TouchSettings,
    stats::{PipelineStats, StatsSnapshot},
};

// ── Shared application state ──────────────────────────────────────────────────

/// Handles onto the pipeline's shared state, held by the UI.
#[derive(Debug)]
pub struct BridgeState {
    table: Arc<CursorSessionTable>,
    settings: Arc<TouchSettings>,
    stats: Arc<PipelineStats>,
    target_area: TargetArea,
}

impl BridgeState {
    /// Shares the state of `pipeline` with the UI.  Call before the refresh
    /// loop takes ownership of the pipeline.
    pub fn from_pipeline(pipeline: &TouchPipeline) -> Arc<Self> {
        Arc::new(Self {
            table: Arc::clone(pipeline.table()),
            settings: Arc::clone(pipeline.settings()),
            stats: Arc::clone(pipeline.stats()),
            target_area: pipeline.target_area(),
        })
    }
}

// ── DTOs ──────────────────────────────────────────────────────────────────────

/// Status snapshot returned to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeStatusDto {
    /// Cursors currently tracked, including released ones awaiting delivery.
    pub live_cursors: usize,
    pub area_radius: u32,
    pub target_area: TargetArea,
    pub stats: StatsSnapshot,
}

/// Unified response wrapper for UI commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    /// `true` if the command completed successfully; `false` on error.
    pub success: bool,
    /// The command's return value, present only when `success` is `true`.
    pub data: Option<T>,
    /// A human-readable error message, present only when `success` is `false`.
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Returns the current bridge status.
pub fn get_bridge_status(state: &BridgeState) -> CommandResult<BridgeStatusDto> {
    CommandResult::ok(BridgeStatusDto {
        live_cursors: state.table.len(),
        area_radius: state.settings.area_radius(),
        target_area: state.target_area,
        stats: state.stats.snapshot(),
    })
}

/// Applies a new contact radius from the slider.
///
/// Every value is accepted as-is; 0 gives point contacts.  The applied
/// value is returned so the slider can show it.
pub fn set_area_radius(state: &BridgeState, radius: u32) -> CommandResult<u32> {
    let applied = state.settings.set_area_radius(radius);
    info!(area_radius = applied, "contact radius changed");
    CommandResult::ok(applied)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
