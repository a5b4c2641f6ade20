//! Startup sequencing and the refresh loop.
//!
//! The bridge is useless until two independent things are ready: the host's
//! touch-injection capability and the protocol channel delivering refresh
//! notifications.  [`start_bridge`] brings both up in a fixed order, resolves
//! the target display, and only then hands back a [`ReadyBridge`] whose
//! refresh loop can be armed.  Any failure here is fatal and returned to the
//! caller; nothing is retried.
//!
//! ```text
//! start_bridge()
//!  ├─ TouchCapability::initialize()   -- CapabilityUnavailable on failure
//!  ├─ ProtocolChannel::connect()      -- ChannelUnavailable on failure
//!  ├─ select_target_area()            -- NoDisplay on failure
//!  └─ ReadyBridge::run()              -- one pipeline pass per RefreshTick
//! ```

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::info;
use touch_core::{
    BatchBuilder, CursorSessionTable, TouchCoreError, TouchIdAllocator,
    DEFAULT_MAX_TOUCH_POINTS, DEFAULT_PRESSURE,
};

use super::{
    inject_touch::{
        InjectionError, RefreshTick, TouchCapability, TouchFeedback, TouchPipeline,
        DEFAULT_SLOW_DISPATCH,
    },
    select_display::{select_target_area, DisplayEnumerator, ScreenInfoError},
    settings::{TouchSettings, DEFAULT_AREA_RADIUS},
    stats::StatsSnapshot,
};

/// Error type for protocol channel operations.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("protocol channel is already connected")]
    AlreadyConnected,
    #[error("protocol channel is not connected")]
    NotConnected,
    #[error("refresh loop has stopped")]
    Closed,
    #[error("refresh queue depth must be greater than zero")]
    ZeroQueueDepth,
    #[error("protocol channel failed to connect: {0}")]
    Connect(String),
}

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid touch configuration: {0}")]
    InvalidConfig(#[from] TouchCoreError),
    #[error("touch injection capability unavailable: {0}")]
    CapabilityUnavailable(#[source] InjectionError),
    #[error("protocol channel unavailable: {0}")]
    ChannelUnavailable(#[source] ChannelError),
    #[error("no target display: {0}")]
    NoDisplay(#[source] ScreenInfoError),
}

/// Source of refresh notifications.
///
/// The concrete channel is owned by whoever decodes the wire protocol; the
/// bridge only needs to connect it and take the stream of ticks.
#[async_trait]
pub trait ProtocolChannel: Send {
    /// Opens the channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] if the channel cannot be opened.
    async fn connect(&mut self) -> Result<(), ChannelError>;

    /// Hands over the refresh notifications.
    ///
    /// Returns `None` before `connect` succeeded or if already taken.
    fn take_ticks(&mut self) -> Option<mpsc::Receiver<RefreshTick>>;
}

/// Values [`start_bridge`] needs, resolved from the config file and CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    pub max_touch_points: u32,
    pub feedback: TouchFeedback,
    pub display_index: usize,
    pub area_radius: u32,
    pub pressure: u32,
    pub slow_dispatch: Duration,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            max_touch_points: DEFAULT_MAX_TOUCH_POINTS,
            feedback: TouchFeedback::Default,
            display_index: 0,
            area_radius: DEFAULT_AREA_RADIUS,
            pressure: DEFAULT_PRESSURE,
            slow_dispatch: DEFAULT_SLOW_DISPATCH,
        }
    }
}

/// A fully initialized bridge whose refresh loop has not started yet.
pub struct ReadyBridge {
    pipeline: TouchPipeline,
    ticks: mpsc::Receiver<RefreshTick>,
}

impl ReadyBridge {
    /// The pipeline the loop will drive.  Use it to share the table,
    /// settings and stats with the UI before calling [`ReadyBridge::run`].
    pub fn pipeline(&self) -> &TouchPipeline {
        &self.pipeline
    }

    /// Runs the refresh loop until the protocol channel closes.
    pub async fn run(self) -> StatsSnapshot {
        run_refresh_loop(self.pipeline, self.ticks).await
    }
}

/// Brings up touch injection and the protocol channel, in that order.
///
/// `table` is the session table the protocol receiver writes into; the
/// returned pipeline reads and prunes the same table.
///
/// # Errors
///
/// Returns a [`StartupError`] naming the step that failed.
pub async fn start_bridge(
    config: &StartupConfig,
    table: Arc<CursorSessionTable>,
    capability: &dyn TouchCapability,
    channel: &mut dyn ProtocolChannel,
    displays: &dyn DisplayEnumerator,
) -> Result<ReadyBridge, StartupError> {
    let max_touch_points =
        NonZeroU32::new(config.max_touch_points).ok_or(TouchCoreError::ZeroTouchPoints)?;
    let allocator = TouchIdAllocator::new(max_touch_points);

    // ── Step 1: touch capability ─────────────────────────────────────────────
    let injector = capability
        .initialize(max_touch_points, config.feedback)
        .map_err(StartupError::CapabilityUnavailable)?;
    info!(
        max_touch_points = max_touch_points.get(),
        feedback = ?config.feedback,
        "touch injection initialized"
    );

    // ── Step 2: protocol channel ─────────────────────────────────────────────
    channel
        .connect()
        .await
        .map_err(StartupError::ChannelUnavailable)?;
    let ticks = channel
        .take_ticks()
        .ok_or(StartupError::ChannelUnavailable(ChannelError::NotConnected))?;
    info!("protocol channel connected");

    // ── Target area ──────────────────────────────────────────────────────────
    let area = select_target_area(displays, config.display_index)
        .map_err(StartupError::NoDisplay)?;
    info!(
        x = area.x,
        y = area.y,
        width = area.width,
        height = area.height,
        "target area selected"
    );

    let pipeline = TouchPipeline::new(
        table,
        BatchBuilder::new(allocator, config.pressure),
        area,
        Arc::new(TouchSettings::new(config.area_radius)),
        injector,
    )
    .with_slow_dispatch_threshold(config.slow_dispatch);

    Ok(ReadyBridge { pipeline, ticks })
}

/// Runs one pipeline pass per tick until the sender side is dropped.
///
/// A single consumer drives the pipeline, so passes never overlap; a tick
/// that arrives mid-pass waits in the queue.
pub async fn run_refresh_loop(
    pipeline: TouchPipeline,
    mut ticks: mpsc::Receiver<RefreshTick>,
) -> StatsSnapshot {
    info!("refresh loop armed");
    while let Some(tick) = ticks.recv().await {
        pipeline.run_refresh(tick);
    }
    let stats = pipeline.stats().snapshot();
    info!(
        refreshes = stats.refreshes,
        rejected = stats.rejected,
        collisions = stats.collisions,
        "protocol channel closed; refresh loop stopped"
    );
    stats
}

// ── Tests ─────────────────────────────────────────────────────────────────────
