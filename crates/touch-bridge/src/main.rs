//! Touch bridge entry point.
//!
//! Loads the configuration, brings up touch injection and the protocol
//! channel, then runs the refresh loop until Ctrl+C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()            -- TOML file, then CLI overrides
//!  └─ start_bridge()           -- capability, channel, target display
//!  └─ ReadyBridge::run()       -- one pipeline pass per refresh tick
//!  └─ CursorFeed               -- handed to the TUIO receiver
//! ```
//!
//! The TUIO decoder is not part of this binary.  `--demo` drives a single
//! synthetic swipe through the same `CursorFeed` a decoder would use, which
//! is enough to see touches arrive on the target display.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use touch_bridge::application::startup::start_bridge;
use touch_bridge::infrastructure::{
    receiver::{CursorFeed, LocalChannel},
    screen_info::NativeDisplayEnumerator,
    storage::config::{load_config, load_config_from, AppConfig},
    touch_injection::NativeTouchCapability,
    ui_bridge::{get_bridge_status, BridgeState},
};
use touch_core::{CursorSessionTable, SessionId};

/// Forwards TUIO cursors to the operating system as touch input.
#[derive(Debug, Parser)]
#[command(name = "touch-bridge", version)]
struct Cli {
    /// Path to the TOML config file.  Defaults to the platform config directory.
    #[arg(long, env = "TOUCH_BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Index of the target display, primary first.
    #[arg(long, env = "TOUCH_BRIDGE_DISPLAY")]
    display: Option<usize>,

    /// Half-width of each contact rectangle, in pixels.
    #[arg(long, env = "TOUCH_BRIDGE_AREA_RADIUS")]
    area_radius: Option<u32>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, env = "TOUCH_BRIDGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Inject one synthetic swipe across the target display, then idle.
    #[arg(long)]
    demo: bool,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => load_config().context("failed to load config")?,
        };

        if let Some(index) = self.display {
            config.display.index = index;
        }
        if let Some(radius) = self.area_radius {
            config.touch.area_radius = radius;
        }
        if let Some(level) = &self.log_level {
            config.runtime.log_level = level.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.runtime.log_level)),
        )
        .init();

    info!("touch bridge starting");

    let table = Arc::new(CursorSessionTable::new());
    let mut channel = LocalChannel::new(Arc::clone(&table), config.runtime.tick_queue_depth);
    let capability = NativeTouchCapability::new();
    let displays = NativeDisplayEnumerator::new();

    let ready = start_bridge(
        &config.to_startup_config(),
        table,
        &capability,
        &mut channel,
        &displays,
    )
    .await
    .context("bridge startup failed")?;

    let ui_state = BridgeState::from_pipeline(ready.pipeline());
    let feed = channel
        .take_feed()
        .context("protocol channel produced no cursor feed")?;
    let refresh_loop = tokio::spawn(ready.run());

    let demo = cli.demo.then(|| tokio::spawn(demo_swipe(feed.clone())));

    info!("touch bridge ready; press Ctrl+C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    info!("shutdown signal received");

    // The loop ends once every CursorFeed is gone.
    if let Some(demo) = demo {
        demo.abort();
        let _ = demo.await;
    }
    drop(feed);
    drop(channel);

    let stats = refresh_loop.await.context("refresh loop panicked")?;
    if let Some(status) = get_bridge_status(&ui_state).data {
        info!(
            live_cursors = status.live_cursors,
            refreshes = stats.refreshes,
            dispatched = stats.dispatched,
            rejected = stats.rejected,
            pruned = stats.pruned,
            slow_dispatches = stats.slow_dispatches,
            "touch bridge stopped"
        );
    }
    Ok(())
}

/// Session ID used for the demo finger.
const DEMO_SESSION: SessionId = 1;

/// Drags one finger from left to right across the middle of the display at
/// roughly 60 refreshes per second.
async fn demo_swipe(feed: CursorFeed) {
    const STEPS: u32 = 60;

    let started = Instant::now();
    let mut interval = tokio::time::interval(Duration::from_millis(16));
    for step in 0..=STEPS {
        interval.tick().await;
        let x = 0.2 + 0.6 * step as f32 / STEPS as f32;
        match step {
            0 => feed.add_cursor(DEMO_SESSION, x, 0.5),
            STEPS => feed.remove_cursor(DEMO_SESSION, x, 0.5),
            _ => feed.update_cursor(DEMO_SESSION, x, 0.5),
        }
        if feed.refresh(started.elapsed()).is_err() {
            warn!("refresh loop stopped during demo swipe");
            return;
        }
    }
    info!("demo swipe finished");
}
