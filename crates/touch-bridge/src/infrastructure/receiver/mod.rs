//! In-process protocol channel between a TUIO receiver and the refresh loop.
//!
//! Packet decoding lives outside this crate.  Whatever decodes the wire
//! protocol is handed a [`CursorFeed`] and calls it from its own thread:
//!
//! ```text
//! TUIO receiver thread                      tokio runtime
//! ───────────────────────────────────────────────────────────────────
//! feed.add_cursor(7, 0.5, 0.2)   ──> CursorSessionTable (mutex)
//! feed.update_cursor(7, 0.6, 0.2) ─> CursorSessionTable (mutex)
//! feed.refresh(t)                ──> mpsc (bounded) ──> run_refresh_loop
//! ```
//!
//! Cursor updates go straight into the shared table.  Only the refresh
//! notification crosses the queue, so a full queue never loses cursor state:
//! the dropped tick would have read the same table as the next one.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info};
use touch_core::{CursorSessionTable, Lifecycle, SessionId};

use crate::application::{
    inject_touch::RefreshTick,
    startup::{ChannelError, ProtocolChannel},
};

/// Default capacity of the refresh-tick queue.
pub const DEFAULT_TICK_QUEUE_DEPTH: usize = 64;

/// Handle the protocol receiver uses to report cursors and refreshes.
///
/// Cheap to clone; every clone writes the same table and feeds the same
/// refresh loop.  The loop stops once every clone has been dropped.
#[derive(Debug, Clone)]
pub struct CursorFeed {
    table: Arc<CursorSessionTable>,
    ticks: mpsc::Sender<RefreshTick>,
}

impl CursorFeed {
    /// Writes the latest known state of one cursor.
    pub fn upsert(&self, session_id: SessionId, x: f32, y: f32, lifecycle: Lifecycle) {
        self.table.upsert(session_id, x, y, lifecycle);
    }

    /// A new finger touched the surface.
    pub fn add_cursor(&self, session_id: SessionId, x: f32, y: f32) {
        self.upsert(session_id, x, y, Lifecycle::New);
    }

    /// An existing finger moved.
    pub fn update_cursor(&self, session_id: SessionId, x: f32, y: f32) {
        self.upsert(session_id, x, y, Lifecycle::Updated);
    }

    /// A finger lifted at its last known position.
    ///
    /// The cursor stays in the table until a batch carrying its release has
    /// been accepted by the host.
    pub fn remove_cursor(&self, session_id: SessionId, x: f32, y: f32) {
        self.upsert(session_id, x, y, Lifecycle::Removed);
    }

    /// Asks the refresh loop for one pipeline pass.
    ///
    /// Returns `Ok(false)` when the queue is full and the tick was dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Closed`] once the refresh loop has stopped.
    pub fn refresh(&self, time: Duration) -> Result<bool, ChannelError> {
        match self.ticks.try_send(RefreshTick::at(time)) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(tick)) => {
                debug!(time_us = tick.time.as_micros() as u64, "refresh queue full; tick dropped");
                Ok(false)
            }
            Err(TrySendError::Closed(_)) => Err(ChannelError::Closed),
        }
    }
}

/// [`ProtocolChannel`] whose producer side is a [`CursorFeed`] in this process.
#[derive(Debug)]
pub struct LocalChannel {
    table: Arc<CursorSessionTable>,
    depth: usize,
    connected: bool,
    feed: Option<CursorFeed>,
    ticks: Option<mpsc::Receiver<RefreshTick>>,
}

impl LocalChannel {
    /// Creates an unconnected channel with a tick queue of `depth` entries.
    pub fn new(table: Arc<CursorSessionTable>, depth: usize) -> Self {
        Self {
            table,
            depth,
            connected: false,
            feed: None,
            ticks: None,
        }
    }

    /// Moves the producer handle out of the channel.
    ///
    /// Returns `None` before `connect` or if it was already taken.
    pub fn take_feed(&mut self) -> Option<CursorFeed> {
        self.feed.take()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

#[async_trait]
impl ProtocolChannel for LocalChannel {
    async fn connect(&mut self) -> Result<(), ChannelError> {
        if self.connected {
            return Err(ChannelError::AlreadyConnected);
        }
        if self.depth == 0 {
            return Err(ChannelError::ZeroQueueDepth);
        }

        let (tx, rx) = mpsc::channel(self.depth);
        self.feed = Some(CursorFeed {
            table: Arc::clone(&self.table),
            ticks: tx,
        });
        self.ticks = Some(rx);
        self.connected = true;
        info!(depth = self.depth, "local protocol channel open");
        Ok(())
    }

    fn take_ticks(&mut self) -> Option<mpsc::Receiver<RefreshTick>> {
        self.ticks.take()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
