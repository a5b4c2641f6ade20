//! Counters describing what the refresh pipeline has done since startup.
//!
//! All counters are monotonically increasing `AtomicU64`s, so the UI bridge
//! can read them from any thread while the refresh loop keeps running.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Live pipeline counters.
#[derive(Debug, Default)]
pub struct PipelineStats {
    refreshes: AtomicU64,
    dispatched: AtomicU64,
    rejected: AtomicU64,
    collisions: AtomicU64,
    pruned: AtomicU64,
    slow_dispatches: AtomicU64,
}

/// Point-in-time copy of [`PipelineStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Refresh passes run, including ones with an empty batch.
    pub refreshes: u64,
    /// Batches the host accepted.
    pub dispatched: u64,
    /// Batches the host refused.
    pub rejected: u64,
    /// Descriptors that reused a touch ID already present in their batch.
    pub collisions: u64,
    /// Cursors deleted after their release was delivered.
    pub pruned: u64,
    /// Dispatches that took longer than the configured threshold.
    pub slow_dispatches: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_collisions(&self, count: usize) {
        self.collisions.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_pruned(&self, count: usize) {
        self.pruned.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_slow_dispatch(&self) {
        self.slow_dispatches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            refreshes: self.refreshes.load(Ordering::Relaxed),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            collisions: self.collisions.load(Ordering::Relaxed),
            pruned: self.pruned.load(Ordering::Relaxed),
            slow_dispatches: self.slow_dispatches.load(Ordering::Relaxed),
        }
    }
}
