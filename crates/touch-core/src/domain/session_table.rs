//! The authoritative table of tracked cursors.
//!
//! Two execution contexts touch the table: the protocol receiver calls
//! [`CursorSessionTable::upsert`] whenever packets arrive, and the refresh
//! pipeline reads it and prunes released cursors.  Every public method takes
//! the single internal lock for the duration of that call only; the storage
//! itself is never handed out.
//!
//! # Why a `BTreeMap`?
//!
//! Snapshots are returned ordered by session ID, so a batch built from the
//! same table contents always has the same order.  Order carries no meaning
//! for the host, but stable batches make logs and tests easier to read.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::cursor::{Cursor, Lifecycle, SessionId};

/// Mutex-guarded map from session ID to cursor.
#[derive(Debug, Default)]
pub struct CursorSessionTable {
    cursors: Mutex<BTreeMap<SessionId, Cursor>>,
}

impl CursorSessionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the cursor for `session_id`, or overwrites it if present.
    pub fn upsert(&self, session_id: SessionId, x: f32, y: f32, lifecycle: Lifecycle) {
        self.lock()
            .insert(session_id, Cursor::new(session_id, x, y, lifecycle));
    }

    /// Returns a copy of every cursor, ordered by session ID.
    pub fn snapshot(&self) -> Vec<Cursor> {
        self.lock().values().copied().collect()
    }

    /// Atomically returns every cursor and removes those matching `predicate`.
    ///
    /// The returned vector holds the table contents as they were *before*
    /// removal, so callers can see what was dropped.
    pub fn snapshot_and_clear<F>(&self, mut predicate: F) -> Vec<Cursor>
    where
        F: FnMut(&Cursor) -> bool,
    {
        let mut guard = self.lock();
        let snapshot: Vec<Cursor> = guard.values().copied().collect();
        guard.retain(|_, cursor| !predicate(cursor));
        snapshot
    }

    pub fn get(&self, session_id: SessionId) -> Option<Cursor> {
        self.lock().get(&session_id).copied()
    }

    pub fn contains(&self, session_id: SessionId) -> bool {
        self.lock().contains_key(&session_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // The map only holds plain `Copy` records, so a panic in another holder
    // cannot leave it half-updated.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<SessionId, Cursor>> {
        self.cursors.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
