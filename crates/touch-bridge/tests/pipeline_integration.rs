//! Integration tests for the refresh pipeline.
//!
//! These tests bring the bridge up through `start_bridge` with the recording
//! touch capability, the fixed display enumerator and the in-process
//! channel, then drive it the way a TUIO receiver would: through a
//! `CursorFeed`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use touch_bridge::application::{
    inject_touch::{InjectionError, RefreshTick, TouchInjector, TouchPipeline},
    settings::TouchSettings,
    startup::{start_bridge, ReadyBridge, StartupConfig, StartupError},
};
use touch_bridge::infrastructure::{
    receiver::{CursorFeed, LocalChannel},
    screen_info::MockDisplayEnumerator,
    touch_injection::mock::{MockTouchCapability, MockTouchInjector},
};
use touch_core::{
    BatchBuilder, CursorSessionTable, Lifecycle, PixelPoint, TargetArea, TouchPointDescriptor,
};

struct Harness {
    ready: ReadyBridge,
    feed: CursorFeed,
    table: Arc<CursorSessionTable>,
    injector: Arc<MockTouchInjector>,
}

async fn start(depth: usize) -> Harness {
    let table = Arc::new(CursorSessionTable::new());
    let capability = MockTouchCapability::new();
    let mut channel = LocalChannel::new(Arc::clone(&table), depth);

    let ready = start_bridge(
        &StartupConfig::default(),
        Arc::clone(&table),
        &capability,
        &mut channel,
        &MockDisplayEnumerator::single_1080p(),
    )
    .await
    .expect("startup with mocks must succeed");
    let feed = channel.take_feed().expect("feed after connect");

    Harness {
        ready,
        feed,
        table,
        injector: capability.injector(),
    }
}

fn tick() -> RefreshTick {
    RefreshTick::default()
}

fn ids(batch: &[TouchPointDescriptor]) -> Vec<u32> {
    batch.iter().map(|d| d.touch_id).collect()
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_cursor_lifecycle_becomes_down_update_up_then_disappears() {
    // Arrange
    let h = start(8).await;
    let pipeline = h.ready.pipeline();

    // Act
    h.feed.add_cursor(7, 0.5, 0.5);
    let pressed = pipeline.run_refresh(tick());
    h.feed.update_cursor(7, 0.25, 0.5);
    let moved = pipeline.run_refresh(tick());
    h.feed.remove_cursor(7, 0.25, 0.5);
    let released = pipeline.run_refresh(tick());
    let after = pipeline.run_refresh(tick());

    // Assert
    assert!(pressed.batch[0].flags.is_down());
    assert_eq!(pressed.batch[0].pixel, PixelPoint { x: 960, y: 540 });
    assert!(moved.batch[0].flags.is_update());
    assert_eq!(moved.batch[0].pixel, PixelPoint { x: 480, y: 540 });
    assert!(released.batch[0].flags.is_up());
    assert_eq!(released.pruned, 1);
    assert!(after.batch.is_empty());
    assert!(h.table.is_empty());
    assert_eq!(h.injector.batches().len(), 3, "empty batch is never submitted");
}

#[tokio::test]
async fn test_released_cursor_survives_rejected_batch_and_is_resent() {
    // Arrange
    let h = start(8).await;
    let pipeline = h.ready.pipeline();
    h.feed.add_cursor(3, 0.1, 0.1);
    pipeline.run_refresh(tick());
    h.feed.remove_cursor(3, 0.1, 0.1);

    // Act – host refuses the release
    h.injector.set_fail(true);
    let rejected = pipeline.run_refresh(tick());

    // Assert – nothing was pruned
    assert!(!rejected.accepted);
    assert!(h.table.contains(3));

    // Act – host accepts again
    h.injector.set_fail(false);
    let accepted = pipeline.run_refresh(tick());

    // Assert – the release went out and the cursor is gone
    assert!(accepted.accepted);
    assert!(accepted.batch[0].flags.is_up());
    assert!(!h.table.contains(3));
    let last = h.injector.batches().pop().expect("accepted batch");
    assert_eq!(ids(&last), vec![3]);
    assert_eq!(pipeline.stats().snapshot().rejected, 1);
}

/// Accepts every batch; during the first call it rewrites one cursor the
/// way a receiver thread racing the pipeline would.
struct RetagDuringInject {
    table: Arc<CursorSessionTable>,
    session_id: i64,
    lifecycle: Lifecycle,
    calls: AtomicUsize,
    batches: Mutex<Vec<Vec<TouchPointDescriptor>>>,
}

impl RetagDuringInject {
    fn new(table: Arc<CursorSessionTable>, session_id: i64, lifecycle: Lifecycle) -> Self {
        Self {
            table,
            session_id,
            lifecycle,
            calls: AtomicUsize::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }
}

impl TouchInjector for RetagDuringInject {
    fn inject(&self, batch: &[TouchPointDescriptor]) -> Result<(), InjectionError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.table.upsert(self.session_id, 0.5, 0.5, self.lifecycle);
        }
        self.batches.lock().unwrap().push(batch.to_vec());
        Ok(())
    }
}

fn pipeline_with(
    table: &Arc<CursorSessionTable>,
    injector: Arc<RetagDuringInject>,
) -> TouchPipeline {
    TouchPipeline::new(
        Arc::clone(table),
        BatchBuilder::default(),
        TargetArea::new(0, 0, 1920, 1080),
        Arc::new(TouchSettings::default()),
        injector,
    )
}

#[test]
fn test_cursor_released_during_dispatch_is_kept_until_its_up_is_sent() {
    // Arrange – the finger lifts while its DOWN is being injected
    let table = Arc::new(CursorSessionTable::new());
    let injector = Arc::new(RetagDuringInject::new(Arc::clone(&table), 9, Lifecycle::Removed));
    let pipeline = pipeline_with(&table, Arc::clone(&injector));
    table.upsert(9, 0.5, 0.5, Lifecycle::New);

    // Act
    let first = pipeline.run_refresh(tick());

    // Assert – the accepted batch carried no UP for 9, so it stays
    assert!(first.accepted);
    assert!(first.batch[0].flags.is_down());
    assert_eq!(first.pruned, 0);
    assert!(table.contains(9));

    // Act
    let second = pipeline.run_refresh(tick());

    // Assert – the release goes out and only then is the cursor deleted
    assert!(second.batch[0].flags.is_up());
    assert_eq!(second.pruned, 1);
    assert!(!table.contains(9));
    assert_eq!(injector.batches.lock().unwrap().len(), 2);
}

#[test]
fn test_cursor_readded_during_dispatch_of_its_up_is_not_pruned() {
    // Arrange – the UP is in flight when the same session is reported again
    let table = Arc::new(CursorSessionTable::new());
    let injector = Arc::new(RetagDuringInject::new(Arc::clone(&table), 4, Lifecycle::Updated));
    let pipeline = pipeline_with(&table, injector);
    table.upsert(4, 0.5, 0.5, Lifecycle::Removed);

    // Act
    let outcome = pipeline.run_refresh(tick());

    // Assert
    assert!(outcome.batch[0].flags.is_up());
    assert_eq!(outcome.pruned, 0);
    assert_eq!(table.get(4).map(|c| c.lifecycle), Some(Lifecycle::Updated));
}

#[tokio::test]
async fn test_cursor_readded_before_refresh_goes_out_as_down() {
    let h = start(8).await;
    let pipeline = h.ready.pipeline();
    h.feed.remove_cursor(5, 0.5, 0.5);
    h.feed.add_cursor(5, 0.5, 0.5);

    let outcome = pipeline.run_refresh(tick());

    assert!(outcome.batch[0].flags.is_down());
    assert_eq!(outcome.pruned, 0);
    assert!(h.table.contains(5));
}

// ── Batch properties ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_every_live_cursor_appears_once_per_batch() {
    let h = start(8).await;
    for session in 0..10 {
        h.feed.add_cursor(session, 0.05 * session as f32, 0.5);
    }

    let outcome = h.ready.pipeline().run_refresh(tick());

    assert_eq!(outcome.batch.len(), 10);
    let mut sessions: Vec<i64> = outcome.batch.iter().map(|d| d.session_id).collect();
    sessions.dedup();
    assert_eq!(sessions, (0..10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_colliding_sessions_are_both_sent_with_the_same_touch_id() {
    // Arrange – 3 and 27 alias modulo 24
    let h = start(8).await;
    h.feed.add_cursor(3, 0.2, 0.2);
    h.feed.add_cursor(27, 0.8, 0.8);

    // Act
    let outcome = h.ready.pipeline().run_refresh(tick());

    // Assert
    assert!(outcome.accepted);
    assert_eq!(ids(&outcome.batch), vec![3, 3]);
    assert_eq!(outcome.collisions, 1);
}

#[tokio::test]
async fn test_unchanged_table_produces_identical_batches() {
    let h = start(8).await;
    h.feed.update_cursor(1, 0.3, 0.6);
    h.feed.update_cursor(2, 0.7, 0.4);

    let first = h.ready.pipeline().run_refresh(tick());
    let second = h.ready.pipeline().run_refresh(tick());

    assert_eq!(first.batch, second.batch);
}

// ── Startup ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_startup_without_touch_capability_is_fatal() {
    let table = Arc::new(CursorSessionTable::new());
    let mut channel = LocalChannel::new(Arc::clone(&table), 8);

    let result = start_bridge(
        &StartupConfig::default(),
        table,
        &MockTouchCapability::unavailable(),
        &mut channel,
        &MockDisplayEnumerator::single_1080p(),
    )
    .await;

    assert!(matches!(result, Err(StartupError::CapabilityUnavailable(_))));
    assert!(!channel.is_connected());
}

#[tokio::test]
async fn test_startup_without_displays_is_fatal() {
    let table = Arc::new(CursorSessionTable::new());
    let mut channel = LocalChannel::new(Arc::clone(&table), 8);

    let result = start_bridge(
        &StartupConfig::default(),
        table,
        &MockTouchCapability::new(),
        &mut channel,
        &MockDisplayEnumerator::headless(),
    )
    .await;

    assert!(matches!(result, Err(StartupError::NoDisplay(_))));
}

#[tokio::test]
async fn test_startup_with_zero_queue_depth_is_fatal() {
    let table = Arc::new(CursorSessionTable::new());
    let mut channel = LocalChannel::new(Arc::clone(&table), 0);

    let result = start_bridge(
        &StartupConfig::default(),
        table,
        &MockTouchCapability::new(),
        &mut channel,
        &MockDisplayEnumerator::single_1080p(),
    )
    .await;

    assert!(matches!(result, Err(StartupError::ChannelUnavailable(_))));
}

// ── Refresh loop ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_receiver_thread_and_refresh_loop_run_concurrently() {
    // Arrange
    const CURSORS: i64 = 5;
    const FRAMES: u64 = 100;
    let Harness {
        ready,
        feed,
        table,
        injector,
    } = start(1024).await;
    let refresh_loop = tokio::spawn(ready.run());

    // Act – a receiver thread moves every cursor, then lifts them all
    let receiver = thread::spawn(move || {
        let mut queued = 0;
        for frame in 0..FRAMES {
            for session in 0..CURSORS {
                let x = (frame as f32 / FRAMES as f32).min(1.0);
                if frame == 0 {
                    feed.add_cursor(session, x, 0.1 * session as f32);
                } else {
                    feed.update_cursor(session, x, 0.1 * session as f32);
                }
            }
            if feed.refresh(Duration::from_millis(frame)).expect("loop alive") {
                queued += 1;
            }
        }
        for session in 0..CURSORS {
            feed.remove_cursor(session, 1.0, 0.1 * session as f32);
        }
        if feed.refresh(Duration::from_millis(FRAMES)).expect("loop alive") {
            queued += 1;
        }
        queued
    });
    let queued = receiver.join().expect("receiver thread");
    let stats = refresh_loop.await.expect("refresh loop");

    // Assert
    assert_eq!(stats.refreshes, queued);
    assert_eq!(stats.rejected, 0);
    assert_eq!(stats.pruned, CURSORS as u64);
    assert!(table.is_empty());
    for batch in injector.batches() {
        assert!(batch.len() <= CURSORS as usize);
    }
}
