//! TouchPipeline: turns the cursor table into one injected touch batch per refresh.
//!
//! This use case sits at the application layer and delegates to a
//! [`TouchInjector`] trait object for the OS-level injection call.  The
//! platform-specific implementations are in the infrastructure layer.
//!
//! # One refresh (for beginners)
//!
//! ```text
//! snapshot table ──> build batch ──> dispatch (one host call) ──> prune released
//!                                        │
//!                                        └── rejected? keep everything, try next refresh
//! ```
//!
//! The pipeline owns no per-cursor state of its own.  Everything it knows
//! about a contact lives in the shared [`CursorSessionTable`]; the only thing
//! it changes there is deleting cursors whose release (`UP`) the host has
//! accepted.

use std::collections::HashSet;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};
use touch_core::{
    find_collisions, BatchBuilder, Cursor, CursorSessionTable, SessionId, TargetArea,
    TouchPointDescriptor,
};

use super::{settings::TouchSettings, stats::PipelineStats};

/// Dispatches slower than this are logged and counted.
pub const DEFAULT_SLOW_DISPATCH: Duration = Duration::from_millis(50);

/// Error type for touch injection operations.
#[derive(Debug, Error)]
pub enum InjectionError {
    /// The host refused the batch.  Nothing from it was applied.
    #[error("host rejected touch batch of {count} contacts: {reason}")]
    Rejected { count: usize, reason: String },
    /// The touch-injection capability could not be brought up.
    #[error("touch injection unavailable: {0}")]
    Unavailable(String),
}

/// Visual feedback the host draws for injected contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchFeedback {
    /// The host's usual touch visualization.
    #[default]
    Default,
    /// Feedback as if the contacts came from an indirect device.
    Indirect,
    /// No visualization.
    None,
}

/// Submits touch batches to the host.
///
/// Implementations must apply the whole batch or nothing.
#[cfg_attr(test, mockall::automock)]
pub trait TouchInjector: Send + Sync {
    /// Injects every descriptor of `batch` in a single host call.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::Rejected`] if the host refused the batch.
    fn inject(&self, batch: &[TouchPointDescriptor]) -> Result<(), InjectionError>;
}

/// Brings up the host's touch-injection capability.
///
/// Called exactly once at startup.
pub trait TouchCapability: Send + Sync {
    /// Initializes injection for `max_touch_points` simultaneous contacts.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::Unavailable`] if the host cannot inject touch.
    fn initialize(
        &self,
        max_touch_points: NonZeroU32,
        feedback: TouchFeedback,
    ) -> Result<Arc<dyn TouchInjector>, InjectionError>;
}

/// One refresh notification from the protocol receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshTick {
    /// Monotonic protocol time of the refresh.
    pub time: Duration,
}

impl RefreshTick {
    pub fn at(time: Duration) -> Self {
        Self { time }
    }
}

/// What one refresh pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// The batch built for this refresh, in dispatch order.
    pub batch: Vec<TouchPointDescriptor>,
    /// Whether the host accepted the batch (an empty batch counts as accepted).
    pub accepted: bool,
    /// Cursors deleted from the table after the dispatch.
    pub pruned: usize,
    /// Descriptors whose touch ID repeated within the batch.
    pub collisions: usize,
}

/// The refresh pipeline: builder, dispatcher and pruner around the shared table.
pub struct TouchPipeline {
    table: Arc<CursorSessionTable>,
    builder: BatchBuilder,
    area: TargetArea,
    settings: Arc<TouchSettings>,
    injector: Arc<dyn TouchInjector>,
    stats: Arc<PipelineStats>,
    slow_dispatch: Duration,
}

impl TouchPipeline {
    /// Creates a pipeline reading from `table` and injecting through `injector`.
    pub fn new(
        table: Arc<CursorSessionTable>,
        builder: BatchBuilder,
        area: TargetArea,
        settings: Arc<TouchSettings>,
        injector: Arc<dyn TouchInjector>,
    ) -> Self {
        Self {
            table,
            builder,
            area,
            settings,
            injector,
            stats: Arc::new(PipelineStats::new()),
            slow_dispatch: DEFAULT_SLOW_DISPATCH,
        }
    }

    pub fn with_slow_dispatch_threshold(mut self, threshold: Duration) -> Self {
        self.slow_dispatch = threshold;
        self
    }

    pub fn table(&self) -> &Arc<CursorSessionTable> {
        &self.table
    }

    pub fn settings(&self) -> &Arc<TouchSettings> {
        &self.settings
    }

    pub fn stats(&self) -> &Arc<PipelineStats> {
        &self.stats
    }

    pub fn target_area(&self) -> TargetArea {
        self.area
    }

    /// Runs one full pass: snapshot, build, dispatch, and prune on success.
    ///
    /// Never fails: a rejected batch is logged, counted, and leaves the table
    /// untouched so released cursors are offered again next refresh.
    pub fn run_refresh(&self, tick: RefreshTick) -> RefreshOutcome {
        self.stats.record_refresh();

        let snapshot = self.table.snapshot();
        let batch = self
            .builder
            .build(&snapshot, &self.area, self.settings.area_radius());

        let collisions = find_collisions(&batch);
        if collisions > 0 {
            self.stats.record_collisions(collisions);
            debug!(
                collisions,
                max_touch_points = self.builder.allocator().max_touch_points(),
                "touch id collision in batch; host will merge the colliding contacts"
            );
        }

        let accepted = self.dispatch(&batch);
        let pruned = if accepted { self.prune(&batch) } else { 0 };

        debug!(
            time_us = tick.time.as_micros() as u64,
            contacts = batch.len(),
            accepted,
            pruned,
            "refresh processed"
        );

        RefreshOutcome {
            batch,
            accepted,
            pruned,
            collisions,
        }
    }

    /// Submits `batch` as one indivisible host call.  Returns `true` on success.
    ///
    /// No retry: a later refresh resends the state of every live cursor.
    /// An empty batch is not submitted.
    pub fn dispatch(&self, batch: &[TouchPointDescriptor]) -> bool {
        if batch.is_empty() {
            return true;
        }

        for d in batch {
            trace!(
                touch_id = d.touch_id,
                session_id = d.session_id,
                x = d.pixel.x,
                y = d.pixel.y,
                flags = d.flags.0,
                "descriptor"
            );
        }

        let started = Instant::now();
        let result = self.injector.inject(batch);
        let elapsed = started.elapsed();

        if elapsed > self.slow_dispatch {
            self.stats.record_slow_dispatch();
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                contacts = batch.len(),
                "touch injection was slow"
            );
        }

        match result {
            Ok(()) => {
                self.stats.record_dispatched();
                true
            }
            Err(e) => {
                self.stats.record_rejected();
                warn!(error = %e, "touch batch dropped; pruning skipped for this refresh");
                false
            }
        }
    }

    /// Deletes cursors whose release was carried by the accepted `batch`.
    ///
    /// Only sessions that are still tagged `Removed` are deleted, so a cursor
    /// the receiver re-tagged after the snapshot is left alone.
    fn prune(&self, batch: &[TouchPointDescriptor]) -> usize {
        let released: HashSet<SessionId> = batch
            .iter()
            .filter(|d| d.flags.is_up())
            .map(|d| d.session_id)
            .collect();
        if released.is_empty() {
            return 0;
        }

        let delivered = |c: &Cursor| c.is_removed() && released.contains(&c.session_id);
        let pruned = self
            .table
            .snapshot_and_clear(delivered)
            .iter()
            .filter(|c| delivered(*c))
            .count();

        self.stats.record_pruned(pruned);
        pruned
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::always;
    use touch_core::{Lifecycle, PointerFlags, TouchIdAllocator, DEFAULT_PRESSURE};

    fn area() -> TargetArea {
        TargetArea::new(100, 50, 1000, 800)
    }

    fn make_pipeline(injector: MockTouchInjector) -> (TouchPipeline, Arc<CursorSessionTable>) {
        let table = Arc::new(CursorSessionTable::new());
        let builder = BatchBuilder::new(TouchIdAllocator::try_new(24).unwrap(), DEFAULT_PRESSURE);
        let pipeline = TouchPipeline::new(
            Arc::clone(&table),
            builder,
            area(),
            Arc::new(TouchSettings::default()),
            Arc::new(injector),
        );
        (pipeline, table)
    }

    fn rejected() -> InjectionError {
        InjectionError::Rejected {
            count: 1,
            reason: "injected failure".to_string(),
        }
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    #[test]
    fn test_dispatch_submits_whole_batch_in_one_call() {
        // Arrange
        let mut injector = MockTouchInjector::new();
        injector
            .expect_inject()
            .withf(|batch| batch.len() == 3)
            .times(1)
            .returning(|_| Ok(()));
        let (pipeline, table) = make_pipeline(injector);
        table.upsert(1, 0.1, 0.1, Lifecycle::New);
        table.upsert(2, 0.2, 0.2, Lifecycle::Updated);
        table.upsert(3, 0.3, 0.3, Lifecycle::Updated);

        // Act
        let outcome = pipeline.run_refresh(RefreshTick::default());

        // Assert
        assert!(outcome.accepted);
        assert_eq!(pipeline.stats().snapshot().dispatched, 1);
    }

    #[test]
    fn test_empty_table_skips_host_call() {
        let mut injector = MockTouchInjector::new();
        injector.expect_inject().never();
        let (pipeline, _table) = make_pipeline(injector);

        let outcome = pipeline.run_refresh(RefreshTick::default());

        assert!(outcome.accepted);
        assert!(outcome.batch.is_empty());
        assert_eq!(pipeline.stats().snapshot().refreshes, 1);
        assert_eq!(pipeline.stats().snapshot().dispatched, 0);
    }

    #[test]
    fn test_rejected_dispatch_is_reported_not_retried() {
        let mut injector = MockTouchInjector::new();
        injector
            .expect_inject()
            .with(always())
            .times(1)
            .returning(|_| Err(rejected()));
        let (pipeline, table) = make_pipeline(injector);
        table.upsert(4, 0.5, 0.5, Lifecycle::Updated);

        let outcome = pipeline.run_refresh(RefreshTick::default());

        assert!(!outcome.accepted);
        assert_eq!(pipeline.stats().snapshot().rejected, 1);
    }

    // ── Pruning ───────────────────────────────────────────────────────────────

    #[test]
    fn test_successful_dispatch_prunes_removed_cursors_only() {
        // Arrange
        let mut injector = MockTouchInjector::new();
        injector.expect_inject().returning(|_| Ok(()));
        let (pipeline, table) = make_pipeline(injector);
        table.upsert(1, 0.1, 0.1, Lifecycle::Updated);
        table.upsert(2, 0.2, 0.2, Lifecycle::Removed);

        // Act
        let outcome = pipeline.run_refresh(RefreshTick::default());

        // Assert
        assert_eq!(outcome.pruned, 1);
        assert!(table.contains(1));
        assert!(!table.contains(2));
    }

    #[test]
    fn test_failed_dispatch_keeps_removed_cursor_for_next_refresh() {
        let mut injector = MockTouchInjector::new();
        injector.expect_inject().returning(|_| Err(rejected()));
        let (pipeline, table) = make_pipeline(injector);
        table.upsert(2, 0.2, 0.2, Lifecycle::Removed);

        let outcome = pipeline.run_refresh(RefreshTick::default());

        assert_eq!(outcome.pruned, 0);
        assert!(table.contains(2));
        assert!(outcome.batch[0].flags.is_up());
    }

    #[test]
    fn test_removed_cursor_is_pruned_once_a_later_dispatch_succeeds() {
        // Arrange – first call fails, second succeeds
        let mut injector = MockTouchInjector::new();
        let mut seq = mockall::Sequence::new();
        injector
            .expect_inject()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(rejected()));
        injector
            .expect_inject()
            .withf(|batch| batch.len() == 1 && batch[0].flags == PointerFlags::released())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        let (pipeline, table) = make_pipeline(injector);
        table.upsert(8, 0.5, 0.5, Lifecycle::Removed);

        // Act
        let first = pipeline.run_refresh(RefreshTick::default());
        let second = pipeline.run_refresh(RefreshTick::default());

        // Assert
        assert!(!first.accepted);
        assert!(second.accepted);
        assert_eq!(second.pruned, 1);
        assert!(table.is_empty());
    }

    // ── Settings / stats ──────────────────────────────────────────────────────

    #[test]
    fn test_radius_change_applies_on_next_refresh() {
        let mut injector = MockTouchInjector::new();
        injector.expect_inject().returning(|_| Ok(()));
        let (pipeline, table) = make_pipeline(injector);
        table.upsert(1, 0.5, 0.25, Lifecycle::Updated);

        pipeline.settings().set_area_radius(3);
        let outcome = pipeline.run_refresh(RefreshTick::default());

        let rect = outcome.batch[0].contact_area;
        assert_eq!((rect.left, rect.right), (597, 603));
    }

    #[test]
    fn test_collisions_are_counted_but_not_fatal() {
        let mut injector = MockTouchInjector::new();
        injector
            .expect_inject()
            .withf(|batch| batch.len() == 2)
            .returning(|_| Ok(()));
        let (pipeline, table) = make_pipeline(injector);
        table.upsert(1, 0.1, 0.1, Lifecycle::New);
        table.upsert(25, 0.9, 0.9, Lifecycle::New);

        let outcome = pipeline.run_refresh(RefreshTick::default());

        assert!(outcome.accepted);
        assert_eq!(outcome.collisions, 1);
        assert_eq!(pipeline.stats().snapshot().collisions, 1);
    }

    #[test]
    fn test_slow_dispatch_is_counted() {
        let mut injector = MockTouchInjector::new();
        injector.expect_inject().returning(|_| {
            std::thread::sleep(Duration::from_millis(5));
            Ok(())
        });
        let (pipeline, table) = make_pipeline(injector);
        let pipeline = pipeline.with_slow_dispatch_threshold(Duration::from_millis(1));
        table.upsert(1, 0.1, 0.1, Lifecycle::New);

        pipeline.run_refresh(RefreshTick::default());

        assert_eq!(pipeline.stats().snapshot().slow_dispatches, 1);
    }

    #[test]
    fn test_touch_feedback_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            feedback: TouchFeedback,
        }
        let w: Wrapper = toml::from_str("feedback = \"indirect\"").unwrap();
        assert_eq!(w.feedback, TouchFeedback::Indirect);
    }
}
