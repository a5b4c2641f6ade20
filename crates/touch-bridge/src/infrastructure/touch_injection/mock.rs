//! Mock touch injection for unit testing and non-Windows builds.
//!
//! # Why a mock injector?
//!
//! The real injector (`WindowsTouchInjector`) makes OS API calls that:
//!
//! - Require an interactive Windows desktop session to run.
//! - Actually press on whatever window is under the injected contacts.
//! - Cannot be observed directly from Rust test code.
//!
//! The `MockTouchInjector` replaces the OS call with in-memory recording.
//! Every accepted batch is pushed into a `Mutex<Vec<...>>` so test assertions
//! can inspect exactly what was injected and in what order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let capability = MockTouchCapability::new();
//! let injector = capability.injector();
//! // ... start the bridge with `&capability`, run refreshes ...
//! let batches = injector.batches();
//! assert_eq!(batches.len(), 1);
//! assert!(batches[0][0].flags.is_down());
//! ```
//!
//! # Simulating host rejection
//!
//! Call `set_fail(true)` to make every following `inject` call return
//! [`InjectionError::Rejected`] without recording the batch, and
//! `set_fail(false)` to accept again.  The flag is atomic so it can be
//! flipped between refreshes while the loop runs on another task.

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use touch_core::TouchPointDescriptor;

use crate::application::inject_touch::{
    InjectionError, TouchCapability, TouchFeedback, TouchInjector,
};

/// An injector that records batches without touching the OS.
#[derive(Debug, Default)]
pub struct MockTouchInjector {
    batches: Mutex<Vec<Vec<TouchPointDescriptor>>>,
    should_fail: AtomicBool,
    attempts: AtomicUsize,
}

impl MockTouchInjector {
    /// Creates an injector that accepts every batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `inject` calls fail (`true`) or succeed (`false`).
    pub fn set_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Accepted batches, oldest first.
    pub fn batches(&self) -> Vec<Vec<TouchPointDescriptor>> {
        self.lock().clone()
    }

    /// Number of `inject` calls, accepted or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Vec<TouchPointDescriptor>>> {
        self.batches.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TouchInjector for MockTouchInjector {
    /// Records the batch, or rejects it if `set_fail(true)` was called.
    fn inject(&self, batch: &[TouchPointDescriptor]) -> Result<(), InjectionError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(InjectionError::Rejected {
                count: batch.len(),
                reason: "mock failure".into(),
            });
        }
        self.lock().push(batch.to_vec());
        Ok(())
    }
}

/// A capability that hands out one shared [`MockTouchInjector`].
#[derive(Debug)]
pub struct MockTouchCapability {
    injector: Arc<MockTouchInjector>,
    available: bool,
    initialized_with: Mutex<Option<(u32, TouchFeedback)>>,
}

impl MockTouchCapability {
    /// Creates a capability that initializes successfully.
    pub fn new() -> Self {
        Self {
            injector: Arc::new(MockTouchInjector::new()),
            available: true,
            initialized_with: Mutex::new(None),
        }
    }

    /// Creates a capability whose initialization always fails.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// The injector returned by `initialize`, for inspection.
    pub fn injector(&self) -> Arc<MockTouchInjector> {
        Arc::clone(&self.injector)
    }

    /// Arguments of the last successful `initialize` call.
    pub fn initialized_with(&self) -> Option<(u32, TouchFeedback)> {
        *self
            .initialized_with
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockTouchCapability {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchCapability for MockTouchCapability {
    fn initialize(
        &self,
        max_touch_points: NonZeroU32,
        feedback: TouchFeedback,
    ) -> Result<Arc<dyn TouchInjector>, InjectionError> {
        if !self.available {
            return Err(InjectionError::Unavailable(
                "mock capability disabled".into(),
            ));
        }
        *self
            .initialized_with
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some((max_touch_points.get(), feedback));
        Ok(Arc::clone(&self.injector) as Arc<dyn TouchInjector>)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
