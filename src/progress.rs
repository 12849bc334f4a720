//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn BatchProgress>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive
//! events as the batch processes each document.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a terminal progress bar, a GUI log pane, or a
//! database record without the library knowing anything about how the host
//! application communicates. The trait is `Send + Sync` so a host that runs
//! the batch on a worker thread can share the callback with its interactive
//! thread.

use crate::output::{BatchStats, ItemResult};
use std::path::Path;
use std::sync::Arc;

/// Called by the batch runner as it processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Documents are processed sequentially, so the
/// per-document methods are never called concurrently; `Send + Sync` is
/// required only so the callback can cross the thread boundary into a
/// background batch.
pub trait BatchProgress: Send + Sync {
    /// Called once before the first document.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called just before a document is rendered/linked.
    ///
    /// `index` is 0-based.
    fn on_document_start(&self, index: usize, total: usize, source: &Path) {
        let _ = (index, total, source);
    }

    /// Called after a document has been fully attempted, whether it
    /// succeeded or not — check [`ItemResult::is_ok`].
    fn on_document_complete(&self, index: usize, total: usize, result: &ItemResult) {
        let _ = (index, total, result);
    }

    /// Called once after every document has been attempted.
    fn on_batch_complete(&self, stats: &BatchStats) {
        let _ = stats;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl BatchProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgress>;
