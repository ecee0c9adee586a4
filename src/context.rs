//! Cancellation and progress reporting passed explicitly through the sort phases.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

/// Cooperative cancellation flag. Once cancelled it stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken::default()
    }

    /// Requests cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Progress events emitted by the sorter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    SplitStarted,
    /// A sorted chunk has been spilled to a temporary file.
    ChunkWritten { chunk: usize, records: usize },
    SplitCompleted { chunks: usize, records: u64 },
    MergeStarted { chunks: usize },
    /// Total number of records merged so far.
    RecordsMerged(u64),
    /// Every record of the chunk has been merged and its file removed.
    ChunkExhausted { chunk: usize },
    MergeCompleted { records: u64 },
}

/// One-way progress notification channel. Implementations must not block.
pub trait ProgressSink {
    fn notify(&self, event: Progress);
}

/// Progress sink discarding every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn notify(&self, _event: Progress) {}
}

impl<F> ProgressSink for F
where
    F: Fn(Progress),
{
    fn notify(&self, event: Progress) {
        self(event)
    }
}

impl ProgressSink for mpsc::Sender<Progress> {
    fn notify(&self, event: Progress) {
        // a dropped receiver just means nobody is listening anymore
        let _ = self.send(event);
    }
}

/// Cancellation token and progress sink of a single sort run.
#[derive(Clone, Copy)]
pub struct SortContext<'a> {
    cancellation: &'a CancellationToken,
    progress: &'a dyn ProgressSink,
}

impl<'a> SortContext<'a> {
    pub fn new(cancellation: &'a CancellationToken, progress: &'a dyn ProgressSink) -> Self {
        SortContext { cancellation, progress }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn notify(&self, event: Progress) {
        self.progress.notify(event)
    }
}
