//! Binary heap merger.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io;

use log;

use crate::chunk::ExternalChunk;
use crate::context::{Progress, SortContext};
use crate::record::Record;
use crate::sort::SortError;
use crate::stream::{MemoryRecordReader, RecordReader, RecordWriter};

/// A sorted record input of the merger that can be released once drained.
pub trait MergeSource: RecordReader {
    /// Closes the source and frees its backing storage.
    fn release(self) -> io::Result<()>;
}

impl MergeSource for ExternalChunk {
    fn release(self) -> io::Result<()> {
        self.remove()
    }
}

impl MergeSource for MemoryRecordReader {
    fn release(self) -> io::Result<()> {
        Ok(())
    }
}

/// Merge run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Number of records written to the output.
    pub records: u64,
    /// Number of sources whose storage could not be released.
    pub release_failures: usize,
}

/// Binary heap merger implementation.
/// Merges multiple sorted sources into a single sorted output.
/// Time complexity is *m* \* log(*n*) in worst case where *m* is the number of records,
/// *n* is the number of sources.
///
/// A source is released as soon as it is drained. Sources still open when the merger is
/// dropped (cancellation or error) are released on drop.
pub struct BinaryHeapMerger<S: MergeSource> {
    // binary heap is max-heap by default so we reverse it to convert it to min-heap
    frontier: BinaryHeap<Reverse<(Record, usize)>>,
    sources: Vec<Option<S>>,
    progress_interval: u64,
    stats: MergeStats,
}

impl<S: MergeSource> BinaryHeapMerger<S> {
    /// Creates an instance of a binary heap merger using sources as inputs.
    /// Source records should be sorted in ascending order otherwise the result is undefined.
    ///
    /// # Arguments
    /// * `sources` - Sources to be merged in a single sorted one
    pub fn new<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let sources = Vec::from_iter(sources.into_iter().map(Some));
        let frontier = BinaryHeap::with_capacity(sources.len());

        return BinaryHeapMerger {
            frontier,
            sources,
            progress_interval: 0,
            stats: MergeStats::default(),
        };
    }

    /// Emits a [`Progress::RecordsMerged`] event every `interval` records, `0` disables it.
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        return self;
    }

    /// Number of sources not drained yet.
    pub fn open_sources(&self) -> usize {
        self.sources.iter().filter(|source| source.is_some()).count()
    }

    /// Merges every source into `writer`.
    ///
    /// The cancellation flag is checked before each record is emitted. On cancellation or
    /// error the remaining sources are released when the merger is dropped.
    pub fn merge_into<W: RecordWriter>(mut self, writer: &mut W, ctx: &SortContext) -> Result<MergeStats, SortError> {
        ctx.notify(Progress::MergeStarted {
            chunks: self.sources.len(),
        });

        for idx in 0..self.sources.len() {
            self.advance(idx, ctx)?;
        }

        while let Some(Reverse((record, idx))) = self.frontier.pop() {
            if ctx.is_cancelled() {
                log::info!("merge cancelled after {} records", self.stats.records);
                return Err(SortError::Cancelled);
            }

            writer.write_next(&record)?;
            self.stats.records += 1;
            if self.progress_interval > 0 && self.stats.records % self.progress_interval == 0 {
                ctx.notify(Progress::RecordsMerged(self.stats.records));
            }

            self.advance(idx, ctx)?;
        }

        ctx.notify(Progress::MergeCompleted {
            records: self.stats.records,
        });
        log::debug!("merge done ({} records)", self.stats.records);

        return Ok(self.stats);
    }

    /// Reads the next record of source `idx` into the frontier, releasing the source if it is drained.
    fn advance(&mut self, idx: usize, ctx: &SortContext) -> Result<(), SortError> {
        let source = match self.sources[idx].as_mut() {
            Some(source) => source,
            None => return Ok(()),
        };

        match source.read_next()? {
            Some(record) => self.frontier.push(Reverse((record, idx))),
            None => {
                if let Some(source) = self.sources[idx].take() {
                    if let Err(err) = source.release() {
                        log::warn!("merge source {} not released: {}", idx, err);
                        self.stats.release_failures += 1;
                    }
                }
                ctx.notify(Progress::ChunkExhausted { chunk: idx });
            }
        }

        return Ok(());
    }
}

impl<S: MergeSource> Drop for BinaryHeapMerger<S> {
    fn drop(&mut self) {
        for (idx, source) in self.sources.iter_mut().enumerate() {
            if let Some(source) = source.take() {
                if let Err(err) = source.release() {
                    log::warn!("merge source {} not released: {}", idx, err);
                }
            }
        }
    }
}
