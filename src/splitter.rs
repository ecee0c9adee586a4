//! Splits a record stream into sorted temporary chunks.

use std::path::Path;

use log;

use crate::buffer::ChunkBuffer;
use crate::chunk::ExternalChunk;
use crate::context::{Progress, SortContext};
use crate::record::Record;
use crate::sort::SortError;
use crate::stream::RecordReader;

/// Result of a split run.
pub struct SplitOutput {
    /// Chunks in creation order.
    pub chunks: Vec<ExternalChunk>,
    /// Number of records read from the source.
    pub records: u64,
    /// Largest number of records buffered in memory at once.
    pub peak_buffered: usize,
}

/// Reads a source in batches of at most `chunk_size` records, sorts every batch
/// in memory and spills it to a temporary chunk file.
pub struct ChunkSplitter<'a> {
    chunk_size: usize,
    rw_buf_size: Option<usize>,
    thread_pool: &'a rayon::ThreadPool,
}

impl<'a> ChunkSplitter<'a> {
    /// Creates a splitter.
    ///
    /// # Arguments
    /// * `chunk_size` - Maximum number of records per chunk, must be positive
    /// * `rw_buf_size` - Chunk file write buffer size
    /// * `thread_pool` - Pool the in-memory sort runs on
    pub fn new(chunk_size: usize, rw_buf_size: Option<usize>, thread_pool: &'a rayon::ThreadPool) -> Self {
        ChunkSplitter {
            chunk_size,
            rw_buf_size,
            thread_pool,
        }
    }

    /// Splits `reader` into chunks stored in `tmp_dir`.
    ///
    /// The cancellation flag is checked before every read. On cancellation or error every
    /// chunk created by this call is removed before the error is returned.
    pub fn split<R: RecordReader>(
        &self,
        reader: &mut R,
        tmp_dir: &Path,
        ctx: &SortContext,
    ) -> Result<SplitOutput, SortError> {
        if self.chunk_size == 0 {
            return Err(SortError::Configuration("chunk size must be positive".to_string()));
        }

        ctx.notify(Progress::SplitStarted);

        let mut buffer: ChunkBuffer<Record> = ChunkBuffer::new(self.chunk_size, false);
        let mut chunks: Vec<ExternalChunk> = Vec::new();
        let mut records: u64 = 0;

        loop {
            while !buffer.is_full() {
                if ctx.is_cancelled() {
                    log::info!("split cancelled after {} records, removing {} chunks", records, chunks.len());
                    return Err(SortError::Cancelled);
                }

                match reader.read_next()? {
                    Some(record) => {
                        buffer.push(record);
                        records += 1;
                    }
                    None => break,
                }
            }

            if buffer.is_empty() {
                break;
            }

            let chunk = self.spill(&mut buffer, chunks.len(), tmp_dir)?;
            ctx.notify(Progress::ChunkWritten {
                chunk: chunk.index(),
                records: chunk.len(),
            });
            chunks.push(chunk);

            if reader.is_exhausted() {
                break;
            }
        }

        log::debug!("split done ({} records, {} chunks)", records, chunks.len());
        ctx.notify(Progress::SplitCompleted {
            chunks: chunks.len(),
            records,
        });

        return Ok(SplitOutput {
            chunks,
            records,
            peak_buffered: buffer.peak(),
        });
    }

    fn spill(&self, buffer: &mut ChunkBuffer<Record>, index: usize, tmp_dir: &Path) -> Result<ExternalChunk, SortError> {
        log::debug!("sorting chunk {} ({} records) ...", index, buffer.len());
        buffer.sort(self.thread_pool);

        log::debug!("saving chunk {}", index);
        let chunk = ExternalChunk::build(tmp_dir, index, buffer.as_slice(), self.rw_buf_size)?;
        buffer.clear();

        return Ok(chunk);
    }
}
