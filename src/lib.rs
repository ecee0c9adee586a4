//! `record-sort` sorts text files of `<numeric>. <text>` records that do not fit into memory.
//!
//! Sorting is done in two passes. During the first pass the input is read in chunks of a bounded
//! number of records, every chunk is sorted in memory and spilled to a temporary file. During the
//! second pass the sorted chunks are merged together using a binary heap holding the next unread
//! record of every chunk. At any moment at most `chunk_size` records plus one record per chunk
//! are kept in memory. For more information see [External Sorting](https://en.wikipedia.org/wiki/External_sorting).
//!
//! # Overview
//!
//! * **Record ordering:**
//!   records are ordered by their text part first and by their numeric part second, both compared
//!   byte-wise as strings.
//! * **Cancellation:**
//!   a [`CancellationToken`] is checked before every record in both passes.
//! * **Progress reporting:**
//!   [`Progress`] events are sent to a [`ProgressSink`], closures and `mpsc` senders are supported.
//! * **Cleanup:**
//!   temporary chunk files are removed as soon as they are merged and on every error or
//!   cancellation path.
//! * **Multithreading support:**
//!   chunks are sorted in parallel on a rayon thread pool.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use record_sort::{CancellationToken, ExternalSorterBuilder, Progress};
//!
//! fn main() {
//!     let sorter = ExternalSorterBuilder::new()
//!         .with_chunk_size(1_000_000)
//!         .with_tmp_dir(Path::new("./"))
//!         .build()
//!         .unwrap();
//!
//!     let token = CancellationToken::new();
//!     let progress = |event: Progress| println!("{:?}", event);
//!
//!     let stats = sorter
//!         .sort(Path::new("input.txt"), Path::new("output.txt"), &token, &progress)
//!         .unwrap();
//!     println!("{} records sorted", stats.records);
//! }
//! ```

pub mod buffer;
pub mod chunk;
pub mod context;
pub mod merger;
pub mod record;
pub mod sort;
pub mod splitter;
pub mod stream;

pub use buffer::ChunkBuffer;
pub use chunk::ExternalChunk;
pub use context::{CancellationToken, NoProgress, Progress, ProgressSink, SortContext};
pub use merger::{BinaryHeapMerger, MergeSource, MergeStats};
pub use record::{MalformedReason, MalformedRecordError, Record};
pub use sort::{sort, ExternalSorter, ExternalSorterBuilder, SortError, SortStats, SortStatus, DEFAULT_CHUNK_SIZE};
pub use splitter::{ChunkSplitter, SplitOutput};
pub use stream::{MemoryRecordReader, MemoryRecordWriter, RecordReader, RecordWriter, TextRecordReader, TextRecordWriter};
