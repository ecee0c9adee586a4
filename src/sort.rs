//! External sorter.

use log;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::context::{CancellationToken, ProgressSink, SortContext};
use crate::merger::BinaryHeapMerger;
use crate::record::MalformedRecordError;
use crate::splitter::ChunkSplitter;
use crate::stream::{RecordReader, RecordWriter, TextRecordReader, TextRecordWriter};

/// Default number of records per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;
/// Default number of merged records between two progress ticks.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

/// Sorting error.
#[derive(Debug)]
pub enum SortError {
    /// Temporary directory or file creation error.
    TempDir(io::Error),
    /// Workers thread pool initialization error.
    ThreadPoolBuildError(rayon::ThreadPoolBuildError),
    /// Common I/O error.
    IO(io::Error),
    /// Input line could not be parsed.
    Malformed(MalformedRecordError),
    /// Sorting was cancelled.
    Cancelled,
    /// Invalid sorter configuration or unusable source.
    Configuration(String),
}

impl SortError {
    /// Checks if the error is a cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SortError::Cancelled)
    }
}

impl Error for SortError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self {
            SortError::TempDir(err) => Some(err),
            SortError::ThreadPoolBuildError(err) => Some(err),
            SortError::IO(err) => Some(err),
            SortError::Malformed(err) => Some(err),
            SortError::Cancelled | SortError::Configuration(_) => None,
        }
    }
}

impl Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            SortError::TempDir(err) => write!(f, "temporary directory or file not created: {}", err),
            SortError::ThreadPoolBuildError(err) => write!(f, "thread pool initialization failed: {}", err),
            SortError::IO(err) => write!(f, "I/O operation failed: {}", err),
            SortError::Malformed(err) => write!(f, "input data error: {}", err),
            SortError::Cancelled => write!(f, "sorting cancelled"),
            SortError::Configuration(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl From<io::Error> for SortError {
    fn from(err: io::Error) -> Self {
        SortError::IO(err)
    }
}

impl From<MalformedRecordError> for SortError {
    fn from(err: MalformedRecordError) -> Self {
        SortError::Malformed(err)
    }
}

/// Sort run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortStats {
    /// Number of records sorted.
    pub records: u64,
    /// Number of chunk files created.
    pub chunks: usize,
    /// Largest number of records held in the chunk buffer.
    pub peak_buffered: usize,
    pub split_elapsed: Duration,
    pub merge_elapsed: Duration,
    /// Chunk files that could not be removed after being merged.
    pub cleanup_failures: usize,
}

/// Terminal status of a sort run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortStatus {
    Success(SortStats),
    Cancelled,
    Failed(String),
}

impl From<&Result<SortStats, SortError>> for SortStatus {
    fn from(result: &Result<SortStats, SortError>) -> Self {
        match result {
            Ok(stats) => SortStatus::Success(*stats),
            Err(SortError::Cancelled) => SortStatus::Cancelled,
            Err(err) => SortStatus::Failed(err.to_string()),
        }
    }
}

/// External sorter builder. Provides methods for [`ExternalSorter`] initialization.
#[derive(Clone)]
pub struct ExternalSorterBuilder {
    /// Maximum number of records per chunk.
    chunk_size: usize,
    /// Number of threads to be used to sort chunks in parallel.
    threads_number: Option<usize>,
    /// Directory to be used to store temporary data.
    tmp_dir: Option<Box<Path>>,
    /// File read/write buffer size.
    rw_buf_size: Option<usize>,
    /// Number of merged records between two progress ticks.
    progress_interval: u64,
}

impl ExternalSorterBuilder {
    /// Creates an instance of a builder with default parameters.
    pub fn new() -> Self {
        ExternalSorterBuilder::default()
    }

    /// Builds an [`ExternalSorter`] instance using provided configuration.
    pub fn build(self) -> Result<ExternalSorter, SortError> {
        ExternalSorter::new(
            self.chunk_size,
            self.threads_number,
            self.tmp_dir.as_deref(),
            self.rw_buf_size,
            self.progress_interval,
        )
    }

    /// Sets maximum number of records held in memory and stored in a single chunk.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> ExternalSorterBuilder {
        self.chunk_size = chunk_size;
        return self;
    }

    /// Sets number of threads to be used to sort data in parallel.
    pub fn with_threads_number(mut self, threads_number: usize) -> ExternalSorterBuilder {
        self.threads_number = Some(threads_number);
        return self;
    }

    /// Sets directory to be used to store temporary data.
    pub fn with_tmp_dir(mut self, path: &Path) -> ExternalSorterBuilder {
        self.tmp_dir = Some(path.into());
        return self;
    }

    /// Sets file read/write buffer size.
    pub fn with_rw_buf_size(mut self, buf_size: usize) -> ExternalSorterBuilder {
        self.rw_buf_size = Some(buf_size);
        return self;
    }

    /// Sets number of merged records between two progress ticks, `0` disables ticks.
    pub fn with_progress_interval(mut self, interval: u64) -> ExternalSorterBuilder {
        self.progress_interval = interval;
        return self;
    }
}

impl Default for ExternalSorterBuilder {
    fn default() -> Self {
        ExternalSorterBuilder {
            chunk_size: DEFAULT_CHUNK_SIZE,
            threads_number: None,
            tmp_dir: None,
            rw_buf_size: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// External sorter.
pub struct ExternalSorter {
    /// Maximum number of records per chunk.
    chunk_size: usize,
    /// Sorting thread pool.
    thread_pool: rayon::ThreadPool,
    /// Parent of the per-run temporary directories.
    tmp_dir: Option<Box<Path>>,
    /// File read/write buffer size.
    rw_buf_size: Option<usize>,
    /// Number of merged records between two progress ticks.
    progress_interval: u64,
}

impl ExternalSorter {
    /// Creates a new external sorter instance.
    ///
    /// # Arguments
    /// * `chunk_size` - Maximum number of records per chunk. Must be positive.
    /// * `threads_number` - Number of threads to be used to sort data in parallel. If the parameter is [`None`]
    ///   threads number will be selected based on available CPU core number.
    /// * `tmp_path` - Directory to be used to store temporary data. If parameter is [`None`] default OS temporary
    ///   directory will be used.
    /// * `rw_buf_size` - File read/write buffer size.
    /// * `progress_interval` - Number of merged records between two progress ticks.
    pub fn new(
        chunk_size: usize,
        threads_number: Option<usize>,
        tmp_path: Option<&Path>,
        rw_buf_size: Option<usize>,
        progress_interval: u64,
    ) -> Result<Self, SortError> {
        if chunk_size == 0 {
            return Err(SortError::Configuration("chunk size must be positive".to_string()));
        }
        if rw_buf_size == Some(0) {
            return Err(SortError::Configuration("read/write buffer size must be positive".to_string()));
        }

        return Ok(ExternalSorter {
            chunk_size,
            thread_pool: Self::init_thread_pool(threads_number)?,
            tmp_dir: tmp_path.map(Box::from),
            rw_buf_size,
            progress_interval,
        });
    }

    fn init_thread_pool(threads_number: Option<usize>) -> Result<rayon::ThreadPool, SortError> {
        let mut thread_pool_builder = rayon::ThreadPoolBuilder::new();

        if let Some(threads_number) = threads_number {
            log::info!("initializing thread-pool (threads: {})", threads_number);
            thread_pool_builder = thread_pool_builder.num_threads(threads_number);
        } else {
            log::info!("initializing thread-pool (threads: default)");
        }
        let thread_pool = thread_pool_builder
            .build()
            .map_err(|err| SortError::ThreadPoolBuildError(err))?;

        return Ok(thread_pool);
    }

    fn init_tmp_directory(&self) -> Result<tempfile::TempDir, SortError> {
        let tmp_dir = if let Some(tmp_path) = &self.tmp_dir {
            tempfile::Builder::new().prefix("record-sort-").tempdir_in(tmp_path)
        } else {
            tempfile::Builder::new().prefix("record-sort-").tempdir()
        }
        .map_err(|err| SortError::TempDir(err))?;

        log::info!("using {} as a temporary directory", tmp_dir.path().display());

        return Ok(tmp_dir);
    }

    /// Maximum number of records held in memory at once.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Sorts the `source` file into the `destination` file.
    ///
    /// The destination is created (or truncated) only once the source has been split. If the
    /// result is not `Ok` the destination may be missing, empty or partially written. Temporary
    /// chunk files are removed on every exit path.
    ///
    /// # Arguments
    /// * `source` - File to be sorted
    /// * `destination` - File the sorted records are written to
    /// * `cancellation` - Cancellation flag checked before every record
    /// * `progress` - Progress events receiver
    pub fn sort(
        &self,
        source: &Path,
        destination: &Path,
        cancellation: &CancellationToken,
        progress: &dyn ProgressSink,
    ) -> Result<SortStats, SortError> {
        let ctx = SortContext::new(cancellation, progress);
        let reader = self.open_source(source)?;
        let rw_buf_size = self.rw_buf_size;

        log::info!("sorting {} into {}", source.display(), destination.display());
        let stats = self.run(reader, || Ok(TextRecordWriter::create(destination, rw_buf_size)?), &ctx)?;
        log::info!(
            "sorting done ({} records, {} chunks, split {:?}, merge {:?})",
            stats.records,
            stats.chunks,
            stats.split_elapsed,
            stats.merge_elapsed
        );

        return Ok(stats);
    }

    /// Sorts records from `reader` into `writer`.
    pub fn sort_stream<R, W>(&self, reader: R, writer: &mut W, ctx: &SortContext) -> Result<SortStats, SortError>
    where
        R: RecordReader,
        W: RecordWriter,
    {
        self.run(reader, || Ok(writer), ctx)
    }

    fn open_source(&self, source: &Path) -> Result<TextRecordReader<io::BufReader<fs::File>>, SortError> {
        let not_readable =
            |err: io::Error| SortError::Configuration(format!("source {} not readable: {}", source.display(), err));

        let metadata = fs::metadata(source).map_err(not_readable)?;
        if !metadata.is_file() {
            return Err(SortError::Configuration(format!("source {} is not a file", source.display())));
        }

        return TextRecordReader::open(source, self.rw_buf_size).map_err(not_readable);
    }

    /// Splits the source, opens the destination and merges the chunks into it.
    /// The source is closed before the destination is opened.
    fn run<R, W, F>(&self, mut reader: R, open_writer: F, ctx: &SortContext) -> Result<SortStats, SortError>
    where
        R: RecordReader,
        W: RecordWriter,
        F: FnOnce() -> Result<W, SortError>,
    {
        let tmp_dir = self.init_tmp_directory()?;

        let split_started = Instant::now();
        let split = ChunkSplitter::new(self.chunk_size, self.rw_buf_size, &self.thread_pool).split(
            &mut reader,
            tmp_dir.path(),
            ctx,
        )?;
        drop(reader);
        let split_elapsed = split_started.elapsed();
        log::info!(
            "split done ({} records, {} chunks, {:?})",
            split.records,
            split.chunks.len(),
            split_elapsed
        );

        let mut stats = SortStats {
            records: split.records,
            chunks: split.chunks.len(),
            peak_buffered: split.peak_buffered,
            split_elapsed,
            ..SortStats::default()
        };

        if ctx.is_cancelled() {
            log::info!("sorting cancelled before merge, removing {} chunks", split.chunks.len());
            return Err(SortError::Cancelled);
        }

        let mut writer = open_writer()?;

        let merge_started = Instant::now();
        let merge = BinaryHeapMerger::new(split.chunks)
            .with_progress_interval(self.progress_interval)
            .merge_into(&mut writer, ctx)?;
        writer.flush()?;
        stats.merge_elapsed = merge_started.elapsed();
        stats.cleanup_failures = merge.release_failures;

        if merge.records != stats.records {
            return Err(SortError::IO(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} records read but {} merged", stats.records, merge.records),
            )));
        }

        if let Err(err) = tmp_dir.close() {
            log::warn!("temporary directory not removed: {}", err);
        }

        return Ok(stats);
    }
}

/// Sorts the `source` file into the `destination` file using at most `chunk_size` records per chunk
/// and default settings otherwise. See [`ExternalSorter::sort`].
pub fn sort(
    source: &Path,
    destination: &Path,
    chunk_size: usize,
    cancellation: &CancellationToken,
    progress: &dyn ProgressSink,
) -> Result<SortStats, SortError> {
    ExternalSorterBuilder::new()
        .with_chunk_size(chunk_size)
        .build()?
        .sort(source, destination, cancellation, progress)
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::fs;
    use std::path::{Path, PathBuf};

    use rand::seq::SliceRandom;
    use rand::Rng;
    use rstest::*;

    use super::{sort, ExternalSorter, ExternalSorterBuilder, SortError, SortStatus};
    use crate::context::{CancellationToken, NoProgress, Progress, SortContext};
    use crate::record::{MalformedReason, Record};
    use crate::stream::{MemoryRecordReader, MemoryRecordWriter};

    struct Workspace {
        dir: tempfile::TempDir,
        tmp: PathBuf,
    }

    impl Workspace {
        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn write_input(&self, lines: &[&str]) -> PathBuf {
            let path = self.path("input.txt");
            let content: String = lines.iter().map(|line| format!("{}\n", line)).collect();
            fs::write(&path, content).unwrap();
            return path;
        }

        fn sorter(&self, chunk_size: usize) -> ExternalSorter {
            ExternalSorterBuilder::new()
                .with_chunk_size(chunk_size)
                .with_threads_number(2)
                .with_tmp_dir(&self.tmp)
                .build()
                .unwrap()
        }

        fn tmp_entries(&self) -> usize {
            fs::read_dir(&self.tmp).unwrap().count()
        }
    }

    #[fixture]
    fn workspace() -> Workspace {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join("tmp");
        fs::create_dir(&tmp).unwrap();
        Workspace { dir, tmp }
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path).unwrap().lines().map(String::from).collect()
    }

    #[rstest]
    #[case(
        vec!["5. pear", "2. apple", "9. apple"],
        2,
        vec!["2. apple", "9. apple", "5. pear"],
    )]
    #[case(
        vec!["3. cherry", "1. banana", "2. apple"],
        1,
        vec!["2. apple", "1. banana", "3. cherry"],
    )]
    #[case(
        vec!["10. b", "9. b", "1. a", "1. a"],
        3,
        vec!["1. a", "1. a", "10. b", "9. b"],
    )]
    #[case(
        vec!["1. Zoo", "2. apple", "3. Apple"],
        100,
        vec!["3. Apple", "1. Zoo", "2. apple"],
    )]
    fn test_sort_file(
        workspace: Workspace,
        #[case] input: Vec<&str>,
        #[case] chunk_size: usize,
        #[case] expected: Vec<&str>,
    ) {
        let source = workspace.write_input(&input);
        let destination = workspace.path("output.txt");

        let sorter = workspace.sorter(chunk_size);
        assert_eq!(sorter.chunk_size(), chunk_size);

        let stats = sorter
            .sort(&source, &destination, &CancellationToken::new(), &NoProgress)
            .unwrap();

        assert_eq!(read_lines(&destination), expected);
        assert_eq!(stats.records, input.len() as u64);
        assert_eq!(stats.chunks, (input.len() + chunk_size - 1) / chunk_size);
        assert!(stats.peak_buffered <= chunk_size);
        assert_eq!(stats.cleanup_failures, 0);
        assert_eq!(workspace.tmp_entries(), 0);
    }

    #[rstest]
    fn test_sort_empty_file(workspace: Workspace) {
        let source = workspace.write_input(&[]);
        let destination = workspace.path("output.txt");

        let stats = workspace
            .sorter(4)
            .sort(&source, &destination, &CancellationToken::new(), &NoProgress)
            .unwrap();

        assert!(destination.exists());
        assert_eq!(fs::read_to_string(&destination).unwrap(), "");
        assert_eq!(stats.chunks, 0);
        assert_eq!(stats.records, 0);
        assert_eq!(workspace.tmp_entries(), 0);
    }

    #[rstest]
    #[case(1)]
    #[case(7)]
    #[case(64)]
    #[case(1000)]
    fn test_sort_random_input(workspace: Workspace, #[case] chunk_size: usize) {
        let mut rng = rand::thread_rng();
        let words = ["apple", "pear", "plum", "fig", "kiwi", "lime", "Apple"];
        let lines: Vec<String> = (0..500)
            .map(|_| {
                let numeric: u32 = rng.gen_range(0..50);
                let first = words.choose(&mut rng).unwrap();
                let second = words.choose(&mut rng).unwrap();
                format!("{}. {} {}", numeric, first, second)
            })
            .collect();
        let source = workspace.write_input(&lines.iter().map(String::as_str).collect::<Vec<_>>());
        let destination = workspace.path("output.txt");

        let events = RefCell::new(Vec::new());
        let sink = |event: Progress| events.borrow_mut().push(event);
        workspace
            .sorter(chunk_size)
            .sort(&source, &destination, &CancellationToken::new(), &sink)
            .unwrap();

        let mut expected: Vec<Record> = lines.iter().map(|line| Record::parse(line).unwrap()).collect();
        expected.sort();
        let actual: Vec<Record> = read_lines(&destination)
            .iter()
            .map(|line| Record::parse(line).unwrap())
            .collect();

        assert_eq!(actual, expected);
        assert_eq!(workspace.tmp_entries(), 0);

        let events = events.into_inner();
        let written = events
            .iter()
            .filter(|event| matches!(event, Progress::ChunkWritten { .. }))
            .count();
        let exhausted = events
            .iter()
            .filter(|event| matches!(event, Progress::ChunkExhausted { .. }))
            .count();
        assert_eq!(written, (500 + chunk_size - 1) / chunk_size);
        assert_eq!(exhausted, written);
        assert_eq!(events.first(), Some(&Progress::SplitStarted));
        assert_eq!(events.last(), Some(&Progress::MergeCompleted { records: 500 }));
    }

    #[rstest]
    fn test_sort_ties_keep_multiset(workspace: Workspace) {
        let sorter = workspace.sorter(2);
        let token = CancellationToken::new();
        let ctx = SortContext::new(&token, &NoProgress);

        let mut outputs = Vec::new();
        for input in [["1. x", "1. x", "0. a"], ["0. a", "1. x", "1. x"]] {
            let reader = MemoryRecordReader::from_lines(input).unwrap();
            let mut writer = MemoryRecordWriter::new();
            let stats = sorter.sort_stream(reader, &mut writer, &ctx).unwrap();
            assert_eq!(stats.records, writer.records().len() as u64);
            outputs.push(writer.lines());
        }

        assert_eq!(outputs[0], vec!["0. a", "1. x", "1. x"]);
        assert_eq!(outputs[0], outputs[1]);
    }

    #[rstest]
    fn test_sort_cancelled_after_first_chunk(workspace: Workspace) {
        let source = workspace.write_input(&["4. d", "3. c", "2. b", "1. a"]);
        let destination = workspace.path("output.txt");

        let token = CancellationToken::new();
        let sink = |event: Progress| {
            if let Progress::ChunkWritten { chunk: 0, .. } = event {
                token.cancel();
            }
        };

        let result = workspace.sorter(2).sort(&source, &destination, &token, &sink);

        assert!(result.as_ref().unwrap_err().is_cancelled());
        assert_eq!(SortStatus::from(&result), SortStatus::Cancelled);
        assert!(!destination.exists());
        assert_eq!(workspace.tmp_entries(), 0);
    }

    #[rstest]
    fn test_sort_cancelled_between_phases(workspace: Workspace) {
        let source = workspace.write_input(&["2. b", "1. a"]);
        let destination = workspace.path("output.txt");

        let token = CancellationToken::new();
        let sink = |event: Progress| {
            if let Progress::SplitCompleted { .. } = event {
                token.cancel();
            }
        };

        let result = workspace.sorter(2).sort(&source, &destination, &token, &sink);

        assert!(matches!(result, Err(SortError::Cancelled)));
        assert!(!destination.exists());
        assert_eq!(workspace.tmp_entries(), 0);
    }

    #[rstest]
    fn test_sort_cancelled_during_merge(workspace: Workspace) {
        let source = workspace.write_input(&["4. d", "3. c", "2. b", "1. a"]);
        let destination = workspace.path("output.txt");

        let token = CancellationToken::new();
        let sink = |event: Progress| {
            if let Progress::RecordsMerged(1) = event {
                token.cancel();
            }
        };
        let sorter = ExternalSorterBuilder::new()
            .with_chunk_size(2)
            .with_tmp_dir(&workspace.tmp)
            .with_progress_interval(1)
            .build()
            .unwrap();

        let result = sorter.sort(&source, &destination, &token, &sink);

        assert!(matches!(result, Err(SortError::Cancelled)));
        assert_eq!(read_lines(&destination), vec!["1. a"]);
        assert_eq!(workspace.tmp_entries(), 0);
    }

    #[rstest]
    fn test_sort_malformed_input(workspace: Workspace) {
        let source = workspace.write_input(&["2. b", "1. a", "3. c", "missing delimiter", "4. d"]);
        let destination = workspace.path("output.txt");

        let result = workspace
            .sorter(2)
            .sort(&source, &destination, &CancellationToken::new(), &NoProgress);

        match &result {
            Err(SortError::Malformed(err)) => {
                assert_eq!(err.reason(), MalformedReason::MissingDelimiter);
                assert_eq!(err.line(), Some(4));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(SortStatus::from(&result), SortStatus::Failed(_)));
        assert!(!destination.exists());
        assert_eq!(workspace.tmp_entries(), 0);
    }

    #[rstest]
    fn test_sort_missing_source(workspace: Workspace) {
        let result = workspace.sorter(2).sort(
            &workspace.path("missing.txt"),
            &workspace.path("output.txt"),
            &CancellationToken::new(),
            &NoProgress,
        );

        assert!(matches!(result, Err(SortError::Configuration(_))));
        assert_eq!(workspace.tmp_entries(), 0);
    }

    #[rstest]
    fn test_sort_directory_source(workspace: Workspace) {
        let result = workspace.sorter(2).sort(
            &workspace.tmp,
            &workspace.path("output.txt"),
            &CancellationToken::new(),
            &NoProgress,
        );

        assert!(matches!(result, Err(SortError::Configuration(_))));
    }

    #[rstest]
    fn test_sort_unwritable_destination(workspace: Workspace) {
        let source = workspace.write_input(&["2. b", "1. a", "3. c"]);
        let destination = workspace.path("missing-dir").join("output.txt");

        let result = workspace
            .sorter(2)
            .sort(&source, &destination, &CancellationToken::new(), &NoProgress);

        assert!(matches!(result, Err(SortError::IO(_))));
        assert_eq!(workspace.tmp_entries(), 0);
    }

    #[rstest]
    #[case(ExternalSorterBuilder::new().with_chunk_size(0))]
    #[case(ExternalSorterBuilder::new().with_rw_buf_size(0))]
    fn test_invalid_configuration(#[case] builder: ExternalSorterBuilder) {
        assert!(matches!(builder.build(), Err(SortError::Configuration(_))));
    }

    #[rstest]
    fn test_sort_entry_point(workspace: Workspace) {
        let source = workspace.write_input(&["5. pear", "2. apple", "9. apple"]);
        let destination = workspace.path("output.txt");

        let result = sort(&source, &destination, 2, &CancellationToken::new(), &NoProgress);
        assert!(matches!(SortStatus::from(&result), SortStatus::Success(_)));
        assert_eq!(read_lines(&destination), vec!["2. apple", "9. apple", "5. pear"]);

        let result = sort(&source, &destination, 0, &CancellationToken::new(), &NoProgress);
        assert!(matches!(result, Err(SortError::Configuration(_))));
    }
}
