use std::path::PathBuf;
use std::process;

use clap::ArgEnum;
use ctrlc;
use env_logger;
use log;

use record_sort::{CancellationToken, ExternalSorterBuilder, Progress, SortStatus};

/// Exit code used when the run was interrupted.
const EXIT_CANCELLED: i32 = 130;

fn main() {
    let options = Options::from_args();
    init_logger(options.log_level);

    let mut sorter_builder = ExternalSorterBuilder::new().with_chunk_size(options.chunk_size);
    if let Some(threads) = options.threads {
        sorter_builder = sorter_builder.with_threads_number(threads);
    }
    if let Some(tmp_dir) = &options.tmp_dir {
        sorter_builder = sorter_builder.with_tmp_dir(tmp_dir.as_path());
    }

    let sorter = sorter_builder.build().unwrap_or_else(|err| {
        log::error!("sorter configuration rejected: {}", err);
        process::exit(1);
    });

    let token = CancellationToken::new();
    install_interrupt_handler(&token);

    let result = sorter.sort(&options.input, &options.output, &token, &log_progress);
    match SortStatus::from(&result) {
        SortStatus::Success(stats) => {
            log::info!(
                "{} records sorted using {} chunks (peak buffer {} records)",
                stats.records,
                stats.chunks,
                stats.peak_buffered
            );
            if stats.cleanup_failures > 0 {
                log::warn!("{} temporary chunk files could not be removed", stats.cleanup_failures);
            }
        }
        SortStatus::Cancelled => {
            log::error!("sorting cancelled, {} is incomplete", options.output.display());
            process::exit(EXIT_CANCELLED);
        }
        SortStatus::Failed(err) => {
            log::error!("sorting failed: {}", err);
            process::exit(1);
        }
    }
}

/// Command line options of a single run.
struct Options {
    input: PathBuf,
    output: PathBuf,
    chunk_size: usize,
    threads: Option<usize>,
    tmp_dir: Option<PathBuf>,
    log_level: LogLevel,
}

impl Options {
    fn from_args() -> Self {
        let matches = cli().get_matches();

        Options {
            input: matches.value_of_t_or_exit("input"),
            output: matches.value_of_t_or_exit("output"),
            chunk_size: matches.value_of_t_or_exit("chunk_size"),
            threads: matches
                .is_present("threads")
                .then(|| matches.value_of_t_or_exit("threads")),
            tmp_dir: matches.value_of("tmp_dir").map(PathBuf::from),
            log_level: matches.value_of_t_or_exit("log_level"),
        }
    }
}

fn cli() -> clap::App<'static> {
    let path_arg = |name: &'static str, long: &'static str, short: char, help: &'static str| {
        clap::Arg::new(name).short(short).long(long).value_name("PATH").help(help).takes_value(true)
    };

    clap::App::new("record-sort")
        .about("Sorts '<number>. <text>' records by text, then by number, using bounded memory")
        .arg(path_arg("input", "input", 'i', "record file to sort").required(true))
        .arg(path_arg("output", "output", 'o', "where the sorted records are written").required(true))
        .arg(path_arg("tmp_dir", "tmp-dir", 'd', "parent directory for temporary chunk files"))
        .arg(
            clap::Arg::new("chunk_size")
                .short('c')
                .long("chunk-size")
                .value_name("RECORDS")
                .help("records held in memory per chunk")
                .takes_value(true)
                .default_value(DEFAULT_CHUNK_SIZE_STR)
                .validator(|value| match value.parse::<usize>() {
                    Ok(0) => Err("must be at least 1".to_string()),
                    Ok(_) => Ok(()),
                    Err(err) => Err(err.to_string()),
                }),
        )
        .arg(
            clap::Arg::new("threads")
                .short('t')
                .long("threads")
                .value_name("N")
                .help("chunk sorting threads (defaults to the number of CPUs)")
                .takes_value(true),
        )
        .arg(
            clap::Arg::new("log_level")
                .short('l')
                .long("loglevel")
                .help("log verbosity")
                .takes_value(true)
                .default_value("info")
                .possible_values(LogLevel::value_variants().iter().filter_map(|level| level.to_possible_value())),
        )
}

// keep in sync with `DEFAULT_CHUNK_SIZE`, clap needs a `&'static str` default
const DEFAULT_CHUNK_SIZE_STR: &str = "100000";

fn install_interrupt_handler(token: &CancellationToken) {
    let token = token.clone();
    let installed = ctrlc::set_handler(move || {
        log::warn!("interrupt received, cancelling");
        token.cancel();
    });

    if let Err(err) = installed {
        log::warn!("interrupt handler not installed: {}", err);
    }
}

fn log_progress(event: Progress) {
    match event {
        Progress::SplitStarted => log::info!("splitting input"),
        Progress::ChunkWritten { chunk, records } => log::debug!("chunk {} written ({} records)", chunk, records),
        Progress::SplitCompleted { chunks, records } => {
            log::info!("input split into {} chunks ({} records)", chunks, records)
        }
        Progress::MergeStarted { chunks } => log::info!("merging {} chunks", chunks),
        Progress::RecordsMerged(records) => log::info!("{} records merged", records),
        Progress::ChunkExhausted { chunk } => log::debug!("chunk {} merged", chunk),
        Progress::MergeCompleted { records } => log::info!("merge completed ({} records)", records),
    }
}

#[derive(Copy, Clone, clap::ArgEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <LogLevel as ArgEnum>::from_str(s, false)
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn init_logger(log_level: LogLevel) {
    env_logger::Builder::new()
        .filter_level(log_level.into())
        .format_timestamp_millis()
        .init();
}

#[cfg(test)]
mod test {
    use rstest::*;

    use super::{cli, LogLevel, DEFAULT_CHUNK_SIZE_STR};
    use record_sort::DEFAULT_CHUNK_SIZE;

    #[test]
    fn test_default_chunk_size_matches_library() {
        assert_eq!(DEFAULT_CHUNK_SIZE_STR.parse::<usize>().unwrap(), DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_cli_defaults() {
        let matches = cli().try_get_matches_from(["record-sort", "-i", "in.txt", "-o", "out.txt"]).unwrap();
        assert_eq!(matches.value_of("chunk_size"), Some(DEFAULT_CHUNK_SIZE_STR));
        assert_eq!(matches.value_of("log_level"), Some("info"));
        assert!(!matches.is_present("threads"));
        assert!(!matches.is_present("tmp_dir"));
    }

    #[rstest]
    #[case(&["record-sort", "-o", "out.txt"])]
    #[case(&["record-sort", "-i", "in.txt", "-o", "out.txt", "-c", "0"])]
    #[case(&["record-sort", "-i", "in.txt", "-o", "out.txt", "-c", "many"])]
    #[case(&["record-sort", "-i", "in.txt", "-o", "out.txt", "-l", "loud"])]
    fn test_cli_rejects(#[case] args: &[&str]) {
        assert!(cli().try_get_matches_from(args).is_err());
    }

    #[rstest]
    #[case("off", log::LevelFilter::Off)]
    #[case("warn", log::LevelFilter::Warn)]
    #[case("trace", log::LevelFilter::Trace)]
    fn test_log_level(#[case] value: &str, #[case] expected: log::LevelFilter) {
        let level: LogLevel = value.parse().unwrap();
        assert_eq!(log::LevelFilter::from(level), expected);
    }
}
