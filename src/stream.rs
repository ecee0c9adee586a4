//! Sequential record readers and writers.
//!
//! Source, chunk and destination streams share the same capability set and are used
//! through the [`RecordReader`] and [`RecordWriter`] traits. Two implementations are
//! provided: text backed ([`TextRecordReader`], [`TextRecordWriter`]) and in-memory
//! ([`MemoryRecordReader`], [`MemoryRecordWriter`]).

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::Path;

use crate::record::Record;
use crate::sort::SortError;

/// Forward-only record producer.
pub trait RecordReader {
    /// Reads the next record. Returns `Ok(None)` once the stream is exhausted.
    /// A malformed line aborts reading with [`SortError::Malformed`].
    fn read_next(&mut self) -> Result<Option<Record>, SortError>;

    /// Checks whether the end of the stream has been reached.
    fn is_exhausted(&self) -> bool;
}

/// Forward-only record consumer.
pub trait RecordWriter {
    /// Writes a complete record.
    fn write_next(&mut self, record: &Record) -> Result<(), SortError>;

    /// Flushes buffered data to the underlying sink.
    fn flush(&mut self) -> Result<(), SortError>;
}

impl<R: RecordReader + ?Sized> RecordReader for &mut R {
    fn read_next(&mut self) -> Result<Option<Record>, SortError> {
        (**self).read_next()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }
}

impl<W: RecordWriter + ?Sized> RecordWriter for &mut W {
    fn write_next(&mut self, record: &Record) -> Result<(), SortError> {
        (**self).write_next(record)
    }

    fn flush(&mut self) -> Result<(), SortError> {
        (**self).flush()
    }
}

/// Line oriented record reader, one `<numeric>. <text>` record per line.
pub struct TextRecordReader<R: BufRead> {
    reader: R,
    line_buf: String,
    line_number: u64,
    exhausted: bool,
}

impl<R: BufRead> TextRecordReader<R> {
    pub fn new(reader: R) -> Self {
        TextRecordReader {
            reader,
            line_buf: String::new(),
            line_number: 0,
            exhausted: false,
        }
    }

    /// Number of lines read so far.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }
}

impl TextRecordReader<io::BufReader<fs::File>> {
    /// Opens a file for reading.
    pub fn open(path: &Path, buf_size: Option<usize>) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        let reader = match buf_size {
            Some(buf_size) => io::BufReader::with_capacity(buf_size, file),
            None => io::BufReader::new(file),
        };

        return Ok(TextRecordReader::new(reader));
    }
}

impl<R: BufRead> RecordReader for TextRecordReader<R> {
    fn read_next(&mut self) -> Result<Option<Record>, SortError> {
        if self.exhausted {
            return Ok(None);
        }

        self.line_buf.clear();
        if self.reader.read_line(&mut self.line_buf)? == 0 {
            self.exhausted = true;
            return Ok(None);
        }
        self.line_number += 1;

        let mut line = self.line_buf.as_str();
        if let Some(stripped) = line.strip_suffix('\n') {
            line = stripped.strip_suffix('\r').unwrap_or(stripped);
        }

        let record = Record::parse(line).map_err(|err| err.at_line(self.line_number))?;

        return Ok(Some(record));
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// Line oriented record writer. Every record is terminated by `\n`.
pub struct TextRecordWriter<W: Write> {
    writer: W,
    line_buf: String,
}

impl<W: Write> TextRecordWriter<W> {
    pub fn new(writer: W) -> Self {
        TextRecordWriter {
            writer,
            line_buf: String::new(),
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(mut self) -> Result<W, SortError> {
        self.writer.flush()?;
        return Ok(self.writer);
    }
}

impl TextRecordWriter<io::BufWriter<fs::File>> {
    /// Creates (or truncates) a file for writing.
    pub fn create(path: &Path, buf_size: Option<usize>) -> io::Result<Self> {
        let file = fs::File::create(path)?;
        let writer = match buf_size {
            Some(buf_size) => io::BufWriter::with_capacity(buf_size, file),
            None => io::BufWriter::new(file),
        };

        return Ok(TextRecordWriter::new(writer));
    }
}

impl<W: Write> RecordWriter for TextRecordWriter<W> {
    fn write_next(&mut self, record: &Record) -> Result<(), SortError> {
        use std::fmt::Write as _;

        self.line_buf.clear();
        // writing into a String cannot fail
        let _ = writeln!(self.line_buf, "{}", record);
        self.writer.write_all(self.line_buf.as_bytes())?;

        return Ok(());
    }

    fn flush(&mut self) -> Result<(), SortError> {
        self.writer.flush()?;
        return Ok(());
    }
}

/// In-memory record reader.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordReader {
    records: VecDeque<Record>,
    exhausted: bool,
}

impl MemoryRecordReader {
    pub fn new(records: impl IntoIterator<Item = Record>) -> Self {
        MemoryRecordReader {
            records: records.into_iter().collect(),
            exhausted: false,
        }
    }

    /// Builds a reader from serialized lines, failing on the first malformed one.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self, SortError> {
        let mut records = VecDeque::new();
        for (idx, line) in lines.into_iter().enumerate() {
            records.push_back(Record::parse(line).map_err(|err| err.at_line(idx as u64 + 1))?);
        }

        return Ok(MemoryRecordReader {
            records,
            exhausted: false,
        });
    }

    /// Number of records not read yet.
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl RecordReader for MemoryRecordReader {
    fn read_next(&mut self) -> Result<Option<Record>, SortError> {
        let next = self.records.pop_front();
        if next.is_none() {
            self.exhausted = true;
        }

        return Ok(next);
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// In-memory record writer.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordWriter {
    records: Vec<Record>,
}

impl MemoryRecordWriter {
    pub fn new() -> Self {
        MemoryRecordWriter::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Returns the serialized form of every written record.
    pub fn lines(&self) -> Vec<String> {
        self.records.iter().map(Record::serialize).collect()
    }
}

impl RecordWriter for MemoryRecordWriter {
    fn write_next(&mut self, record: &Record) -> Result<(), SortError> {
        self.records.push(record.clone());
        return Ok(());
    }

    fn flush(&mut self) -> Result<(), SortError> {
        Ok(())
    }
}
