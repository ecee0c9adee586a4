//! Temporary chunk files.

use std::fs;
use std::io;
use std::path::Path;

use log;
use tempfile;

use crate::record::Record;
use crate::sort::SortError;
use crate::stream::{RecordReader, RecordWriter, TextRecordReader, TextRecordWriter};

/// A sorted run of records stored in a temporary file.
///
/// The backing file is removed when the chunk is released through [`ExternalChunk::remove`]
/// or, on any other exit path, when the chunk is dropped. The read handle is always closed
/// before the file is removed.
pub struct ExternalChunk {
    index: usize,
    records: usize,
    buf_size: Option<usize>,
    path: Option<tempfile::TempPath>,
    reader: Option<TextRecordReader<io::BufReader<fs::File>>>,
}

impl ExternalChunk {
    /// Writes `items` to a new uniquely named file in `dir`.
    /// Items must already be sorted. If writing fails the file is removed before the error is returned.
    pub fn build<'a>(
        dir: &Path,
        index: usize,
        items: impl IntoIterator<Item = &'a Record>,
        buf_size: Option<usize>,
    ) -> Result<Self, SortError> {
        let tmp_file = tempfile::Builder::new()
            .prefix("chunk-")
            .suffix(".txt")
            .tempfile_in(dir)
            .map_err(SortError::TempDir)?;

        let mut records = 0;
        {
            let file_writer = match buf_size {
                Some(buf_size) => io::BufWriter::with_capacity(buf_size, tmp_file.as_file()),
                None => io::BufWriter::new(tmp_file.as_file()),
            };
            let mut chunk_writer = TextRecordWriter::new(file_writer);
            for item in items {
                chunk_writer.write_next(item)?;
                records += 1;
            }
            chunk_writer.flush()?;
        }

        let path = tmp_file.into_temp_path();
        log::debug!("chunk {} saved to {} ({} records)", index, path.display(), records);

        return Ok(ExternalChunk {
            index,
            records,
            buf_size,
            path: Some(path),
            reader: None,
        });
    }

    /// Chunk sequence number within a sort run.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of records written to the chunk.
    pub fn len(&self) -> usize {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Backing file path, `None` once the file has been removed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Opens the backing file for reading. Subsequent calls are no-ops.
    pub fn open(&mut self) -> Result<(), SortError> {
        if self.reader.is_some() {
            return Ok(());
        }

        let path = self
            .path
            .as_deref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "chunk file already removed"))?;
        self.reader = Some(TextRecordReader::open(path, self.buf_size)?);

        return Ok(());
    }

    /// Closes the read handle and removes the backing file.
    pub fn remove(mut self) -> io::Result<()> {
        self.delete()
    }

    fn delete(&mut self) -> io::Result<()> {
        self.reader = None;

        match self.path.take() {
            Some(path) => {
                log::debug!("removing chunk {} file {}", self.index, path.display());
                path.close()
            }
            None => Ok(()),
        }
    }
}

impl RecordReader for ExternalChunk {
    fn read_next(&mut self) -> Result<Option<Record>, SortError> {
        self.open()?;
        match self.reader.as_mut() {
            Some(reader) => reader.read_next(),
            None => Ok(None),
        }
    }

    fn is_exhausted(&self) -> bool {
        match &self.reader {
            Some(reader) => reader.is_exhausted(),
            None => self.path.is_none(),
        }
    }
}

impl Drop for ExternalChunk {
    fn drop(&mut self) {
        if let Err(err) = self.delete() {
            log::warn!("chunk {} file not removed: {}", self.index, err);
        }
    }
}
