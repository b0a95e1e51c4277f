//! Record sources: the head of every pipeline.
//!
//! A source reads its input incrementally, one line per pull, and owns the
//! underlying reader. The reader is dropped as soon as the input is
//! exhausted or a read fails, and in any case when the stream is dropped.

use crate::stream::RecordStream;
use crate::{Diagnostics, PipelineError, Record, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Something that can be opened into a lazy stream of records.
pub trait RecordSource {
    /// Human-readable location, used in diagnostics and errors.
    fn location(&self) -> &str;

    /// Acquire the input and return a stream over it.
    ///
    /// Fails with [`PipelineError::SourceUnavailable`] before yielding
    /// anything if the input cannot be opened.
    fn open(self: Box<Self>) -> Result<RecordStream>;
}

/// Reads newline-delimited records from any buffered reader.
///
/// `\n` and `\r\n` terminators are stripped; all other whitespace is kept.
pub struct LineSource<R> {
    reader: Option<R>,
    location: String,
    diagnostics: Diagnostics,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R, location: impl Into<String>, diagnostics: Diagnostics) -> Self {
        Self {
            reader: Some(reader),
            location: location.into(),
            diagnostics,
        }
    }

    fn close(&mut self) {
        if self.reader.take().is_some() {
            tracing::debug!(location = %self.location, "source closed");
        }
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                self.close();
                None
            }
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                let record = Record::from(line);
                self.diagnostics.log("source", &record);
                Some(Ok(record))
            }
            Err(e) => {
                self.close();
                Some(Err(PipelineError::source_unavailable(
                    self.location.clone(),
                    e,
                )))
            }
        }
    }
}

impl<R: BufRead + 'static> RecordSource for LineSource<R> {
    fn location(&self) -> &str {
        &self.location
    }

    fn open(self: Box<Self>) -> Result<RecordStream> {
        Ok(self)
    }
}

/// Reads records from a text file, one line at a time.
pub struct FileSource {
    path: PathBuf,
    location: String,
    diagnostics: Diagnostics,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>, diagnostics: Diagnostics) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            location: path.display().to_string(),
            path,
            diagnostics,
        }
    }
}

impl RecordSource for FileSource {
    fn location(&self) -> &str {
        &self.location
    }

    fn open(self: Box<Self>) -> Result<RecordStream> {
        let file = File::open(&self.path)
            .map_err(|e| PipelineError::source_unavailable(self.location.clone(), e))?;
        tracing::debug!(location = %self.location, "source opened");
        Ok(Box::new(LineSource::new(
            BufReader::new(file),
            self.location,
            self.diagnostics,
        )))
    }
}
