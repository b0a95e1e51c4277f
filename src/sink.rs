//! The write-to-disk stage.
//!
//! `SinkHandler` appends every record it sees to a destination and passes
//! the record on unchanged. The destination is created on the first pull,
//! so composing a pipeline never touches the output. Output written before
//! a failure is left in place.

use crate::handler::StreamHandler;
use crate::stream::RecordStream;
use crate::{Diagnostics, PipelineError, Record, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where a [`SinkHandler`] writes.
pub trait Destination {
    /// Human-readable location, used in diagnostics and errors.
    fn location(&self) -> &str;

    /// Create the destination fresh, discarding any previous content.
    fn create(&self) -> io::Result<Box<dyn Write>>;
}

/// A file, truncated on open.
#[derive(Debug, Clone)]
pub struct FileDestination {
    path: PathBuf,
    location: String,
}

impl FileDestination {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            location: path.display().to_string(),
            path,
        }
    }
}

impl Destination for FileDestination {
    fn location(&self) -> &str {
        &self.location
    }

    fn create(&self) -> io::Result<Box<dyn Write>> {
        let file = File::create(&self.path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// SINK - writes each record plus a newline, then yields it.
pub struct SinkHandler {
    destination: Box<dyn Destination>,
    diagnostics: Diagnostics,
}

impl SinkHandler {
    pub fn new(destination: impl Destination + 'static, diagnostics: Diagnostics) -> Self {
        Self {
            destination: Box::new(destination),
            diagnostics,
        }
    }

    /// Sink into a file at `path`.
    pub fn to_file(path: impl AsRef<Path>, diagnostics: Diagnostics) -> Self {
        Self::new(FileDestination::new(path), diagnostics)
    }
}

impl StreamHandler for SinkHandler {
    fn name(&self) -> &str {
        "sink"
    }

    fn handle(self: Box<Self>, upstream: RecordStream) -> RecordStream {
        Box::new(SinkStream {
            upstream,
            location: self.destination.location().to_string(),
            state: SinkState::Pending(self.destination),
            diagnostics: self.diagnostics,
        })
    }
}

enum SinkState {
    Pending(Box<dyn Destination>),
    Open(Box<dyn Write>),
    Closed,
}

struct SinkStream {
    upstream: RecordStream,
    location: String,
    state: SinkState,
    diagnostics: Diagnostics,
}

impl SinkStream {
    fn unavailable(&mut self, e: io::Error) -> PipelineError {
        self.state = SinkState::Closed;
        tracing::warn!(location = %self.location, error = %e, "sink closed after failure");
        PipelineError::sink_unavailable(self.location.clone(), e)
    }

    /// Create the destination on first use. `Ok(false)` once closed.
    fn ensure_open(&mut self) -> Result<bool> {
        if let SinkState::Pending(destination) = &self.state {
            match destination.create() {
                Ok(writer) => {
                    tracing::debug!(location = %self.location, "sink opened");
                    self.state = SinkState::Open(writer);
                }
                Err(e) => return Err(self.unavailable(e)),
            }
        }
        Ok(matches!(self.state, SinkState::Open(_)))
    }

    fn finish(&mut self) -> Result<()> {
        if let SinkState::Open(writer) = &mut self.state {
            if let Err(e) = writer.flush() {
                return Err(self.unavailable(e));
            }
            self.state = SinkState::Closed;
            tracing::debug!(location = %self.location, "sink closed");
        }
        Ok(())
    }
}

impl Iterator for SinkStream {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.ensure_open() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => return Some(Err(e)),
        }
        match self.upstream.next() {
            Some(Ok(record)) => {
                self.diagnostics.log("sink", &record);
                let written = match &mut self.state {
                    SinkState::Open(writer) => writeln!(writer, "{record}"),
                    _ => Ok(()),
                };
                match written {
                    Ok(()) => Some(Ok(record)),
                    Err(e) => Some(Err(self.unavailable(e))),
                }
            }
            Some(Err(e)) => {
                self.state = SinkState::Closed;
                Some(Err(e))
            }
            None => match self.finish() {
                Ok(()) => None,
                Err(e) => Some(Err(e)),
            },
        }
    }
}
