//! Stream handlers: the stages of a pipeline.
//!
//! Each `StreamHandler` turns an upstream [`RecordStream`] into a new lazy
//! stream. Calling `handle` only wraps the upstream; work happens one
//! record at a time as the downstream consumer pulls. The handlers here
//! are all 1:1, but the trait does not require it.

use crate::stream::RecordStream;
use crate::{Diagnostics, PipelineError, Record, Result};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Marker placed before each record by [`PrependHandler`].
pub const DEFAULT_MARKER: &str = "=== ";

/// A pipeline stage that transforms or observes a stream of records.
pub trait StreamHandler {
    /// The stage name used in diagnostics and errors.
    fn name(&self) -> &str;

    /// Wrap `upstream` in this stage, consuming the handler.
    ///
    /// Must not pull from `upstream`; the returned stream pulls lazily.
    fn handle(self: Box<Self>, upstream: RecordStream) -> RecordStream;
}

// ---------------------------------------------------------------------------
// Handler implementations
// ---------------------------------------------------------------------------

/// PREPEND - prefixes each record with a fixed marker.
pub struct PrependHandler {
    marker: String,
    diagnostics: Diagnostics,
}

impl PrependHandler {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self::with_marker(DEFAULT_MARKER, diagnostics)
    }

    pub fn with_marker(marker: impl Into<String>, diagnostics: Diagnostics) -> Self {
        Self {
            marker: marker.into(),
            diagnostics,
        }
    }
}

impl StreamHandler for PrependHandler {
    fn name(&self) -> &str {
        "prepend"
    }

    fn handle(self: Box<Self>, upstream: RecordStream) -> RecordStream {
        let Self {
            marker,
            diagnostics,
        } = *self;
        Box::new(upstream.map(move |item| {
            let record = item?;
            diagnostics.log("prepend", &record);
            Ok(Record::new(format!("{marker}{record}")))
        }))
    }
}

/// OBSERVE - prints each record to the console and passes it through.
///
/// The print happens once per record, before the record is yielded, and
/// never for records that are not pulled.
pub struct ObserveHandler {
    console: Rc<RefCell<dyn Write>>,
    diagnostics: Diagnostics,
}

impl ObserveHandler {
    /// Observe to stdout.
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self::with_console(io::stdout(), diagnostics)
    }

    pub fn with_console(console: impl Write + 'static, diagnostics: Diagnostics) -> Self {
        let console: Rc<RefCell<dyn Write>> = Rc::new(RefCell::new(console));
        Self {
            console,
            diagnostics,
        }
    }
}

impl StreamHandler for ObserveHandler {
    fn name(&self) -> &str {
        "observe"
    }

    fn handle(self: Box<Self>, upstream: RecordStream) -> RecordStream {
        let Self {
            console,
            diagnostics,
        } = *self;
        Box::new(upstream.map(move |item| {
            let record = item?;
            diagnostics.log("observe", &record);
            writeln!(console.borrow_mut(), "{record}")
                .map_err(|e| PipelineError::stage_failure("observe", e.to_string()))?;
            Ok(record)
        }))
    }
}

/// MAP - applies a fallible function to each record.
///
/// An `Err(message)` from the function aborts the stream with
/// [`PipelineError::StageFailure`] naming this stage.
pub struct MapHandler<F> {
    name: String,
    f: F,
    diagnostics: Diagnostics,
}

impl<F> MapHandler<F>
where
    F: FnMut(Record) -> Result<Record, String> + 'static,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            diagnostics: Diagnostics::disabled(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

impl<F> StreamHandler for MapHandler<F>
where
    F: FnMut(Record) -> Result<Record, String> + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(self: Box<Self>, upstream: RecordStream) -> RecordStream {
        let Self {
            name,
            mut f,
            diagnostics,
        } = *self;
        Box::new(upstream.map(move |item| {
            let record = item?;
            diagnostics.log(&name, &record);
            f(record).map_err(|message| PipelineError::stage_failure(name.as_str(), message))
        }))
    }
}
