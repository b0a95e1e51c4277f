//! The stream operator: assembles a pipeline and drives it to completion.
//!
//! Driving is the only place records move. The operator pulls one record
//! at a time through the composed chain and discards it after logging; it
//! never collects the stream. If any stage fails, `run` returns that error
//! and dropping the chain releases every reader and writer it held.

use crate::handler::{ObserveHandler, PrependHandler, StreamHandler};
use crate::sink::{Destination, FileDestination, SinkHandler};
use crate::source::{FileSource, RecordSource};
use crate::stream::compose;
use crate::{Diagnostics, Result};
use std::path::{Path, PathBuf};

/// Settings for a file-to-file run with the default handler chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorConfig {
    /// Input text file.
    pub input: PathBuf,
    /// Output file. No sink stage is added when absent.
    pub output: Option<PathBuf>,
    /// Marker used by the prepend stage.
    pub prefix: String,
    /// Whether the diagnostic channel is enabled.
    pub log: bool,
}

impl OperatorConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            prefix: crate::handler::DEFAULT_MARKER.to_string(),
            log: true,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Diagnostic channel on stdout, enabled per `log`.
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::stdout(self.log)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Records that reached the end of the chain.
    pub records: usize,
}

/// Owns a source and an ordered handler list for one execution.
pub struct StreamOperator {
    source: Box<dyn RecordSource>,
    handlers: Vec<Box<dyn StreamHandler>>,
    diagnostics: Diagnostics,
}

impl StreamOperator {
    pub fn new(source: impl RecordSource + 'static, diagnostics: Diagnostics) -> Self {
        Self {
            source: Box::new(source),
            handlers: Vec::new(),
            diagnostics,
        }
    }

    /// Build the default chain from `config`: prepend, observe, and a
    /// file sink when an output is configured.
    pub fn from_config(config: &OperatorConfig, diagnostics: Diagnostics) -> Self {
        let source = FileSource::new(&config.input, diagnostics.clone());
        let operator = Self::new(source, diagnostics.clone())
            .with_handler(PrependHandler::with_marker(
                config.prefix.clone(),
                diagnostics.clone(),
            ))
            .with_handler(ObserveHandler::new(diagnostics));
        match &config.output {
            Some(output) => operator.with_sink(FileDestination::new(output)),
            None => operator,
        }
    }

    /// Append a handler to the end of the chain.
    pub fn with_handler(mut self, handler: impl StreamHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Append already-boxed handlers, in order.
    pub fn with_handlers<I>(mut self, handlers: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn StreamHandler>>,
    {
        self.handlers.extend(handlers);
        self
    }

    /// Append a sink stage writing to `destination`.
    pub fn with_sink(self, destination: impl Destination + 'static) -> Self {
        let sink = SinkHandler::new(destination, self.diagnostics.clone());
        self.with_handler(sink)
    }

    /// Number of stages after the source.
    pub fn stage_count(&self) -> usize {
        self.handlers.len()
    }

    /// Compose the pipeline and pull every record through it.
    pub fn run(self) -> Result<RunStats> {
        let Self {
            source,
            handlers,
            diagnostics,
        } = self;

        let location = source.location().to_string();
        tracing::info!(source = %location, stages = handlers.len(), "starting run");

        let stream = compose(source.open()?, handlers);
        let mut stats = RunStats::default();
        for item in stream {
            let record = item?;
            diagnostics.log("execute", &record);
            stats.records += 1;
        }

        tracing::info!(source = %location, records = stats.records, "run complete");
        Ok(stats)
    }
}

/// Read `source_location`, thread it through `handlers` and, if given,
/// write the result to `sink_location`.
pub fn run(
    source_location: impl AsRef<Path>,
    handlers: Vec<Box<dyn StreamHandler>>,
    sink_location: Option<&Path>,
    diagnostics: Diagnostics,
) -> Result<RunStats> {
    let operator = StreamOperator::new(
        FileSource::new(source_location, diagnostics.clone()),
        diagnostics,
    )
    .with_handlers(handlers);
    let operator = match sink_location {
        Some(path) => operator.with_sink(FileDestination::new(path)),
        None => operator,
    };
    operator.run()
}
