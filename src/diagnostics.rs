//! Diagnostic channel shared by the operator and its stages.
//!
//! When enabled, every stage writes one line per record it receives:
//!
//! ```text
//! LOG - source: alpha
//! LOG - prepend: alpha
//! LOG - observe: === alpha
//! LOG - execute: === alpha
//! ```
//!
//! The channel is configured once before a run and handed to each stage
//! explicitly. It is single-threaded: clones share one writer through an
//! `Rc<RefCell<_>>`.

use crate::Record;
use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

/// Marker placed at the start of every diagnostic line.
pub const LOG_MARKER: &str = "LOG - ";

#[derive(Clone)]
enum Channel {
    Writer(Rc<RefCell<dyn Write>>),
    Memory(DiagnosticLog),
}

/// Toggleable logging port for per-record diagnostics.
#[derive(Clone)]
pub struct Diagnostics {
    enabled: bool,
    channel: Channel,
}

impl Diagnostics {
    /// Diagnostics written to stdout.
    pub fn stdout(enabled: bool) -> Self {
        Self::to_writer(enabled, io::stdout())
    }

    /// Diagnostics written to an arbitrary writer.
    pub fn to_writer(enabled: bool, writer: impl Write + 'static) -> Self {
        let writer: Rc<RefCell<dyn Write>> = Rc::new(RefCell::new(writer));
        Self {
            enabled,
            channel: Channel::Writer(writer),
        }
    }

    /// A channel that emits nothing.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            channel: Channel::Memory(DiagnosticLog::default()),
        }
    }

    /// An enabled channel that keeps lines in memory, for inspection.
    pub fn capture() -> (Self, DiagnosticLog) {
        let log = DiagnosticLog::default();
        let diagnostics = Self {
            enabled: true,
            channel: Channel::Memory(log.clone()),
        };
        (diagnostics, log)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Emit `LOG - <stage>: <record>` if the channel is enabled.
    pub fn log(&self, stage: &str, record: &Record) {
        if !self.enabled {
            return;
        }
        let line = format!("{LOG_MARKER}{stage}: {record}");
        match &self.channel {
            Channel::Writer(writer) => {
                if let Err(e) = writeln!(writer.borrow_mut(), "{line}") {
                    tracing::warn!(error = %e, "failed to write diagnostic line");
                }
            }
            Channel::Memory(log) => log.push(line),
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channel = match self.channel {
            Channel::Writer(_) => "writer",
            Channel::Memory(_) => "memory",
        };
        f.debug_struct("Diagnostics")
            .field("enabled", &self.enabled)
            .field("channel", &channel)
            .finish()
    }
}

/// In-memory diagnostic lines captured by [`Diagnostics::capture`].
#[derive(Debug, Clone, Default)]
pub struct DiagnosticLog {
    lines: Rc<RefCell<Vec<String>>>,
}

impl DiagnosticLog {
    fn push(&self, line: String) {
        self.lines.borrow_mut().push(line);
    }

    /// Snapshot of every line logged so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }
}
