//! # lazy-pipe
//!
//! A lazily-evaluated, pull-based record streaming pipeline.
//!
//! A source produces records one at a time, a chain of handlers transforms
//! or observes each record as it passes, and an operator drives the result
//! to exhaustion. The full record set is never held in memory: each record
//! makes one trip through the whole chain before the next is read.
//!
//! ## Overview
//!
//! - **Source** ([`RecordSource`]): reads its input incrementally, one line
//!   per pull.
//! - **Handler** ([`StreamHandler`]): wraps an upstream [`RecordStream`] in
//!   a new lazy stream.
//! - **Composition** ([`compose`]): a left fold of the handler list over the
//!   source stream. Builds adapters only; no record moves.
//! - **Operator** ([`StreamOperator`]): composes the chain and pulls it dry.
//!
//! ## Example
//!
//! ```
//! use lazy_pipe::{Diagnostics, PrependHandler, Record, StreamHandler, compose, from_records};
//!
//! let source = from_records(vec![Record::new("alpha"), Record::new("beta")]);
//! let handlers: Vec<Box<dyn StreamHandler>> =
//!     vec![Box::new(PrependHandler::new(Diagnostics::disabled()))];
//!
//! let out: Vec<String> = compose(source, handlers)
//!     .map(|r| r.unwrap().into_string())
//!     .collect();
//!
//! assert_eq!(out, vec!["=== alpha", "=== beta"]);
//! ```

pub mod diagnostics;
pub mod error;
pub mod handler;
pub mod operator;
pub mod record;
pub mod sink;
pub mod source;
pub mod stream;

#[cfg(test)]
mod test_support;

pub use diagnostics::{DiagnosticLog, Diagnostics, LOG_MARKER};
pub use error::{PipelineError, Result};
pub use handler::{DEFAULT_MARKER, MapHandler, ObserveHandler, PrependHandler, StreamHandler};
pub use operator::{OperatorConfig, RunStats, StreamOperator, run};
pub use record::Record;
pub use sink::{Destination, FileDestination, SinkHandler};
pub use source::{FileSource, LineSource, RecordSource};
pub use stream::{RecordStream, compose, from_records};
