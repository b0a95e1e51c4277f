//! Lazy record streams and their composition.
//!
//! A [`RecordStream`] is a boxed pull iterator: nothing happens until a
//! consumer calls `next()`, which in turn pulls from upstream. Composing a
//! pipeline is a left fold over the handler list with the source stream as
//! the seed, so building the chain costs one boxed adapter per handler and
//! never touches a record.

use crate::handler::StreamHandler;
use crate::{Record, Result};

/// A lazy, forward-only, single-pass sequence of records.
///
/// An `Err` item aborts the run.
pub type RecordStream = Box<dyn Iterator<Item = Result<Record>>>;

/// Thread `source` through each handler in order.
///
/// Handler `i`'s output becomes handler `i + 1`'s input. With no handlers
/// the source is returned as-is.
pub fn compose<I>(source: RecordStream, handlers: I) -> RecordStream
where
    I: IntoIterator<Item = Box<dyn StreamHandler>>,
{
    handlers.into_iter().fold(source, |stream, handler| {
        tracing::debug!(stage = handler.name(), "composing stage");
        handler.handle(stream)
    })
}

/// Wrap an in-memory iterator of records as a stream.
pub fn from_records<I>(records: I) -> RecordStream
where
    I: IntoIterator<Item = Record>,
    I::IntoIter: 'static,
{
    Box::new(records.into_iter().map(Ok))
}
