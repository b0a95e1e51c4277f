//! The unit of data flowing through a pipeline.

use std::fmt;

/// One line of text, with its line terminator already stripped.
///
/// The pipeline never looks inside a record. Stages that transform a
/// record emit a new one rather than editing it in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Record(String);

impl Record {
    /// Create a record from any string-like value.
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    /// Get the record content as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the record, returning its content.
    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Record {
    fn from(content: String) -> Self {
        Self(content)
    }
}

impl From<&str> for Record {
    fn from(content: &str) -> Self {
        Self(content.to_string())
    }
}

impl AsRef<str> for Record {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
