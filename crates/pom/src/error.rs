use std::fmt::Display;

use thiserror::Error;

/// Failure while reading or re-serializing a project descriptor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PomError {
    /// The input is not a well-formed XML document with exactly one root element
    #[error("XML parsing error at position {position}: {message}")]
    Parse { position: u64, message: String },

    #[error("XML serialization error: {0}")]
    Serialize(String),
}

impl PomError {
    pub(crate) fn parse(position: u64, message: impl Display) -> Self {
        Self::Parse {
            position,
            message: message.to_string(),
        }
    }

    pub(crate) fn serialize(err: impl Display) -> Self {
        Self::Serialize(err.to_string())
    }

    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
