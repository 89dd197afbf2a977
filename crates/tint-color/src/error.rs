//! Error types for color parsing.

use thiserror::Error;

/// Errors returned when a color string cannot be turned into a [`Color`].
///
/// [`Color`]: crate::Color
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The notation is not one this crate understands.
    #[error("unsupported color format \"{input}\": {reason}")]
    UnsupportedFormat {
        /// The offending input, trimmed.
        input: String,
        reason: &'static str,
    },

    /// The notation is known but its payload is not valid.
    #[error("malformed color \"{input}\": {reason}")]
    MalformedColor {
        /// The offending input, trimmed.
        input: String,
        reason: String,
    },
}

impl ParseError {
    pub(crate) fn unsupported(input: &str, reason: &'static str) -> Self {
        Self::UnsupportedFormat {
            input: input.to_owned(),
            reason,
        }
    }

    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedColor {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }

    /// The input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::UnsupportedFormat { input, .. } | Self::MalformedColor { input, .. } => input,
        }
    }
}
