#![forbid(unsafe_code)]

//! Error types for configuration and selector parsing.

use thiserror::Error;

/// Result alias for configuration validation and loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Why a selector string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,

    #[error("expected a name at offset {offset}")]
    EmptyName { offset: usize },

    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("combinators are not supported (offset {offset})")]
    UnsupportedCombinator { offset: usize },

    #[error("unterminated attribute selector opened at offset {offset}")]
    UnterminatedAttribute { offset: usize },
}

impl SelectorError {
    /// Byte offset into the parsed source, if the error has one.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::Empty => None,
            Self::EmptyName { offset }
            | Self::UnexpectedChar { offset, .. }
            | Self::UnsupportedCombinator { offset }
            | Self::UnterminatedAttribute { offset } => Some(*offset),
        }
    }

    /// The same error with its offset moved `by` bytes to the right.
    #[must_use]
    pub(crate) fn shifted(mut self, by: usize) -> Self {
        match &mut self {
            Self::Empty => {}
            Self::EmptyName { offset }
            | Self::UnexpectedChar { offset, .. }
            | Self::UnsupportedCombinator { offset }
            | Self::UnterminatedAttribute { offset } => *offset += by,
        }
        self
    }
}

/// Configuration rejected by validation or loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("trailing speed must be a finite number >= 1, got {value}")]
    TrailingSpeed { value: f64 },

    #[error("{element} size must be finite and positive, got {value}")]
    ElementSize { element: &'static str, value: f64 },

    #[error("{element} border width must be finite and non-negative, got {value}")]
    BorderWidth { element: &'static str, value: f64 },

    #[error("outer scale must be finite and positive, got {value}")]
    Scale { value: f64 },

    #[error("{field} must be within [0, 1], got {value}")]
    Opacity { field: &'static str, value: f64 },

    #[error("invalid selector {selector:?}: {reason}")]
    Selector {
        selector: String,
        #[source]
        reason: SelectorError,
    },

    #[cfg(feature = "config-file")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-file")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config-file")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
