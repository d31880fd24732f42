use thiserror::Error;

use crate::model::BuildError;
use crate::parser::ParseError;

/// Result type for javamodel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types surfaced to callers of the parse and project operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Model error: {0}")]
    Build(#[from] BuildError),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// The parse error behind this error, if any
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Error::Parse(e) => Some(e),
            _ => None,
        }
    }

    /// 1-based source line for lexical/syntax failures
    pub fn line(&self) -> Option<usize> {
        self.as_parse_error().map(|e| e.line())
    }
}
