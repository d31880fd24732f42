use thiserror::Error;

use super::span::Location;

/// Coarse classification of a parse failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or unterminated literal or comment
    Lexical,
    /// Token sequence matches no production
    Syntax,
    /// Recognized construct outside the supported subset
    UnsupportedConstruct,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Lexical error at {location}: {message}")]
    Lexical { message: String, location: Location },

    #[error("Parse error at {location}: expected {expected}, found {found}")]
    Syntax {
        expected: String,
        found: String,
        location: Location,
    },

    #[error("Parse error at {location}: unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { expected: String, location: Location },

    #[error("Unsupported construct at {location}: {message}")]
    UnsupportedConstruct { message: String, location: Location },
}

impl ParseError {
    pub fn lexical(message: impl Into<String>, location: Location) -> Self {
        ParseError::Lexical {
            message: message.into(),
            location,
        }
    }

    pub fn syntax(expected: impl Into<String>, found: impl Into<String>, location: Location) -> Self {
        ParseError::Syntax {
            expected: expected.into(),
            found: found.into(),
            location,
        }
    }

    pub fn unexpected_end_of_input(expected: impl Into<String>, location: Location) -> Self {
        ParseError::UnexpectedEndOfInput {
            expected: expected.into(),
            location,
        }
    }

    pub fn unsupported(message: impl Into<String>, location: Location) -> Self {
        ParseError::UnsupportedConstruct {
            message: message.into(),
            location,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Lexical { .. } => ErrorKind::Lexical,
            ParseError::Syntax { .. } | ParseError::UnexpectedEndOfInput { .. } => ErrorKind::Syntax,
            ParseError::UnsupportedConstruct { .. } => ErrorKind::UnsupportedConstruct,
        }
    }

    pub fn location(&self) -> Location {
        match self {
            ParseError::Lexical { location, .. }
            | ParseError::Syntax { location, .. }
            | ParseError::UnexpectedEndOfInput { location, .. }
            | ParseError::UnsupportedConstruct { location, .. } => *location,
        }
    }

    /// 1-based line of the offending token
    pub fn line(&self) -> usize {
        self.location().line
    }

    /// Whether the parser may skip past this error and continue the unit
    pub fn is_recoverable(&self) -> bool {
        match self {
            ParseError::Lexical { .. } => false,
            ParseError::UnexpectedEndOfInput { .. } => false,
            ParseError::Syntax { .. } | ParseError::UnsupportedConstruct { .. } => true,
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Error recovery context
#[derive(Debug)]
pub struct ErrorRecovery {
    /// Whether to continue parsing after errors
    pub continue_on_error: bool,
    /// Maximum number of errors to collect before giving up
    pub max_errors: usize,
    /// Collected errors
    pub errors: Vec<ParseError>,
}

impl ErrorRecovery {
    pub fn new(continue_on_error: bool, max_errors: usize) -> Self {
        Self {
            continue_on_error,
            max_errors,
            errors: Vec::new(),
        }
    }

    /// Record an error; `false` once the error budget is spent
    pub fn add_error(&mut self, error: ParseError) -> bool {
        if self.errors.len() >= self.max_errors {
            return false;
        }
        self.errors.push(error);
        true
    }

    /// Whether parsing may go on after `error`
    pub fn can_recover(&self, error: &ParseError) -> bool {
        self.continue_on_error && error.is_recoverable() && self.errors.len() < self.max_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_and_lines() {
        let at = Location::new(3, 7, 40);
        assert_eq!(ParseError::lexical("bad", at).kind(), ErrorKind::Lexical);
        assert_eq!(ParseError::syntax("';'", "'}'", at).kind(), ErrorKind::Syntax);
        assert_eq!(ParseError::unexpected_end_of_input("'}'", at).kind(), ErrorKind::Syntax);
        assert_eq!(ParseError::unsupported("'-' operator", at).kind(), ErrorKind::UnsupportedConstruct);
        assert_eq!(ParseError::syntax("a", "b", at).line(), 3);
        assert_eq!(
            ParseError::syntax("';'", "'}'", at).to_string(),
            "Parse error at 3:7: expected ';', found '}'"
        );
    }

    #[test]
    fn test_recovery_budget() {
        let at = Location::start();
        let mut recovery = ErrorRecovery::new(true, 1);
        let syntax = ParseError::syntax("x", "y", at);
        assert!(recovery.can_recover(&syntax));
        assert!(recovery.add_error(syntax.clone()));
        assert!(!recovery.can_recover(&syntax));
        assert!(!recovery.add_error(syntax));
        assert!(!ErrorRecovery::new(true, 5).can_recover(&ParseError::lexical("x", at)));
    }
}
