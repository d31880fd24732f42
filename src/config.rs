//! Parser configuration.
//!
//! Defaults suit most callers; `Config::from_env` lets test harnesses and
//! tools flip the recovery policy or debug tracing without code changes.

use crate::consts::{DEFAULT_MAX_ERRORS, DEFAULT_MAX_NESTING_DEPTH};
use crate::error::{Error, Result};

/// What the grammar parser does after a syntax error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryPolicy {
    /// The first error aborts the unit; nothing is produced
    Abort,
    /// Skip the failing declaration, record a diagnostic, keep going
    #[default]
    SkipDeclaration,
}

impl std::str::FromStr for RecoveryPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(RecoveryPolicy::Abort),
            "skip" | "skip-declaration" => Ok(RecoveryPolicy::SkipDeclaration),
            other => Err(Error::config_error(format!("unknown recovery policy '{}'", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub recovery: RecoveryPolicy,
    /// Diagnostics collected before the unit is abandoned
    pub max_errors: usize,
    /// Depth bound for annotation values, type arguments and member types
    pub max_nesting_depth: usize,
    /// Trace every token produced by the lexer
    pub debug_lexer: bool,
    /// Trace every declaration recognized by the parser
    pub debug_parser: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recovery: RecoveryPolicy::default(),
            max_errors: DEFAULT_MAX_ERRORS,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            debug_lexer: false,
            debug_parser: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from `JAVAMODEL_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(policy) = lookup("JAVAMODEL_RECOVERY") {
            config.recovery = policy.parse()?;
        }
        if let Some(depth) = lookup("JAVAMODEL_MAX_DEPTH") {
            config.max_nesting_depth = parse_count("JAVAMODEL_MAX_DEPTH", &depth)?;
        }
        if let Some(errors) = lookup("JAVAMODEL_MAX_ERRORS") {
            config.max_errors = parse_count("JAVAMODEL_MAX_ERRORS", &errors)?;
        }
        if let Some(debug) = lookup("JAVAMODEL_DEBUG") {
            for flag in debug.split(',').map(str::trim).filter(|f| !f.is_empty()) {
                match flag {
                    "lexer" => config.debug_lexer = true,
                    "parser" => config.debug_parser = true,
                    "all" => {
                        config.debug_lexer = true;
                        config.debug_parser = true;
                    }
                    other => {
                        return Err(Error::config_error(format!("unknown debug flag '{}'", other)));
                    }
                }
            }
        }

        Ok(config)
    }

    pub fn with_recovery(mut self, recovery: RecoveryPolicy) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_debug(mut self, lexer: bool, parser: bool) -> Self {
        self.debug_lexer = lexer;
        self.debug_parser = parser;
        self
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::config_error(format!("{} must be a positive integer, got '{}'", key, value))),
    }
}
