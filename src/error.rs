//! Error types
//!
//! The walker itself never fails: step and continuation panics unwind out of
//! the evaluation call untouched, and fallible computations carry their own
//! `Result` values (see [`crate::eval::Eval::after_ok`]). What can fail is
//! loading an [`EvalConfig`](crate::config::EvalConfig).

use std::fmt;

/// Error raised while building an evaluation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The TOML document could not be parsed or did not match the schema
    Parse(String),

    /// A strategy name that is none of the known spellings
    UnknownStrategy(String),

    /// An environment variable held a value of the wrong shape
    InvalidValue {
        /// Variable (or key) that was being read
        key: String,
        /// The offending raw value
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "Invalid evaluation config: {}", msg),
            ConfigError::UnknownStrategy(name) => write!(
                f,
                "Unknown evaluation strategy '{}' (expected eager, lazy-memoized or lazy-unmemoized)",
                name
            ),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value '{}' for {}", value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.message().to_string())
    }
}
