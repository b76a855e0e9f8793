//! Evaluation configuration
//!
//! Controls the default strategy used by [`Deferred::with_config`], how much
//! room the walker reserves for its frame stack up front, and whether every
//! descend/ascend step is traced.
//!
//! Configuration can be built in code, parsed from TOML, or read from the
//! environment:
//!
//! ```toml
//! [eval]
//! strategy = "lazy-unmemoized"
//! stack_capacity = 1024
//! trace_steps = true
//! ```
//!
//! | Variable                   | Field            |
//! |----------------------------|------------------|
//! | `STACKLESS_STRATEGY`       | `strategy`       |
//! | `STACKLESS_STACK_CAPACITY` | `stack_capacity` |
//! | `STACKLESS_TRACE`          | `trace_steps`    |
//!
//! [`Deferred::with_config`]: crate::eval::Deferred::with_config

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::eval::Strategy;

/// Initial capacity of the walker's frame stack
pub const DEFAULT_STACK_CAPACITY: usize = 64;

/// Environment variable selecting the default strategy
pub const ENV_STRATEGY: &str = "STACKLESS_STRATEGY";
/// Environment variable overriding the initial frame stack capacity
pub const ENV_STACK_CAPACITY: &str = "STACKLESS_STACK_CAPACITY";
/// Environment variable enabling per-step tracing
pub const ENV_TRACE: &str = "STACKLESS_TRACE";

/// Evaluation configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    /// Strategy used by wrappers built from this configuration
    pub strategy: Strategy,
    /// Frames reserved before the first descend
    pub stack_capacity: usize,
    /// Emit a `trace!` event for every descend and ascend step
    pub trace_steps: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            stack_capacity: DEFAULT_STACK_CAPACITY,
            trace_steps: false,
        }
    }
}

impl EvalConfig {
    /// Use `strategy` for wrappers built from this configuration
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Reserve `capacity` frames before walking
    pub fn with_stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = capacity;
        self
    }

    /// Create a configuration with step tracing enabled
    pub fn with_trace(mut self) -> Self {
        self.trace_steps = true;
        self
    }

    /// Parse a TOML document.
    ///
    /// Keys may sit at the top level or inside an `[eval]` table; missing
    /// keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let mut table: toml::Table = toml::from_str(source)?;
        let section = match table.remove("eval") {
            Some(toml::Value::Table(eval)) => eval,
            Some(other) => {
                return Err(ConfigError::Parse(format!(
                    "expected [eval] to be a table, found {}",
                    other.type_str()
                )))
            }
            None => table,
        };
        Ok(toml::Value::Table(section).try_into()?)
    }

    /// Read overrides from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`, starting from the defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_STRATEGY) {
            config.strategy = raw.parse()?;
        }

        if let Some(raw) = lookup(ENV_STACK_CAPACITY) {
            config.stack_capacity =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: ENV_STACK_CAPACITY.to_string(),
                        value: raw.clone(),
                    })?;
        }

        if let Some(raw) = lookup(ENV_TRACE) {
            config.trace_steps = parse_flag(ENV_TRACE, &raw)?;
        }

        Ok(config)
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
