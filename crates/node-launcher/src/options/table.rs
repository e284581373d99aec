//! # Option Table
//!
//! The parsed option set handed over by the front end. Read-only to the
//! resolvers: they only ask "was this explicitly set?" and "what is its
//! current value?".

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::container::{ConfigError, ConfigResult};
use crate::options::descriptor::{descriptor, OptionKind, OPTIONS};

/// Current value of one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionValue {
    /// Raw text as given (or the compiled-in default). `None` when the option
    /// has no default and was not supplied.
    pub raw: Option<String>,
    /// Whether the user supplied the value (command line or environment).
    pub explicit: bool,
}

/// All options with their current values.
#[derive(Debug, Clone)]
pub struct OptionTable {
    values: BTreeMap<&'static str, OptionValue>,
}

impl OptionTable {
    /// Table holding only compiled-in defaults; nothing is explicitly set.
    #[must_use]
    pub fn defaults() -> Self {
        let values = OPTIONS
            .iter()
            .map(|d| {
                let raw = match d.kind {
                    OptionKind::Bool => Some("false".to_string()),
                    _ => d.default.map(str::to_string),
                };
                (
                    d.name,
                    OptionValue {
                        raw,
                        explicit: false,
                    },
                )
            })
            .collect();
        Self { values }
    }

    /// Mark `name` as explicitly set to `value`.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> ConfigResult<()> {
        let d = descriptor(name).ok_or_else(|| ConfigError::UnknownOption(name.to_string()))?;
        self.values.insert(
            d.name,
            OptionValue {
                raw: Some(value.into()),
                explicit: true,
            },
        );
        Ok(())
    }

    /// Builder form of [`OptionTable::set`], for tests.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not in the descriptor table.
    #[cfg(any(test, feature = "test-util"))]
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        if let Err(e) = self.set(name, value) {
            panic!("{e}");
        }
        self
    }

    pub(crate) fn insert(&mut self, name: &'static str, value: OptionValue) {
        self.values.insert(name, value);
    }

    /// Whether the option was explicitly supplied by the user.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        debug_assert!(descriptor(name).is_some(), "unknown option {name}");
        self.values.get(name).is_some_and(|v| v.explicit)
    }

    /// Raw value entry of an option.
    pub fn value(&self, name: &str) -> ConfigResult<&OptionValue> {
        self.values
            .get(name)
            .ok_or_else(|| ConfigError::UnknownOption(name.to_string()))
    }

    /// Current value as text; empty when unset without default.
    pub fn string(&self, name: &str) -> ConfigResult<String> {
        Ok(self.value(name)?.raw.clone().unwrap_or_default())
    }

    pub fn int(&self, name: &str) -> ConfigResult<i64> {
        self.parsed(name, "an integer")
    }

    pub fn uint(&self, name: &str) -> ConfigResult<u64> {
        self.parsed(name, "a non-negative integer")
    }

    pub fn float(&self, name: &str) -> ConfigResult<f64> {
        self.parsed(name, "a number")
    }

    pub fn big(&self, name: &str) -> ConfigResult<u128> {
        self.parsed(name, "a non-negative integer")
    }

    pub fn bool(&self, name: &str) -> ConfigResult<bool> {
        let raw = self.string(name)?;
        match raw.trim() {
            "" | "false" | "0" => Ok(false),
            "true" | "1" => Ok(true),
            _ => Err(ConfigError::range(static_name(name)?, raw, "true or false")),
        }
    }

    pub fn duration(&self, name: &str) -> ConfigResult<Duration> {
        let option = static_name(name)?;
        let raw = self.string(name)?;
        humantime::parse_duration(raw.trim())
            .map_err(|e| ConfigError::range(option, raw.clone(), e.to_string()))
    }

    pub fn path(&self, name: &str) -> ConfigResult<PathBuf> {
        Ok(PathBuf::from(self.string(name)?))
    }

    fn parsed<T: std::str::FromStr>(&self, name: &str, expected: &str) -> ConfigResult<T> {
        let option = static_name(name)?;
        let raw = self.string(name)?;
        raw.trim()
            .parse()
            .map_err(|_| ConfigError::range(option, raw.clone(), expected))
    }
}

impl Default for OptionTable {
    fn default() -> Self {
        Self::defaults()
    }
}

fn static_name(name: &str) -> ConfigResult<&'static str> {
    descriptor(name)
        .map(|d| d.name)
        .ok_or_else(|| ConfigError::UnknownOption(name.to_string()))
}
