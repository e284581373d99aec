//! # Configuration Errors
//!
//! Every error raised while turning the option table into a `NodeConfig`.
//! All of them are fatal: the launcher never starts a partially configured
//! node.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration resolution errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two or more options of one mutual-exclusion group were set.
    #[error("flags {} can't be used at the same time", .flags.join(", "))]
    MutualExclusion {
        /// Conflicting flags, rendered as `--flag` or `--flag=value`.
        flags: Vec<String>,
    },

    /// A value outside its declared legal set or interval.
    #[error("option --{option}: invalid value {value:?} (expected {expected})")]
    Range {
        option: &'static str,
        value: String,
        expected: String,
    },

    /// Lookup of an option that is not in the descriptor table.
    #[error("unknown option {0:?}")]
    UnknownOption(String),

    /// No data directory was given and none could be derived.
    #[error("cannot determine default data directory, please set manually (--datadir)")]
    MissingDataDir,

    /// Reading an input file (password file) failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn range(
        option: &'static str,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::Range {
            option,
            value: value.into(),
            expected: expected.into(),
        }
    }
}

/// Result type for configuration resolution.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutual_exclusion_message_names_every_flag() {
        let err = ConfigError::MutualExclusion {
            flags: vec!["--lightserv".to_string(), "--syncmode=light".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "flags --lightserv, --syncmode=light can't be used at the same time"
        );
    }

    #[test]
    fn test_range_message() {
        let err = ConfigError::range("syncmode", "turbo", "one of full, fast, light");
        let msg = err.to_string();
        assert!(msg.contains("--syncmode"));
        assert!(msg.contains("\"turbo\""));
    }
}
