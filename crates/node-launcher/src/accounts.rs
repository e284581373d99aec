//! # Account Unlocking
//!
//! Reads the password file and pairs passwords with the accounts listed in
//! `--unlock`. Decrypting keys is the keystore's job; this module only hands
//! it the inputs.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::container::{AccountsConfig, ConfigError, ConfigResult};

/// Read a newline-delimited password file. A missing or empty path yields no
/// passwords; a read failure is fatal.
pub fn read_password_list(path: Option<&Path>) -> ConfigResult<Vec<String>> {
    let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(Vec::new());
    };
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let passwords: Vec<String> = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect();
    debug!("Read {} password lines from {}", passwords.len(), path.display());
    Ok(passwords)
}

/// Accounts to unlock with their passwords.
#[derive(Debug, Clone, Default)]
pub struct UnlockPlan {
    accounts: Vec<String>,
    passwords: Vec<String>,
}

impl UnlockPlan {
    /// Build the plan, reading the password file if one is configured.
    pub fn load(config: &AccountsConfig) -> ConfigResult<Self> {
        let passwords = read_password_list(config.password_file.as_deref())?;
        if !config.unlock.is_empty() && passwords.is_empty() {
            warn!(
                "{} account(s) listed for unlock but no password file given",
                config.unlock.len()
            );
        }
        Ok(Self {
            accounts: config.unlock.clone(),
            passwords,
        })
    }

    #[must_use]
    pub fn accounts(&self) -> &[String] {
        &self.accounts
    }

    /// Password for the account at `index`: the matching line, or the last
    /// line when the file is shorter than the account list.
    #[must_use]
    pub fn password_for(&self, index: usize) -> Option<&str> {
        self.passwords
            .get(index)
            .or_else(|| self.passwords.last())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn password_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_no_path_no_passwords() {
        assert!(read_password_list(None).unwrap().is_empty());
        assert!(read_password_list(Some(Path::new(""))).unwrap().is_empty());
    }

    #[test]
    fn test_crlf_is_normalized() {
        let file = password_file("first\r\nsecond\nthird");
        let passwords = read_password_list(Some(file.path())).unwrap();
        assert_eq!(passwords, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        let err = read_password_list(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::Io { ref path, .. } if *path == missing));
    }

    #[test]
    fn test_last_password_reused() {
        let file = password_file("a\nb");
        let plan = UnlockPlan::load(&AccountsConfig {
            unlock: vec!["0".into(), "1".into(), "2".into()],
            password_file: Some(PathBuf::from(file.path())),
        })
        .unwrap();
        assert_eq!(plan.accounts().len(), 3);
        assert_eq!(plan.password_for(0), Some("a"));
        assert_eq!(plan.password_for(1), Some("b"));
        assert_eq!(plan.password_for(2), Some("b"));
    }

    #[test]
    fn test_no_passwords() {
        let plan = UnlockPlan::load(&AccountsConfig {
            unlock: vec!["0".into()],
            password_file: None,
        })
        .unwrap();
        assert_eq!(plan.password_for(0), None);
    }
}
