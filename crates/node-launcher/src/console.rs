//! Console preload script resolution.

use std::path::{Path, PathBuf};

use crate::container::config::absolute_or_join;
use crate::validation::split_and_trim;

/// Resolve a comma-separated preload list against `root`. Absolute entries
/// are kept as given.
#[must_use]
pub fn resolve_preloads(root: &Path, list: &str) -> Vec<PathBuf> {
    split_and_trim(list)
        .into_iter()
        .map(|entry| absolute_or_join(root, Path::new(&entry)))
        .collect()
}
