use std::fs;
use std::path::{Path, PathBuf};

use cdnstrip_common::error::StripError;
use cdnstrip_common::debug;
use cdnstrip_common::network::range::RangeSet;

/// Newline-separated range literals on disk.
#[derive(Debug, Clone)]
pub struct RangeCache {
    path: PathBuf,
}

impl RangeCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cache. Missing, unreadable or empty caches are all `None`.
    ///
    /// Lines that are not valid range literals are skipped.
    pub fn load(&self) -> Option<RangeSet> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("no usable range cache at {}: {e}", self.path.display());
                return None;
            }
        };

        let set = RangeSet::from_literals(content.lines());
        if set.is_empty() {
            debug!("range cache {} holds no valid ranges", self.path.display());
            return None;
        }
        Some(set)
    }

    /// Replaces the cache with `set`, creating the parent directory if needed.
    pub fn persist(&self, set: &RangeSet) -> Result<(), StripError> {
        let cache_err = |source| StripError::Cache {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(cache_err)?;
            }
        }

        let body = set.literals().collect::<Vec<_>>().join("\n");
        fs::write(&self.path, body).map_err(cache_err)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
