//! Store location resolution
//!
//! The store lives at `~/.plz/extensions`. Resolution happens once at
//! startup; the resolved paths are passed into [`crate::store::Registry`]
//! so operations never read ambient environment state themselves.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::domain::ExtensionName;

/// Resolved filesystem locations for the extension store
#[derive(Debug, Clone)]
pub struct StorePaths {
    extensions_dir: PathBuf,
}

impl StorePaths {
    /// Resolves the store under the user's home directory.
    ///
    /// Falls back to the current working directory when home cannot be
    /// determined. The fallback is surprising but matches the behavior
    /// existing installs rely on.
    pub fn resolve() -> Self {
        let base = BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        Self::under(base)
    }

    /// Places the store under an explicit base directory
    pub fn under(base: impl Into<PathBuf>) -> Self {
        Self {
            extensions_dir: base.into().join(".plz").join("extensions"),
        }
    }

    /// Returns the extensions directory
    pub fn extensions_dir(&self) -> &Path {
        &self.extensions_dir
    }

    /// Returns the entry path for a validated extension name
    pub fn entry_path(&self, name: &ExtensionName) -> PathBuf {
        self.extensions_dir.join(name.as_str())
    }
}
