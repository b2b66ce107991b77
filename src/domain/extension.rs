//! Metadata for installed extensions

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// A store entry that satisfies the installed-extension invariant:
/// a regular file with at least one execute bit set.
#[derive(Debug, Clone, Serialize)]
pub struct InstalledExtension {
    /// Invocation name (equals the file name inside the store)
    pub name: String,

    /// Absolute path of the entry
    pub path: PathBuf,

    /// Size in bytes
    pub size: u64,

    /// Last modification time, when the filesystem reports one
    pub modified: Option<DateTime<Utc>>,
}
