//! Validated extension names
//!
//! An extension name doubles as the file name of its entry inside the store
//! directory, so a name must never be able to address anything outside that
//! directory. Names are validated at construction: every store operation
//! takes an `ExtensionName`, never a raw string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("extension name cannot be empty")]
    Empty,

    #[error("extension name cannot contain path separators: '{0}'")]
    PathSeparator(String),

    #[error("'{0}' is not a valid extension name")]
    Reserved(String),
}

/// A validated extension name.
///
/// Guaranteed non-empty, free of `/` and `\`, and not `.` or `..`, so
/// joining it onto the store directory stays inside the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExtensionName(String);

impl ExtensionName {
    /// Validates and wraps a candidate name
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();

        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name.contains('/') || name.contains('\\') {
            return Err(NameError::PathSeparator(name));
        }
        if name == "." || name == ".." {
            return Err(NameError::Reserved(name));
        }

        Ok(Self(name))
    }

    /// Derives the default install name from a source path's base filename
    pub fn from_source_path(path: &Path) -> Result<Self, NameError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        Self::new(file_name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtensionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExtensionName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ExtensionName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExtensionName> for String {
    fn from(name: ExtensionName) -> Self {
        name.0
    }
}

impl AsRef<str> for ExtensionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
