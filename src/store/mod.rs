//! # Extension Store
//!
//! Persistence layer for installed extensions.
//!
//! ## Layout
//!
//! ```text
//! ~/.plz/extensions/
//! ├── git-status        # one file per extension, named after it
//! └── deploy
//! ```
//!
//! The store directory is created lazily on the first install and is the
//! only state plz persists. An entry counts as installed when it is a
//! regular file with at least one execute bit set; anything else in the
//! directory is invisible to listing and dispatch.
//!
//! ## Concurrency
//!
//! The store is not locked. Concurrent installs are last-writer-wins, and a
//! list racing an uninstall may or may not observe the removed entry. This
//! is a documented limitation of the filesystem-as-database approach.
//!
//! ## Key Types
//!
//! - [`StorePaths`] - Resolved store location, computed once at startup
//! - [`Registry`] - Install, uninstall, list and lookup operations

mod paths;
mod registry;

pub use paths::StorePaths;
pub use registry::{Registry, RegistryError};
