//! plz - An extensible CLI tool
//!
//! plz ships a small set of built-in commands and treats any other first
//! argument as the name of an "extension": a user-installed executable in
//! `~/.plz/extensions/`, invoked transparently with the remaining arguments
//! and with its exit status propagated back to the shell. Extensions can be
//! written in any language as long as they are executable.

pub mod domain;
pub mod store;
pub mod dispatch;
pub mod cli;

pub use domain::{ExtensionName, InstalledExtension, NameError};
pub use store::{Registry, RegistryError, StorePaths};
pub use dispatch::{DispatchError, DispatchOutcome, Dispatcher};
