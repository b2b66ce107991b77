//! The dispatch decision procedure and extension execution

use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

use crate::domain::ExtensionName;
use crate::store::Registry;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to execute extension '{name}'")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Result of a dispatch decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The arguments target a built-in (or nothing installed matches);
    /// fall through to normal command parsing.
    NotHandled,

    /// An extension ran to completion; its exit status must become the
    /// process's own.
    Handled { exit_code: i32 },
}

/// Decides whether an invocation targets an extension and executes it.
///
/// Stateless apart from the registry reference: each dispatch decision is
/// made against the store's contents at call time.
pub struct Dispatcher<'a> {
    registry: &'a Registry,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Runs the dispatch decision procedure on the raw argument vector
    /// (program name excluded).
    pub fn dispatch(
        &self,
        builtins: &clap::Command,
        args: &[String],
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(candidate) = args.first() else {
            return Ok(DispatchOutcome::NotHandled);
        };

        // Flags such as --help or --version belong to the built-in parser.
        if candidate.starts_with('-') {
            return Ok(DispatchOutcome::NotHandled);
        }

        if resolves_to_builtin(builtins, candidate) {
            return Ok(DispatchOutcome::NotHandled);
        }

        if !self.registry.is_extension(candidate) {
            return Ok(DispatchOutcome::NotHandled);
        }

        // An uninstall racing this lookup loses the entry between the two
        // checks; treat that the same as "never installed".
        let Ok(name) = candidate.parse::<ExtensionName>() else {
            return Ok(DispatchOutcome::NotHandled);
        };
        let Ok(path) = self.registry.find(&name) else {
            return Ok(DispatchOutcome::NotHandled);
        };

        self.execute(&path, candidate, &args[1..])
    }

    /// Spawns the extension with the parent's stdio and blocks until it
    /// exits
    fn execute(
        &self,
        path: &Path,
        name: &str,
        args: &[String],
    ) -> Result<DispatchOutcome, DispatchError> {
        let status = Command::new(path)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| DispatchError::Spawn {
                name: name.to_string(),
                source: e,
            })?;

        Ok(DispatchOutcome::Handled {
            exit_code: exit_code_of(status),
        })
    }
}

/// Maps a child exit status to the code this process should exit with.
///
/// On Unix a signal-terminated child maps to `128 + signal`, the shell
/// convention scripts checking `$?` expect.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Membership test against the built-in command tree.
///
/// `find_subcommand` matches subcommand names and aliases. The implicit
/// `help` subcommand only exists after clap builds the tree, so it is
/// named explicitly; an extension can never shadow it.
fn resolves_to_builtin(builtins: &clap::Command, candidate: &str) -> bool {
    candidate == "help" || builtins.find_subcommand(candidate).is_some()
}
