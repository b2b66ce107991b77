//! # Dispatch
//!
//! Routes an invocation to either a built-in command or an installed
//! extension. Runs once per process, on the raw argument vector, before
//! any argument parsing.
//!
//! ## Decision procedure
//!
//! ```text
//! plz <candidate> [args...]
//!  │
//!  ├─ no arguments, or candidate is a flag ──────────► NotHandled
//!  ├─ candidate matches a built-in (or alias) ───────► NotHandled
//!  ├─ candidate is not an installed extension ───────► NotHandled
//!  └─ otherwise: spawn <store>/<candidate> args...
//!       stdio inherited, blocking wait ──────────────► Handled { exit_code }
//! ```
//!
//! `NotHandled` falls through to the built-in parser, which produces its
//! own help or unknown-command error. Built-ins always take precedence
//! over an extension of the same name.
//!
//! A non-zero exit from a spawned extension is not an error: the code is
//! carried out in [`DispatchOutcome::Handled`] and becomes the process's
//! own exit status. Only a failure to start the child at all surfaces as
//! [`DispatchError`].

mod dispatcher;

pub use dispatcher::{DispatchError, DispatchOutcome, Dispatcher};
