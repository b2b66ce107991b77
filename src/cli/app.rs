//! Main CLI application structure

use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use super::extension_cmd;
use super::output::{Output, OutputFormat};
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::store::{Registry, StorePaths};

#[derive(Parser)]
#[command(name = "plz")]
#[command(author, version, about = "An extensible CLI tool")]
#[command(
    long_about = "plz is a CLI app that can be extended with external executable files.\n\
                  Extensions can be written in any language as long as they are executable."
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage plz extensions
    #[command(subcommand, alias = "ext")]
    Extension(extension_cmd::ExtensionCommands),
}

/// Main entry point for the CLI.
///
/// The dispatcher sees the raw arguments before clap does, so an unknown
/// first token can reach an installed extension unchanged. The returned
/// code is the one `main` exits with; nothing below this function
/// terminates the process.
pub fn run() -> Result<ExitCode> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let registry = Registry::new(StorePaths::resolve());
    let dispatcher = Dispatcher::new(&registry);

    match dispatcher.dispatch(&Cli::command(), &args)? {
        DispatchOutcome::Handled { exit_code } => {
            return Ok(ExitCode::from(clamp_exit_code(exit_code)))
        }
        DispatchOutcome::NotHandled => {}
    }

    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("plz starting");
    output.verbose_ctx("store", &registry.store_dir().display().to_string());

    match cli.command {
        Commands::Extension(cmd) => extension_cmd::run(cmd, &registry, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(ExitCode::SUCCESS)
}

/// Clamps a child exit code to the 0-255 range a process can exit with
fn clamp_exit_code(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}
