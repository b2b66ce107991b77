//! Extension management commands

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::ExtensionName;
use crate::store::Registry;

#[derive(Subcommand)]
pub enum ExtensionCommands {
    /// Install a new extension from an executable file
    #[command(
        long_about = "Install a new extension from an executable file.\n\
                      The extension can be written in any language as long as it's executable."
    )]
    Install {
        /// Path to the executable to install
        source: PathBuf,

        /// Name to install it under (defaults to the source file name)
        name: Option<String>,
    },

    /// Remove an installed extension
    Uninstall {
        /// Extension name
        name: String,
    },

    /// List installed extensions
    List,
}

pub fn run(cmd: ExtensionCommands, registry: &Registry, output: &Output) -> Result<()> {
    match cmd {
        ExtensionCommands::Install { source, name } => {
            install(registry, output, &source, name.as_deref())
        }
        ExtensionCommands::Uninstall { name } => uninstall(registry, output, &name),
        ExtensionCommands::List => list(registry, output),
    }
}

fn install(
    registry: &Registry,
    output: &Output,
    source: &Path,
    name: Option<&str>,
) -> Result<()> {
    let name = match name {
        Some(name) => ExtensionName::new(name)?,
        None => ExtensionName::from_source_path(source)?,
    };

    output.verbose_ctx(
        "install",
        &format!("Installing {} as '{}'", source.display(), name),
    );
    let installed = registry.install(source, &name)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "installed": true,
            "name": name.as_str(),
            "path": installed.display().to_string(),
        }));
    } else {
        output.success(&format!("Extension '{}' installed successfully!", name));
        println!("  You can now run it with: plz {}", name);
    }

    Ok(())
}

fn uninstall(registry: &Registry, output: &Output, name: &str) -> Result<()> {
    let name = ExtensionName::new(name)?;

    registry.uninstall(&name)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "uninstalled": true,
            "name": name.as_str(),
        }));
    } else {
        output.success(&format!("Extension '{}' uninstalled successfully!", name));
    }

    Ok(())
}

fn list(registry: &Registry, output: &Output) -> Result<()> {
    let extensions = registry.list()?;

    if output.is_json() {
        output.data(&extensions);
    } else if extensions.is_empty() {
        println!("No extensions installed.");
        println!();
        println!("To install an extension, use:");
        println!("  plz extension install <source-path> [name]");
    } else {
        println!("Installed extensions:");
        for ext in &extensions {
            println!("  {:<20} (executable, {} bytes)", ext.name, ext.size);
        }
        println!();
        println!("Run an extension with: plz <extension-name> [args...]");
    }

    Ok(())
}
