//! Entry point for the assetman command line interface.

use std::path::{
    Path,
    PathBuf,
};

use anyhow::Context;
use assetman::build;
use assetman::config::ConfigManager;
use assetman::registry::PackageRegistry;
use clap::{
    Parser,
    Subcommand,
};

/// Asset and translation manager for package-based web sites.
#[derive(Parser, Debug)]
#[command(name = "assetman", version, about)]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Compile the translation catalog for configured packages.
    Build {
        /// Workspace root holding `.assetman.json`.
        #[arg(long, default_value = ".")]
        workspace: PathBuf,

        /// Output file for the compiled catalog.
        /// Defaults to `assets/assetman/translations.json` under the workspace.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Packages to compile; all configured packages when empty.
        packages: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();

    match cli.command {
        Command::Build { workspace, out, packages } => build_command(&workspace, out, &packages),
    }
}

/// Load settings, register the requested packages and write the catalog.
fn build_command(
    workspace: &Path,
    out: Option<PathBuf>,
    only: &[String],
) -> anyhow::Result<()> {
    let mut config = ConfigManager::new();
    config
        .load_settings(Some(workspace.to_path_buf()))
        .context("Failed to load workspace settings")?;
    let settings = config.get_settings().clone();

    let mut registry = PackageRegistry::new();
    for entry in &settings.packages {
        if !only.is_empty() && !only.contains(&entry.name) {
            continue;
        }
        registry
            .register(&entry.name, &workspace.join(&entry.assets_dir))
            .with_context(|| format!("Failed to register package '{}'", entry.name))?;
    }

    let table = build::compile(&registry, &settings)?;
    let out = out.unwrap_or_else(|| {
        workspace.join("assets").join("assetman").join("translations.json")
    });
    build::write(&table, &out)?;
    tracing::info!(path = %out.display(), "Translation catalog written");

    Ok(())
}
