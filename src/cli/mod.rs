//! CLI command definitions for projconf
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod export;
pub mod list;

use crate::config::{
    DEFAULT_FILE_NAME, DEFAULT_PUBLIC_PATTERN, Defaults, ENV_VAR, LoadOptions, PROJECT_VAR,
    ProjectFilter,
};
use crate::format::{BuiltinReader, Format, FormatReader};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use export::ExportArgs;
use list::ListArgs;
use std::path::Path;

/// Discover and merge per-project, per-environment configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path pattern matching the public config directories
    #[arg(short, long, default_value = DEFAULT_PUBLIC_PATTERN, global = true)]
    pub public: String,

    /// Path pattern matching optional local override directories
    #[arg(short = 'L', long, global = true)]
    pub local: Option<String>,

    /// Target environment (defaults to the default file name)
    #[arg(short, long, env = ENV_VAR, global = true)]
    pub env: Option<String>,

    /// Only keep this project ('*' for all)
    #[arg(short = 'P', long, env = PROJECT_VAR, global = true)]
    pub project: Option<String>,

    /// File name (without extension) of each project's default config
    #[arg(long, default_value = DEFAULT_FILE_NAME, global = true)]
    pub default_file_name: String,

    /// Config file whose contents are the scaffold for every project
    #[arg(long, value_name = "FILE", global = true)]
    pub defaults: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write resolved configuration as JSON
    Export(ExportArgs),

    /// Print each project's configuration (or a section of it)
    List(ListArgs),
}

impl Cli {
    /// Load options described by the global flags.
    pub fn load_options(&self) -> Result<LoadOptions> {
        let mut options = LoadOptions::new()
            .with_public(&self.public)
            .with_default_file_name(&self.default_file_name)
            .with_project(self.project_filter());

        if let Some(ref local) = self.local {
            options = options.with_local(local);
        }
        if let Some(ref env) = self.env {
            options = options.with_env(env);
        }
        if let Some(ref path) = self.defaults {
            options = options.with_defaults(read_defaults_file(Path::new(path))?);
        }
        Ok(options)
    }

    pub fn project_filter(&self) -> ProjectFilter {
        ProjectFilter::from_option(self.project.as_deref())
    }
}

/// Read a static scaffold from any supported config file.
fn read_defaults_file(path: &Path) -> Result<Defaults> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let Some(format) = Format::from_extension(ext) else {
        bail!("Unsupported defaults file format: {}", path.display());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read defaults file {}", path.display()))?;
    match BuiltinReader.parse(&text, format)? {
        Some(value) => Ok(Defaults::Value(value)),
        None => bail!("No reader available for {} files", format),
    }
}
