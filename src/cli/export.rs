//! Export subcommand for projconf CLI
//!
//! Writes the resolved configuration as pretty-printed JSON, either into a
//! directory tree or to stdout.

use crate::config::{ConfigSet, ProjectFilter, Section};
use crate::export::{
    DEFAULT_ARTIFACT_NAME, DEFAULT_STRINGIFY_SPACE, DirSink, ExportOptions, Sink, WriterSink,
    export,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the export subcommand
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output directory (default: stdout)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Artifact file name
    #[arg(short, long, default_value = DEFAULT_ARTIFACT_NAME)]
    pub name: String,

    /// Indentation width of the JSON output
    #[arg(long, default_value_t = DEFAULT_STRINGIFY_SPACE)]
    pub space: usize,

    /// Only export this section of each project (e.g. `db.host`)
    #[arg(short, long, value_name = "PATH")]
    pub section: Option<String>,

    /// Write one artifact per project even when no project is selected
    #[arg(long)]
    pub split: bool,
}

impl ExportArgs {
    pub fn export_options(&self, project: ProjectFilter) -> ExportOptions {
        ExportOptions {
            name: self.name.clone(),
            stringify_space: self.space,
            section: self.section.as_deref().map(Section::parse),
            project,
            split: self.split,
        }
    }
}

/// Export `set` according to `args`. Returns the number of artifacts.
pub fn run(set: &ConfigSet, args: &ExportArgs, project: ProjectFilter) -> Result<usize> {
    let options = args.export_options(project);
    let mut sink: Box<dyn Sink> = match args.out {
        Some(ref dir) => Box::new(DirSink::new(dir)),
        None => Box::new(WriterSink::new(std::io::stdout().lock())),
    };
    Ok(export(set, &options, sink.as_mut())?)
}
