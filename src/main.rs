//! projconf
//!
//! Resolves per-project, per-environment configuration trees and exports
//! the result for downstream build tasks.

use anyhow::Result;
use clap::Parser;
use projconf::cli::{Cli, Command, export, list};
use projconf::config::ConfigLoader;
use projconf::logging::{self, LogTarget};
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let options = cli.load_options()?;
    debug!(
        public = %options.public_pattern,
        local = ?options.local_pattern,
        env = options.target_env(),
        "Loading configuration"
    );
    let set = ConfigLoader::new(options).load()?;
    let project = cli.project_filter();

    match cli.command {
        Command::Export(ref args) => {
            export::run(&set, args, project)?;
        }
        Command::List(ref args) => {
            list::run(&set, args, &project)?;
        }
    }

    Ok(())
}
