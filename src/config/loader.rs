//! Configuration loading entry point.
//!
//! A load expands the public path pattern (and the optional local one) into
//! directories, builds a raw index from each, resolves both, and layers the
//! local result over the public one.

use super::defaults::Defaults;
use super::index::{ConfigIndex, ErrorPolicy};
use super::resolver::Resolver;
use super::set::{ConfigSet, ProjectFilter};
use crate::error::{ConfigError, Result};
use crate::format::{BuiltinReader, FormatReader};
use std::path::PathBuf;
use tracing::{debug, info};

/// Environment variable holding the target environment.
pub const ENV_VAR: &str = "NODE_ENV";

/// Environment variable holding the active project selector.
pub const PROJECT_VAR: &str = "PROJECT";

/// Default public source pattern.
pub const DEFAULT_PUBLIC_PATTERN: &str = "config";

/// Default name of the default entry.
pub const DEFAULT_FILE_NAME: &str = "default";

/// Options for a load.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Path pattern for the public source directories.
    pub public_pattern: String,
    /// Path pattern for the optional, best-effort local override directories.
    pub local_pattern: Option<String>,
    /// Target environment; the default entry name when unset.
    pub env: Option<String>,
    /// Restrict the result to one project.
    pub project: ProjectFilter,
    /// File stem of each project's default entry.
    pub default_file_name: String,
    /// Scaffold every project is merged over.
    pub defaults: Defaults,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            public_pattern: DEFAULT_PUBLIC_PATTERN.to_string(),
            local_pattern: None,
            env: None,
            project: ProjectFilter::All,
            default_file_name: DEFAULT_FILE_NAME.to_string(),
            defaults: Defaults::default(),
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus `env` and `project` taken from `NODE_ENV` and `PROJECT`.
    pub fn from_env() -> Self {
        let env = std::env::var(ENV_VAR).ok().filter(|v| !v.is_empty());
        let project = std::env::var(PROJECT_VAR).ok();

        Self {
            env,
            project: ProjectFilter::from_option(project.as_deref()),
            ..Self::default()
        }
    }

    pub fn with_public(mut self, pattern: impl Into<String>) -> Self {
        self.public_pattern = pattern.into();
        self
    }

    pub fn with_local(mut self, pattern: impl Into<String>) -> Self {
        self.local_pattern = Some(pattern.into());
        self
    }

    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    pub fn with_project(mut self, project: ProjectFilter) -> Self {
        self.project = project;
        self
    }

    pub fn with_default_file_name(mut self, name: impl Into<String>) -> Self {
        self.default_file_name = name.into();
        self
    }

    pub fn with_defaults(mut self, defaults: impl Into<Defaults>) -> Self {
        self.defaults = defaults.into();
        self
    }

    /// The environment actually resolved: `env`, or the default entry name.
    pub fn target_env(&self) -> &str {
        self.env
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(&self.default_file_name)
    }
}

/// Loads configuration with a pluggable format reader.
pub struct ConfigLoader {
    options: LoadOptions,
    reader: Box<dyn FormatReader>,
}

impl ConfigLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self::with_reader(options, Box::new(BuiltinReader))
    }

    pub fn with_reader(options: LoadOptions, reader: Box<dyn FormatReader>) -> Self {
        Self { options, reader }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load into a fresh set.
    pub fn load(&self) -> Result<ConfigSet> {
        let mut set = ConfigSet::new();
        self.load_into(&mut set)?;
        Ok(set)
    }

    /// Load and merge the result into `set`.
    ///
    /// Repeated loads accumulate: projects already in `set` are deep merged
    /// with the new values winning. On error `set` is left untouched.
    pub fn load_into(&self, set: &mut ConfigSet) -> Result<()> {
        let options = &self.options;
        let env = options.target_env();
        let resolver = Resolver::new(&options.default_file_name, env, &options.defaults);

        let public_dirs = expand_pattern(&options.public_pattern)?;
        let public_index =
            ConfigIndex::from_dirs(&public_dirs, self.reader.as_ref(), ErrorPolicy::Propagate)?;
        let mut loaded = resolver.combine(&public_index, ErrorPolicy::Propagate)?;

        if let Some(ref pattern) = options.local_pattern {
            let local_dirs = match expand_pattern(pattern) {
                Ok(dirs) => dirs,
                Err(err) => {
                    ErrorPolicy::Ignore.handle(err)?;
                    Vec::new()
                }
            };
            let local_index =
                ConfigIndex::from_dirs(&local_dirs, self.reader.as_ref(), ErrorPolicy::Ignore)?;
            let local = resolver.combine(&local_index, ErrorPolicy::Ignore)?;
            debug!(projects = local.len(), "Merging local overrides");
            loaded.merge_from(local);
        }

        set.merge_from(loaded);
        if !options.project.is_all() {
            set.retain(&options.project);
        }

        info!(
            env,
            projects = set.len(),
            pattern = %options.public_pattern,
            "Configuration loaded"
        );
        Ok(())
    }
}

/// Load with the built-in format reader.
pub fn load(options: &LoadOptions) -> Result<ConfigSet> {
    ConfigLoader::new(options.clone()).load()
}

/// Expand a path pattern into the directories it matches, in sorted order.
/// Matches that are not directories are skipped.
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|e| ConfigError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut dirs = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            ConfigError::io(path, e.into_error())
        })?;
        if path.is_dir() {
            dirs.push(path);
        } else {
            debug!(path = %path.display(), "Pattern matched a non-directory, skipping");
        }
    }
    Ok(dirs)
}
