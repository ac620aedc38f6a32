//! Export of resolved configuration as pretty-printed JSON artifacts.
//!
//! Without a project filter the whole set goes out as one artifact keyed by
//! project name. With a filter, or with `split` set, each project gets its
//! own artifact under `<project>/<name>`.

pub mod sink;

pub use sink::{DirSink, MemorySink, Sink, WriterSink};

use crate::config::{ConfigSet, ProjectFilter, Section};
use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{debug, info};

/// Default artifact file name.
pub const DEFAULT_ARTIFACT_NAME: &str = "config.js";

/// Default indentation width.
pub const DEFAULT_STRINGIFY_SPACE: usize = 4;

/// One emitted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Relative path: `<project>/<name>`, or just `<name>` for the combined
    /// artifact.
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl Artifact {
    pub fn contents_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.contents)
    }
}

/// Export settings.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Artifact file name.
    pub name: String,
    /// Indentation width of the JSON output.
    pub stringify_space: usize,
    /// Sub-value to export from each project instead of the whole config.
    pub section: Option<Section>,
    /// Projects to export.
    pub project: ProjectFilter,
    /// One artifact per project even without a project filter.
    pub split: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_ARTIFACT_NAME.to_string(),
            stringify_space: DEFAULT_STRINGIFY_SPACE,
            section: None,
            project: ProjectFilter::All,
            split: false,
        }
    }
}

impl ExportOptions {
    fn select<'a>(&self, config: &'a Value) -> Option<&'a Value> {
        match self.section {
            Some(ref section) => section.select(config),
            None => Some(config),
        }
    }

    fn per_project(&self) -> bool {
        self.split || !self.project.is_all()
    }
}

/// Write `set` to `sink` and close it. Returns the number of artifacts
/// written.
pub fn export(set: &ConfigSet, options: &ExportOptions, sink: &mut dyn Sink) -> Result<usize> {
    let artifacts = render(set, options)?;
    let count = artifacts.len();
    for artifact in artifacts {
        debug!(path = %artifact.path.display(), bytes = artifact.contents.len(), "Writing artifact");
        sink.write(artifact)?;
    }
    // Every write is queued before the sink is marked complete.
    sink.close()?;

    info!(artifacts = count, "Export complete");
    Ok(count)
}

/// Build the artifacts for `set` without writing them anywhere.
pub fn render(set: &ConfigSet, options: &ExportOptions) -> Result<Vec<Artifact>> {
    if options.per_project() {
        let mut artifacts = Vec::new();
        for (project, config) in set.select(&options.project) {
            let Some(value) = options.select(config) else {
                debug!(project, "Section absent, no artifact");
                continue;
            };
            artifacts.push(Artifact {
                path: PathBuf::from(project).join(&options.name),
                contents: to_pretty_json(value, options.stringify_space)?,
            });
        }
        return Ok(artifacts);
    }

    let mut combined = Map::new();
    for (project, config) in set.iter() {
        if let Some(value) = options.select(config) {
            combined.insert(project.to_string(), value.clone());
        }
    }
    Ok(vec![Artifact {
        path: PathBuf::from(&options.name),
        contents: to_pretty_json(&Value::Object(combined), options.stringify_space)?,
    }])
}

/// Serialize with `space` columns of indentation per level.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T, space: usize) -> Result<Vec<u8>> {
    let indent = vec![b' '; space];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}
