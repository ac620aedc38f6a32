//! Raw configuration tree: project name → environment name → parsed document.
//!
//! Built fresh on every load from the directories a path pattern matched and
//! discarded once the resolver has combined it.

use super::walker::walk;
use crate::error::{ConfigError, Result};
use crate::format::FormatReader;
use indexmap::IndexMap;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What to do with errors raised while reading or resolving a source tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Fail the whole load (public source).
    Propagate,
    /// Log and carry on (local override source).
    Ignore,
}

impl ErrorPolicy {
    /// Apply the policy to an error: return it, or log it and swallow it.
    pub fn handle(self, err: ConfigError) -> Result<()> {
        match self {
            ErrorPolicy::Propagate => Err(err),
            ErrorPolicy::Ignore => {
                warn!(error = %err, "Ignoring error in optional config source");
                Ok(())
            }
        }
    }

    pub fn ignores_errors(self) -> bool {
        self == ErrorPolicy::Ignore
    }
}

/// Environment entries per project, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigIndex {
    projects: IndexMap<String, IndexMap<String, Value>>,
}

impl ConfigIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from every directory a path pattern matched.
    ///
    /// Each directory is walked with the basename of its parent as the group
    /// name, so `apps/web/config` contributes to project `web`.
    pub fn from_dirs(
        dirs: &[PathBuf],
        reader: &dyn FormatReader,
        policy: ErrorPolicy,
    ) -> Result<Self> {
        let mut index = Self::new();
        for dir in dirs {
            let group = group_name_for(dir);
            debug!(dir = %dir.display(), group = %group, "Reading config directory");
            walk(dir, &group, &mut index, reader, policy)?;
        }
        Ok(index)
    }

    /// Store a parsed document. A later file with the same environment key
    /// replaces the earlier one.
    pub fn insert(&mut self, project: &str, env: &str, value: Value) {
        self.projects
            .entry(project.to_string())
            .or_default()
            .insert(env.to_string(), value);
    }

    pub fn get(&self, project: &str, env: &str) -> Option<&Value> {
        self.projects.get(project).and_then(|envs| envs.get(env))
    }

    /// Iterate projects with their environment entries, in insertion order.
    pub fn projects(&self) -> impl Iterator<Item = (&str, &IndexMap<String, Value>)> {
        self.projects.iter().map(|(name, envs)| (name.as_str(), envs))
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// Group name for a matched directory: the basename of its parent.
///
/// Relative patterns such as `config` have an empty parent, in which case the
/// current directory's name is used.
pub fn group_name_for(dir: &Path) -> String {
    let parent = match dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if let Some(name) = parent.file_name() {
        return name.to_string_lossy().into_owned();
    }

    parent
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| ".".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BuiltinReader;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_group_name_is_parent_basename() {
        assert_eq!(group_name_for(Path::new("apps/web/config")), "web");
        assert_eq!(group_name_for(Path::new("/srv/api/config")), "api");
    }

    #[test]
    fn test_group_name_for_bare_relative_dir() {
        let name = group_name_for(Path::new("config"));
        assert!(!name.is_empty());
        assert_ne!(name, "config");
    }

    #[test]
    fn test_insert_replaces_same_env() {
        let mut index = ConfigIndex::new();
        index.insert("web", "default", json!({"a": 1}));
        index.insert("web", "default", json!({"a": 2}));
        assert_eq!(index.get("web", "default"), Some(&json!({"a": 2})));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_projects_keep_insertion_order() {
        let mut index = ConfigIndex::new();
        index.insert("zeta", "default", json!({}));
        index.insert("alpha", "default", json!({}));
        let names: Vec<&str> = index.projects().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_from_dirs_accumulates_across_directories() {
        let temp = TempDir::new().unwrap();
        let web = temp.path().join("web").join("config");
        let api = temp.path().join("api").join("config");
        std::fs::create_dir_all(&web).unwrap();
        std::fs::create_dir_all(&api).unwrap();
        std::fs::write(web.join("default.json"), r#"{"port": 80}"#).unwrap();
        std::fs::write(api.join("default.json"), r#"{"port": 81}"#).unwrap();

        let index =
            ConfigIndex::from_dirs(&[web, api], &BuiltinReader, ErrorPolicy::Propagate).unwrap();
        assert_eq!(index.get("web", "default"), Some(&json!({"port": 80})));
        assert_eq!(index.get("api", "default"), Some(&json!({"port": 81})));
    }
}
