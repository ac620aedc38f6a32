//! Per-project resolution of a raw configuration tree.
//!
//! Resolution runs in two phases. Phase one merges each project's default
//! and environment entries over its scaffold. Phase two applies `inherit`
//! edges, using the parent's phase-one result as the base layer.
//!
//! Phase two is a single pass over the edges in discovery order: a parent
//! that itself inherits only contributes its inherited values if its own
//! edge was applied earlier in the same pass.

use super::defaults::{Defaults, DefaultsContext};
use super::index::{ConfigIndex, ErrorPolicy};
use super::merge::{deep_merge, deep_merge_all};
use super::set::ConfigSet;
use crate::error::{ConfigError, Result};
use serde_json::Value;
use tracing::{debug, warn};

/// Key in a default entry naming the project to inherit from.
pub const INHERIT_KEY: &str = "inherit";

/// Key in a default entry allowing it to stand in for a missing environment.
pub const USE_IF_NO_ENV_KEY: &str = "useIfNoEnv";

/// Combines raw entries into final per-project configuration.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    /// Name of the default entry (file stem), usually `default`.
    pub default_name: &'a str,
    /// Target environment name.
    pub env: &'a str,
    pub defaults: &'a Defaults,
}

impl<'a> Resolver<'a> {
    pub fn new(default_name: &'a str, env: &'a str, defaults: &'a Defaults) -> Self {
        Self {
            default_name,
            env,
            defaults,
        }
    }

    /// Resolve every project in `index`.
    pub fn combine(&self, index: &ConfigIndex, policy: ErrorPolicy) -> Result<ConfigSet> {
        let mut resolved = ConfigSet::new();
        let mut edges: Vec<(String, String)> = Vec::new();

        for (project, envs) in index.projects() {
            let default_config = envs.get(self.default_name);
            let env_config = envs.get(self.env);

            let parent = default_config.and_then(|d| inherit_target(project, d));
            if let Some(ref parent) = parent {
                edges.push((project.to_string(), parent.clone()));
            }

            let excused = parent.is_some() || default_config.is_some_and(use_if_no_env);
            if env_config.is_none() && !excused {
                policy.handle(ConfigError::missing_env(project, self.env))?;
            }

            let project_config =
                deep_merge_all(default_config.into_iter().chain(env_config).cloned());
            let scaffold = self.defaults.scaffold(&DefaultsContext {
                env: self.env,
                project,
                merged: &project_config,
            });

            debug!(project, env = self.env, "Resolved project config");
            resolved.insert(project, deep_merge_all([scaffold, project_config]));
        }

        for (child, parent) in edges {
            let Some(parent_config) = resolved.get(&parent).cloned() else {
                policy.handle(ConfigError::missing_parent(&parent, &child))?;
                continue;
            };
            if let Some(child_config) = resolved.get(&child).cloned() {
                debug!(project = %child, parent = %parent, "Applying inherited config");
                resolved.insert(child, deep_merge(parent_config, child_config));
            }
        }

        Ok(resolved)
    }
}

/// The project named by a default entry's `inherit` key, if any.
fn inherit_target(project: &str, default_config: &Value) -> Option<String> {
    match default_config.get(INHERIT_KEY)? {
        Value::String(name) if !name.is_empty() => Some(name.clone()),
        Value::Null | Value::Bool(false) => None,
        Value::String(_) => None,
        other => {
            warn!(project, value = %other, "Ignoring non-string inherit directive");
            None
        }
    }
}

fn use_if_no_env(default_config: &Value) -> bool {
    default_config
        .get(USE_IF_NO_ENV_KEY)
        .is_some_and(is_truthy)
}

/// Truthiness of a flag value: `null`, `false`, `0` and `""` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
