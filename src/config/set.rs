//! The resolved configuration set: project name → final configuration.

use super::merge::deep_merge;
use super::section::Section;
use crate::series::{Emit, Series};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

/// Which projects an operation applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProjectFilter {
    /// Every project (the `*` selector).
    #[default]
    All,
    /// A single named project.
    Only(String),
}

impl ProjectFilter {
    /// Wildcard selector meaning "all projects".
    pub const WILDCARD: &'static str = "*";

    /// Parse a selector: `*` or an empty string selects every project.
    pub fn parse(selector: &str) -> Self {
        match selector.trim() {
            "" | Self::WILDCARD => ProjectFilter::All,
            name => ProjectFilter::Only(name.to_string()),
        }
    }

    pub fn from_option(selector: Option<&str>) -> Self {
        selector.map(Self::parse).unwrap_or_default()
    }

    pub fn matches(&self, project: &str) -> bool {
        match self {
            ProjectFilter::All => true,
            ProjectFilter::Only(name) => name == project,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, ProjectFilter::All)
    }
}

impl FromStr for ProjectFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Final per-project configuration, in resolution order.
///
/// Serializes as a JSON object keyed by project name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigSet {
    projects: IndexMap<String, Value>,
}

impl ConfigSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, project: &str) -> Option<&Value> {
        self.projects.get(project)
    }

    pub fn contains(&self, project: &str) -> bool {
        self.projects.contains_key(project)
    }

    /// Set a project's configuration, replacing any previous value.
    pub fn insert(&mut self, project: impl Into<String>, config: Value) {
        self.projects.insert(project.into(), config);
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &Value)> {
        self.projects.iter().map(|(name, config)| (name.as_str(), config))
    }

    /// Projects accepted by `filter`, in order.
    pub fn select<'a>(
        &'a self,
        filter: &'a ProjectFilter,
    ) -> impl DoubleEndedIterator<Item = (&'a str, &'a Value)> + 'a {
        self.iter().filter(move |(name, _)| filter.matches(name))
    }

    /// Merge another set over this one. Projects present in both are deep
    /// merged with `other` winning; new projects are appended.
    pub fn merge_from(&mut self, other: ConfigSet) {
        for (name, config) in other.projects {
            match self.projects.get_mut(&name) {
                Some(existing) => {
                    let base = std::mem::take(existing);
                    *existing = deep_merge(base, config);
                }
                None => {
                    self.projects.insert(name, config);
                }
            }
        }
    }

    /// Drop every project `filter` rejects.
    pub fn retain(&mut self, filter: &ProjectFilter) {
        self.projects.retain(|name, _| filter.matches(name));
    }

    /// Call `f` for every value in every selected project.
    ///
    /// With a section, each project contributes the value at that path;
    /// projects where it is absent or `null` are skipped. Array values are
    /// expanded, one call per element. Handles returned by `f` are collected
    /// in call order; `None` when no call produced one.
    pub fn for_each<H, F>(
        &self,
        section: Option<&Section>,
        filter: &ProjectFilter,
        mut f: F,
    ) -> Option<Series<H>>
    where
        F: FnMut(&Value, &str) -> Emit<H>,
    {
        let mut series = Series::new();

        for (name, config) in self.select(filter) {
            let selected = match section {
                Some(section) => section.select(config),
                None => Some(config),
            };
            let Some(value) = selected.filter(|v| !v.is_null()) else {
                continue;
            };

            let items = match value {
                Value::Array(items) => items.iter().collect::<Vec<_>>(),
                other => vec![other],
            };
            for item in items {
                if let Emit::Handle(handle) = f(item, name) {
                    series.push(handle);
                }
            }
        }

        series.into_option()
    }

    /// Fold over the selected projects from first to last.
    pub fn reduce<A, F>(&self, filter: &ProjectFilter, init: A, f: F) -> A
    where
        F: FnMut(A, (&str, &Value)) -> A,
    {
        self.select(filter).fold(init, f)
    }

    /// Fold over the selected projects from last to first.
    pub fn reduce_right<A, F>(&self, filter: &ProjectFilter, init: A, f: F) -> A
    where
        F: FnMut(A, (&str, &Value)) -> A,
    {
        self.select(filter).rev().fold(init, f)
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.projects
    }
}

impl FromIterator<(String, Value)> for ConfigSet {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            projects: iter.into_iter().collect(),
        }
    }
}
