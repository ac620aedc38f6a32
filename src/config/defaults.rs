//! Per-project scaffold defaults.
//!
//! The scaffold is the lowest layer of a project's configuration: anything
//! the project's own files set wins over it.

use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;

/// What the factory gets to look at when building a project's scaffold.
#[derive(Debug, Clone, Copy)]
pub struct DefaultsContext<'a> {
    /// Target environment name.
    pub env: &'a str,
    /// Project being resolved.
    pub project: &'a str,
    /// The project's default and environment files, already merged.
    pub merged: &'a Value,
}

type Factory = dyn Fn(&DefaultsContext<'_>) -> Value + Send + Sync;

/// Source of the scaffold every project is merged over.
#[derive(Clone, Default)]
pub enum Defaults {
    /// `{"env": <env>, "project": <project>}`.
    #[default]
    Scaffold,
    /// The same document for every project.
    Value(Value),
    /// Computed per project.
    Factory(Arc<Factory>),
}

impl Defaults {
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&DefaultsContext<'_>) -> Value + Send + Sync + 'static,
    {
        Defaults::Factory(Arc::new(f))
    }

    /// Produce the scaffold for one project.
    pub fn scaffold(&self, ctx: &DefaultsContext<'_>) -> Value {
        match self {
            Defaults::Scaffold => json!({ "env": ctx.env, "project": ctx.project }),
            Defaults::Value(value) => value.clone(),
            Defaults::Factory(f) => f(ctx),
        }
    }
}

impl fmt::Debug for Defaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defaults::Scaffold => write!(f, "Defaults::Scaffold"),
            Defaults::Value(v) => f.debug_tuple("Defaults::Value").field(v).finish(),
            Defaults::Factory(_) => write!(f, "Defaults::Factory(..)"),
        }
    }
}

impl From<Value> for Defaults {
    fn from(value: Value) -> Self {
        Defaults::Value(value)
    }
}
