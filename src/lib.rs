//! projconf library
//!
//! Discovers per-project configuration files, resolves them per environment
//! and exposes the result for enumeration, reduction and export.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod logging;
pub mod series;

pub use config::{ConfigSet, LoadOptions, ProjectFilter, load};
pub use error::{ConfigError, Result};
