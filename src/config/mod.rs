//! Per-project, per-environment configuration resolution.
//!
//! Configuration lives in directory trees matched by a path pattern:
//!
//! ```text
//! apps/
//!   web/config/default.yaml      -> project "web", entry "default"
//!   web/config/production.yaml   -> project "web", entry "production"
//!   api/config/default.json      -> project "api", entry "default"
//! ```
//!
//! ## Merge Order
//! Lowest to highest precedence, per project:
//! 1. **Scaffold** - [`Defaults`] output for the project
//! 2. **Default entry** - `default.*` (name configurable)
//! 3. **Environment entry** - `<env>.*`
//! 4. **Parent** - with `inherit: <project>` in the default entry, the
//!    parent's resolved config becomes the base beneath 1-3
//! 5. **Local overrides** - the same layout under the optional local pattern
//!
//! Arrays are always replaced, never merged element-wise.
//!
//! ## Environment Variables
//! Read only by [`LoadOptions::from_env`]:
//! - `NODE_ENV` - target environment
//! - `PROJECT` - active project selector (`*` for all)

mod defaults;
mod index;
mod loader;
mod merge;
mod resolver;
mod section;
mod set;
mod walker;

pub use defaults::{Defaults, DefaultsContext};
pub use index::{ConfigIndex, ErrorPolicy, group_name_for};
pub use loader::{
    ConfigLoader, DEFAULT_FILE_NAME, DEFAULT_PUBLIC_PATTERN, ENV_VAR, LoadOptions, PROJECT_VAR,
    expand_pattern, load,
};
pub use merge::{deep_merge, deep_merge_all};
pub use resolver::{INHERIT_KEY, Resolver, USE_IF_NO_ENV_KEY};
pub use section::Section;
pub use set::{ConfigSet, ProjectFilter};
pub use walker::walk;
