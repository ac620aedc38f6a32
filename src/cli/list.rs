//! List subcommand for projconf CLI
//!
//! Prints one line per project value, expanding arrays to one line per
//! element.

use crate::config::{ConfigSet, ProjectFilter, Section};
use crate::series::Emit;
use anyhow::Result;
use clap::Args;
use std::io::Write;

/// Arguments for the list subcommand
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show this section of each project (e.g. `db.host`)
    #[arg(short, long, value_name = "PATH")]
    pub section: Option<String>,
}

/// Render `project<TAB>json` lines for every enumerated value.
pub fn lines(set: &ConfigSet, args: &ListArgs, project: &ProjectFilter) -> Vec<String> {
    let section = args.section.as_deref().map(Section::parse);
    set.for_each(section.as_ref(), project, |value, name| {
        Emit::Handle(format!("{}\t{}", name, value))
    })
    .map(|series| series.into_iter().collect())
    .unwrap_or_default()
}

pub fn run(set: &ConfigSet, args: &ListArgs, project: &ProjectFilter) -> Result<()> {
    let mut out = std::io::stdout().lock();
    for line in lines(set, args, project) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lines_expand_arrays() {
        let mut set = ConfigSet::new();
        set.insert("web", json!({"hosts": ["a", "b"]}));
        set.insert("api", json!({"port": 81}));

        let args = ListArgs {
            section: Some("hosts".to_string()),
        };
        assert_eq!(
            lines(&set, &args, &ProjectFilter::All),
            vec!["web\t\"a\"", "web\t\"b\""]
        );
    }

    #[test]
    fn test_lines_empty_when_nothing_matches() {
        let set = ConfigSet::new();
        let args = ListArgs { section: None };
        assert!(lines(&set, &args, &ProjectFilter::All).is_empty());
    }
}
