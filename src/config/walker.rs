//! Recursive directory walker.
//!
//! Each directory is a group: files directly inside it become environment
//! entries of that group, keyed by file name without extension, and each
//! subdirectory becomes a group of its own named after its basename.

use super::index::{ConfigIndex, ErrorPolicy};
use crate::error::{ConfigError, Result};
use crate::format::{Format, FormatReader};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Walk `dir`, storing every supported file under `index[group][env]`.
///
/// Entries are visited in file-name order so group insertion order is stable
/// across platforms. With [`ErrorPolicy::Ignore`] unreadable directories and
/// files that fail to parse are logged and skipped.
pub fn walk(
    dir: &Path,
    group: &str,
    index: &mut ConfigIndex,
    reader: &dyn FormatReader,
    policy: ErrorPolicy,
) -> Result<()> {
    let mut entries = match read_entries(dir) {
        Ok(entries) => entries,
        Err(err) => return policy.handle(err),
    };
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    for entry in entries {
        let path = entry.path();
        let is_dir = match entry.file_type() {
            Ok(file_type) => file_type.is_dir(),
            Err(err) => {
                policy.handle(ConfigError::io(&path, err))?;
                continue;
            }
        };

        if is_dir {
            let name = entry.file_name().to_string_lossy().into_owned();
            walk(&path, &name, index, reader, policy)?;
        } else if let Err(err) = read_file(&path, group, index, reader) {
            policy.handle(err)?;
        }
    }

    Ok(())
}

fn read_entries(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    fs::read_dir(dir)
        .and_then(|entries| entries.collect::<std::io::Result<Vec<_>>>())
        .map_err(|e| ConfigError::io(dir, e))
}

fn read_file(
    path: &Path,
    group: &str,
    index: &mut ConfigIndex,
    reader: &dyn FormatReader,
) -> Result<()> {
    let Some(format) = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(Format::from_extension)
    else {
        debug!(path = %path.display(), "Skipping file with unsupported extension");
        return Ok(());
    };

    let Some(env) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
        return Ok(());
    };

    let text = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    match reader
        .parse(&text, format)
        .map_err(|e| ConfigError::parse(path, format.extension(), format!("{:#}", e)))?
    {
        Some(value) => {
            debug!(path = %path.display(), group, env = %env, "Loaded config file");
            index.insert(group, &env, value);
        }
        None => {
            warn!(path = %path.display(), %format, "No reader available for format, skipping");
        }
    }

    Ok(())
}
