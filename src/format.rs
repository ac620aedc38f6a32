//! Supported configuration file formats and the reader that parses them.
//!
//! The walker only ever looks at files whose extension is in the fixed
//! allow-list below. Parsing itself goes through [`FormatReader`], so callers
//! can plug in parsers for formats the built-in reader does not understand.

use anyhow::{Context, Result};
use serde_json::{Map, Value};

/// File formats recognised by extension (case-sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Json5,
    Hjson,
    Toml,
    Iced,
    Yaml,
    Yml,
    Cson,
    Properties,
}

impl Format {
    /// Every supported format, in allow-list order.
    pub const ALL: [Format; 9] = [
        Format::Json,
        Format::Json5,
        Format::Hjson,
        Format::Toml,
        Format::Iced,
        Format::Yaml,
        Format::Yml,
        Format::Cson,
        Format::Properties,
    ];

    /// Look up a format by file extension. Matching is case-sensitive, so
    /// `JSON` is not a supported extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(Format::Json),
            "json5" => Some(Format::Json5),
            "hjson" => Some(Format::Hjson),
            "toml" => Some(Format::Toml),
            "iced" => Some(Format::Iced),
            "yaml" => Some(Format::Yaml),
            "yml" => Some(Format::Yml),
            "cson" => Some(Format::Cson),
            "properties" => Some(Format::Properties),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Json5 => "json5",
            Format::Hjson => "hjson",
            Format::Toml => "toml",
            Format::Iced => "iced",
            Format::Yaml => "yaml",
            Format::Yml => "yml",
            Format::Cson => "cson",
            Format::Properties => "properties",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Parses the text of a known format into a structured value.
pub trait FormatReader {
    /// Parse `text` as `format`.
    ///
    /// Returns `Ok(None)` when this reader has no parser for the format; the
    /// file is then skipped rather than treated as an error.
    fn parse(&self, text: &str, format: Format) -> Result<Option<Value>>;
}

/// Reader backed by the serde ecosystem parsers.
///
/// CoffeeScript-based formats (`cson`, `iced`) have no parser here and are
/// reported as unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinReader;

impl FormatReader for BuiltinReader {
    fn parse(&self, text: &str, format: Format) -> Result<Option<Value>> {
        let value = match format {
            Format::Json => serde_json::from_str::<Value>(text)?,
            Format::Json5 => json5::from_str::<Value>(text)?,
            Format::Hjson => deser_hjson::from_str::<Value>(text)?,
            Format::Toml => toml_to_json(toml::from_str::<toml::Value>(text)?),
            Format::Yaml | Format::Yml => serde_yaml::from_str::<Value>(text)?,
            Format::Properties => parse_properties(text)?,
            Format::Cson | Format::Iced => return Ok(None),
        };
        Ok(Some(value))
    }
}

/// Convert a TOML document into JSON. Datetimes become their string form.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Parse a `.properties` file. Dotted keys expand into nested mappings, so
/// `db.host=x` becomes `{"db": {"host": "x"}}`.
fn parse_properties(text: &str) -> Result<Value> {
    let flat = java_properties::read(text.as_bytes()).context("invalid properties file")?;

    // The reader hands back a HashMap; sort so nesting is deterministic.
    let mut entries: Vec<(String, String)> = flat.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut root = Map::new();
    for (key, value) in entries {
        insert_dotted(&mut root, &key, Value::String(value));
    }
    Ok(Value::Object(root))
}

fn insert_dotted(root: &mut Map<String, Value>, key: &str, value: Value) {
    let mut segments = key.split('.').peekable();
    let mut current = root;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => unreachable!("entry was just made an object"),
        };
    }
}
