//! Section selectors: paths such as `db.host` or `servers[0].port` that
//! pick a sub-value out of a project's configuration.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A parsed section path.
///
/// Segments are kept as strings; a segment addresses an array element when
/// it parses as an index and the value at that point is an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    raw: String,
    segments: Vec<String>,
}

impl Section {
    /// Parse a dotted path. Bracketed segments may be indices (`[0]`) or
    /// quoted keys (`["a.b"]`), the latter allowing dots inside a key.
    pub fn parse(path: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = path.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                    let quote = match chars.peek() {
                        Some(&q @ ('"' | '\'')) => {
                            chars.next();
                            Some(q)
                        }
                        _ => None,
                    };
                    let mut key = String::new();
                    while let Some(c) = chars.next() {
                        match (quote, c) {
                            (Some(q), c) if c == q && chars.peek() == Some(&']') => {
                                chars.next();
                                break;
                            }
                            (None, ']') => break,
                            _ => key.push(c),
                        }
                    }
                    segments.push(key);
                }
                _ => current.push(c),
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }

        Self {
            raw: path.to_string(),
            segments,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Look the section up in `value`. Returns `None` when any segment is
    /// missing along the way.
    pub fn select<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(value, |current, segment| match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }
}

impl FromStr for Section {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
