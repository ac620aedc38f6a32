//! Deep merge of parsed configuration documents.
//!
//! Mappings merge key by key at every depth. Arrays never merge element-wise:
//! a later array replaces an earlier one wholesale.

use serde_json::Value;

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Arrays are replaced entirely, at any depth
/// - Strings, numbers, booleans and nulls in overlay replace base
///
/// # Example
/// ```
/// use serde_json::json;
/// use projconf::config::deep_merge;
///
/// let base = json!({
///     "db": { "host": "localhost", "port": 5432 },
///     "hosts": ["a", "b"]
/// });
/// let overlay = json!({
///     "db": { "port": 6432 },
///     "hosts": ["c"]
/// });
/// let result = deep_merge(base, overlay);
/// assert_eq!(result, json!({
///     "db": { "host": "localhost", "port": 6432 },
///     "hosts": ["c"]
/// }));
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        // Both are objects: merge recursively
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                // Merge in place so existing keys keep their position
                match base_map.get_mut(&key) {
                    Some(slot) => {
                        let base_value = std::mem::take(slot);
                        *slot = deep_merge(base_value, overlay_value);
                    }
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
            Value::Object(base_map)
        }
        // Arrays: replace, never concatenate
        (Value::Array(_), overlay @ Value::Array(_)) => overlay,
        // Any other case: overlay replaces base entirely
        (_, overlay) => overlay,
    }
}

/// Merge multiple documents in order, with later values taking precedence.
///
/// Top-level `null` documents are treated as absent and skipped, so the
/// result of merging nothing is an empty object.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values
        .into_iter()
        .filter(|v| !v.is_null())
        .fold(Value::Object(Default::default()), deep_merge)
}
