pub mod booking;
pub mod bus;
pub mod user;

use serde_json::Value;

/// First of `keys` on `doc` holding a usable id. Backends spell ids as
/// `_id`, `id` or something more specific, as strings or numbers.
pub fn document_id(doc: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match doc.get(key)? {
        Value::String(id) if !id.trim().is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    })
}
