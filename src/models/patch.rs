use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Set a property addressed by name on a serializable record.
///
/// `path` may use dot notation (`contact.email`); missing intermediate
/// objects are created. The record is only replaced when the patched JSON
/// still deserializes into `T`, so a value of the wrong shape leaves it
/// untouched and returns `false`.
pub fn set_property<T>(target: &mut T, path: &str, value: Value) -> bool
where
    T: Serialize + DeserializeOwned,
{
    let Ok(mut json) = serde_json::to_value(&*target) else {
        return false;
    };

    let mut keys = path.split('.').peekable();
    let mut node = &mut json;
    while let Some(key) = keys.next() {
        let Some(obj) = node.as_object_mut() else {
            return false;
        };
        if keys.peek().is_none() {
            obj.insert(key.to_string(), value);
            break;
        }
        let child = obj
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if child.is_null() {
            *child = Value::Object(Map::new());
        }
        node = child;
    }

    match serde_json::from_value(json) {
        Ok(patched) => {
            *target = patched;
            true
        }
        Err(e) => {
            tracing::warn!("Rejected patch of '{}': {}", path, e);
            false
        }
    }
}
