//! Projection of a data object onto a set of paths.
//!
//! Not cryptographic. Used to produce the public document a holder of
//! selectively disclosed evidence actually shares.

use serde_json::{Map, Value};

use crate::path::{Key, PropPath};

/// Null-safe structural read. Missing segments or mistyped containers yield
/// `None`.
pub fn read_path<'a>(data: &'a Value, path: &[Key]) -> Option<&'a Value> {
    path.iter().try_fold(data, |cur, key| match (cur, key) {
        (Value::Array(items), Key::Index(i)) => items.get(*i),
        (Value::Array(items), Key::Name(n)) => n.parse::<usize>().ok().and_then(|i| items.get(i)),
        (Value::Object(obj), Key::Name(n)) => obj.get(n),
        (Value::Object(obj), Key::Index(i)) => obj.get(&i.to_string()),
        _ => None,
    })
}

/// Write `value` at `path` inside `target`, creating objects (for names) and
/// arrays (for indexes) on demand. Array gaps are filled with `null`. An
/// undefined value still creates the intermediate containers but never grows
/// an array for its own slot.
pub fn write_path(target: Value, path: &[Key], value: Option<Value>) -> Value {
    match path.split_first() {
        None => value.unwrap_or(target),
        Some((Key::Index(i), rest)) => {
            let mut items = match target {
                Value::Array(items) => items,
                _ => Vec::new(),
            };
            if rest.is_empty() && value.is_none() {
                return Value::Array(items);
            }
            if items.len() <= *i {
                let Some(len) = i.checked_add(1) else {
                    return Value::Array(items);
                };
                items.resize(len, Value::Null);
            }
            let child = std::mem::take(&mut items[*i]);
            items[*i] = write_path(child, rest, value);
            Value::Array(items)
        }
        Some((Key::Name(n), rest)) => {
            let mut obj = match target {
                Value::Object(obj) => obj,
                _ => Map::new(),
            };
            if rest.is_empty() && value.is_none() {
                return Value::Object(obj);
            }
            let child = obj.get_mut(n).map(std::mem::take).unwrap_or(Value::Null);
            obj.insert(n.clone(), write_path(child, rest, value));
            Value::Object(obj)
        }
    }
}

/// Copy only the values at `paths` from `data` into a fresh object.
///
/// A path that misses in `data` only materializes containers down to the
/// first missing segment, so output arrays never outgrow the input.
pub fn expose(data: &Value, paths: &[PropPath]) -> Value {
    paths.iter().fold(Value::Object(Map::new()), |out, path| {
        match read_path(data, path) {
            Some(v) => write_path(out, path, Some(v.clone())),
            None => {
                let found = (0..path.len())
                    .take_while(|&n| read_path(data, &path[..=n]).is_some())
                    .count();
                write_path(out, &path[..=found], None)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prop_path;
    use serde_json::json;

    fn data() -> Value {
        json!({
            "books": [{"note": "A0", "title": "B0"}, {"note": "A1", "title": "B1"}],
            "name": "B",
            "event": {"organizer": {"email": "A", "name": "B"}, "title": "A"}
        })
    }

    #[test]
    fn read_is_null_safe() {
        let d = data();
        assert_eq!(read_path(&d, &prop_path!["books", 1, "title"]), Some(&json!("B1")));
        assert_eq!(read_path(&d, &prop_path!["books", 9, "title"]), None);
        assert_eq!(read_path(&d, &prop_path!["name", "deeper"]), None);
        assert_eq!(read_path(&d, &[]), Some(&d));
    }

    #[test]
    fn expose_projects_selected_paths() {
        let out = expose(
            &data(),
            &[prop_path!["name"], prop_path!["books", 1, "title"], prop_path!["event", "organizer", "email"]],
        );
        assert_eq!(
            out,
            json!({
                "name": "B",
                "books": [null, {"title": "B1"}],
                "event": {"organizer": {"email": "A"}}
            })
        );
    }

    #[test]
    fn missing_values_are_not_written() {
        let out = expose(&data(), &[prop_path!["missing"]]);
        assert_eq!(out, json!({}));
        let out = expose(&data(), &[prop_path!["event", "nope"]]);
        assert_eq!(out, json!({"event": {}}));
    }

    #[test]
    fn far_missing_indexes_do_not_grow_arrays() {
        let out = expose(&data(), &[prop_path!["books", 99_999_999_999usize]]);
        assert_eq!(out, json!({"books": []}));
        let out = expose(&data(), &[prop_path!["books", usize::MAX, "title"]]);
        assert_eq!(out, json!({"books": []}));

        let out = write_path(json!([]), &prop_path![usize::MAX], Some(json!(1)));
        assert_eq!(out, json!([]));
    }

    #[test]
    fn no_paths_gives_empty_object() {
        assert_eq!(expose(&data(), &[]), json!({}));
    }
}
