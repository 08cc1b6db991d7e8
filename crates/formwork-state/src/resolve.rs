//! Reading and writing values at paths in a document.
//!
//! Reads are resilient: any missing or type-mismatched intermediate yields
//! `None`, so field views stay readable before the engine finishes
//! initializing. Writes fault on contract violations instead.

use crate::error::{value_type_name, StateError, StateResult};
use crate::{Path, Seg};
use serde_json::{Map, Value};

/// Get a reference to the value at a path.
///
/// Walks segments left to right. Returns `None` if any segment cannot be
/// resolved — a missing key, an out-of-range index, or an intermediate
/// value of the wrong type. Never errors.
///
/// # Examples
///
/// ```
/// use formwork_state::{get_value, parse_path};
/// use serde_json::json;
///
/// let doc = json!({"guests": [{"name": "Ada"}]});
/// assert_eq!(
///     get_value(&doc, &parse_path("guests.0.name")),
///     Some(&json!("Ada"))
/// );
/// assert_eq!(get_value(&doc, &parse_path("guests.3.name")), None);
/// ```
pub fn get_value<'a>(doc: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut current = doc;
    for seg in path.segments() {
        match seg {
            Seg::Key(key) => current = current.get(key)?,
            Seg::Index(idx) => current = current.get(idx)?,
        }
    }
    Some(current)
}

/// Set the value at a path, mutating the document in place.
///
/// An empty path leaves the document untouched — whole-document
/// replacement is the engine's job, not the resolver's. Otherwise all but
/// the last segment are resolved, creating intermediate objects for key
/// segments as needed, and the final segment is assigned on the resolved
/// container.
///
/// Indexing out of bounds, or into a value that is not an array, is a
/// contract violation and returns an error.
///
/// The document is mutated in place; callers that hand out snapshots must
/// clone before calling so earlier snapshots stay untouched.
///
/// # Examples
///
/// ```
/// use formwork_state::{get_value, set_value, parse_path};
/// use serde_json::json;
///
/// let mut doc = json!({});
/// let path = parse_path("profile.name");
/// set_value(&mut doc, &path, json!("Ada")).unwrap();
/// assert_eq!(get_value(&doc, &path), Some(&json!("Ada")));
/// ```
pub fn set_value(doc: &mut Value, path: &Path, value: Value) -> StateResult<()> {
    if path.is_empty() {
        return Ok(());
    }
    set_at(doc, path.segments(), value, path)
}

fn set_at(current: &mut Value, segments: &[Seg], value: Value, full_path: &Path) -> StateResult<()> {
    match segments {
        [] => {
            *current = value;
            Ok(())
        }
        [Seg::Key(key), rest @ ..] => {
            // Key segments create intermediate objects as needed
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            let obj = current.as_object_mut().unwrap();

            if rest.is_empty() {
                obj.insert(key.clone(), value);
            } else {
                let entry = obj.entry(key.clone()).or_insert(Value::Null);
                set_at(entry, rest, value, full_path)?;
            }
            Ok(())
        }
        [Seg::Index(idx), rest @ ..] => {
            if !current.is_array() {
                return Err(StateError::type_mismatch(
                    full_path.clone(),
                    "array",
                    value_type_name(current),
                ));
            }
            let arr = current.as_array_mut().unwrap();

            if *idx >= arr.len() {
                return Err(StateError::index_out_of_bounds(
                    full_path.clone(),
                    *idx,
                    arr.len(),
                ));
            }

            if rest.is_empty() {
                arr[*idx] = value;
            } else {
                set_at(&mut arr[*idx], rest, value, full_path)?;
            }
            Ok(())
        }
    }
}
