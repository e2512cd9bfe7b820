//! Post-decode dotted-key expansion.
//!
//! With [`crate::PathExpansion::Safe`] enabled, a decoded key like `a.b.c`
//! whose segments are all identifiers is exploded into nested objects:
//! `{"a.b.c": 1}` becomes `{"a": {"b": {"c": 1}}}`. Keys with any
//! non-identifier segment (`a.2b`, `a..b`, `a.b-c`) stay as single literal
//! keys. The pass runs over the whole tree, including objects inside arrays,
//! and is the inverse of the encoder's safe key folding.

use crate::error::{Result, ToonError};
use crate::scalar;
use crate::value::{ToonMap, Value};

/// Expand every eligible dotted key in `value`, bottom-up.
///
/// In strict mode a collision where the existing and incoming values
/// disagree about being objects — at the leaf, or anywhere along the path —
/// is an [`ToonError::ExpansionConflict`]. In non-strict mode the later
/// write wins, replacing whatever was in the way.
pub(crate) fn expand_paths(value: &mut Value, strict: bool) -> Result<()> {
    match value {
        Value::Object(map) => {
            for (_, child) in map.iter_mut() {
                expand_paths(child, strict)?;
            }
            if map.keys().any(|k| is_expandable(k)) {
                let previous = std::mem::take(map);
                let mut expanded = ToonMap::with_capacity(previous.len());
                for (key, val) in previous {
                    if is_expandable(&key) {
                        insert_path(&mut expanded, &key, val, strict)?;
                    } else {
                        merge_entry(&mut expanded, &key, val, strict, &key)?;
                    }
                }
                *map = expanded;
            }
        }
        Value::Array(arr) => {
            for element in arr {
                expand_paths(element, strict)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// A key participates in expansion when it contains a dot and every
/// dot-separated segment is an identifier.
fn is_expandable(key: &str) -> bool {
    key.contains('.') && key.split('.').all(scalar::is_identifier_segment)
}

/// Walk `a.b.c` into `map`, creating interior objects as needed and merging
/// the leaf.
fn insert_path(map: &mut ToonMap, key: &str, value: Value, strict: bool) -> Result<()> {
    let segments: Vec<&str> = key.split('.').collect();
    let Some((leaf, path)) = segments.split_last() else {
        return Ok(());
    };
    let mut current = map;
    for segment in path {
        match current.get(*segment) {
            Some(Value::Object(_)) => {}
            Some(_) => {
                // A non-object blocks the descent.
                if strict {
                    return Err(ToonError::ExpansionConflict {
                        key: key.to_string(),
                    });
                }
                current.insert((*segment).to_string(), Value::Object(ToonMap::new()));
            }
            None => {
                current.insert((*segment).to_string(), Value::Object(ToonMap::new()));
            }
        }
        let Some(Value::Object(next)) = current.get_mut(*segment) else {
            return Err(ToonError::ExpansionConflict {
                key: key.to_string(),
            });
        };
        current = next;
    }
    merge_entry(current, leaf, value, strict, key)
}

/// Insert `incoming` under `leaf`, merging object-into-object recursively.
/// Two non-objects are last-write-wins; an object/non-object disagreement is
/// a conflict in strict mode.
fn merge_entry(
    map: &mut ToonMap,
    leaf: &str,
    incoming: Value,
    strict: bool,
    full_key: &str,
) -> Result<()> {
    if !map.contains_key(leaf) {
        map.insert(leaf.to_string(), incoming);
        return Ok(());
    }
    let Some(existing) = map.get_mut(leaf) else {
        return Ok(());
    };
    match (existing, incoming) {
        (Value::Object(a), Value::Object(b)) => {
            for (k, v) in b {
                merge_entry(a, &k, v, strict, full_key)?;
            }
            Ok(())
        }
        (slot, incoming) => {
            if strict && (matches!(slot, Value::Object(_)) != incoming.is_object()) {
                return Err(ToonError::ExpansionConflict {
                    key: full_key.to_string(),
                });
            }
            *slot = incoming;
            Ok(())
        }
    }
}
