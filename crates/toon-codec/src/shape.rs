//! Array form classification.
//!
//! The encoder renders an array in one of four shapes depending on its
//! contents; the classification drives which header and body get emitted.

use crate::value::Value;

/// The wire form of a non-empty array.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ArrayForm {
    /// All elements primitive: a single `[N]: v1,v2,…` line.
    PrimitiveInline,
    /// All elements are objects sharing one primitive-valued key set:
    /// `[N]{f1,f2}:` plus one row line per object. Field order is the first
    /// object's insertion order.
    Tabular(Vec<String>),
    /// All elements are arrays of primitives: one `- [M]: …` line each.
    ArrayOfArrays,
    /// Anything else: expanded `- ` list items.
    MixedExpanded,
}

/// Classify a non-empty array in a single pass over its elements.
pub(crate) fn classify(arr: &[Value]) -> ArrayForm {
    debug_assert!(!arr.is_empty());
    if arr.iter().all(Value::is_primitive) {
        return ArrayForm::PrimitiveInline;
    }
    if arr
        .iter()
        .all(|v| matches!(v, Value::Array(inner) if inner.iter().all(Value::is_primitive)))
    {
        return ArrayForm::ArrayOfArrays;
    }
    if let Some(fields) = tabular_fields(arr) {
        return ArrayForm::Tabular(fields);
    }
    ArrayForm::MixedExpanded
}

/// Column names when every element is an object with the same keys (by count
/// and name, order-insensitive) and only primitive values. The first object
/// must be non-empty; later objects are looked up by name.
fn tabular_fields(arr: &[Value]) -> Option<Vec<String>> {
    let first = match &arr[0] {
        Value::Object(map) if !map.is_empty() => map,
        _ => return None,
    };
    if first.values().any(|v| !v.is_primitive()) {
        return None;
    }
    let fields: Vec<String> = first.keys().cloned().collect();
    for item in &arr[1..] {
        let obj = item.as_object()?;
        if obj.len() != fields.len() {
            return None;
        }
        for field in &fields {
            match obj.get(field) {
                Some(v) if v.is_primitive() => {}
                _ => return None,
            }
        }
    }
    Some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toon;

    #[test]
    fn primitives_inline() {
        let arr = vec![toon!(1), toon!("a"), toon!(null)];
        assert_eq!(classify(&arr), ArrayForm::PrimitiveInline);
    }

    #[test]
    fn uniform_objects_are_tabular() {
        let arr = vec![
            toon!({"id": 1, "name": "Alice"}),
            toon!({"name": "Bob", "id": 2}),
        ];
        assert_eq!(
            classify(&arr),
            ArrayForm::Tabular(vec!["id".to_string(), "name".to_string()])
        );
    }

    #[test]
    fn differing_key_sets_expand() {
        let arr = vec![toon!({"id": 1}), toon!({"id": 2, "name": "Bob"})];
        assert_eq!(classify(&arr), ArrayForm::MixedExpanded);
    }

    #[test]
    fn nested_values_break_tabular() {
        let arr = vec![toon!({"id": 1, "tags": [1]}), toon!({"id": 2, "tags": [2]})];
        assert_eq!(classify(&arr), ArrayForm::MixedExpanded);
    }

    #[test]
    fn empty_first_object_is_not_tabular() {
        let arr = vec![toon!({}), toon!({})];
        assert_eq!(classify(&arr), ArrayForm::MixedExpanded);
    }

    #[test]
    fn nested_primitive_arrays() {
        let arr = vec![toon!([1, 2]), toon!([]), toon!(["x"])];
        assert_eq!(classify(&arr), ArrayForm::ArrayOfArrays);
    }

    #[test]
    fn deep_nesting_is_expanded() {
        let arr = vec![toon!([[1], [2]])];
        assert_eq!(classify(&arr), ArrayForm::MixedExpanded);
    }
}
