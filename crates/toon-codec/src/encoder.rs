//! TOON v3.0 encoder — renders a [`Value`] tree as Token-Oriented Object
//! Notation.
//!
//! The encoder walks the tree once, driven by the current indentation depth
//! and the document's active delimiter:
//!
//! - Nested objects are expressed by indentation, no braces
//! - Primitive arrays go inline: `key[N]: v1,v2,v3`
//! - Uniform object arrays compress to tables: `key[N]{f1,f2}:` plus rows
//! - Arrays of primitive arrays get one `- [M]: …` line each
//! - Everything else expands to `- ` list items
//! - Strings are quoted only when reading them back bare would change their
//!   meaning (see the quoting rules in [`crate::scalar`])
//!
//! # Example
//! ```
//! use toon_codec::{encode, toon};
//!
//! let value = toon!({"name": "Alice", "age": 30, "tags": ["rust", "wasm"]});
//! let out = encode(&value).unwrap();
//! assert_eq!(out, "name: Alice\nage: 30\ntags[2]: rust,wasm");
//! ```

use std::borrow::Cow;

use crate::error::Result;
use crate::options::{EncodeOptions, KeyFolding};
use crate::scalar;
use crate::shape::{classify, ArrayForm};
use crate::value::{ToonMap, Value};

/// Encode a value with default options.
pub fn encode(value: &Value) -> Result<String> {
    encode_with_options(value, &EncodeOptions::default())
}

/// Encode a value with explicit options.
pub fn encode_with_options(value: &Value, options: &EncodeOptions) -> Result<String> {
    let mut encoder = Encoder {
        options,
        out: String::with_capacity(256),
    };
    encoder.root(value);
    Ok(encoder.out)
}

struct Encoder<'o> {
    options: &'o EncodeOptions,
    out: String,
}

impl Encoder<'_> {
    fn indent(&mut self, depth: usize) {
        for _ in 0..depth * self.options.indent {
            self.out.push(' ');
        }
    }

    fn primitive(&mut self, value: &Value) {
        scalar::write_primitive(value, self.options.delimiter, &mut self.out);
    }

    /// Root dispatch: a bare primitive token, a headerless root array, the
    /// empty output for an empty object, or fields at depth 0.
    fn root(&mut self, value: &Value) {
        match value {
            Value::Object(map) if map.is_empty() => {}
            Value::Object(map) => self.object_fields(map, 0),
            Value::Array(arr) => self.array_field(arr, 0),
            primitive => self.primitive(primitive),
        }
    }

    /// The entries of `map` as they will appear on the wire: the map's own
    /// entries, or dotted-key folded chains when folding is enabled.
    fn entries<'v>(&self, map: &'v ToonMap) -> Vec<(Cow<'v, str>, &'v Value)> {
        match self.options.key_folding {
            KeyFolding::Off => map
                .iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), v))
                .collect(),
            KeyFolding::Safe => fold_entries(map, self.options.flatten_depth),
        }
    }

    fn object_fields(&mut self, map: &ToonMap, depth: usize) {
        let entries = self.entries(map);
        for (i, (key, value)) in entries.iter().enumerate() {
            if i > 0 {
                self.out.push('\n');
            }
            self.indent(depth);
            scalar::write_key(key, &mut self.out);
            self.field_value(value, depth);
        }
    }

    /// Everything after the key on a field line. `depth` is the depth of the
    /// field line itself; nested bodies go one level deeper.
    fn field_value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Object(map) if map.is_empty() => self.out.push(':'),
            Value::Object(map) => {
                self.out.push_str(":\n");
                self.object_fields(map, depth + 1);
            }
            Value::Array(arr) => self.array_field(arr, depth),
            primitive => {
                self.out.push_str(": ");
                self.primitive(primitive);
            }
        }
    }

    /// `[N<Δ>]` plus the form-dependent body. Also used for root arrays,
    /// which are this production with no preceding key.
    fn array_field(&mut self, arr: &[Value], depth: usize) {
        self.array_header(arr.len());
        if arr.is_empty() {
            self.out.push(':');
            return;
        }
        match classify(arr) {
            ArrayForm::PrimitiveInline => {
                self.out.push_str(": ");
                self.inline_values(arr);
            }
            ArrayForm::Tabular(fields) => {
                let d = self.options.delimiter.as_char();
                self.out.push('{');
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        self.out.push(d);
                    }
                    scalar::write_key(field, &mut self.out);
                }
                self.out.push_str("}:");
                self.tabular_rows(arr, &fields, depth + 1);
            }
            ArrayForm::ArrayOfArrays => {
                self.out.push(':');
                self.inner_array_lines(arr, depth + 1);
            }
            ArrayForm::MixedExpanded => {
                self.out.push(':');
                self.list_items(arr, depth + 1);
            }
        }
    }

    fn array_header(&mut self, len: usize) {
        self.out.push('[');
        self.out.push_str(&len.to_string());
        self.out.push_str(self.options.delimiter.header_suffix());
        self.out.push(']');
    }

    fn inline_values(&mut self, arr: &[Value]) {
        let d = self.options.delimiter.as_char();
        for (i, value) in arr.iter().enumerate() {
            if i > 0 {
                self.out.push(d);
            }
            self.primitive(value);
        }
    }

    /// One line per object, values in column order. A column a later object
    /// is missing emits the literal `null`.
    fn tabular_rows(&mut self, arr: &[Value], fields: &[String], row_depth: usize) {
        let d = self.options.delimiter.as_char();
        for item in arr {
            self.out.push('\n');
            self.indent(row_depth);
            if let Value::Object(map) = item {
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        self.out.push(d);
                    }
                    match map.get(field) {
                        Some(value) => self.primitive(value),
                        None => self.out.push_str("null"),
                    }
                }
            }
        }
    }

    /// Array-of-arrays body: each inner array on its own hyphen line with an
    /// inline header, `- [M]: v1,v2`.
    fn inner_array_lines(&mut self, arr: &[Value], item_depth: usize) {
        for item in arr {
            self.out.push('\n');
            self.indent(item_depth);
            self.out.push_str("- ");
            if let Value::Array(values) = item {
                self.array_header(values.len());
                self.out.push(':');
                if !values.is_empty() {
                    self.out.push(' ');
                    self.inline_values(values);
                }
            }
        }
    }

    /// Expanded list body. `item_depth` is the depth of the hyphen lines.
    fn list_items(&mut self, arr: &[Value], item_depth: usize) {
        for item in arr {
            self.out.push('\n');
            self.indent(item_depth);
            match item {
                // An empty object has no first field to put on the hyphen
                // line; it is a bare hyphen with no trailing space.
                Value::Object(map) if map.is_empty() => self.out.push('-'),
                Value::Object(map) => {
                    self.out.push_str("- ");
                    self.item_object(map, item_depth);
                }
                Value::Array(inner) => {
                    self.out.push_str("- ");
                    self.item_array(inner, item_depth);
                }
                primitive => {
                    self.out.push_str("- ");
                    self.primitive(primitive);
                }
            }
        }
    }

    /// An array appearing directly as a list item: inline when its elements
    /// are all primitive, nested expanded items otherwise.
    fn item_array(&mut self, inner: &[Value], item_depth: usize) {
        self.array_header(inner.len());
        if inner.is_empty() {
            self.out.push(':');
        } else if inner.iter().all(Value::is_primitive) {
            self.out.push_str(": ");
            self.inline_values(inner);
        } else {
            self.out.push(':');
            self.list_items(inner, item_depth + 1);
        }
    }

    /// A non-empty object as a list item: the first field rides the hyphen
    /// line, remaining fields sit one level deeper than the hyphen, and all
    /// field bodies (tabular rows, nested object content) land two levels
    /// deeper than the hyphen.
    fn item_object(&mut self, map: &ToonMap, item_depth: usize) {
        let entries = self.entries(map);
        let mut iter = entries.iter();
        if let Some((key, value)) = iter.next() {
            scalar::write_key(key, &mut self.out);
            self.field_value(value, item_depth + 1);
        }
        for (key, value) in iter {
            self.out.push('\n');
            self.indent(item_depth + 1);
            scalar::write_key(key, &mut self.out);
            self.field_value(value, item_depth + 1);
        }
    }
}

/// Fold each entry's chain of nested single-entry objects into a dotted key,
/// bounded by `flatten_depth` segments. A fold whose resulting name would
/// collide with another entry's name reverts to the original key.
fn fold_entries(map: &ToonMap, flatten_depth: usize) -> Vec<(Cow<'_, str>, &Value)> {
    let mut folded: Vec<(Cow<'_, str>, &Value)> = map
        .iter()
        .map(|(key, value)| fold_chain(key, value, flatten_depth))
        .collect();

    let mut duplicated: Vec<usize> = Vec::new();
    for (i, (name, _)) in folded.iter().enumerate() {
        let clashes = folded
            .iter()
            .enumerate()
            .any(|(j, (other, _))| i != j && name == other);
        if clashes {
            duplicated.push(i);
        }
    }
    for (i, (original_key, original_value)) in map.iter().enumerate() {
        if duplicated.contains(&i) {
            folded[i] = (Cow::Borrowed(original_key.as_str()), original_value);
        }
    }
    folded
}

fn fold_chain<'v>(key: &'v str, value: &'v Value, flatten_depth: usize) -> (Cow<'v, str>, &'v Value) {
    if !scalar::is_identifier_segment(key) {
        return (Cow::Borrowed(key), value);
    }
    let mut segments = vec![key];
    let mut current = value;
    loop {
        if segments.len() >= flatten_depth {
            break;
        }
        let Value::Object(map) = current else { break };
        if map.len() != 1 {
            break;
        }
        let Some((next_key, next_value)) = map.iter().next() else {
            break;
        };
        if !scalar::is_identifier_segment(next_key) {
            break;
        }
        segments.push(next_key);
        current = next_value;
    }
    if segments.len() == 1 {
        (Cow::Borrowed(key), value)
    } else {
        (Cow::Owned(segments.join(".")), current)
    }
}
