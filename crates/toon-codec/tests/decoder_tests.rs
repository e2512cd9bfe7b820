/// Decoder behavior tests for TOON v3.0.
///
/// Covers root dispatch, type inference for primitive tokens, the three
/// array bodies, strict-mode validation, and lenient degradation.
use toon_codec::{
    decode, decode_with_options, toon, DecodeOptions, ToonError, Value,
};

fn lenient() -> DecodeOptions {
    DecodeOptions::new().with_strict(false)
}

// ============================================================================
// Root dispatch
// ============================================================================

#[test]
fn empty_document_is_empty_object() {
    assert_eq!(decode("").unwrap(), toon!({}));
    assert_eq!(decode("\n\n").unwrap(), toon!({}));
}

#[test]
fn root_primitives() {
    assert_eq!(decode("null").unwrap(), Value::Null);
    assert_eq!(decode("true").unwrap(), Value::Bool(true));
    assert_eq!(decode("42").unwrap(), Value::Int(42));
    assert_eq!(decode("-2.5").unwrap(), Value::Float(-2.5));
    assert_eq!(decode("hello world").unwrap(), toon!("hello world"));
}

#[test]
fn root_quoted_string_with_colon() {
    assert_eq!(decode("\"a: b\"").unwrap(), toon!("a: b"));
}

#[test]
fn root_empty_array() {
    assert_eq!(decode("[0]:").unwrap(), toon!([]));
}

#[test]
fn root_inline_array() {
    assert_eq!(decode("[3]: 1,2,3").unwrap(), toon!([1, 2, 3]));
}

#[test]
fn root_tabular_array() {
    assert_eq!(
        decode("[2]{id}:\n  1\n  2").unwrap(),
        toon!([{"id": 1}, {"id": 2}])
    );
}

#[test]
fn bom_is_rejected() {
    assert!(matches!(
        decode("\u{FEFF}a: 1"),
        Err(ToonError::InvalidInput(_))
    ));
}

#[test]
fn content_after_root_array_is_rejected() {
    assert!(matches!(
        decode("[1]: 1\nkey: 2"),
        Err(ToonError::InvalidInput(_))
    ));
}

// ============================================================================
// Primitive token inference
// ============================================================================

#[test]
fn leading_zero_tokens_stay_strings() {
    assert_eq!(decode("n: 05").unwrap(), toon!({"n": "05"}));
    assert_eq!(decode("n: -07").unwrap(), toon!({"n": "-07"}));
}

#[test]
fn exponent_tokens_decode_as_numbers() {
    assert_eq!(decode("n: 1e3").unwrap(), toon!({"n": 1000}));
    assert_eq!(decode("n: 2.5e-2").unwrap(), toon!({"n": 0.025}));
}

#[test]
fn dangling_dot_tokens_stay_strings() {
    assert_eq!(decode("n: 1.").unwrap(), toon!({"n": "1."}));
    assert_eq!(decode("n: .5").unwrap(), toon!({"n": ".5"}));
}

#[test]
fn integer_overflow_falls_back_to_float() {
    assert_eq!(
        decode("n: 9223372036854775808").unwrap(),
        toon!({"n": 9223372036854775808.0})
    );
}

#[test]
fn quoted_tokens_unescape() {
    assert_eq!(
        decode("s: \"a\\nb\\tc\\\\d\\\"e\"").unwrap(),
        toon!({"s": "a\nb\tc\\d\"e"})
    );
}

#[test]
fn quoted_keywords_stay_strings() {
    assert_eq!(decode("s: \"true\"").unwrap(), toon!({"s": "true"}));
    assert_eq!(decode("s: \"42\"").unwrap(), toon!({"s": "42"}));
}

#[test]
fn invalid_escape_is_rejected() {
    assert!(matches!(
        decode("s: \"a\\qb\""),
        Err(ToonError::InvalidEscape { found: 'q', .. })
    ));
}

#[test]
fn unicode_escape_is_not_a_toon_escape() {
    assert!(matches!(
        decode("s: \"\\u0041\""),
        Err(ToonError::InvalidEscape { found: 'u', .. })
    ));
}

#[test]
fn unterminated_string_is_rejected() {
    assert!(matches!(
        decode("s: \"open"),
        Err(ToonError::UnterminatedString { line: 1 })
    ));
}

// ============================================================================
// Objects
// ============================================================================

#[test]
fn flat_object() {
    assert_eq!(
        decode("name: Alice\nage: 30").unwrap(),
        toon!({"name": "Alice", "age": 30})
    );
}

#[test]
fn nested_objects() {
    assert_eq!(
        decode("user:\n  name: Alice\n  meta:\n    ok: true").unwrap(),
        toon!({"user": {"name": "Alice", "meta": {"ok": true}}})
    );
}

#[test]
fn empty_object_field() {
    assert_eq!(decode("e:\nnext: 1").unwrap(), toon!({"e": {}, "next": 1}));
    assert_eq!(decode("e:").unwrap(), toon!({"e": {}}));
}

#[test]
fn quoted_keys() {
    assert_eq!(decode("\"my key\": 1").unwrap(), toon!({"my key": 1}));
    assert_eq!(decode("\"2nd\": x").unwrap(), toon!({"2nd": "x"}));
    assert_eq!(decode("\"a\\nb\": 1").unwrap(), toon!({"a\nb": 1}));
}

#[test]
fn duplicate_keys_last_write_wins() {
    assert_eq!(decode("a: 1\na: 2").unwrap(), toon!({"a": 2}));
}

#[test]
fn blank_lines_between_fields_are_fine() {
    assert_eq!(decode("a: 1\n\nb: 2").unwrap(), toon!({"a": 1, "b": 2}));
}

#[test]
fn missing_colon_is_rejected() {
    assert!(matches!(
        decode("a: 1\njust words"),
        Err(ToonError::MissingColon { line: 2 })
    ));
}

#[test]
fn empty_key_is_rejected() {
    assert!(matches!(decode(": 5"), Err(ToonError::InvalidKey { line: 1 })));
}

#[test]
fn non_identifier_bare_key_is_rejected_in_strict() {
    assert!(matches!(
        decode("my key: 1"),
        Err(ToonError::InvalidKey { line: 1 })
    ));
    assert_eq!(
        decode_with_options("my key: 1", &lenient()).unwrap(),
        toon!({"my key": 1})
    );
}

#[test]
fn junk_after_quoted_key_is_rejected() {
    assert!(matches!(
        decode("\"key\"x: 1"),
        Err(ToonError::UnexpectedCharacter { found: 'x', line: 1 })
    ));
}

// ============================================================================
// Indentation
// ============================================================================

#[test]
fn tab_indentation_rejected_in_strict() {
    assert!(matches!(
        decode("a:\n\tb: 1"),
        Err(ToonError::TabIndentation { line: 2 })
    ));
}

#[test]
fn odd_indentation_rejected_in_strict() {
    assert!(matches!(
        decode("a:\n   b: 1"),
        Err(ToonError::InvalidIndentation { found: 3, unit: 2, .. })
    ));
}

#[test]
fn over_indented_line_rejected_in_strict() {
    assert!(matches!(
        decode("a: 1\n    b: 2"),
        Err(ToonError::UnexpectedIndent { line: 2 })
    ));
}

#[test]
fn over_indented_line_skipped_in_lenient() {
    assert_eq!(
        decode_with_options("a: 1\n    b: 2\nc: 3", &lenient()).unwrap(),
        toon!({"a": 1, "c": 3})
    );
}

#[test]
fn crlf_rejected_in_strict_trimmed_in_lenient() {
    assert!(matches!(
        decode("a: 1\r\nb: 2"),
        Err(ToonError::UnexpectedCharacter { found: '\r', line: 1 })
    ));
    assert_eq!(
        decode_with_options("a: 1\r\nb: 2", &lenient()).unwrap(),
        toon!({"a": 1, "b": 2})
    );
}

#[test]
fn custom_indent_width() {
    let options = DecodeOptions::new().with_indent(4);
    assert_eq!(
        decode_with_options("a:\n    b: 1", &options).unwrap(),
        toon!({"a": {"b": 1}})
    );
}

// ============================================================================
// Inline arrays
// ============================================================================

#[test]
fn inline_with_quoted_delimiters() {
    assert_eq!(
        decode("a[2]: \"x,y\",z").unwrap(),
        toon!({"a": ["x,y", "z"]})
    );
}

#[test]
fn inline_length_mismatch_rejected_in_strict() {
    assert!(matches!(
        decode("a[3]: 1,2"),
        Err(ToonError::ArrayLengthMismatch { expected: 3, found: 2, .. })
    ));
    assert_eq!(
        decode_with_options("a[3]: 1,2", &lenient()).unwrap(),
        toon!({"a": [1, 2]})
    );
}

#[test]
fn wrong_delimiter_reports_delimiter_mismatch() {
    assert!(matches!(
        decode("a[3]: 1|2|3"),
        Err(ToonError::DelimiterMismatch { .. })
    ));
}

#[test]
fn tab_delimited_inline() {
    assert_eq!(
        decode("a[2\t]: x\ty").unwrap(),
        toon!({"a": ["x", "y"]})
    );
}

#[test]
fn pipe_delimited_inline_keeps_commas() {
    assert_eq!(
        decode("a[2|]: x,1|y").unwrap(),
        toon!({"a": ["x,1", "y"]})
    );
}

#[test]
fn malformed_headers_are_rejected() {
    assert!(matches!(
        decode("a[x]: 1"),
        Err(ToonError::InvalidArrayHeader { line: 1, .. })
    ));
    assert!(matches!(
        decode("k: 1\na[2"),
        Err(ToonError::InvalidArrayHeader { line: 2, .. })
    ));
    assert!(matches!(
        decode("a[2]x"),
        Err(ToonError::InvalidArrayHeader { .. })
    ));
    // Without a closing bracket there is no header, so a lone line is just a
    // string per root dispatch.
    assert_eq!(decode("a[2").unwrap(), toon!("a[2"));
    assert!(matches!(
        decode("a[1]{x}: 1"),
        Err(ToonError::InvalidArrayHeader { .. })
    ));
}

#[test]
fn huge_length_overflows() {
    assert!(matches!(
        decode("a[99999999999999999999999999]:"),
        Err(ToonError::Overflow { .. })
    ));
}

// ============================================================================
// Tabular arrays
// ============================================================================

#[test]
fn tabular_basic() {
    assert_eq!(
        decode("users[2]{id,name}:\n  1,Alice\n  2,Bob").unwrap(),
        toon!({"users": [{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}]})
    );
}

#[test]
fn tabular_quoted_cells() {
    assert_eq!(
        decode("r[1]{a,b}:\n  \"1,2\",\"x:y\"").unwrap(),
        toon!({"r": [{"a": "1,2", "b": "x:y"}]})
    );
}

#[test]
fn tabular_quoted_field_names() {
    assert_eq!(
        decode("r[1]{\"my field\",ok}:\n  1,2").unwrap(),
        toon!({"r": [{"my field": 1, "ok": 2}]})
    );
}

#[test]
fn tabular_sibling_after_rows() {
    assert_eq!(
        decode("t[1]{x}:\n  5\nnext: 1").unwrap(),
        toon!({"t": [{"x": 5}], "next": 1})
    );
}

#[test]
fn row_width_mismatch_rejected_in_strict() {
    assert!(matches!(
        decode("t[1]{x,y}:\n  1"),
        Err(ToonError::RowWidthMismatch { expected: 2, found: 1, .. })
    ));
}

#[test]
fn short_rows_pad_null_in_lenient() {
    assert_eq!(
        decode_with_options("t[2]{x,y}:\n  1\n  2,3", &lenient()).unwrap(),
        toon!({"t": [{"x": 1, "y": null}, {"x": 2, "y": 3}]})
    );
}

#[test]
fn missing_rows_rejected_in_strict() {
    assert!(matches!(
        decode("t[2]{x}:\n  1\nnext: 9"),
        Err(ToonError::ArrayLengthMismatch { expected: 2, found: 1, .. })
    ));
}

#[test]
fn surplus_rows_rejected_in_strict() {
    assert!(matches!(
        decode("t[1]{x}:\n  1\n  2"),
        Err(ToonError::ArrayLengthMismatch { .. })
    ));
}

#[test]
fn missing_body_is_end_of_input() {
    assert!(matches!(
        decode("t[2]{x}:"),
        Err(ToonError::UnexpectedEndOfInput { .. })
    ));
    assert!(matches!(
        decode("t[2]:"),
        Err(ToonError::UnexpectedEndOfInput { .. })
    ));
}

#[test]
fn blank_line_between_rows_rejected_in_strict() {
    assert!(matches!(
        decode("t[2]{x}:\n  1\n\n  2"),
        Err(ToonError::BlankLineInArray { .. })
    ));
    assert_eq!(
        decode_with_options("t[2]{x}:\n  1\n\n  2", &lenient()).unwrap(),
        toon!({"t": [{"x": 1}, {"x": 2}]})
    );
}

#[test]
fn row_with_delimiter_before_colon_is_still_a_row() {
    // "a,b:c" has its comma before the colon, so it reads as a row cell pair.
    assert_eq!(
        decode("t[1]{x,y}:\n  a,b:c").unwrap(),
        toon!({"t": [{"x": "a", "y": "b:c"}]})
    );
}

// ============================================================================
// Expanded lists
// ============================================================================

#[test]
fn list_of_mixed_items() {
    assert_eq!(
        decode("l[3]:\n  - 1\n  - a: 1\n    b: 2\n  - text").unwrap(),
        toon!({"l": [1, {"a": 1, "b": 2}, "text"]})
    );
}

#[test]
fn bare_hyphen_is_empty_object() {
    assert_eq!(decode("l[2]:\n  -\n  - 1").unwrap(), toon!({"l": [{}, 1]}));
}

#[test]
fn negative_numbers_as_items() {
    assert_eq!(
        decode("l[2]:\n  - -5\n  - -2.5").unwrap(),
        toon!({"l": [(-5), (-2.5)]})
    );
}

#[test]
fn nested_arrays_as_items() {
    assert_eq!(
        decode("m[2]:\n  - [3]: 1,2,3\n  - [3]: 4,5,6").unwrap(),
        toon!({"m": [[1, 2, 3], [4, 5, 6]]})
    );
}

#[test]
fn item_object_with_nested_first_field() {
    assert_eq!(
        decode("l[1]:\n  - user:\n      name: A\n    ok: true").unwrap(),
        toon!({"l": [{"user": {"name": "A"}, "ok": true}]})
    );
}

#[test]
fn item_object_with_tabular_first_field() {
    assert_eq!(
        decode("l[1]:\n  - t[2]{x}:\n      1\n      2\n    b: 3").unwrap(),
        toon!({"l": [{"t": [{"x": 1}, {"x": 2}], "b": 3}]})
    );
}

#[test]
fn malformed_hyphen_rejected() {
    assert!(matches!(
        decode("l[1]:\n  -x"),
        Err(ToonError::InvalidListItem { line: 2 })
    ));
}

#[test]
fn item_count_mismatch_rejected_in_strict() {
    assert!(matches!(
        decode("l[3]:\n  - 1\n  - 2\nnext: 1"),
        Err(ToonError::ArrayLengthMismatch { expected: 3, found: 2, .. })
    ));
    assert!(matches!(
        decode("l[1]:\n  - 1\n  - 2"),
        Err(ToonError::ArrayLengthMismatch { .. })
    ));
}

#[test]
fn blank_line_between_items_rejected_in_strict() {
    assert!(matches!(
        decode("l[2]:\n  - 1\n\n  - 2"),
        Err(ToonError::BlankLineInArray { .. })
    ));
}

#[test]
fn trailing_blank_after_complete_body_is_fine() {
    assert_eq!(decode("l[1]:\n  - 1\n\n").unwrap(), toon!({"l": [1]}));
    assert_eq!(decode("[2]:\n  - 1\n  - 2\n\n").unwrap(), toon!([1, 2]));
}

#[test]
fn nesting_bound_is_enforced() {
    let options = DecodeOptions::new().with_max_depth(2);
    assert!(matches!(
        decode_with_options("a:\n  b:\n    c:\n      d: 1", &options),
        Err(ToonError::NestingError { max: 2, .. })
    ));
    assert!(decode_with_options("a:\n  b: 1", &options).is_ok());
}
