//! Error types for TOON encoding and decoding operations.
//!
//! All decode-side variants carry the 1-based line number where the problem
//! was detected; line numbers are assigned during line pre-tokenization.

use thiserror::Error;

/// Errors that can occur during TOON encoding or decoding.
#[derive(Error, Debug)]
pub enum ToonError {
    /// The input string was not valid JSON (JSON bridge functions only).
    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A backslash followed by anything other than `\` `"` `n` `r` `t`.
    #[error("invalid escape sequence `\\{found}` at line {line}")]
    InvalidEscape { found: char, line: usize },

    /// A quoted string or key with no closing quote, or a lone trailing backslash.
    #[error("unterminated quoted string at line {line}")]
    UnterminatedString { line: usize },

    /// An object field line with no `:` after the key.
    #[error("missing `:` after key at line {line}")]
    MissingColon { line: usize },

    /// A `key[N]{...}:` header that does not match the header grammar.
    #[error("malformed array header at line {line}: {reason}")]
    InvalidArrayHeader { line: usize, reason: String },

    /// An array body that splits to the declared length under a different
    /// delimiter than the one the header declares.
    #[error("delimiter mismatch at line {line}: {reason}")]
    DelimiterMismatch { line: usize, reason: String },

    /// An empty key, or an unquoted key that is not a valid identifier.
    #[error("invalid key at line {line}")]
    InvalidKey { line: usize },

    #[error("unexpected character `{found}` at line {line}")]
    UnexpectedCharacter { found: char, line: usize },

    /// The array body held a different number of elements than `[N]` declared.
    #[error("array declared {expected} elements but body has {found} at line {line}")]
    ArrayLengthMismatch {
        expected: usize,
        found: usize,
        line: usize,
    },

    /// A tabular row whose value count differs from the header's field count.
    #[error("row has {found} values but the header lists {expected} fields at line {line}")]
    RowWidthMismatch {
        expected: usize,
        found: usize,
        line: usize,
    },

    /// Leading spaces that are not a whole multiple of the indent unit.
    #[error("indentation of {found} spaces is not a multiple of {unit} at line {line}")]
    InvalidIndentation {
        found: usize,
        unit: usize,
        line: usize,
    },

    /// A tab character inside the indentation prefix.
    #[error("tab character in indentation at line {line}")]
    TabIndentation { line: usize },

    /// A line indented deeper than any construct that could own it.
    #[error("unexpected indentation at line {line}")]
    UnexpectedIndent { line: usize },

    /// A blank line between the elements of an array body.
    #[error("blank line inside array body at line {line}")]
    BlankLineInArray { line: usize },

    /// A list-item line whose hyphen is not followed by a space (and is not a
    /// bare `-`).
    #[error("malformed list item at line {line}")]
    InvalidListItem { line: usize },

    /// Value nesting exceeded the decoder's configured bound.
    #[error("nesting depth exceeds the configured maximum of {max} at line {line}")]
    NestingError { max: usize, line: usize },

    /// Dotted-key expansion would overwrite an incompatible existing value.
    #[error("path expansion conflict at key `{key}`")]
    ExpansionConflict { key: String },

    /// A token handed to the numeric parser that does not match the number
    /// grammar (leading zeros, dangling `.`, and similar).
    #[error("invalid numeric token `{token}`")]
    InvalidNumber { token: String },

    /// A numeric field (such as an array length) too large to represent.
    #[error("numeric overflow in `{token}`")]
    Overflow { token: String },

    /// Input rejected before parsing began (BOM, stray content after a root
    /// array, and similar).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The document ended while an array body was still owed its elements.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { expected: String },
}

/// Convenience alias used throughout toon-codec.
pub type Result<T> = std::result::Result<T, ToonError>;
