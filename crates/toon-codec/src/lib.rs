//! # toon-codec
//!
//! Pure-Rust encoder and decoder for **TOON (Token-Oriented Object Notation)**
//! v3.0, a line-oriented indented text format that carries the JSON data
//! model in a fraction of the tokens.
//!
//! TOON drops the braces, brackets, and most of the quotes: nested objects
//! are expressed by indentation, uniform object arrays compress into tables
//! with a single header, and strings are only quoted when reading them back
//! bare would change their meaning. The decoder validates every declared
//! array length on the way back in, and `decode(encode(v))` returns the
//! value it was given.
//!
//! ## Quick start
//!
//! ```rust
//! use toon_codec::{decode, encode, toon};
//!
//! let value = toon!({
//!     "name": "Alice",
//!     "scores": [95, 87, 92]
//! });
//!
//! let text = encode(&value).unwrap();
//! assert_eq!(text, "name: Alice\nscores[3]: 95,87,92");
//!
//! let back = decode(&text).unwrap();
//! assert_eq!(back, value);
//! ```
//!
//! Uniform object arrays become tables — one header, one row per object:
//!
//! ```rust
//! use toon_codec::{encode, toon};
//!
//! let users = toon!({"users": [
//!     {"id": 1, "name": "Alice"},
//!     {"id": 2, "name": "Bob"}
//! ]});
//! assert_eq!(
//!     encode(&users).unwrap(),
//!     "users[2]{id,name}:\n  1,Alice\n  2,Bob"
//! );
//! ```
//!
//! ## Working with JSON text
//!
//! The codec operates on [`Value`] trees. When the data is JSON text, the
//! bridge functions parse and re-serialize through `serde_json`:
//!
//! ```rust
//! use toon_codec::{decode_to_json, encode_json};
//!
//! let toon = encode_json(r#"{"tags":["a","b","c"]}"#).unwrap();
//! assert_eq!(toon, "tags[3]: a,b,c");
//! assert_eq!(decode_to_json(&toon).unwrap(), r#"{"tags":["a","b","c"]}"#);
//! ```
//!
//! ## Options
//!
//! [`EncodeOptions`] selects the indent width, the active delimiter (comma,
//! tab, or pipe), and dotted-key folding. [`DecodeOptions`] selects the
//! indent width, strict or lenient validation, dotted-key expansion, and the
//! recursion bound. See [`options`] for details.
//!
//! ## Modules
//!
//! - [`encoder`] — [`Value`] → TOON text
//! - [`decoder`] — TOON text → [`Value`]
//! - [`value`] — the value model and its ordered object map
//! - [`options`] — encode/decode configuration
//! - [`error`] — error types for encode/decode failures

pub mod decoder;
pub mod encoder;
pub mod error;
mod expand;
mod macros;
pub mod options;
mod scalar;
mod shape;
pub mod value;

pub use decoder::{decode, decode_with_options};
pub use encoder::{encode, encode_with_options};
pub use error::{Result, ToonError};
pub use options::{DecodeOptions, Delimiter, EncodeOptions, KeyFolding, PathExpansion};
pub use value::{ToonMap, Value};

/// Encode a JSON string as TOON with default options.
///
/// # Errors
///
/// Returns an error if `json` is not valid JSON.
pub fn encode_json(json: &str) -> Result<String> {
    encode_json_with_options(json, &EncodeOptions::default())
}

/// Encode a JSON string as TOON with explicit options.
///
/// # Errors
///
/// Returns an error if `json` is not valid JSON.
pub fn encode_json_with_options(json: &str, options: &EncodeOptions) -> Result<String> {
    let parsed: serde_json::Value = serde_json::from_str(json)?;
    encode_with_options(&Value::from(parsed), options)
}

/// Decode a TOON string into minified JSON text with default options.
///
/// # Errors
///
/// Returns an error if `toon` is not valid TOON.
pub fn decode_to_json(toon: &str) -> Result<String> {
    decode_to_json_with_options(toon, &DecodeOptions::default())
}

/// Decode a TOON string into minified JSON text with explicit options.
///
/// # Errors
///
/// Returns an error if `toon` is not valid TOON.
pub fn decode_to_json_with_options(toon: &str, options: &DecodeOptions) -> Result<String> {
    let value = decode_with_options(toon, options)?;
    Ok(serde_json::to_string(&serde_json::Value::from(value))?)
}
