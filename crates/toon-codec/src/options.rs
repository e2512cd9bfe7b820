//! Configuration for encoding and decoding.
//!
//! Both option structs use a builder style: start from `default()` (or
//! `new()`) and chain `with_*` calls.
//!
//! ```rust
//! use toon_codec::{DecodeOptions, Delimiter, EncodeOptions};
//!
//! let enc = EncodeOptions::new().with_delimiter(Delimiter::Pipe);
//! let dec = DecodeOptions::new().with_strict(false);
//! assert_eq!(enc.indent, 2);
//! assert_eq!(dec.indent, 2);
//! ```

/// Delimiter separating inline array values, tabular header fields, and
/// tabular row cells.
///
/// The choice is encoded on the wire: tab and pipe append their byte to the
/// array length inside the header (`[3\t]`, `[3|]`), comma appends nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    /// The separator character itself.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }

    /// The suffix placed after the length inside `[N…]` headers. Comma is the
    /// default on the wire and gets no suffix.
    #[must_use]
    pub const fn header_suffix(self) -> &'static str {
        match self {
            Delimiter::Comma => "",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }

    /// Human-readable name, used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Delimiter::Comma => "comma",
            Delimiter::Tab => "tab",
            Delimiter::Pipe => "pipe",
        }
    }
}

/// Whether the encoder folds chains of single-entry objects into dotted keys
/// (`a: {b: {c: v}}` → `a.b.c: v`). `Safe` is the exact inverse of
/// [`PathExpansion::Safe`] on the decode side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyFolding {
    #[default]
    Off,
    Safe,
}

/// Whether the decoder expands dotted keys into nested objects after parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PathExpansion {
    #[default]
    Off,
    Safe,
}

/// Options controlling TOON output.
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    /// Spaces per indentation level. Must be at least 1.
    pub indent: usize,
    /// The document's active delimiter.
    pub delimiter: Delimiter,
    /// Dotted-key folding mode.
    pub key_folding: KeyFolding,
    /// Maximum number of segments in a folded key when folding is enabled.
    pub flatten_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            indent: 2,
            delimiter: Delimiter::default(),
            key_folding: KeyFolding::default(),
            flatten_depth: usize::MAX,
        }
    }
}

impl EncodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_key_folding(mut self, key_folding: KeyFolding) -> Self {
        self.key_folding = key_folding;
        self
    }

    #[must_use]
    pub fn with_flatten_depth(mut self, flatten_depth: usize) -> Self {
        self.flatten_depth = flatten_depth;
        self
    }
}

/// Options controlling TOON parsing.
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    /// Spaces per indentation level. Must be at least 1.
    pub indent: usize,
    /// When true (the default), all length, width, indentation, and
    /// blank-line checks are enforced. When false, shape problems degrade to
    /// best effort: unexpected lines are skipped and short rows are padded
    /// with nulls.
    pub strict: bool,
    /// Post-decode dotted-key expansion mode.
    pub expand_paths: PathExpansion,
    /// Recursion bound; inputs nesting deeper than this are rejected.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            indent: 2,
            strict: true,
            expand_paths: PathExpansion::default(),
            max_depth: 128,
        }
    }
}

impl DecodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_expand_paths(mut self, expand_paths: PathExpansion) -> Self {
        self.expand_paths = expand_paths;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
