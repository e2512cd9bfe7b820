//! TOON v3.0 decoder — parses Token-Oriented Object Notation back into a
//! [`Value`] tree.
//!
//! Decoding happens in two stages:
//!
//! 1. **Line pre-tokenization** — the input is split on `\n` and each line
//!    gets its 1-based number, indentation depth, and right-trimmed content.
//!    Strict mode rejects tabs in the indentation prefix, indentation that is
//!    not a whole multiple of the indent unit, and CRLF line endings here.
//! 2. **Recursive descent** — a cursor walks the line stream, assembling
//!    objects, the three array bodies (inline, tabular, expanded list), and
//!    primitive tokens. Array headers declare their length and every body is
//!    cross-checked against it in strict mode.
//!
//! The disambiguation that makes tabular bodies parse correctly: at the
//! expected row depth, a line counts as a row only if it has no unquoted
//! colon, or an unquoted delimiter appears before the first unquoted colon.
//! Anything else is the start of an outer sibling key.
//!
//! # Example
//! ```
//! use toon_codec::{decode, toon};
//!
//! let value = decode("users[2]{id,name}:\n  1,Alice\n  2,Bob").unwrap();
//! assert_eq!(
//!     value,
//!     toon!({"users": [{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}]})
//! );
//! ```

use crate::error::{Result, ToonError};
use crate::expand;
use crate::options::{DecodeOptions, Delimiter, PathExpansion};
use crate::scalar;
use crate::value::{ToonMap, Value};

/// Decode a TOON string with default options (strict mode on).
pub fn decode(input: &str) -> Result<Value> {
    decode_with_options(input, &DecodeOptions::default())
}

/// Decode a TOON string with explicit options.
pub fn decode_with_options(input: &str, options: &DecodeOptions) -> Result<Value> {
    if input.starts_with('\u{FEFF}') {
        return Err(ToonError::InvalidInput(
            "byte-order mark at start of document".to_string(),
        ));
    }
    let lines = pretokenize(input, options)?;
    let mut parser = Parser {
        lines,
        pos: 0,
        options,
    };
    let mut value = parser.document()?;
    if options.expand_paths == PathExpansion::Safe {
        expand::expand_paths(&mut value, options.strict)?;
    }
    Ok(value)
}

/// One pre-tokenized input line.
struct Line<'a> {
    /// 1-based line number, for error context.
    number: usize,
    /// Indentation depth in whole indent units. Zero for blank lines.
    depth: usize,
    /// Content with indentation and trailing spaces/tabs removed.
    content: &'a str,
    blank: bool,
}

fn pretokenize<'a>(input: &'a str, options: &DecodeOptions) -> Result<Vec<Line<'a>>> {
    let unit = options.indent.max(1);
    let mut lines = Vec::new();
    for (idx, mut raw) in input.split('\n').enumerate() {
        let number = idx + 1;
        if raw.ends_with('\r') {
            if options.strict {
                return Err(ToonError::UnexpectedCharacter {
                    found: '\r',
                    line: number,
                });
            }
            raw = &raw[..raw.len() - 1];
        }
        let rest = raw.trim_start_matches([' ', '\t']);
        let lead = &raw[..raw.len() - rest.len()];
        let content = rest.trim_end_matches([' ', '\t']);
        let blank = content.is_empty();
        let mut depth = 0;
        if !blank {
            if options.strict && lead.contains('\t') {
                return Err(ToonError::TabIndentation { line: number });
            }
            if options.strict && lead.len() % unit != 0 {
                return Err(ToonError::InvalidIndentation {
                    found: lead.len(),
                    unit,
                    line: number,
                });
            }
            depth = lead.len() / unit;
        }
        lines.push(Line {
            number,
            depth,
            content,
            blank,
        });
    }
    Ok(lines)
}

/// Parsed metadata from an array header like `key[3|]{a|b}:` or `[2]: 1,2`.
struct ArrayHeader<'a> {
    /// Declared element count; bodies are validated against it.
    len: usize,
    /// This array's local delimiter, from the byte after the length.
    delimiter: Delimiter,
    /// Tabular column names when a `{…}` field list is present.
    fields: Option<Vec<String>>,
    /// Raw same-line body text after `:` for inline arrays.
    inline: Option<&'a str>,
    /// Line the header appeared on.
    line: usize,
}

struct Parser<'a, 'o> {
    lines: Vec<Line<'a>>,
    pos: usize,
    options: &'o DecodeOptions,
}

impl<'a> Parser<'a, '_> {
    fn peek(&self) -> Option<&Line<'a>> {
        self.lines.get(self.pos)
    }

    fn peek_nonblank(&self) -> Option<&Line<'a>> {
        self.lines[self.pos..].iter().find(|l| !l.blank)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn last_line_number(&self) -> usize {
        self.lines.last().map_or(1, |l| l.number)
    }

    fn check_depth(&self, vdepth: usize, line: usize) -> Result<()> {
        if vdepth > self.options.max_depth {
            return Err(ToonError::NestingError {
                max: self.options.max_depth,
                line,
            });
        }
        Ok(())
    }

    /// Root dispatch: empty document, root array, lone primitive, or object.
    fn document(&mut self) -> Result<Value> {
        while matches!(self.peek(), Some(l) if l.blank) {
            self.bump();
        }
        let Some(first) = self.peek() else {
            return Ok(Value::Object(ToonMap::new()));
        };

        if first.content.starts_with('[') {
            let (content, number) = (first.content, first.number);
            let header = self.parse_header(content, number)?;
            self.bump();
            let arr = self.array_body(header, 1, 0)?;
            self.expect_document_end()?;
            return Ok(Value::Array(arr));
        }

        if self.root_is_primitive() {
            let (content, number) = (first.content, first.number);
            let value = scalar::parse_primitive_token(content, number)?;
            self.bump();
            self.expect_document_end()?;
            return Ok(value);
        }

        self.object(0, 0)
    }

    /// A lone non-blank line with no key structure decodes as a primitive: a
    /// complete quoted string, or a token free of unquoted colons and `[…]`
    /// headers.
    fn root_is_primitive(&self) -> bool {
        let mut nonblank = self.lines[self.pos..].iter().filter(|l| !l.blank);
        let Some(first) = nonblank.next() else {
            return false;
        };
        if nonblank.next().is_some() || first.depth != 0 {
            return false;
        }
        let content = first.content;
        if content.starts_with('"') {
            // A complete quoted token (or an unterminated one, which the
            // primitive path reports more precisely than the key path).
            return match scalar::find_closing_quote(content, 1) {
                Some(end) => end == content.len() - 1,
                None => true,
            };
        }
        let has_header =
            find_unquoted(content, b'[').is_some_and(|open| content[open..].contains(']'));
        find_unquoted(content, b':').is_none() && !has_header
    }

    fn expect_document_end(&mut self) -> Result<()> {
        while let Some(line) = self.peek() {
            if !line.blank {
                return Err(ToonError::InvalidInput(format!(
                    "unexpected content at line {}",
                    line.number
                )));
            }
            self.bump();
        }
        Ok(())
    }

    /// Parse an object whose field lines sit at `depth`.
    fn object(&mut self, depth: usize, vdepth: usize) -> Result<Value> {
        if let Some(line) = self.peek_nonblank() {
            self.check_depth(vdepth, line.number)?;
        }
        let mut map = ToonMap::new();
        while let Some(line) = self.peek() {
            if line.blank {
                self.bump();
                continue;
            }
            if line.depth < depth {
                break;
            }
            if line.depth > depth {
                if self.options.strict {
                    return Err(ToonError::UnexpectedIndent { line: line.number });
                }
                self.bump();
                continue;
            }
            let (content, number) = (line.content, line.number);
            self.field_into(content, number, depth, vdepth, &mut map)?;
        }
        Ok(Value::Object(map))
    }

    /// Parse one `key…` field from `content` (the current line) into `map`,
    /// consuming the line and any body lines the field owns. `depth` is the
    /// logical depth of the field; its bodies live at `depth + 1`.
    fn field_into(
        &mut self,
        content: &'a str,
        number: usize,
        depth: usize,
        vdepth: usize,
        map: &mut ToonMap,
    ) -> Result<()> {
        let (key, rest) = self.parse_key(content, number)?;

        if rest.starts_with('[') {
            let header = self.parse_header(rest, number)?;
            self.bump();
            let arr = self.array_body(header, depth + 1, vdepth + 1)?;
            map.insert(key, Value::Array(arr));
            return Ok(());
        }

        // parse_key only returns on ':' or '['
        let after = rest[1..].trim_matches(' ');
        if !after.is_empty() {
            let value = scalar::parse_primitive_token(after, number)?;
            map.insert(key, value);
            self.bump();
            return Ok(());
        }

        // Bare `key:` — nested object when the following lines are deeper,
        // empty object otherwise.
        self.bump();
        match self.peek_nonblank() {
            Some(next) if next.depth > depth => {
                let obj = self.object(depth + 1, vdepth + 1)?;
                map.insert(key, obj);
            }
            _ => {
                map.insert(key, Value::Object(ToonMap::new()));
            }
        }
        Ok(())
    }

    /// Split `content` into a key and the remainder starting at `:` or `[`.
    fn parse_key(&self, content: &'a str, line: usize) -> Result<(String, &'a str)> {
        if content.starts_with('"') {
            let end = scalar::find_closing_quote(content, 1)
                .ok_or(ToonError::UnterminatedString { line })?;
            let key = scalar::unescape(&content[1..end], line)?;
            let rest = &content[end + 1..];
            return match rest.as_bytes().first() {
                Some(&b':') | Some(&b'[') => Ok((key, rest)),
                Some(_) => Err(ToonError::UnexpectedCharacter {
                    found: rest.chars().next().unwrap_or('"'),
                    line,
                }),
                None => Err(ToonError::MissingColon { line }),
            };
        }
        let colon = content.find(':');
        let bracket = content.find('[');
        let end = match (colon, bracket) {
            (Some(c), Some(b)) => c.min(b),
            (Some(c), None) => c,
            (None, Some(b)) => b,
            (None, None) => return Err(ToonError::MissingColon { line }),
        };
        if end == 0 {
            return Err(ToonError::InvalidKey { line });
        }
        let key = &content[..end];
        if self.options.strict && !scalar::is_unquoted_key(key) {
            return Err(ToonError::InvalidKey { line });
        }
        Ok((key.to_string(), &content[end..]))
    }

    /// Parse `[digits (tab|pipe)?] ('{' fields '}')? ':' inline?` from `rest`
    /// (which starts at the `[`).
    fn parse_header(&self, rest: &'a str, line: usize) -> Result<ArrayHeader<'a>> {
        let close = rest.find(']').ok_or_else(|| ToonError::InvalidArrayHeader {
            line,
            reason: "missing `]`".to_string(),
        })?;
        let inside = &rest[1..close];
        let (digits, delimiter) = match inside.as_bytes().last() {
            Some(&b'\t') => (&inside[..inside.len() - 1], Delimiter::Tab),
            Some(&b'|') => (&inside[..inside.len() - 1], Delimiter::Pipe),
            _ => (inside, Delimiter::Comma),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ToonError::InvalidArrayHeader {
                line,
                reason: format!("invalid length `{inside}`"),
            });
        }
        let len: usize = digits.parse().map_err(|_| ToonError::Overflow {
            token: digits.to_string(),
        })?;

        let mut after = &rest[close + 1..];
        let mut fields = None;
        if let Some(field_text) = after.strip_prefix('{') {
            let brace = find_unquoted(field_text, b'}').ok_or_else(|| {
                ToonError::InvalidArrayHeader {
                    line,
                    reason: "missing `}`".to_string(),
                }
            })?;
            fields = Some(self.parse_field_list(&field_text[..brace], delimiter, line)?);
            after = &field_text[brace + 1..];
        }
        let Some(tail) = after.strip_prefix(':') else {
            return Err(ToonError::InvalidArrayHeader {
                line,
                reason: "missing `:`".to_string(),
            });
        };
        let inline = if tail.is_empty() {
            None
        } else {
            Some(tail.strip_prefix(' ').unwrap_or(tail))
        };
        if fields.is_some() && inline.is_some() {
            return Err(ToonError::InvalidArrayHeader {
                line,
                reason: "inline content after a field list".to_string(),
            });
        }
        Ok(ArrayHeader {
            len,
            delimiter,
            fields,
            inline,
            line,
        })
    }

    /// Each entry of a `{…}` field list is parsed as a key: quoted fields
    /// unescape, bare fields must be identifiers in strict mode.
    fn parse_field_list(
        &self,
        text: &str,
        delimiter: Delimiter,
        line: usize,
    ) -> Result<Vec<String>> {
        let mut fields = Vec::new();
        for piece in split_delimited(text, delimiter.as_char()) {
            let piece = piece.trim_matches(' ');
            if piece.starts_with('"') {
                let end = scalar::find_closing_quote(piece, 1)
                    .ok_or(ToonError::UnterminatedString { line })?;
                if end != piece.len() - 1 {
                    return Err(ToonError::UnexpectedCharacter {
                        found: piece[end + 1..].chars().next().unwrap_or('"'),
                        line,
                    });
                }
                fields.push(scalar::unescape(&piece[1..end], line)?);
            } else {
                if self.options.strict && !scalar::is_unquoted_key(piece) {
                    return Err(ToonError::InvalidKey { line });
                }
                fields.push(piece.to_string());
            }
        }
        Ok(fields)
    }

    /// Parse the body the header calls for. `body_depth` is the depth rows or
    /// items are expected at; `vdepth` is the array's own nesting depth.
    fn array_body(
        &mut self,
        header: ArrayHeader<'a>,
        body_depth: usize,
        vdepth: usize,
    ) -> Result<Vec<Value>> {
        self.check_depth(vdepth, header.line)?;

        if let Some(inline) = header.inline {
            let pieces = split_delimited(inline, header.delimiter.as_char());
            if self.options.strict && pieces.len() != header.len {
                return Err(self.inline_mismatch(inline, pieces.len(), &header));
            }
            let mut values = Vec::with_capacity(pieces.len());
            for piece in pieces {
                values.push(scalar::parse_primitive_token(piece, header.line)?);
            }
            return Ok(values);
        }

        if header.len == 0 {
            return Ok(Vec::new());
        }

        if header.fields.is_some() {
            self.tabular_rows(&header, body_depth, vdepth)
        } else {
            self.list_items(&header, body_depth, vdepth)
        }
    }

    /// A count mismatch in an inline body reports as a delimiter mismatch
    /// when splitting by one of the other standard delimiters would have
    /// produced the declared length.
    fn inline_mismatch(&self, raw: &str, found: usize, header: &ArrayHeader) -> ToonError {
        for alt in [Delimiter::Comma, Delimiter::Tab, Delimiter::Pipe] {
            if alt != header.delimiter && split_delimited(raw, alt.as_char()).len() == header.len {
                return ToonError::DelimiterMismatch {
                    line: header.line,
                    reason: format!(
                        "body splits to the declared length {} with {}, but the header declares {}",
                        header.len,
                        alt.name(),
                        header.delimiter.name()
                    ),
                };
            }
        }
        ToonError::ArrayLengthMismatch {
            expected: header.len,
            found,
            line: header.line,
        }
    }

    fn tabular_rows(
        &mut self,
        header: &ArrayHeader<'a>,
        row_depth: usize,
        vdepth: usize,
    ) -> Result<Vec<Value>> {
        self.check_depth(vdepth + 1, header.line)?;
        let fields = header.fields.as_deref().unwrap_or(&[]);
        let mut rows: Vec<Value> = Vec::with_capacity(header.len);

        while rows.len() < header.len {
            let Some(line) = self.peek() else {
                if rows.is_empty() {
                    return Err(ToonError::UnexpectedEndOfInput {
                        expected: format!("{} tabular rows", header.len),
                    });
                }
                if self.options.strict {
                    return Err(ToonError::ArrayLengthMismatch {
                        expected: header.len,
                        found: rows.len(),
                        line: self.last_line_number(),
                    });
                }
                break;
            };
            if line.blank {
                if self.options.strict {
                    return Err(ToonError::BlankLineInArray { line: line.number });
                }
                self.bump();
                continue;
            }
            if line.depth > row_depth {
                if self.options.strict {
                    return Err(ToonError::UnexpectedIndent { line: line.number });
                }
                self.bump();
                continue;
            }
            if line.depth < row_depth || !is_tabular_row(line.content, header.delimiter) {
                // The body ended early; this line belongs to an outer scope.
                if self.options.strict {
                    return Err(ToonError::ArrayLengthMismatch {
                        expected: header.len,
                        found: rows.len(),
                        line: line.number,
                    });
                }
                break;
            }

            let (content, number) = (line.content, line.number);
            let pieces = split_delimited(content, header.delimiter.as_char());
            if self.options.strict && pieces.len() != fields.len() {
                return Err(ToonError::RowWidthMismatch {
                    expected: fields.len(),
                    found: pieces.len(),
                    line: number,
                });
            }
            let mut obj = ToonMap::with_capacity(fields.len());
            for (i, field) in fields.iter().enumerate() {
                let value = match pieces.get(i) {
                    Some(piece) => scalar::parse_primitive_token(piece, number)?,
                    // Short rows pad with null in non-strict mode.
                    None => Value::Null,
                };
                obj.insert(field.clone(), value);
            }
            rows.push(Value::Object(obj));
            self.bump();
        }

        if self.options.strict {
            if let Some(line) = self.peek_nonblank() {
                if line.depth == row_depth && is_tabular_row(line.content, header.delimiter) {
                    return Err(ToonError::ArrayLengthMismatch {
                        expected: header.len,
                        found: header.len + 1,
                        line: line.number,
                    });
                }
            }
        }
        Ok(rows)
    }

    fn list_items(
        &mut self,
        header: &ArrayHeader<'a>,
        item_depth: usize,
        vdepth: usize,
    ) -> Result<Vec<Value>> {
        let mut items: Vec<Value> = Vec::with_capacity(header.len);

        while items.len() < header.len {
            let Some(line) = self.peek() else {
                if items.is_empty() {
                    return Err(ToonError::UnexpectedEndOfInput {
                        expected: format!("{} list items", header.len),
                    });
                }
                if self.options.strict {
                    return Err(ToonError::ArrayLengthMismatch {
                        expected: header.len,
                        found: items.len(),
                        line: self.last_line_number(),
                    });
                }
                break;
            };
            if line.blank {
                if self.options.strict {
                    return Err(ToonError::BlankLineInArray { line: line.number });
                }
                self.bump();
                continue;
            }
            if line.depth > item_depth {
                if self.options.strict {
                    return Err(ToonError::UnexpectedIndent { line: line.number });
                }
                self.bump();
                continue;
            }
            if line.depth < item_depth || !line.content.starts_with('-') {
                if self.options.strict {
                    return Err(ToonError::ArrayLengthMismatch {
                        expected: header.len,
                        found: items.len(),
                        line: line.number,
                    });
                }
                break;
            }

            let (content, number) = (line.content, line.number);
            let item = if content == "-" {
                // Bare hyphen: an empty object.
                self.bump();
                Value::Object(ToonMap::new())
            } else if let Some(rest) = content.strip_prefix("- ") {
                self.list_item(rest, number, item_depth, vdepth)?
            } else {
                return Err(ToonError::InvalidListItem { line: number });
            };
            items.push(item);
        }

        if self.options.strict {
            if let Some(line) = self.peek_nonblank() {
                if line.depth == item_depth
                    && (line.content == "-" || line.content.starts_with("- "))
                {
                    return Err(ToonError::ArrayLengthMismatch {
                        expected: header.len,
                        found: header.len + 1,
                        line: line.number,
                    });
                }
            }
        }
        Ok(items)
    }

    /// Parse the content after `- ` on a hyphen line: a nested array, an
    /// object whose first field rides the hyphen line, or a primitive.
    fn list_item(
        &mut self,
        rest: &'a str,
        number: usize,
        item_depth: usize,
        vdepth: usize,
    ) -> Result<Value> {
        self.check_depth(vdepth + 1, number)?;

        if rest.starts_with('[') {
            let header = self.parse_header(rest, number)?;
            self.bump();
            let arr = self.array_body(header, item_depth + 1, vdepth + 1)?;
            return Ok(Value::Array(arr));
        }

        if item_is_object(rest) {
            let mut map = ToonMap::new();
            // First field: logical depth is one past the hyphen, so its
            // bodies land two levels past the hyphen.
            self.field_into(rest, number, item_depth + 1, vdepth + 1, &mut map)?;

            // Remaining fields align one level past the hyphen.
            loop {
                let Some(line) = self.peek() else { break };
                if line.blank {
                    match self.peek_nonblank() {
                        Some(next) if next.depth == item_depth + 1 => {
                            if self.options.strict {
                                return Err(ToonError::BlankLineInArray { line: line.number });
                            }
                            self.bump();
                            continue;
                        }
                        _ => break,
                    }
                }
                if line.depth != item_depth + 1 {
                    break;
                }
                let (content, n) = (line.content, line.number);
                self.field_into(content, n, item_depth + 1, vdepth + 1, &mut map)?;
            }
            return Ok(Value::Object(map));
        }

        let value = scalar::parse_primitive_token(rest, number)?;
        self.bump();
        Ok(value)
    }
}

/// Does hyphen-line content start an object? True when an unquoted colon is
/// present, or a quoted key is followed by `:` or `[`.
fn item_is_object(rest: &str) -> bool {
    if rest.starts_with('"') {
        return match scalar::find_closing_quote(rest, 1) {
            Some(end) => matches!(rest.as_bytes().get(end + 1), Some(&b':') | Some(&b'[')),
            None => false,
        };
    }
    find_unquoted(rest, b':').is_some()
}

/// Is a line at the expected row depth a tabular row, as opposed to the
/// first line of an outer sibling key? Yes when it has no unquoted colon, or
/// an unquoted delimiter appears before the first unquoted colon.
fn is_tabular_row(content: &str, delimiter: Delimiter) -> bool {
    match find_unquoted(content, b':') {
        None => true,
        Some(colon) => match find_unquoted(content, delimiter.as_char() as u8) {
            Some(delim) => delim < colon,
            None => false,
        },
    }
}

/// First unquoted occurrence of `target`. `"` toggles the in-quotes state
/// and `\` escapes the next byte while inside quotes.
fn find_unquoted(s: &str, target: u8) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut in_quotes = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if in_quotes && b == b'\\' {
            i += 2;
            continue;
        }
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == target && !in_quotes {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Split on `delimiter`, honoring quoted sections. The delimiter is always
/// ASCII, so byte positions are char boundaries.
fn split_delimited(s: &str, delimiter: char) -> Vec<&str> {
    let target = delimiter as u8;
    let bytes = s.as_bytes();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if in_quotes && b == b'\\' {
            i += 2;
            continue;
        }
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == target && !in_quotes {
            pieces.push(&s[start..i]);
            start = i + 1;
        }
        i += 1;
    }
    pieces.push(&s[start..]);
    pieces
}
