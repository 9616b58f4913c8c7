//! Struct tag decoding and encoding.
//!
//! A tag is the literal attached to a struct field, e.g.
//! `` `json:"name" gorm:"column:name"` ``. Decoding yields the ordered
//! entries; encoding joins them back with single spaces inside backticks.

use std::fmt;

/// One `key:"value"` unit of a struct tag.
///
/// Entries that do not have the canonical `key:"value"` shape (a bare token,
/// or a value without closing quote) keep their original token text in `raw`
/// and are re-emitted byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub key: String,
    pub value: String,
    raw: Option<String>,
}

impl TagEntry {
    /// A well-formed entry rendering as `key:"value"`.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            raw: None,
        }
    }

    /// An entry that could not be read as `key:"value"`.
    pub(crate) fn verbatim(key: impl Into<String>, value: impl Into<String>, raw: &str) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            raw: Some(raw.to_string()),
        }
    }

    /// Whether the entry was read as `key:"value"` with balanced quotes.
    pub fn is_well_formed(&self) -> bool {
        self.raw.is_none()
    }
}

impl fmt::Display for TagEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => f.write_str(raw),
            None => write!(f, "{}:\"{}\"", self.key, self.value),
        }
    }
}

/// Decode a tag literal into its ordered entries.
///
/// Accepts the raw form (`` `...` ``), the interpreted form (`"..."`, with
/// `\"`, `\\`, `\n` and `\t` unescaped), or bare tag content. Never fails: anything that
/// does not lex as `key:"value"` is kept as a verbatim entry.
pub fn decode(literal: &str) -> Vec<TagEntry> {
    let content = strip_delimiters(literal);
    let mut entries = Vec::new();
    let mut rest = content.trim_start();

    while !rest.is_empty() {
        let (entry, consumed) = lex_entry(rest);
        entries.push(entry);
        rest = rest[consumed..].trim_start();
    }

    entries
}

/// Encode entries as a tag literal.
///
/// The raw form is used unless the body contains a backtick, which a raw
/// literal cannot hold; then an interpreted literal is emitted instead.
/// An empty sequence encodes to the empty string, meaning "no tag at all".
pub fn encode(entries: &[TagEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let body = entries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");

    if body.contains('`') {
        format!("\"{}\"", escape(&body))
    } else {
        format!("`{body}`")
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

fn strip_delimiters(literal: &str) -> std::borrow::Cow<'_, str> {
    let trimmed = literal.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('`') && trimmed.ends_with('`') {
        return trimmed[1..trimmed.len() - 1].into();
    }
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        return unescape(&trimmed[1..trimmed.len() - 1]).into();
    }
    trimmed.into()
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Lex one entry from the start of `input` (which has no leading whitespace).
/// Returns the entry and the number of bytes consumed.
fn lex_entry(input: &str) -> (TagEntry, usize) {
    let token_end = input
        .find(char::is_whitespace)
        .unwrap_or(input.len());

    let Some(colon) = input[..token_end].find(':') else {
        let token = &input[..token_end];
        return (TagEntry::verbatim(token, "", token), token_end);
    };

    let key = &input[..colon];
    let after = &input[colon + 1..];

    if key.is_empty() || !after.starts_with('"') {
        let token = &input[..token_end];
        return (TagEntry::verbatim(key, &input[colon + 1..token_end], token), token_end);
    }

    match closing_quote(&after[1..]) {
        Some(close) if ends_token(&after[1 + close + 1..]) => {
            let value = &after[1..1 + close];
            let consumed = colon + 1 + 1 + close + 1;
            (TagEntry::new(key, value), consumed)
        }
        _ => {
            let token = &input[..token_end];
            let value = &input[colon + 1..token_end];
            (TagEntry::verbatim(key, value, token), token_end)
        }
    }
}

fn ends_token(rest: &str) -> bool {
    rest.chars().next().map_or(true, char::is_whitespace)
}

/// Byte offset of the first unescaped `"` in `s`.
fn closing_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}
