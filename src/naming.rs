//! Naming-convention conversion for generated tag values.
//!
//! Field identifiers are Go exported names (`UserID`, `HTTPServer`, `Name`).
//! Each [`NamingStyle`] is a pure mapping from that identifier to the value
//! written into a new tag entry.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The closed set of supported value styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamingStyle {
    /// Lower camel case with the leading-acronym rule of [`to_camel`].
    Camel,
    /// `[a-z0-9][A-Z]` boundaries split by `_`, then lower-cased.
    Snake,
    /// The identifier as written.
    Verbatim,
    /// Every character upper-cased.
    Upper,
    /// Every character lower-cased.
    Lower,
}

/// Canonical names and aliases accepted for each style.
const STYLE_NAMES: &[(NamingStyle, &[&str])] = &[
    (NamingStyle::Camel, &["camel", "aA"]),
    (NamingStyle::Snake, &["snake", "a_a"]),
    (NamingStyle::Verbatim, &["go", "verbatim", "Aa"]),
    (NamingStyle::Upper, &["upper", "AA"]),
    (NamingStyle::Lower, &["lower", "aa"]),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported style: {0}")]
pub struct StyleError(pub String);

impl NamingStyle {
    /// Look up a style by canonical name or alias. Matching is case-sensitive
    /// since `AA` and `aa` name different styles.
    pub fn lookup(name: &str) -> Option<Self> {
        STYLE_NAMES
            .iter()
            .find(|(_, names)| names.contains(&name))
            .map(|(style, _)| *style)
    }

    /// Canonical name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            NamingStyle::Camel => "camel",
            NamingStyle::Snake => "snake",
            NamingStyle::Verbatim => "go",
            NamingStyle::Upper => "upper",
            NamingStyle::Lower => "lower",
        }
    }

    /// Convert a field identifier into this style.
    pub fn apply(self, identifier: &str) -> String {
        convert(identifier, self)
    }
}

impl FromStr for NamingStyle {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NamingStyle::lookup(s).ok_or_else(|| StyleError(s.to_string()))
    }
}

impl fmt::Display for NamingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert `identifier` into `style`.
pub fn convert(identifier: &str, style: NamingStyle) -> String {
    match style {
        NamingStyle::Camel => to_camel(identifier),
        NamingStyle::Snake => to_snake(identifier),
        NamingStyle::Verbatim => identifier.to_string(),
        NamingStyle::Upper => identifier.to_uppercase(),
        NamingStyle::Lower => identifier.to_lowercase(),
    }
}

/// Insert `_` at every `[a-z0-9][A-Z]` transition and lower-case the result.
///
/// Runs of capitals are never split, so `UserID` becomes `user_id` and
/// `HTTPServer` becomes `httpserver`.
pub fn to_snake(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 4);
    let mut prev: Option<char> = None;

    for c in identifier.chars() {
        if let Some(p) = prev {
            if (p.is_ascii_lowercase() || p.is_ascii_digit()) && c.is_ascii_uppercase() {
                out.push('_');
            }
        }
        out.push(c);
        prev = Some(c);
    }

    out.to_lowercase()
}

/// Lower the leading run of non-lowercase characters.
///
/// Scanning stops at the first lowercase character. When the lowered run is
/// longer than one character and shorter than the whole identifier, its last
/// character is restored to upper case because it starts the next word:
/// `HTTPServer` -> `httpServer`, `UserID` -> `userID`, `ID` -> `id`.
pub fn to_camel(identifier: &str) -> String {
    let mut chars: Vec<char> = identifier.chars().collect();

    let mut run = 0;
    while run < chars.len() {
        if chars[run].is_lowercase() {
            break;
        }
        chars[run] = lower_char(chars[run]);
        run += 1;
    }

    if run > 1 && run != chars.len() {
        chars[run - 1] = upper_char(chars[run - 1]);
    }

    chars.into_iter().collect()
}

fn lower_char(c: char) -> char {
    let mut lowered = c.to_lowercase();
    match (lowered.next(), lowered.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

fn upper_char(c: char) -> char {
    let mut uppered = c.to_uppercase();
    match (uppered.next(), uppered.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_splits_lower_to_upper_only() {
        assert_eq!(convert("UserID", NamingStyle::Snake), "user_id");
        assert_eq!(convert("CreatedAt", NamingStyle::Snake), "created_at");
        assert_eq!(convert("HTTPServer", NamingStyle::Snake), "httpserver");
        assert_eq!(convert("Ipv4Addr", NamingStyle::Snake), "ipv4_addr");
        assert_eq!(convert("ID", NamingStyle::Snake), "id");
    }

    #[test]
    fn camel_follows_leading_run_rule() {
        assert_eq!(convert("Name", NamingStyle::Camel), "name");
        assert_eq!(convert("UserID", NamingStyle::Camel), "userID");
        assert_eq!(convert("ID", NamingStyle::Camel), "id");
        assert_eq!(convert("HTTPServer", NamingStyle::Camel), "httpServer");
        assert_eq!(convert("URLPath", NamingStyle::Camel), "urlPath");
    }

    #[test]
    fn camel_leaves_lowercase_start_alone() {
        assert_eq!(to_camel("name"), "name");
        assert_eq!(to_camel(""), "");
    }

    #[test]
    fn camel_treats_digits_as_part_of_run() {
        // '2' is not lowercase, so the run is "A2" and its tail is re-raised.
        assert_eq!(to_camel("A2b"), "a2b");
        assert_eq!(to_camel("AB2c"), "ab2c");
    }

    #[test]
    fn verbatim_upper_lower() {
        assert_eq!(convert("Name", NamingStyle::Verbatim), "Name");
        assert_eq!(convert("ID", NamingStyle::Upper), "ID");
        assert_eq!(convert("UserID", NamingStyle::Upper), "USERID");
        assert_eq!(convert("UserID", NamingStyle::Lower), "userid");
    }

    #[test]
    fn lookup_accepts_names_and_aliases() {
        assert_eq!(NamingStyle::lookup("camel"), Some(NamingStyle::Camel));
        assert_eq!(NamingStyle::lookup("aA"), Some(NamingStyle::Camel));
        assert_eq!(NamingStyle::lookup("a_a"), Some(NamingStyle::Snake));
        assert_eq!(NamingStyle::lookup("go"), Some(NamingStyle::Verbatim));
        assert_eq!(NamingStyle::lookup("verbatim"), Some(NamingStyle::Verbatim));
        assert_eq!(NamingStyle::lookup("Aa"), Some(NamingStyle::Verbatim));
        assert_eq!(NamingStyle::lookup("AA"), Some(NamingStyle::Upper));
        assert_eq!(NamingStyle::lookup("aa"), Some(NamingStyle::Lower));
        assert_eq!(NamingStyle::lookup("Camel"), None);
        assert_eq!(NamingStyle::lookup("kebab"), None);
    }

    #[test]
    fn from_str_reports_unknown_style() {
        let err = "pascal".parse::<NamingStyle>().unwrap_err();
        assert_eq!(err, StyleError("pascal".to_string()));
        assert_eq!(err.to_string(), "unsupported style: pascal");
    }
}
