//! Parsing of command-line `--add` / `--remove` tokens.

use crate::config::loader::ConfigError;
use crate::config::schema::check_key;
use crate::naming::{NamingStyle, StyleError};
use crate::tag::{AddRequest, RemoveRequest};

/// Parse one `key:style` token.
///
/// The token must split on `:` into exactly two parts with a valid key;
/// otherwise it is [`ConfigError::InvalidTag`]. An unknown style is
/// [`ConfigError::UnsupportedStyle`].
pub fn parse_add(token: &str) -> Result<AddRequest, ConfigError> {
    let invalid = || ConfigError::InvalidTag {
        token: token.to_string(),
    };

    let mut parts = token.split(':');
    let (Some(key), Some(style), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    check_key(key).map_err(|_| invalid())?;

    let style = style
        .parse::<NamingStyle>()
        .map_err(|StyleError(style)| ConfigError::UnsupportedStyle {
            token: token.to_string(),
            style,
        })?;

    Ok(AddRequest::new(key, style))
}

/// Parse one `key` token.
pub fn parse_remove(token: &str) -> Result<RemoveRequest, ConfigError> {
    check_key(token).map_err(|_| ConfigError::InvalidTag {
        token: token.to_string(),
    })?;
    Ok(RemoveRequest::new(token))
}

pub fn parse_adds<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<AddRequest>, ConfigError> {
    tokens.iter().map(|t| parse_add(t.as_ref())).collect()
}

pub fn parse_removes<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<RemoveRequest>, ConfigError> {
    tokens.iter().map(|t| parse_remove(t.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_alias_styles() {
        assert_eq!(
            parse_add("json:camel").unwrap(),
            AddRequest::new("json", NamingStyle::Camel)
        );
        assert_eq!(
            parse_add("gorm:a_a").unwrap(),
            AddRequest::new("gorm", NamingStyle::Snake)
        );
        assert_eq!(
            parse_add("bson:Aa").unwrap(),
            AddRequest::new("bson", NamingStyle::Verbatim)
        );
    }

    #[test]
    fn wrong_part_count_is_invalid_tag() {
        for token in ["json", "json:camel:x", ":camel", ""] {
            let err = parse_add(token).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidTag { .. }),
                "{token:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn unknown_style_is_unsupported() {
        let err = parse_add("json:kebab").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedStyle { ref style, .. } if style == "kebab"
        ));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn remove_tokens() {
        assert_eq!(parse_remove("gorm").unwrap(), RemoveRequest::new("gorm"));
        assert!(matches!(
            parse_remove("gorm:x"),
            Err(ConfigError::InvalidTag { .. })
        ));
        assert_eq!(parse_remove("").unwrap_err().exit_code(), 3);
    }

    #[test]
    fn first_bad_token_wins() {
        let err = parse_adds(&["json:camel", "db", "xml:nope"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTag { ref token } if token == "db"));
    }
}
