use crate::naming::NamingStyle;
use crate::tag::{AddRequest, RemoveRequest};
use serde::Deserialize;
use std::fmt;

/// On-disk configuration (`.gotag.toml`).
///
/// ```toml
/// index = 0
/// remove = ["gorm"]
///
/// [[add]]
/// key = "json"
/// style = "camel"
/// ```
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub add: Vec<FileAdd>,
    #[serde(default)]
    pub remove: Vec<String>,
    #[serde(default)]
    pub index: Option<i64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileAdd {
    pub key: String,
    pub style: String,
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        for (idx, add) in self.add.iter().enumerate() {
            if let Err(reason) = check_key(&add.key) {
                issues.push(ValidationIssue::InvalidKey {
                    section: "add",
                    position: idx,
                    reason,
                });
            }
        }

        for (idx, key) in self.remove.iter().enumerate() {
            if let Err(reason) = check_key(key) {
                issues.push(ValidationIssue::InvalidKey {
                    section: "remove",
                    position: idx,
                    reason,
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Add requests with a known style. Unknown styles are logged and
    /// skipped so the rest of the file still applies.
    pub fn add_requests(&self) -> Vec<AddRequest> {
        self.add
            .iter()
            .filter_map(|add| match NamingStyle::lookup(&add.style) {
                Some(style) => Some(AddRequest::new(add.key.clone(), style)),
                None => {
                    tracing::warn!(
                        key = %add.key,
                        style = %add.style,
                        "unsupported style in config file, skipping tag"
                    );
                    None
                }
            })
            .collect()
    }

    pub fn remove_requests(&self) -> Vec<RemoveRequest> {
        self.remove.iter().cloned().map(RemoveRequest::new).collect()
    }
}

/// Tag keys are non-empty and carry no space, quote or colon.
pub fn check_key(key: &str) -> Result<(), &'static str> {
    if key.is_empty() {
        return Err("key is empty");
    }
    if key
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == ':' || c == '`')
    {
        return Err("key contains a space, quote, colon or control character");
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    InvalidKey {
        section: &'static str,
        position: usize,
        reason: &'static str,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::InvalidKey {
                section,
                position,
                reason,
            } => write!(f, "{section}[{position}]: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_key_rules() {
        assert!(check_key("json").is_ok());
        assert!(check_key("my-tag_2").is_ok());
        assert!(check_key("").is_err());
        assert!(check_key("a b").is_err());
        assert!(check_key("a:b").is_err());
        assert!(check_key("a\"").is_err());
    }

    #[test]
    fn unknown_style_is_skipped() {
        let config = FileConfig {
            add: vec![
                FileAdd {
                    key: "json".into(),
                    style: "aA".into(),
                },
                FileAdd {
                    key: "xml".into(),
                    style: "kebab".into(),
                },
            ],
            ..FileConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(
            config.add_requests(),
            vec![AddRequest::new("json", NamingStyle::Camel)]
        );
    }

    #[test]
    fn validation_collects_every_issue() {
        let config = FileConfig {
            add: vec![FileAdd {
                key: "".into(),
                style: "camel".into(),
            }],
            remove: vec!["ok".into(), "bad key".into()],
            index: None,
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.issues.len(), 2);
        assert_eq!(
            err.to_string(),
            "add[0]: key is empty\nremove[1]: key contains a space, quote, colon or control character"
        );
    }
}
