//! Field selection and per-field tag rewriting.
//!
//! The visitor only needs a narrow view of a struct declaration, expressed by
//! [`StructDecl`] and [`TaggedField`]. The Go syntax tree implements these in
//! [`crate::ts::structs`]; tests use an in-memory fake.

use crate::tag::{decode, encode, patch, TagConfig};

/// A struct field whose tag can be read and replaced.
pub trait TaggedField {
    /// The field's first declared name; `None` for embedded fields.
    fn identifier(&self) -> Option<&str>;

    /// The current tag literal, delimiters included; `None` when untagged.
    fn raw_tag(&self) -> Option<&str>;

    /// Replace the tag literal, or drop the tag with `None`.
    fn set_raw_tag(&mut self, tag: Option<String>);
}

/// A struct declaration exposing its direct fields.
pub trait StructDecl {
    type Field: TaggedField;

    fn fields_mut(&mut self) -> &mut [Self::Field];
}

/// What happened to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    /// Embedded or unexported; never touched.
    Skipped,
    /// The patched entries equal the existing ones.
    Unchanged,
    /// The tag literal was replaced or created.
    Rewritten,
    /// Every entry was removed, so the tag was dropped.
    Cleared,
}

/// Per-struct counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitStats {
    pub skipped: usize,
    pub unchanged: usize,
    pub rewritten: usize,
    pub cleared: usize,
}

impl VisitStats {
    pub fn record(&mut self, outcome: FieldOutcome) {
        match outcome {
            FieldOutcome::Skipped => self.skipped += 1,
            FieldOutcome::Unchanged => self.unchanged += 1,
            FieldOutcome::Rewritten => self.rewritten += 1,
            FieldOutcome::Cleared => self.cleared += 1,
        }
    }

    /// Number of fields whose tag text changed.
    pub fn changed(&self) -> usize {
        self.rewritten + self.cleared
    }

    pub fn merge(&mut self, other: VisitStats) {
        self.skipped += other.skipped;
        self.unchanged += other.unchanged;
        self.rewritten += other.rewritten;
        self.cleared += other.cleared;
    }
}

/// Exported Go identifiers start with an upper-case letter.
pub fn is_exported(identifier: &str) -> bool {
    identifier.chars().next().is_some_and(char::is_uppercase)
}

/// Rewrite every eligible field of `decl`.
pub fn visit_struct<S: StructDecl>(decl: &mut S, config: &TagConfig) -> VisitStats {
    let mut stats = VisitStats::default();
    for field in decl.fields_mut() {
        stats.record(rewrite_field(field, config));
    }
    stats
}

/// Patch one field's tag in place.
pub fn rewrite_field<F: TaggedField>(field: &mut F, config: &TagConfig) -> FieldOutcome {
    let name = match field.identifier() {
        Some(name) if is_exported(name) => name.to_string(),
        _ => return FieldOutcome::Skipped,
    };

    let old = decode(field.raw_tag().unwrap_or_default());
    let new = patch(&old, &name, config);

    if new == old {
        return FieldOutcome::Unchanged;
    }

    let encoded = encode(&new);
    tracing::debug!(field = %name, tag = %encoded, "rewrote field tag");

    if encoded.is_empty() {
        field.set_raw_tag(None);
        FieldOutcome::Cleared
    } else {
        field.set_raw_tag(Some(encoded));
        FieldOutcome::Rewritten
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::NamingStyle;
    use crate::tag::{AddRequest, InsertionIndex, RemoveRequest};

    #[derive(Debug, Clone, PartialEq)]
    struct FakeField {
        name: Option<&'static str>,
        tag: Option<String>,
    }

    impl FakeField {
        fn new(name: Option<&'static str>, tag: Option<&str>) -> Self {
            Self {
                name,
                tag: tag.map(str::to_string),
            }
        }
    }

    impl TaggedField for FakeField {
        fn identifier(&self) -> Option<&str> {
            self.name
        }

        fn raw_tag(&self) -> Option<&str> {
            self.tag.as_deref()
        }

        fn set_raw_tag(&mut self, tag: Option<String>) {
            self.tag = tag;
        }
    }

    struct FakeStruct(Vec<FakeField>);

    impl StructDecl for FakeStruct {
        type Field = FakeField;

        fn fields_mut(&mut self) -> &mut [FakeField] {
            &mut self.0
        }
    }

    fn add_json_camel() -> TagConfig {
        TagConfig::new(
            vec![AddRequest::new("json", NamingStyle::Camel)],
            Vec::new(),
            InsertionIndex::default(),
        )
    }

    #[test]
    fn exported_detection() {
        assert!(is_exported("Name"));
        assert!(is_exported("ÉTAT"));
        assert!(!is_exported("name"));
        assert!(!is_exported("_Name"));
        assert!(!is_exported(""));
    }

    #[test]
    fn adds_tag_to_untagged_field() {
        let mut field = FakeField::new(Some("Name"), None);
        let outcome = rewrite_field(&mut field, &add_json_camel());
        assert_eq!(outcome, FieldOutcome::Rewritten);
        assert_eq!(field.tag.as_deref(), Some(r#"`json:"name"`"#));
    }

    #[test]
    fn removes_tag_entry() {
        let cfg = TagConfig::new(
            Vec::new(),
            vec![RemoveRequest::new("gorm")],
            InsertionIndex::default(),
        );
        let mut field = FakeField::new(Some("Name"), Some(r#"`json:"name" gorm:"column:name"`"#));
        assert_eq!(rewrite_field(&mut field, &cfg), FieldOutcome::Rewritten);
        assert_eq!(field.tag.as_deref(), Some(r#"`json:"name"`"#));
    }

    #[test]
    fn existing_tag_is_left_alone() {
        let mut field = FakeField::new(Some("Name"), Some(r#"`json:"name"`"#));
        assert_eq!(rewrite_field(&mut field, &add_json_camel()), FieldOutcome::Unchanged);
        assert_eq!(field.tag.as_deref(), Some(r#"`json:"name"`"#));
    }

    #[test]
    fn unchanged_entries_keep_original_spacing() {
        let cfg = TagConfig::new(
            Vec::new(),
            vec![RemoveRequest::new("xml")],
            InsertionIndex::default(),
        );
        let mut field = FakeField::new(Some("Name"), Some(r#"`json:"name"    db:"name"`"#));
        assert_eq!(rewrite_field(&mut field, &cfg), FieldOutcome::Unchanged);
        assert_eq!(field.tag.as_deref(), Some(r#"`json:"name"    db:"name"`"#));
    }

    #[test]
    fn clearing_last_entry_drops_tag() {
        let cfg = TagConfig::new(
            Vec::new(),
            vec![RemoveRequest::new("json")],
            InsertionIndex::default(),
        );
        let mut field = FakeField::new(Some("Name"), Some(r#"`json:"name"`"#));
        assert_eq!(rewrite_field(&mut field, &cfg), FieldOutcome::Cleared);
        assert_eq!(field.tag, None);
    }

    #[test]
    fn unexported_and_embedded_fields_are_skipped() {
        let cfg = TagConfig::new(
            vec![AddRequest::new("json", NamingStyle::Camel)],
            vec![RemoveRequest::new("db")],
            InsertionIndex::ReplaceAll,
        );
        let mut decl = FakeStruct(vec![
            FakeField::new(Some("name"), Some(r#"`db:"x"`"#)),
            FakeField::new(None, Some(r#"`db:"x"`"#)),
            FakeField::new(Some("Age"), None),
        ]);

        let stats = visit_struct(&mut decl, &cfg);

        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.rewritten, 1);
        assert_eq!(decl.0[0].tag.as_deref(), Some(r#"`db:"x"`"#));
        assert_eq!(decl.0[1].tag.as_deref(), Some(r#"`db:"x"`"#));
        assert_eq!(decl.0[2].tag.as_deref(), Some(r#"`json:"age"`"#));
    }

    #[test]
    fn visiting_twice_changes_nothing() {
        let cfg = TagConfig::new(
            vec![
                AddRequest::new("json", NamingStyle::Camel),
                AddRequest::new("db", NamingStyle::Snake),
            ],
            Vec::new(),
            InsertionIndex::After(1),
        );
        let mut decl = FakeStruct(vec![
            FakeField::new(Some("UserID"), Some(r#"`xml:"id"`"#)),
            FakeField::new(Some("CreatedAt"), None),
        ]);

        let first = visit_struct(&mut decl, &cfg);
        assert_eq!(first.changed(), 2);
        assert_eq!(
            decl.0[0].tag.as_deref(),
            Some(r#"`xml:"id" json:"userID" db:"user_id"`"#)
        );
        let snapshot: Vec<FakeField> = decl.0.clone();

        let second = visit_struct(&mut decl, &cfg);
        assert_eq!(second.changed(), 0);
        assert_eq!(second.unchanged, 2);
        assert_eq!(decl.0, snapshot);
    }
}
