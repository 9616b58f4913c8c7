//! Struct declarations located in a parsed Go file.
//!
//! Every `struct_type` node reached by a pre-order walk becomes a
//! [`GoStruct`]. The walk does not enter a struct it has collected, so
//! anonymous struct types used as field types are not rewritten.

use crate::edit::TagEdit;
use crate::tag::TagConfig;
use crate::ts::parser::ParsedSource;
use crate::visitor::{visit_struct, StructDecl, TaggedField, VisitStats};
use tree_sitter::Node;

/// The tag literal of a field as found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TagLiteral {
    byte_start: usize,
    byte_end: usize,
    text: String,
    /// Source text between the end of the field type and the literal.
    lead: String,
}

/// One field declaration (`A, B int \`json:"a"\``).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoField {
    names: Vec<String>,
    type_end: usize,
    line: usize,
    tag: Option<TagLiteral>,
    replacement: Option<Option<String>>,
}

impl GoField {
    /// Declared names; empty for embedded fields.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// 1-based line of the declaration.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Whether [`TaggedField::set_raw_tag`] changed the tag.
    pub fn is_modified(&self) -> bool {
        match &self.replacement {
            None => false,
            Some(new) => new.as_deref() != self.tag.as_ref().map(|t| t.text.as_str()),
        }
    }

    /// The byte-span edit that realizes this field's new tag.
    pub fn edit(&self) -> Option<TagEdit> {
        if !self.is_modified() {
            return None;
        }
        let replacement = self.replacement.as_ref()?;

        match (&self.tag, replacement) {
            (Some(old), Some(new)) => Some(TagEdit::new(
                old.byte_start,
                old.byte_end,
                new.clone(),
                old.text.clone(),
            )),
            (None, Some(new)) => Some(TagEdit::new(
                self.type_end,
                self.type_end,
                format!(" {new}"),
                String::new(),
            )),
            (Some(old), None) => Some(TagEdit::new(
                self.type_end,
                old.byte_end,
                String::new(),
                format!("{}{}", old.lead, old.text),
            )),
            (None, None) => None,
        }
    }

    fn from_node(node: Node<'_>, parsed: &ParsedSource<'_>) -> Self {
        let mut cursor = node.walk();
        let names = node
            .children_by_field_name("name", &mut cursor)
            .map(|n| parsed.node_text(n).to_string())
            .collect();

        let tag_node = node.child_by_field_name("tag");
        let type_end = node
            .child_by_field_name("type")
            .map(|t| t.end_byte())
            .or_else(|| tag_node.map(|t| t.start_byte()))
            .unwrap_or_else(|| node.end_byte());

        let tag = tag_node.map(|t| TagLiteral {
            byte_start: t.start_byte(),
            byte_end: t.end_byte(),
            text: parsed.node_text(t).to_string(),
            lead: parsed.source[type_end..t.start_byte()].to_string(),
        });

        Self {
            names,
            type_end,
            line: node.start_position().row + 1,
            tag,
            replacement: None,
        }
    }
}

impl TaggedField for GoField {
    fn identifier(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    fn raw_tag(&self) -> Option<&str> {
        match &self.replacement {
            Some(new) => new.as_deref(),
            None => self.tag.as_ref().map(|t| t.text.as_str()),
        }
    }

    fn set_raw_tag(&mut self, tag: Option<String>) {
        self.replacement = Some(tag);
    }
}

/// A `struct { ... }` type and its direct fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoStruct {
    /// Name from the enclosing `type X struct`, if any.
    pub name: Option<String>,
    fields: Vec<GoField>,
}

impl GoStruct {
    pub fn fields(&self) -> &[GoField] {
        &self.fields
    }

    fn from_node(node: Node<'_>, parsed: &ParsedSource<'_>) -> Self {
        let name = node
            .parent()
            .filter(|p| p.kind() == "type_spec")
            .and_then(|p| p.child_by_field_name("name"))
            .map(|n| parsed.node_text(n).to_string());

        let mut fields = Vec::new();
        let mut cursor = node.walk();
        for list in node.named_children(&mut cursor) {
            if list.kind() != "field_declaration_list" {
                continue;
            }
            let mut list_cursor = list.walk();
            fields.extend(
                list.named_children(&mut list_cursor)
                    .filter(|f| f.kind() == "field_declaration")
                    .map(|f| GoField::from_node(f, parsed)),
            );
        }

        Self { name, fields }
    }
}

impl StructDecl for GoStruct {
    type Field = GoField;

    fn fields_mut(&mut self) -> &mut [GoField] {
        &mut self.fields
    }
}

/// All struct declarations of one Go file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoSourceTree {
    structs: Vec<GoStruct>,
}

impl GoSourceTree {
    /// Collect struct declarations from a parsed file, in source order.
    pub fn collect(parsed: &ParsedSource<'_>) -> Self {
        let mut structs = Vec::new();
        collect_structs(parsed.root_node(), parsed, &mut structs);
        Self { structs }
    }

    /// Run the field visitor over every struct.
    pub fn rewrite(&mut self, config: &TagConfig) -> VisitStats {
        let mut stats = VisitStats::default();
        for decl in &mut self.structs {
            let decl_stats = visit_struct(decl, config);
            if decl_stats.changed() > 0 {
                let changed: Vec<String> = decl
                    .fields()
                    .iter()
                    .filter(|f| f.is_modified())
                    .map(|f| format!("{}@{}", f.names().join(","), f.line()))
                    .collect();
                tracing::debug!(
                    name = decl.name.as_deref().unwrap_or("<anonymous>"),
                    fields = ?changed,
                    "rewrote struct tags"
                );
            }
            stats.merge(decl_stats);
        }
        stats
    }

    /// Edits for every modified field.
    pub fn edits(&self) -> Vec<TagEdit> {
        self.structs
            .iter()
            .flat_map(|s| s.fields.iter())
            .filter_map(GoField::edit)
            .collect()
    }
}

fn collect_structs(node: Node<'_>, parsed: &ParsedSource<'_>, out: &mut Vec<GoStruct>) {
    if node.kind() == "struct_type" {
        out.push(GoStruct::from_node(node, parsed));
        return;
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_structs(child, parsed, out);
    }
}
