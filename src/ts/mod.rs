//! Tree-sitter integration for Go source files.
//!
//! This module parses Go source with the grammar bundled in
//! `ast-grep-language` and exposes struct declarations with byte-accurate
//! field and tag spans, so tags can be rewritten without touching any other
//! byte of the file.

pub mod errors;
pub mod parser;
pub mod structs;
pub mod validator;

pub use errors::TreeSitterError;
pub use parser::{GoParser, ParsedSource};
pub use structs::{GoField, GoSourceTree, GoStruct};
pub use validator::validate_syntax;
