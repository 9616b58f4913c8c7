//! gotag: add and remove struct tags in Go source files.
//!
//! A tag rewrite is a pure function of the field's existing tag text, its
//! identifier, and a [`TagConfig`]. Everything around it is plumbing: files
//! are parsed with tree-sitter, each exported field's tag is decoded,
//! patched and re-encoded, and the changed tags are spliced back into the
//! original text as verified byte-span edits.
//!
//! # Pipeline
//!
//! ```text
//! FileDriver -> GoSourceTree (ts) -> visitor -> tag::decode
//!            -> tag::patch (+ naming) -> tag::encode -> TagEdit -> atomic write
//! ```
//!
//! # Example
//!
//! ```
//! use gotag::{rewrite_source, AddRequest, InsertionIndex, NamingStyle, TagConfig};
//!
//! let config = TagConfig::new(
//!     vec![AddRequest::new("json", NamingStyle::Snake)],
//!     Vec::new(),
//!     InsertionIndex::default(),
//! );
//! let source = "package m\n\ntype T struct {\n\tUserID int\n}\n";
//! let rewrite = rewrite_source(source, &config).unwrap();
//! assert!(rewrite.output.contains("`json:\"user_id\"`"));
//! ```

pub mod config;
pub mod driver;
pub mod edit;
pub mod logging;
pub mod naming;
pub mod pool;
pub mod tag;
pub mod ts;
pub mod visitor;

// Re-exports
pub use config::{CliRequests, ConfigError, FileConfig};
pub use driver::{
    resolve_patterns, rewrite_source, DriverError, FileDriver, FileReport, FileStatus,
    Rewrite, RewriteError, RunSummary,
};
pub use edit::{EditError, TagEdit};
pub use naming::{NamingStyle, StyleError};
pub use tag::{decode, encode, patch, AddRequest, InsertionIndex, RemoveRequest, TagConfig, TagEntry};
pub use ts::{GoField, GoSourceTree, GoStruct, TreeSitterError};
pub use visitor::{FieldOutcome, VisitStats};
