//! Struct tag model: lexing tag literals and patching their entries.

pub mod lexer;
pub mod patcher;

pub use lexer::{decode, encode, TagEntry};
pub use patcher::{patch, AddRequest, InsertionIndex, RemoveRequest, TagConfig};
