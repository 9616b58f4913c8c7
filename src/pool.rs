//! Thread-local parser pooling.
//!
//! Creates a Go parser on first use per thread and reuses it for every file
//! processed afterwards on that thread.

use crate::ts::{GoParser, TreeSitterError};
use std::cell::RefCell;

thread_local! {
    static GO_PARSER: RefCell<Option<GoParser>> = const { RefCell::new(None) };
}

/// Execute function with pooled parser instance.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use gotag::pool::with_parser;
///
/// let has_errors = with_parser(|parser| {
///     parser
///         .parse_with_source("package main\n")
///         .map(|parsed| parsed.has_errors())
/// })??;
/// assert!(!has_errors);
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut GoParser) -> R,
{
    GO_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let parser = match slot.take() {
            Some(parser) => parser,
            None => GoParser::new()?,
        };
        Ok(f(slot.insert(parser)))
    })
}
