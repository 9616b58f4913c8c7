//! Run configuration: command-line tokens, the optional TOML file, and the
//! merged [`TagConfig`] handed to the engine.

pub mod loader;
pub mod request;
pub mod schema;

pub use loader::{discover, load_from_path, load_from_str, ConfigError};
pub use request::{parse_add, parse_remove};
pub use schema::{FileAdd, FileConfig, ValidationError, ValidationIssue};

use crate::tag::{AddRequest, InsertionIndex, RemoveRequest, TagConfig};

/// Command-line side of the configuration, as raw tokens.
#[derive(Debug, Clone, Default)]
pub struct CliRequests {
    pub add: Vec<String>,
    pub remove: Vec<String>,
    pub index: Option<i64>,
}

/// Merge file and command-line settings.
///
/// File entries come first. A command-line add for a key the file already
/// adds replaces that request's style in place. The command-line index wins
/// over the file's; without either the index is 0.
pub fn build(file: Option<&FileConfig>, cli: &CliRequests) -> Result<TagConfig, ConfigError> {
    let cli_adds = request::parse_adds(&cli.add)?;
    let cli_removes = request::parse_removes(&cli.remove)?;

    let mut adds: Vec<AddRequest> = file.map(FileConfig::add_requests).unwrap_or_default();
    for add in cli_adds {
        merge_add(&mut adds, add);
    }

    let mut removes: Vec<RemoveRequest> = Vec::new();
    let file_removes = file.map(FileConfig::remove_requests).unwrap_or_default();
    for remove in file_removes.into_iter().chain(cli_removes) {
        if !removes.contains(&remove) {
            removes.push(remove);
        }
    }

    let index = cli
        .index
        .or_else(|| file.and_then(|f| f.index))
        .map(InsertionIndex::from)
        .unwrap_or_default();

    Ok(TagConfig::new(adds, removes, index))
}

fn merge_add(adds: &mut Vec<AddRequest>, add: AddRequest) {
    match adds.iter_mut().find(|a| a.key == add.key) {
        Some(existing) => existing.style = add.style,
        None => adds.push(add),
    }
}
