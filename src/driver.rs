//! File-level glue: pattern resolution, parse, rewrite, atomic write.
//!
//! Files are processed one at a time in the order their patterns were given.
//! A failing file is reported and the remaining files are still processed.

use crate::edit::{self, EditError};
use crate::pool::with_parser;
use crate::tag::TagConfig;
use crate::ts::{validate_syntax, GoSourceTree, TreeSitterError};
use crate::visitor::VisitStats;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Failure to rewrite a source text in memory.
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("parse failed: {0}")]
    Parse(#[source] TreeSitterError),

    #[error("applying tag edits failed: {0}")]
    Edit(#[from] EditError),

    #[error("rewritten source no longer parses: {0}")]
    InvalidOutput(#[source] TreeSitterError),
}

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("glob '{pattern}' failed: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::GlobError,
    },

    #[error("walking {path} failed: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("reading {path} failed: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Rewrite {
        path: PathBuf,
        #[source]
        source: RewriteError,
    },

    #[error("writing {path} failed: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: EditError,
    },
}

impl DriverError {
    /// The file the error belongs to, when it belongs to one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DriverError::Pattern { .. } | DriverError::Glob { .. } => None,
            DriverError::Walk { path, .. }
            | DriverError::Read { path, .. }
            | DriverError::Rewrite { path, .. }
            | DriverError::Write { path, .. } => Some(path),
        }
    }
}

/// Result of rewriting one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub output: String,
    pub stats: VisitStats,
}

/// Parse `source`, patch every eligible field, and splice the new tags in.
pub fn rewrite_source(source: &str, config: &TagConfig) -> Result<Rewrite, RewriteError> {
    let mut tree = with_parser(|parser| {
        let parsed = parser.parse_with_source(source)?;
        parsed.ensure_valid()?;
        Ok::<_, TreeSitterError>(GoSourceTree::collect(&parsed))
    })
    .and_then(|collected| collected)
    .map_err(RewriteError::Parse)?;

    let stats = tree.rewrite(config);
    let edits = tree.edits();
    if edits.is_empty() {
        return Ok(Rewrite {
            output: source.to_string(),
            stats,
        });
    }

    let output = edit::apply_edits(source, edits)?;
    validate_syntax(&output).map_err(RewriteError::InvalidOutput)?;

    Ok(Rewrite { output, stats })
}

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// New content was written.
    Rewritten,
    /// New content was computed but not written (dry run).
    WouldRewrite,
    /// No tag changed.
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub stats: VisitStats,
    pub original: String,
    pub rewritten: String,
}

impl FileReport {
    pub fn is_changed(&self) -> bool {
        self.status != FileStatus::Unchanged
    }
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<FileReport>,
    pub failures: Vec<DriverError>,
}

impl RunSummary {
    pub fn changed(&self) -> usize {
        self.reports.iter().filter(|r| r.is_changed()).count()
    }

    pub fn unchanged(&self) -> usize {
        self.reports.len() - self.changed()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives the rewrite of a set of files with one [`TagConfig`].
pub struct FileDriver<'a> {
    config: &'a TagConfig,
    dry_run: bool,
}

impl<'a> FileDriver<'a> {
    pub fn new(config: &'a TagConfig) -> Self {
        Self {
            config,
            dry_run: false,
        }
    }

    /// Compute rewrites without touching files.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Rewrite one file in place.
    pub fn process_file(&self, path: &Path) -> Result<FileReport, DriverError> {
        let original = fs::read_to_string(path).map_err(|source| DriverError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let stamp = edit::fingerprint(original.as_bytes());

        let rewrite =
            rewrite_source(&original, self.config).map_err(|source| DriverError::Rewrite {
                path: path.to_path_buf(),
                source,
            })?;

        let status = if rewrite.output == original {
            FileStatus::Unchanged
        } else if self.dry_run {
            FileStatus::WouldRewrite
        } else {
            edit::write_if_unchanged(path, stamp, &rewrite.output).map_err(|source| {
                DriverError::Write {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            tracing::info!(
                path = %path.display(),
                fields = rewrite.stats.changed(),
                "rewrote struct tags"
            );
            FileStatus::Rewritten
        };

        Ok(FileReport {
            path: path.to_path_buf(),
            status,
            stats: rewrite.stats,
            original,
            rewritten: rewrite.output,
        })
    }

    /// Resolve `patterns` and process every file, collecting per-file
    /// failures. Pattern errors abort before any file is touched.
    pub fn run<S: AsRef<str>>(&self, patterns: &[S]) -> Result<RunSummary, DriverError> {
        let files = resolve_patterns(patterns)?;
        let mut summary = RunSummary::default();

        for file in files {
            match self.process_file(&file) {
                Ok(report) => summary.reports.push(report),
                Err(error) => {
                    tracing::error!(%error, "file failed");
                    summary.failures.push(error);
                }
            }
        }

        Ok(summary)
    }
}

/// Expand file patterns into a de-duplicated, ordered list of files.
///
/// A pattern naming a directory contributes every `.go` file below it,
/// sorted by name. Anything else is a glob pattern; matches that are not
/// regular files are ignored.
pub fn resolve_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>, DriverError> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let matched = if Path::new(pattern).is_dir() {
            walk_go_files(Path::new(pattern))?
        } else {
            glob_files(pattern)?
        };

        if matched.is_empty() {
            tracing::warn!(pattern, "pattern matched no files");
        }

        for file in matched {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }

    Ok(files)
}

fn glob_files(pattern: &str) -> Result<Vec<PathBuf>, DriverError> {
    let paths = glob::glob(pattern).map_err(|source| DriverError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|source| DriverError::Glob {
            pattern: pattern.to_string(),
            source,
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

fn walk_go_files(dir: &Path) -> Result<Vec<PathBuf>, DriverError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| DriverError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "go") {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}
