use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// A byte-span replacement on a source text, with the text expected at the
/// span before it is applied.
///
/// Tag rewrites compile down to this primitive: replacing a tag literal,
/// inserting one after a field type, or deleting one with its leading space.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "TagEdit does nothing until applied"]
pub struct TagEdit {
    /// Starting byte offset (inclusive)
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
    /// New text for [byte_start, byte_end)
    pub new_text: String,
    /// Text that must currently occupy the span
    pub expected_before: String,
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("before-text verification failed at byte {byte_start}: expected {expected:?}, found {found:?}")]
    BeforeTextMismatch {
        byte_start: usize,
        expected: String,
        found: String,
    },

    #[error("invalid byte range: [{byte_start}, {byte_end}) in source of length {len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        len: usize,
    },

    #[error("overlapping edits at bytes {first_end} and {second_start}")]
    Overlap {
        first_end: usize,
        second_start: usize,
    },

    #[error("edit would split a UTF-8 character at byte {0}")]
    InvalidUtf8Edit(usize),

    #[error("{0} changed on disk while it was being rewritten")]
    ConcurrentModification(PathBuf),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TagEdit {
    pub fn new(
        byte_start: usize,
        byte_end: usize,
        new_text: impl Into<String>,
        expected_before: impl Into<String>,
    ) -> Self {
        Self {
            byte_start,
            byte_end,
            new_text: new_text.into(),
            expected_before: expected_before.into(),
        }
    }

    /// Validate the edit against `source`.
    ///
    /// Succeeds when the span holds either the expected before-text or the
    /// new text (already applied).
    fn validate(&self, source: &str) -> Result<(), EditError> {
        if self.byte_start > self.byte_end || self.byte_end > source.len() {
            return Err(EditError::InvalidByteRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                len: source.len(),
            });
        }

        for offset in [self.byte_start, self.byte_end] {
            if !source.is_char_boundary(offset) {
                return Err(EditError::InvalidUtf8Edit(offset));
            }
        }

        let current = &source[self.byte_start..self.byte_end];
        if current == self.new_text || current == self.expected_before {
            return Ok(());
        }

        Err(EditError::BeforeTextMismatch {
            byte_start: self.byte_start,
            expected: self.expected_before.clone(),
            found: current.to_string(),
        })
    }
}

/// Apply edits to `source` and return the new text.
///
/// Edits are validated against the original text, checked for overlap, then
/// spliced bottom-to-top so earlier offsets stay valid.
pub fn apply_edits(source: &str, mut edits: Vec<TagEdit>) -> Result<String, EditError> {
    for edit in &edits {
        edit.validate(source)?;
    }

    // Descending by start; an insertion sorts after a replacement at the same offset.
    edits.sort_by(|a, b| {
        b.byte_start
            .cmp(&a.byte_start)
            .then(b.byte_end.cmp(&a.byte_end))
    });

    for window in edits.windows(2) {
        let (later, earlier) = (&window[0], &window[1]);
        if earlier.byte_end > later.byte_start
            || (earlier.byte_start == later.byte_start && earlier.byte_end == later.byte_end)
        {
            return Err(EditError::Overlap {
                first_end: earlier.byte_end,
                second_start: later.byte_start,
            });
        }
    }

    let mut out = source.to_string();
    for edit in &edits {
        if out[edit.byte_start..edit.byte_end] == edit.new_text {
            continue;
        }
        out.replace_range(edit.byte_start..edit.byte_end, &edit.new_text);
    }

    Ok(out)
}

/// Content fingerprint used to detect concurrent modification.
pub fn fingerprint(content: &[u8]) -> u64 {
    xxh3_64(content)
}

/// Atomically replace `path` with `content`, provided the file still has the
/// fingerprint it had when it was read.
pub fn write_if_unchanged(path: &Path, expected: u64, content: &str) -> Result<(), EditError> {
    let current = fs::read(path)?;
    if fingerprint(&current) != expected {
        return Err(EditError::ConcurrentModification(path.to_path_buf()));
    }
    atomic_write(path, content.as_bytes())
}

/// Atomic file write: tempfile + fsync + rename.
///
/// This ensures crash safety - either the full write succeeds or nothing changes.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), EditError> {
    // Create tempfile in same directory to ensure same filesystem
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let permissions = fs::metadata(path).ok().map(|m| m.permissions());

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;

    temp.write_all(content)?;

    // Flush to disk (fsync)
    temp.as_file().sync_all()?;

    if let Some(permissions) = permissions {
        temp.as_file().set_permissions(permissions)?;
    }

    // Atomic rename
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
