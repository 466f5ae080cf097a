use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location of a term.
///
/// Offsets are byte offsets into the originating file, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub start: usize,
    pub end: usize,
    pub filename: String,
}

impl Location {
    /// Create a new location.
    pub fn new(start: usize, end: usize, filename: impl Into<String>) -> Self {
        Self {
            start,
            end,
            filename: filename.into(),
        }
    }

    /// Length of the covered region in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}..{}", self.filename, self.start, self.end)
    }
}

/// Holds the source text for error reporting.
///
/// The evaluator only ever sees byte offsets; this maps them back to
/// 1-based line/column pairs and source lines.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
    /// Cached line start byte offsets for fast line lookup.
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Create a new source file.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    /// Extract a source line by 1-based line number.
    ///
    /// Returns `None` if the line number is out of range.
    pub fn line(&self, line_number: u32) -> Option<&str> {
        let idx = line_number.checked_sub(1)? as usize;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| s.saturating_sub(1)) // strip the \n
            .unwrap_or(self.source.len());
        let line = &self.source[start..end];
        // Also strip trailing \r for CRLF
        Some(line.trim_end_matches('\r'))
    }

    /// Map a byte offset to a 1-based `(line, column)` pair.
    ///
    /// Columns count characters, not bytes. Offsets past the end clamp to
    /// the end of the file.
    pub fn position(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.source.len());
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[idx];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |prefix| prefix.chars().count());
        (idx as u32 + 1, column as u32 + 1)
    }

    /// The source text covered by `location`, if it lies inside this file.
    pub fn snippet(&self, location: &Location) -> Option<&str> {
        self.source.get(location.start..location.end)
    }
}
