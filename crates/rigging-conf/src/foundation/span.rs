//! Source location tracking for diagnostics.
//!
//! Configuration files are small, so this module favors simple structures
//! over clever encodings: a `Span` is a byte range plus a file id, and
//! `SourceMap` owns every loaded file with a line-start index for fast
//! line/column lookup.
//!
//! # Examples
//!
//! ```
//! # use rigging_conf::foundation::span::*;
//! # use std::path::PathBuf;
//! let mut map = SourceMap::new();
//! let file_id = map.add_file(PathBuf::from("train.rig"), "LR = 1e-3\ngamma = 0.99".to_string());
//! let span = Span::new(file_id, 0, 9);
//!
//! assert_eq!(map.snippet(&span), "LR = 1e-3");
//! assert_eq!(map.line_col(&span), (1, 1));
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Byte range in a loaded configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Index into `SourceMap` files.
    pub file_id: u16,
    /// Byte offset of the start position.
    pub start: u32,
    /// Byte offset of the end position (exclusive).
    pub end: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(file_id: u16, start: u32, end: u32) -> Self {
        Self {
            file_id,
            start,
            end,
        }
    }

    /// Zero-length span at the start of a file.
    ///
    /// Used for diagnostics that have no precise location (I/O failures,
    /// empty input).
    pub fn zero(file_id: u16) -> Self {
        Self::new(file_id, 0, 0)
    }

    /// Whether this span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

/// All source files loaded in one configuration pass.
///
/// Converts spans into paths, line/column positions, and text snippets for
/// diagnostic rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

/// A single configuration file with a line index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path as given to the loader.
    pub path: PathBuf,
    /// Original source text.
    pub source: String,
    /// Byte offset of each line start; the final entry is the EOF sentinel.
    pub line_starts: Vec<u32>,
}

impl SourceMap {
    /// Create an empty source map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source file and return its id.
    pub fn add_file(&mut self, path: PathBuf, source: String) -> u16 {
        let file_id = self.files.len();
        assert!(file_id < u16::MAX as usize, "too many source files");
        self.files.push(SourceFile::new(path, source));
        file_id as u16
    }

    /// The source file a span points into.
    pub fn file(&self, span: &Span) -> &SourceFile {
        &self.files[span.file_id as usize]
    }

    /// The file path for a span.
    pub fn file_path(&self, span: &Span) -> &Path {
        &self.files[span.file_id as usize].path
    }

    /// The source text covered by a span.
    pub fn snippet(&self, span: &Span) -> &str {
        let file = &self.files[span.file_id as usize];
        &file.source[span.start as usize..span.end as usize]
    }

    /// 1-based (line, column) of a span's start.
    pub fn line_col(&self, span: &Span) -> (u32, u32) {
        self.files[span.file_id as usize].line_col(span.start)
    }

    /// Number of files in this map.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl SourceFile {
    /// Create a source file, computing the line index.
    pub fn new(path: PathBuf, source: String) -> Self {
        let line_starts = compute_line_starts(&source);
        Self {
            path,
            source,
            line_starts,
        }
    }

    /// 1-based (line, column) for a byte offset.
    ///
    /// Offsets past EOF clamp to the last line rather than panicking, so a
    /// slightly stale span still renders a usable diagnostic.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let offset = offset.min(self.source.len() as u32);
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx.min(self.line_count().saturating_sub(1)),
            Err(idx) => idx.max(1) - 1,
        };
        let line = (line_idx + 1) as u32;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Text of a 1-based line, including its trailing newline.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        if line == 0 || line as usize >= self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[(line - 1) as usize] as usize;
        let end = self.line_starts[line as usize] as usize;
        Some(&self.source[start..end])
    }

    /// Number of lines in this file.
    pub fn line_count(&self) -> usize {
        self.line_starts.len() - 1
    }
}

/// Byte offsets of line starts, with an EOF sentinel as the last entry.
fn compute_line_starts(source: &str) -> Vec<u32> {
    let mut line_starts = vec![0];
    for (idx, ch) in source.char_indices() {
        if ch == '\n' {
            line_starts.push((idx + 1) as u32);
        }
    }
    if line_starts.last() != Some(&(source.len() as u32)) {
        line_starts.push(source.len() as u32);
    }
    line_starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basics() {
        let span = Span::new(0, 10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(Span::zero(0).is_empty());
    }

    #[test]
    fn test_compute_line_starts() {
        assert_eq!(compute_line_starts("a = 1\nb = 2\nc = 3"), vec![0, 6, 12, 17]);
        // Trailing newline yields an empty final line.
        assert_eq!(compute_line_starts("a = 1\n"), vec![0, 6]);
    }

    #[test]
    fn test_line_col() {
        let file = SourceFile::new(PathBuf::from("t.rig"), "LR = 1\ngamma = 2\n".to_string());
        assert_eq!(file.line_col(0), (1, 1));
        assert_eq!(file.line_col(7), (2, 1));
        assert_eq!(file.line_col(15), (2, 9));
    }

    #[test]
    fn test_line_col_clamps_past_eof() {
        let file = SourceFile::new(PathBuf::from("t.rig"), "abc".to_string());
        assert_eq!(file.line_col(100), (1, 4));
    }

    #[test]
    fn test_line_text() {
        let file = SourceFile::new(PathBuf::from("t.rig"), "LR = 1\ngamma = 2\n".to_string());
        assert_eq!(file.line_text(1), Some("LR = 1\n"));
        assert_eq!(file.line_text(2), Some("gamma = 2\n"));
        assert_eq!(file.line_text(3), None);
        assert_eq!(file.line_text(0), None);
    }

    #[test]
    fn test_source_map() {
        let mut map = SourceMap::new();
        let a = map.add_file(PathBuf::from("a.rig"), "x = 1".to_string());
        let b = map.add_file(PathBuf::from("b.rig"), "y = 2".to_string());
        assert_eq!(map.file_count(), 2);

        let span = Span::new(b, 0, 5);
        assert_eq!(map.snippet(&span), "y = 2");
        assert_eq!(map.file_path(&span).to_str(), Some("b.rig"));
        assert_eq!(map.file_path(&Span::zero(a)).to_str(), Some("a.rig"));
    }
}
