//! Load-time error reporting and diagnostics.
//!
//! Every failure during lexing, parsing, resolution, or application is a
//! [`ConfigError`]: a categorized diagnostic with a source span, a message,
//! and optional labels and notes. Loading never recovers partially; the
//! loader collects all diagnostics and the host aborts startup.
//!
//! # Examples
//!
//! ```
//! # use rigging_conf::error::*;
//! # use rigging_conf::foundation::Span;
//! let error = ConfigError::new(
//!     ErrorKind::UnknownSymbol,
//!     Span::new(0, 0, 5),
//!     "no symbol 'Adm' is registered".to_string(),
//! )
//! .with_note("did you mean 'Adam'?".to_string());
//! assert_eq!(error.kind.name(), "unknown symbol");
//! ```

use crate::foundation::{SourceMap, Span};
use std::fmt;

/// A load-time diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Category of this error.
    pub kind: ErrorKind,
    /// Severity level.
    pub severity: Severity,
    /// Primary source location.
    pub span: Span,
    /// Primary message.
    pub message: String,
    /// Additional labeled spans (e.g. "previously bound here").
    pub labels: Vec<Label>,
    /// Additional notes or hints.
    pub notes: Vec<String>,
}

/// Category of load-time error.
///
/// # Invariant
///
/// Discriminant values index into `ERROR_KIND_NAMES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    /// Malformed line: lexing or parsing failed.
    Syntax = 0,
    /// A `%name` reference with no earlier definition.
    UnresolvedReference = 1,
    /// An `@name` reference to a symbol missing from the registry.
    UnknownSymbol = 2,
    /// A value whose shape is incompatible with the consuming parameter.
    /// Reported at construction time when raised by a factory during
    /// `@symbol()` evaluation.
    TypeMismatch = 3,
    /// Configuration file or root directory could not be read.
    Io = 4,
    /// Bug in the loader itself.
    Internal = 5,
}

/// Human-readable names, indexed by `ErrorKind` discriminant.
const ERROR_KIND_NAMES: &[&str] = &[
    "syntax error",         // 0: Syntax
    "unresolved reference", // 1: UnresolvedReference
    "unknown symbol",       // 2: UnknownSymbol
    "type mismatch",        // 3: TypeMismatch
    "io error",             // 4: Io
    "internal error",       // 5: Internal
];

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational note.
    Note,
    /// Suspicious but loadable.
    Warning,
    /// Loading cannot proceed.
    Error,
}

/// Secondary labeled span in a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Related source location.
    pub span: Span,
    /// Label text.
    pub message: String,
}

impl ConfigError {
    /// Create an error diagnostic.
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self::with_severity(kind, Severity::Error, span, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(kind: ErrorKind, span: Span, message: String) -> Self {
        Self::with_severity(kind, Severity::Warning, span, message)
    }

    fn with_severity(kind: ErrorKind, severity: Severity, span: Span, message: String) -> Self {
        Self {
            kind,
            severity,
            span,
            message,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Add a secondary labeled span (chaining).
    pub fn with_label(mut self, span: Span, message: String) -> Self {
        self.labels.push(Label { span, message });
        self
    }

    /// Add a note or hint (chaining).
    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }
}

impl ErrorKind {
    /// Human-readable name for this kind.
    pub fn name(self) -> &'static str {
        ERROR_KIND_NAMES[self as usize]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.kind.name(), self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Result type for loading operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Formats diagnostics with source context.
///
/// Produces `file:line:col` headers, the offending source line with a `^^^`
/// underline, secondary labels, and help notes.
pub struct DiagnosticFormatter<'a> {
    sources: &'a SourceMap,
}

impl<'a> DiagnosticFormatter<'a> {
    /// Create a formatter over the loaded sources.
    pub fn new(sources: &'a SourceMap) -> Self {
        Self { sources }
    }

    /// Format one diagnostic.
    pub fn format(&self, error: &ConfigError) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}: {}: {}\n",
            error.severity,
            error.kind.name(),
            error.message
        ));

        // Diagnostics without a backing file (I/O failures before any source
        // was read) get the header only.
        if error.span.file_id as usize >= self.sources.file_count() {
            return output;
        }

        let file_path = self.sources.file_path(&error.span);
        let (line, col) = self.sources.line_col(&error.span);
        output.push_str(&format!("  --> {}:{}:{}\n", file_path.display(), line, col));

        let file = self.sources.file(&error.span);
        if let Some(source_line) = file.line_text(line) {
            let source_line = source_line.trim_end_matches('\n');
            output.push_str("   |\n");
            output.push_str(&format!("{:3} | {}\n", line, source_line));

            let start_col = col as usize;
            let span_len = error.span.len() as usize;
            let end_col = (start_col + span_len).min(source_line.len() + 1);
            let underline = " ".repeat(start_col.saturating_sub(1))
                + &"^".repeat(end_col.saturating_sub(start_col).max(1));
            output.push_str(&format!("   | {}\n", underline));
        }

        for label in &error.labels {
            output.push_str(&format!("   = note: {}\n", label.message));
            let (label_line, label_col) = self.sources.line_col(&label.span);
            let label_path = self.sources.file_path(&label.span);
            output.push_str(&format!(
                "     at {}:{}:{}\n",
                label_path.display(),
                label_line,
                label_col
            ));
        }

        for note in &error.notes {
            output.push_str(&format!("   = help: {}\n", note));
        }

        output
    }

    /// Format multiple diagnostics, blank-line separated.
    pub fn format_all(&self, errors: &[ConfigError]) -> String {
        errors
            .iter()
            .map(|e| self.format(e))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_sources() -> SourceMap {
        let mut sources = SourceMap::new();
        sources.add_file(
            PathBuf::from("train.rig"),
            "LR = %RL\ngamma = 0.99".to_string(),
        );
        sources
    }

    #[test]
    fn test_error_creation() {
        let err = ConfigError::new(
            ErrorKind::UnresolvedReference,
            Span::new(0, 5, 8),
            "no macro named 'RL'".to_string(),
        );
        assert_eq!(err.kind, ErrorKind::UnresolvedReference);
        assert_eq!(err.severity, Severity::Error);
        assert!(err.labels.is_empty());
        assert!(err.notes.is_empty());
    }

    #[test]
    fn test_error_chaining() {
        let err = ConfigError::new(ErrorKind::Syntax, Span::zero(0), "bad line".to_string())
            .with_label(Span::zero(0), "started here".to_string())
            .with_note("check the value grammar".to_string());
        assert_eq!(err.labels.len(), 1);
        assert_eq!(err.notes.len(), 1);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::Syntax.name(), "syntax error");
        assert_eq!(ErrorKind::UnresolvedReference.name(), "unresolved reference");
        assert_eq!(ErrorKind::UnknownSymbol.name(), "unknown symbol");
        assert_eq!(ErrorKind::TypeMismatch.name(), "type mismatch");
        assert_eq!(ErrorKind::Io.name(), "io error");
        assert_eq!(ErrorKind::Internal.name(), "internal error");
    }

    #[test]
    fn test_display() {
        let err = ConfigError::new(
            ErrorKind::UnknownSymbol,
            Span::zero(0),
            "no symbol 'Adm' is registered".to_string(),
        );
        let display = err.to_string();
        assert!(display.contains("error"));
        assert!(display.contains("unknown symbol"));
        assert!(display.contains("Adm"));
    }

    #[test]
    fn test_formatter_basic() {
        let sources = test_sources();
        // "%RL" on line 1
        let error = ConfigError::new(
            ErrorKind::UnresolvedReference,
            Span::new(0, 5, 8),
            "no macro named 'RL'".to_string(),
        );

        let formatter = DiagnosticFormatter::new(&sources);
        let formatted = formatter.format(&error);

        assert!(formatted.contains("unresolved reference"));
        assert!(formatted.contains("train.rig:1:6"));
        assert!(formatted.contains("LR = %RL"));
        assert!(formatted.contains("^^^"));
    }

    #[test]
    fn test_formatter_note() {
        let sources = test_sources();
        let error = ConfigError::new(
            ErrorKind::UnknownSymbol,
            Span::new(0, 0, 2),
            "no symbol 'LR'".to_string(),
        )
        .with_note("register it before loading".to_string());

        let formatted = DiagnosticFormatter::new(&sources).format(&error);
        assert!(formatted.contains("help: register it before loading"));
    }

    #[test]
    fn test_formatter_multiple() {
        let sources = test_sources();
        let errors = vec![
            ConfigError::new(ErrorKind::Syntax, Span::new(0, 0, 2), "first".to_string()),
            ConfigError::new(ErrorKind::Syntax, Span::new(0, 9, 14), "second".to_string()),
        ];
        let formatted = DiagnosticFormatter::new(&sources).format_all(&errors);
        assert!(formatted.contains("first"));
        assert!(formatted.contains("second"));
        assert!(formatted.contains("train.rig:2:"));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Note < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }
}
