//! High-level configuration loading.
//!
//! This is the public entry point for hosts. It performs the following
//! steps:
//!
//! 1. Discovers `*.rig` files when given a directory (recursive, sorted for
//!    deterministic evaluation order).
//! 2. Reads all sources and builds a [`SourceMap`].
//! 3. Lexes and parses every file into a unified binding list.
//! 4. Appends command-line overrides, if any, so they win by
//!    last-write-wins.
//! 5. Resolves references against the registry and applies the result into
//!    a [`ConfigStore`].
//!
//! Any failure aborts the load with every diagnostic collected so far; no
//! partially applied store is ever returned.

use crate::error::{ConfigError, DiagnosticFormatter, ErrorKind};
use crate::foundation::{SourceMap, Span};
use crate::lexer::Token;
use crate::parser::parse_bindings;
use crate::registry::SymbolRegistry;
use crate::resolve::resolve;
use crate::store::ConfigStore;
use logos::Logos;
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// All diagnostics from a failed load, with the sources needed to render
/// them.
#[derive(Debug)]
pub struct LoadError {
    /// Every diagnostic collected before the load was abandoned.
    pub errors: Vec<ConfigError>,
    /// Sources read before the failure, for snippet rendering.
    pub sources: SourceMap,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatter = DiagnosticFormatter::new(&self.sources);
        write!(f, "{}", formatter.format_all(&self.errors))
    }
}

impl std::error::Error for LoadError {}

impl LoadError {
    fn from_errors(errors: Vec<ConfigError>, sources: SourceMap) -> Self {
        Self { errors, sources }
    }
}

/// Load configuration from a file or directory.
pub fn load_path(path: &Path, registry: &SymbolRegistry) -> Result<ConfigStore, LoadError> {
    load_path_with_overrides(path, &[], registry)
}

/// Load configuration from a file or directory, then apply command-line
/// overrides.
///
/// Each override is one `key = value` assignment in the file grammar.
/// Overrides evaluate after all files, so they take precedence.
pub fn load_path_with_overrides(
    path: &Path,
    overrides: &[String],
    registry: &SymbolRegistry,
) -> Result<ConfigStore, LoadError> {
    let files = if path.is_dir() {
        match discover_files(path) {
            Ok(files) => files,
            Err(e) => return Err(LoadError::from_errors(vec![e], SourceMap::new())),
        }
    } else {
        vec![path.to_path_buf()]
    };

    let mut sources = Vec::new();
    let mut io_errors = Vec::new();
    for file in files {
        match std::fs::read_to_string(&file) {
            Ok(text) => sources.push((file, text)),
            Err(e) => io_errors.push(ConfigError::new(
                ErrorKind::Io,
                Span::zero(0),
                format!("failed to read {}: {}", file.display(), e),
            )),
        }
    }
    if !io_errors.is_empty() {
        return Err(LoadError::from_errors(io_errors, SourceMap::new()));
    }

    for (i, text) in overrides.iter().enumerate() {
        sources.push((PathBuf::from(format!("<override {}>", i + 1)), text.clone()));
    }

    load_sources(sources, registry)
}

/// Load configuration from an in-memory string.
pub fn load_str(source: &str, registry: &SymbolRegistry) -> Result<ConfigStore, LoadError> {
    load_sources(
        vec![(PathBuf::from("<string>"), source.to_string())],
        registry,
    )
}

/// Discover `*.rig` files under a root directory, sorted by path.
pub fn discover_files(root: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        match entry {
            Ok(entry) => {
                if entry.path().extension().is_some_and(|ext| ext == "rig") {
                    files.push(entry.path().to_path_buf());
                }
            }
            Err(err) => {
                return Err(ConfigError::new(
                    ErrorKind::Io,
                    Span::zero(0),
                    format!("directory traversal error: {}", err),
                ));
            }
        }
    }

    files.sort();
    if files.is_empty() {
        return Err(ConfigError::new(
            ErrorKind::Io,
            Span::zero(0),
            format!("no .rig files found in {}", root.display()),
        ));
    }
    Ok(files)
}

/// Format diagnostics with source context.
pub fn format_errors(errors: &[ConfigError], sources: &SourceMap) -> String {
    DiagnosticFormatter::new(sources).format_all(errors)
}

fn load_sources(
    sources: Vec<(PathBuf, String)>,
    registry: &SymbolRegistry,
) -> Result<ConfigStore, LoadError> {
    let mut source_map = SourceMap::new();
    let mut raw = Vec::new();
    let mut all_errors = Vec::new();

    for (path, text) in sources {
        let file_id = source_map.add_file(path, text.clone());

        let tokens = match lex_source(&text, file_id) {
            Ok(tokens) => tokens,
            Err(errors) => {
                all_errors.extend(errors);
                continue;
            }
        };

        match parse_bindings(&tokens, file_id) {
            Ok(bindings) => raw.extend(bindings),
            Err(errors) => {
                all_errors.extend(
                    errors
                        .into_iter()
                        .map(|e| ConfigError::new(ErrorKind::Syntax, e.span, e.message)),
                );
            }
        }
    }

    if !all_errors.is_empty() {
        return Err(LoadError::from_errors(all_errors, source_map));
    }

    debug!(files = source_map.file_count(), bindings = raw.len(), "parsed configuration");

    match resolve(&raw, registry) {
        Ok(set) => {
            debug!(bindings = set.len(), "configuration resolved");
            Ok(ConfigStore::new(set))
        }
        Err(errors) => Err(LoadError::from_errors(errors, source_map)),
    }
}

/// Lex one source file into `(token, byte_span)` pairs.
fn lex_source(
    source: &str,
    file_id: u16,
) -> Result<Vec<(Token, Range<usize>)>, Vec<ConfigError>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(_) => errors.push(ConfigError::new(
                ErrorKind::Syntax,
                Span::new(file_id, span.start as u32, span.end as u32),
                format!("invalid token '{}'", &source[span.clone()]),
            )),
        }
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}
