//! Error reporting tests: every failure mode is fatal, and every
//! diagnostic carries a usable source location.

use rigging_conf::{load_path, load_str, ErrorKind, SymbolRegistry};
use std::path::Path;

fn empty_registry() -> SymbolRegistry {
    SymbolRegistry::new()
}

#[test]
fn test_malformed_line_is_syntax_error() {
    let err = load_str("Trainer.evaluate ! True", &empty_registry()).expect_err("must fail");
    assert_eq!(err.errors[0].kind, ErrorKind::Syntax);
}

#[test]
fn test_invalid_token_is_syntax_error() {
    let err = load_str("Trainer.gamma = $", &empty_registry()).expect_err("must fail");
    assert_eq!(err.errors[0].kind, ErrorKind::Syntax);
    assert!(err.errors[0].message.contains("invalid token"));
}

#[test]
fn test_forward_macro_reference() {
    let err = load_str("A = %B\nB = 1", &empty_registry()).expect_err("must fail");
    assert_eq!(err.errors[0].kind, ErrorKind::UnresolvedReference);
}

#[test]
fn test_unknown_symbol() {
    let err =
        load_str("Trainer.optimizer = @Adam", &empty_registry()).expect_err("must fail");
    assert_eq!(err.errors[0].kind, ErrorKind::UnknownSymbol);
    assert!(err.errors[0].message.contains("'Adam'"));
}

#[test]
fn test_all_syntax_errors_reported_in_one_pass() {
    let err = load_str("a =\nb = 1 2\nc =", &empty_registry()).expect_err("must fail");
    assert_eq!(err.errors.len(), 3);
    assert!(err.errors.iter().all(|e| e.kind == ErrorKind::Syntax));
}

#[test]
fn test_all_resolve_errors_reported_in_one_pass() {
    let err = load_str("a = %x\nb = %y", &empty_registry()).expect_err("must fail");
    assert_eq!(err.errors.len(), 2);
}

#[test]
fn test_display_renders_location_and_snippet() {
    let err = load_str("gamma = 0.99\nA = %B", &empty_registry()).expect_err("must fail");
    let rendered = err.to_string();
    assert!(rendered.contains("unresolved reference"));
    assert!(rendered.contains("<string>:2:"));
    assert!(rendered.contains("A = %B"));
    assert!(rendered.contains("^"));
}

#[test]
fn test_missing_path_is_io_error() {
    let err = load_path(Path::new("/nonexistent/train.rig"), &empty_registry())
        .expect_err("must fail");
    assert_eq!(err.errors[0].kind, ErrorKind::Io);
    // No source was read; the rendering degrades to the header line.
    assert!(err.to_string().contains("failed to read"));
}

#[test]
fn test_syntax_errors_suppress_resolution() {
    // The bad line fails the load outright; the dangling reference on the
    // next line is not reached (load is all-or-nothing).
    let err = load_str("a = 1 2\nb = %missing", &empty_registry()).expect_err("must fail");
    assert!(err.errors.iter().all(|e| e.kind == ErrorKind::Syntax));
}
