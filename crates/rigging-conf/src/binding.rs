//! Parsed binding records, prior to reference resolution.

use crate::foundation::{BindingKey, Span};

/// One parsed configuration assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBinding {
    /// What the line assigns to.
    pub key: BindingKey,
    /// Right-hand side, with references still unresolved.
    pub value: RawValue,
    /// Location of the whole assignment.
    pub span: Span,
}

/// Right-hand side of a binding as parsed.
///
/// `MacroRef` and `SymbolRef` are placeholders replaced during resolution;
/// the literal variants carry through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Integer literal.
    Int(i64),
    /// Float literal.
    Float(f64),
    /// String literal.
    Str(String),
    /// Boolean literal (`True` / `False`).
    Bool(bool),
    /// Null literal (`None`).
    None,
    /// Tuple of values: `(a, b)`, `(a,)`, `()`.
    Tuple(Vec<RawValue>),
    /// List of values: `[a, b]`.
    List(Vec<RawValue>),
    /// `%name` — value of a previously defined macro.
    MacroRef(String),
    /// `@[scope/]name` or `@[scope/]name()` — registered symbol, optionally
    /// invoked immediately.
    SymbolRef {
        /// Scope the referenced symbol reads its own parameters from.
        scope: Option<String>,
        /// Registered symbol name, possibly dotted.
        name: String,
        /// Whether the reference is followed by `()`.
        call: bool,
    },
}

impl RawValue {
    /// Whether this value (recursively) contains any unresolved reference.
    pub fn has_references(&self) -> bool {
        match self {
            RawValue::MacroRef(_) | RawValue::SymbolRef { .. } => true,
            RawValue::Tuple(items) | RawValue::List(items) => {
                items.iter().any(RawValue::has_references)
            }
            _ => false,
        }
    }
}
