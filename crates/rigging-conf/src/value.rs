//! Resolved configuration values.
//!
//! After resolution a value contains no references: macros are substituted
//! by value, `@symbol` becomes a [`SymbolValue`] handle, and `@symbol()`
//! becomes an [`ObjectHandle`] wrapping the constructed object.
//!
//! `Display` renders the textual form of the format, so a resolved binding
//! table can be serialized back to configuration text (see
//! [`crate::serialize`]).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased object produced by a symbol factory.
pub type Object = Arc<dyn Any + Send + Sync>;

/// A fully resolved configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// String.
    Str(String),
    /// Boolean.
    Bool(bool),
    /// Explicit null (`None`): the parameter is deliberately unset.
    None,
    /// Tuple of values.
    Tuple(Vec<Value>),
    /// List of values.
    List(Vec<Value>),
    /// Reference to a registered symbol, constructed later by the host.
    Symbol(SymbolValue),
    /// Object constructed eagerly by `@symbol()`.
    Object(ObjectHandle),
}

/// A resolved `@[scope/]name` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolValue {
    /// Scope the symbol reads its own parameters from when constructed.
    pub scope: Option<String>,
    /// Registered symbol name.
    pub name: String,
}

impl SymbolValue {
    /// Create a symbol value.
    pub fn new(scope: Option<impl Into<String>>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.map(Into::into),
            name: name.into(),
        }
    }
}

/// Handle to an eagerly constructed object.
///
/// Keeps the symbol name for serialization and debugging; the object itself
/// is shared and type-erased. Equality is by symbol name only, so two loads
/// of the same file construct distinct objects that count as equivalent
/// bindings.
#[derive(Clone)]
pub struct ObjectHandle {
    name: String,
    object: Object,
}

impl ObjectHandle {
    /// Wrap a constructed object.
    pub fn new(name: impl Into<String>, object: Object) -> Self {
        Self {
            name: name.into(),
            object,
        }
    }

    /// Name of the symbol that produced this object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type-erased object.
    pub fn object(&self) -> &Object {
        &self.object
    }

    /// Downcast to a concrete type.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.object).downcast::<T>().ok()
    }
}

// Debug cannot derive through `dyn Any`; render as the call form used in
// config text.
impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectHandle(@{}())", self.name)
    }
}

impl PartialEq for ObjectHandle {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Value {
    /// Short description of the value's shape, for type-mismatch messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::None => "None",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Symbol(_) => "symbol reference",
            Value::Object(_) => "constructed object",
        }
    }
}

impl fmt::Display for SymbolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "@{}/{}", scope, self.name),
            None => write!(f, "@{}", self.name),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            // {:?} keeps a decimal point or exponent, so the text re-lexes
            // as a float rather than collapsing to an integer.
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\r' => write!(f, "\\r")?,
                        '\t' => write!(f, "\\t")?,
                        _ => write!(f, "{}", c)?,
                    }
                }
                write!(f, "\"")
            }
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::None => write!(f, "None"),
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                // Single-element tuples need the trailing comma to re-parse
                // as a tuple.
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Symbol(sym) => write!(f, "{}", sym),
            Value::Object(obj) => write!(f, "@{}()", obj.name()),
        }
    }
}
