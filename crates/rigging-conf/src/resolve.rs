//! Reference resolution.
//!
//! Walks parsed bindings in file order and replaces references with values:
//!
//! 1. `%name` — substituted by value from the macro bindings accumulated so
//!    far. Forward references fail: evaluation order is file order.
//! 2. `@[scope/]name` — validated against the [`SymbolRegistry`] and kept
//!    as a symbol handle for the host to construct later.
//! 3. `@[scope/]name()` — additionally invoked immediately, with the
//!    symbol's factory reading parameters from the bindings visible at that
//!    point in the file.
//!
//! Duplicate keys follow last-write-wins. Resolution is idempotent:
//! resolved values contain no references, so resolving them again is the
//! identity.

use crate::binding::{RawBinding, RawValue};
use crate::error::{ConfigError, ErrorKind};
use crate::foundation::Span;
use crate::registry::SymbolRegistry;
use crate::store::{BindingSet, TargetArgs};
use crate::value::{ObjectHandle, SymbolValue, Value};

/// Resolve parsed bindings into a binding set.
///
/// Processes every binding even after a failure, so all resolution errors
/// are reported in one pass.
pub fn resolve(
    bindings: &[RawBinding],
    registry: &SymbolRegistry,
) -> Result<BindingSet, Vec<ConfigError>> {
    let mut set = BindingSet::new();
    let mut errors = Vec::new();

    for binding in bindings {
        match resolve_value(&binding.value, binding.span, &mut set, registry) {
            Ok(value) => {
                set.insert(binding.key.clone(), value);
            }
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(set)
    } else {
        Err(errors)
    }
}

fn resolve_value(
    raw: &RawValue,
    span: Span,
    set: &mut BindingSet,
    registry: &SymbolRegistry,
) -> Result<Value, ConfigError> {
    match raw {
        RawValue::Int(n) => Ok(Value::Int(*n)),
        RawValue::Float(x) => Ok(Value::Float(*x)),
        RawValue::Str(s) => Ok(Value::Str(s.clone())),
        RawValue::Bool(b) => Ok(Value::Bool(*b)),
        RawValue::None => Ok(Value::None),
        RawValue::Tuple(items) => {
            let resolved = items
                .iter()
                .map(|item| resolve_value(item, span, set, registry))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Tuple(resolved))
        }
        RawValue::List(items) => {
            let resolved = items
                .iter()
                .map(|item| resolve_value(item, span, set, registry))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(resolved))
        }
        RawValue::MacroRef(name) => match set.macro_value(name).cloned() {
            Some(value) => {
                set.mark_macro_used(name);
                Ok(value)
            }
            None => Err(ConfigError::new(
                ErrorKind::UnresolvedReference,
                span,
                format!("no macro named '{}' is defined at this point", name),
            )
            .with_note("macros must be defined before they are referenced".to_string())),
        },
        RawValue::SymbolRef { scope, name, call } => {
            let descriptor = registry.get(name).ok_or_else(|| {
                ConfigError::new(
                    ErrorKind::UnknownSymbol,
                    span,
                    format!("no symbol '{}' is registered", name),
                )
            })?;

            if *call {
                let args = TargetArgs::new(set, None, scope.as_deref(), descriptor.name);
                let object = (descriptor.factory)(&args).map_err(|e| {
                    ConfigError::new(
                        ErrorKind::TypeMismatch,
                        span,
                        format!("constructing @{}(): {}", name, e),
                    )
                })?;
                Ok(Value::Object(ObjectHandle::new(descriptor.name, object)))
            } else {
                Ok(Value::Symbol(SymbolValue::new(scope.clone(), name.clone())))
            }
        }
    }
}
