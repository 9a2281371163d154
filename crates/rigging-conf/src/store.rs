//! Resolved binding storage and typed parameter access.
//!
//! [`BindingSet`] is the resolver's output: an insertion-ordered map from
//! binding key to resolved value with last-write-wins semantics.
//! [`ConfigStore`] wraps a set after loading completes; it is immutable and
//! `Send + Sync`, so worker threads read it without synchronization. The
//! store additionally tracks which bindings have been read (atomic flags),
//! feeding the operative/inoperative configuration reports in
//! [`crate::serialize`].
//!
//! [`TargetArgs`] is the contract with host components: a view of one
//! `(scope, target)` site with typed getters. Shape mismatches surface here
//! as [`ParamError`], at construction time rather than load time. A scoped
//! lookup falls back to the unscoped binding; unscoped lookups never observe
//! scoped bindings.

use crate::foundation::{BindingKey, ParamKey};
use crate::registry::SymbolRegistry;
use crate::value::{Object, ObjectHandle, SymbolValue, Value};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Construction-time parameter errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// The bound value's shape is incompatible with the parameter.
    #[error("type mismatch for {key}: expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A parameter the factory requires has no binding.
    #[error("missing required parameter: {key}")]
    MissingParameter { key: String },

    /// Construction was requested for an unregistered symbol.
    #[error("unknown symbol: {name}")]
    UnknownSymbol { name: String },
}

/// Insertion-ordered map of resolved bindings.
///
/// Later insertions for the same key replace the value in place
/// (last-write-wins), keeping the key's original position so serialization
/// order stays stable.
///
/// Equality compares bindings only; the macro-usage bookkeeping carried for
/// operative reporting is excluded.
#[derive(Debug, Clone, Default)]
pub struct BindingSet {
    entries: IndexMap<BindingKey, Value>,
    used_macros: HashSet<String>,
}

impl BindingSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a binding, replacing any earlier value for the same key.
    pub fn insert(&mut self, key: BindingKey, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    /// Look up an exact key.
    pub fn get(&self, key: &BindingKey) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Value of a macro by name.
    pub fn macro_value(&self, name: &str) -> Option<&Value> {
        self.entries.get(&BindingKey::macro_name(name))
    }

    /// Record that a macro was referenced.
    pub fn mark_macro_used(&mut self, name: &str) {
        self.used_macros.insert(name.to_string());
    }

    /// Whether a macro was ever referenced.
    pub fn is_macro_used(&self, name: &str) -> bool {
        self.used_macros.contains(name)
    }

    /// Scoped parameter lookup with unscoped fallback.
    ///
    /// Returns the entry index along with the value so callers can mark the
    /// binding as read.
    pub fn get_param(
        &self,
        scope: Option<&str>,
        target: &str,
        parameter: &str,
    ) -> Option<(usize, &Value)> {
        if let Some(scope) = scope {
            let key = BindingKey::param(Some(scope), target, parameter);
            if let Some((idx, _, value)) = self.entries.get_full(&key) {
                return Some((idx, value));
            }
        }
        let key = BindingKey::param(None::<&str>, target, parameter);
        self.entries
            .get_full(&key)
            .map(|(idx, _, value)| (idx, value))
    }

    /// Iterate bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&BindingKey, &Value)> + '_ {
        self.entries.iter()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for BindingSet {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

/// Per-binding read flags.
///
/// Relaxed atomics: flags are only ever set to true, and reporting runs
/// after the readers are done.
#[derive(Debug, Default)]
pub struct ReadTracker {
    flags: Vec<AtomicBool>,
}

impl ReadTracker {
    fn new(len: usize) -> Self {
        Self {
            flags: (0..len).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    fn mark(&self, idx: usize) {
        if let Some(flag) = self.flags.get(idx) {
            flag.store(true, Ordering::Relaxed);
        }
    }

    fn is_read(&self, idx: usize) -> bool {
        self.flags
            .get(idx)
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}

/// The applied configuration: read-only bindings plus read tracking.
#[derive(Debug)]
pub struct ConfigStore {
    set: BindingSet,
    tracker: ReadTracker,
}

impl ConfigStore {
    /// Wrap a resolved binding set.
    ///
    /// Macros referenced during resolution are marked as read up front, so
    /// they land in the operative report alongside the bindings that used
    /// them.
    pub fn new(set: BindingSet) -> Self {
        let tracker = ReadTracker::new(set.len());
        for (idx, (key, _)) in set.iter().enumerate() {
            if let BindingKey::Macro(name) = key {
                if set.is_macro_used(name) {
                    tracker.mark(idx);
                }
            }
        }
        Self { set, tracker }
    }

    /// Look up a parameter, marking it as read.
    pub fn get(&self, scope: Option<&str>, target: &str, parameter: &str) -> Option<&Value> {
        self.set.get_param(scope, target, parameter).map(|(idx, value)| {
            self.tracker.mark(idx);
            value
        })
    }

    /// Look up a parameter without marking it as read.
    pub fn peek(&self, scope: Option<&str>, target: &str, parameter: &str) -> Option<&Value> {
        self.set.get_param(scope, target, parameter).map(|(_, v)| v)
    }

    /// Typed view of one `(scope, target)` site.
    pub fn args<'a>(&'a self, scope: Option<&'a str>, target: &'a str) -> TargetArgs<'a> {
        TargetArgs {
            set: &self.set,
            tracker: Some(&self.tracker),
            scope,
            target,
        }
    }

    /// Construct a registered symbol from its configured parameters.
    pub fn construct(
        &self,
        registry: &SymbolRegistry,
        scope: Option<&str>,
        name: &str,
    ) -> Result<Object, ParamError> {
        let descriptor = registry.get(name).ok_or_else(|| ParamError::UnknownSymbol {
            name: name.to_string(),
        })?;
        let args = self.args(scope, descriptor.name);
        (descriptor.factory)(&args)
    }

    /// Construct the target of a resolved `@symbol` reference.
    pub fn construct_symbol(
        &self,
        registry: &SymbolRegistry,
        symbol: &SymbolValue,
    ) -> Result<Object, ParamError> {
        self.construct(registry, symbol.scope.as_deref(), &symbol.name)
    }

    /// Iterate bindings with their read flags, in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&BindingKey, &Value, bool)> + '_ {
        self.set
            .iter()
            .enumerate()
            .map(|(idx, (key, value))| (key, value, self.tracker.is_read(idx)))
    }

    /// The underlying binding set.
    pub fn binding_set(&self) -> &BindingSet {
        &self.set
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

/// Typed parameter view of one `(scope, target)` site.
///
/// This is the whole contract between the configuration and host
/// components: factories pull their parameters by name and fall back to
/// their own defaults when a parameter is unbound. An explicit `None`
/// binding reads as unbound.
pub struct TargetArgs<'a> {
    set: &'a BindingSet,
    tracker: Option<&'a ReadTracker>,
    scope: Option<&'a str>,
    target: &'a str,
}

impl<'a> TargetArgs<'a> {
    pub(crate) fn new(
        set: &'a BindingSet,
        tracker: Option<&'a ReadTracker>,
        scope: Option<&'a str>,
        target: &'a str,
    ) -> Self {
        Self {
            set,
            tracker,
            scope,
            target,
        }
    }

    /// The scope this view reads from.
    pub fn scope(&self) -> Option<&str> {
        self.scope
    }

    /// The target this view reads for.
    pub fn target(&self) -> &str {
        self.target
    }

    /// Raw value lookup, marking the binding as read.
    pub fn raw(&self, parameter: &str) -> Option<&'a Value> {
        self.set
            .get_param(self.scope, self.target, parameter)
            .map(|(idx, value)| {
                if let Some(tracker) = self.tracker {
                    tracker.mark(idx);
                }
                value
            })
    }

    /// A `MissingParameter` error for this site, for required parameters:
    /// `args.get_str("name")?.ok_or_else(|| args.missing("name"))?`.
    pub fn missing(&self, parameter: &str) -> ParamError {
        ParamError::MissingParameter {
            key: self.key_string(parameter),
        }
    }

    /// Float parameter; integer bindings coerce.
    pub fn get_f64(&self, parameter: &str) -> Result<Option<f64>, ParamError> {
        match self.raw(parameter) {
            None | Some(Value::None) => Ok(None),
            Some(Value::Float(x)) => Ok(Some(*x)),
            Some(Value::Int(n)) => Ok(Some(*n as f64)),
            Some(other) => Err(self.mismatch(parameter, "float", other)),
        }
    }

    /// Integer parameter.
    pub fn get_i64(&self, parameter: &str) -> Result<Option<i64>, ParamError> {
        match self.raw(parameter) {
            None | Some(Value::None) => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n)),
            Some(other) => Err(self.mismatch(parameter, "int", other)),
        }
    }

    /// Non-negative integer parameter, as `usize`.
    pub fn get_usize(&self, parameter: &str) -> Result<Option<usize>, ParamError> {
        match self.get_i64(parameter)? {
            None => Ok(None),
            Some(n) if n >= 0 => Ok(Some(n as usize)),
            Some(_) => {
                let found = self
                    .raw(parameter)
                    .map(Value::kind)
                    .unwrap_or("negative int");
                Err(ParamError::TypeMismatch {
                    key: self.key_string(parameter),
                    expected: "non-negative int",
                    found,
                })
            }
        }
    }

    /// Boolean parameter.
    pub fn get_bool(&self, parameter: &str) -> Result<Option<bool>, ParamError> {
        match self.raw(parameter) {
            None | Some(Value::None) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.mismatch(parameter, "bool", other)),
        }
    }

    /// String parameter.
    pub fn get_str(&self, parameter: &str) -> Result<Option<&'a str>, ParamError> {
        match self.raw(parameter) {
            None | Some(Value::None) => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.mismatch(parameter, "string", other)),
        }
    }

    /// Symbol-reference parameter (`@name`).
    pub fn get_symbol(&self, parameter: &str) -> Result<Option<&'a SymbolValue>, ParamError> {
        match self.raw(parameter) {
            None | Some(Value::None) => Ok(None),
            Some(Value::Symbol(sym)) => Ok(Some(sym)),
            Some(other) => Err(self.mismatch(parameter, "symbol reference", other)),
        }
    }

    /// Eagerly constructed object parameter (`@name()`).
    pub fn get_object(&self, parameter: &str) -> Result<Option<&'a ObjectHandle>, ParamError> {
        match self.raw(parameter) {
            None | Some(Value::None) => Ok(None),
            Some(Value::Object(obj)) => Ok(Some(obj)),
            Some(other) => Err(self.mismatch(parameter, "constructed object", other)),
        }
    }

    /// Numeric sequence parameter; accepts a tuple or list of ints/floats.
    pub fn get_f64_seq(&self, parameter: &str) -> Result<Option<Vec<f64>>, ParamError> {
        match self.raw(parameter) {
            None | Some(Value::None) => Ok(None),
            Some(Value::Tuple(items)) | Some(Value::List(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Float(x) => out.push(*x),
                        Value::Int(n) => out.push(*n as f64),
                        other => {
                            return Err(self.mismatch(parameter, "sequence of numbers", other))
                        }
                    }
                }
                Ok(Some(out))
            }
            Some(other) => Err(self.mismatch(parameter, "sequence of numbers", other)),
        }
    }

    /// Integer sequence parameter; accepts a tuple or list of ints.
    pub fn get_i64_seq(&self, parameter: &str) -> Result<Option<Vec<i64>>, ParamError> {
        match self.raw(parameter) {
            None | Some(Value::None) => Ok(None),
            Some(Value::Tuple(items)) | Some(Value::List(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Int(n) => out.push(*n),
                        other => return Err(self.mismatch(parameter, "sequence of ints", other)),
                    }
                }
                Ok(Some(out))
            }
            Some(other) => Err(self.mismatch(parameter, "sequence of ints", other)),
        }
    }

    fn key_string(&self, parameter: &str) -> String {
        ParamKey::new(self.scope, self.target, parameter).to_string()
    }

    fn mismatch(&self, parameter: &str, expected: &'static str, found: &Value) -> ParamError {
        ParamError::TypeMismatch {
            key: self.key_string(parameter),
            expected,
            found: found.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(bindings: Vec<(BindingKey, Value)>) -> ConfigStore {
        let mut set = BindingSet::new();
        for (key, value) in bindings {
            set.insert(key, value);
        }
        ConfigStore::new(set)
    }

    #[test]
    fn test_last_write_wins() {
        let mut set = BindingSet::new();
        set.insert(BindingKey::macro_name("X"), Value::Int(1));
        let replaced = set.insert(BindingKey::macro_name("X"), Value::Int(2));
        assert_eq!(replaced, Some(Value::Int(1)));
        assert_eq!(set.macro_value("X"), Some(&Value::Int(2)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_scoped_binding_leaves_unscoped_unset() {
        let store = store(vec![(
            BindingKey::param(Some("actor"), "Network", "width"),
            Value::Int(5),
        )]);
        assert_eq!(store.get(None, "Network", "width"), None);
        assert_eq!(
            store.get(Some("actor"), "Network", "width"),
            Some(&Value::Int(5))
        );
    }

    #[test]
    fn test_scoped_lookup_falls_back_to_unscoped() {
        let store = store(vec![
            (
                BindingKey::param(None::<&str>, "Network", "width"),
                Value::Int(64),
            ),
            (
                BindingKey::param(Some("actor"), "Network", "width"),
                Value::Int(128),
            ),
        ]);
        assert_eq!(
            store.get(Some("actor"), "Network", "width"),
            Some(&Value::Int(128))
        );
        assert_eq!(
            store.get(Some("value"), "Network", "width"),
            Some(&Value::Int(64))
        );
        assert_eq!(store.get(None, "Network", "width"), Some(&Value::Int(64)));
    }

    #[test]
    fn test_typed_getters() {
        let store = store(vec![
            (
                BindingKey::param(None::<&str>, "Adam", "learning_rate"),
                Value::Float(1e-4),
            ),
            (
                BindingKey::param(None::<&str>, "Adam", "steps"),
                Value::Int(100),
            ),
            (
                BindingKey::param(None::<&str>, "Adam", "nesterov"),
                Value::Bool(false),
            ),
            (
                BindingKey::param(None::<&str>, "Adam", "name"),
                Value::Str("adam".into()),
            ),
        ]);
        let args = store.args(None, "Adam");
        assert_eq!(args.get_f64("learning_rate").unwrap(), Some(1e-4));
        // Int coerces to float, but not the reverse.
        assert_eq!(args.get_f64("steps").unwrap(), Some(100.0));
        assert!(args.get_i64("learning_rate").is_err());
        assert_eq!(args.get_usize("steps").unwrap(), Some(100));
        assert_eq!(args.get_bool("nesterov").unwrap(), Some(false));
        assert_eq!(args.get_str("name").unwrap(), Some("adam"));
        assert_eq!(args.get_f64("unbound").unwrap(), None);
    }

    #[test]
    fn test_type_mismatch_message_names_the_key() {
        let store = store(vec![(
            BindingKey::param(Some("ac"), "Adam", "learning_rate"),
            Value::Str("fast".into()),
        )]);
        let args = store.args(Some("ac"), "Adam");
        let err = args.get_f64("learning_rate").unwrap_err();
        assert_eq!(
            err.to_string(),
            "type mismatch for ac/Adam.learning_rate: expected float, found string"
        );
    }

    #[test]
    fn test_none_reads_as_unbound() {
        let store = store(vec![(
            BindingKey::param(None::<&str>, "Trainer", "checkpoint_interval"),
            Value::None,
        )]);
        let args = store.args(None, "Trainer");
        assert_eq!(args.get_i64("checkpoint_interval").unwrap(), None);
    }

    #[test]
    fn test_sequences() {
        let store = store(vec![(
            BindingKey::param(None::<&str>, "Network", "fc_layers"),
            Value::Tuple(vec![Value::Int(256), Value::Int(128)]),
        )]);
        let args = store.args(None, "Network");
        assert_eq!(args.get_i64_seq("fc_layers").unwrap(), Some(vec![256, 128]));
        assert_eq!(
            args.get_f64_seq("fc_layers").unwrap(),
            Some(vec![256.0, 128.0])
        );
    }

    #[test]
    fn test_negative_rejected_for_usize() {
        let store = store(vec![(
            BindingKey::param(None::<&str>, "Trainer", "iterations"),
            Value::Int(-5),
        )]);
        let args = store.args(None, "Trainer");
        assert!(args.get_usize("iterations").is_err());
    }

    #[test]
    fn test_missing_helper() {
        let store = store(vec![]);
        let args = store.args(None, "NavigationEnv");
        let err = args.missing("name");
        assert_eq!(
            err.to_string(),
            "missing required parameter: NavigationEnv.name"
        );
    }

    #[test]
    fn test_read_tracking() {
        let store = store(vec![
            (
                BindingKey::param(None::<&str>, "Adam", "learning_rate"),
                Value::Float(1e-3),
            ),
            (
                BindingKey::param(None::<&str>, "Adam", "eps"),
                Value::Float(1e-8),
            ),
        ]);
        let args = store.args(None, "Adam");
        let _ = args.get_f64("learning_rate");

        let read: Vec<bool> = store.entries().map(|(_, _, read)| read).collect();
        assert_eq!(read, vec![true, false]);
    }

    #[test]
    fn test_peek_does_not_mark() {
        let store = store(vec![(
            BindingKey::param(None::<&str>, "Adam", "eps"),
            Value::Float(1e-8),
        )]);
        let _ = store.peek(None, "Adam", "eps");
        assert!(store.entries().all(|(_, _, read)| !read));
    }
}
