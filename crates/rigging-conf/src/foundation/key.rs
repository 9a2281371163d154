//! Binding keys: what a configuration line assigns to.
//!
//! A key is either a bare macro name (`LR = 1e-3`, later referenced as
//! `%LR`) or a parameter of a target, optionally qualified by a scope
//! (`ac/Adam.learning_rate = %LR`). Targets may themselves be dotted paths
//! (`optim.Adam.learning_rate`); the final segment is always the parameter
//! name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Left-hand side of a configuration binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BindingKey {
    /// Bare name, referenced by `%name`.
    Macro(String),
    /// `[scope/]Target.parameter`.
    Param(ParamKey),
}

/// A scoped parameter key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParamKey {
    /// Namespace prefix, disambiguating instantiation sites of the same
    /// target. `None` for unscoped bindings.
    pub scope: Option<String>,
    /// Target name, possibly dotted.
    pub target: String,
    /// Parameter of the target being overridden.
    pub parameter: String,
}

impl ParamKey {
    /// Create a parameter key.
    pub fn new(
        scope: Option<impl Into<String>>,
        target: impl Into<String>,
        parameter: impl Into<String>,
    ) -> Self {
        Self {
            scope: scope.map(Into::into),
            target: target.into(),
            parameter: parameter.into(),
        }
    }

    /// The `(scope, target)` site this key belongs to.
    pub fn site(&self) -> (Option<&str>, &str) {
        (self.scope.as_deref(), &self.target)
    }
}

impl BindingKey {
    /// Create a macro key.
    pub fn macro_name(name: impl Into<String>) -> Self {
        BindingKey::Macro(name.into())
    }

    /// Create a parameter key.
    pub fn param(
        scope: Option<impl Into<String>>,
        target: impl Into<String>,
        parameter: impl Into<String>,
    ) -> Self {
        BindingKey::Param(ParamKey::new(scope, target, parameter))
    }

    /// Whether this is a macro key.
    pub fn is_macro(&self) -> bool {
        matches!(self, BindingKey::Macro(_))
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{}/{}.{}", scope, self.target, self.parameter),
            None => write!(f, "{}.{}", self.target, self.parameter),
        }
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKey::Macro(name) => write!(f, "{}", name),
            BindingKey::Param(key) => write!(f, "{}", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unscoped() {
        let key = BindingKey::param(None::<&str>, "Trainer", "num_iterations");
        assert_eq!(key.to_string(), "Trainer.num_iterations");
    }

    #[test]
    fn test_display_scoped() {
        let key = BindingKey::param(Some("ac"), "Adam", "learning_rate");
        assert_eq!(key.to_string(), "ac/Adam.learning_rate");
    }

    #[test]
    fn test_display_macro() {
        assert_eq!(BindingKey::macro_name("LR").to_string(), "LR");
        assert!(BindingKey::macro_name("LR").is_macro());
    }

    #[test]
    fn test_scoped_and_unscoped_are_distinct() {
        let scoped = BindingKey::param(Some("ac"), "Adam", "learning_rate");
        let unscoped = BindingKey::param(None::<&str>, "Adam", "learning_rate");
        assert_ne!(scoped, unscoped);
    }

    #[test]
    fn test_dotted_target() {
        let key = ParamKey::new(None::<&str>, "optim.Adam", "learning_rate");
        assert_eq!(key.to_string(), "optim.Adam.learning_rate");
        assert_eq!(key.site(), (None, "optim.Adam"));
    }
}
