// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! # rigging-conf
//!
//! Loader for a declarative parameter-binding configuration language.
//!
//! Configuration files are flat lists of `key = value` assignments that
//! override default parameters of registered components before a host
//! program constructs them:
//!
//! ```text
//! # hyperparameters
//! LR = 1e-3
//!
//! ac/Adam.learning_rate = %LR
//! ActorCriticAlgorithm.gamma = 0.99
//! ActorCriticAlgorithm.optimizer = @ac/Adam
//! Trainer.env = @NavigationEnv()
//! ```
//!
//! `%name` references substitute earlier macro values; `@name` references
//! resolve against a [`SymbolRegistry`] the host populates before loading,
//! and `@name()` constructs the symbol immediately. Bindings load once, are
//! immutable afterward, and are read at construction time through typed
//! [`TargetArgs`] views.
//!
//! ## Architecture
//!
//! ```text
//! lexer      - tokenization (logos)
//! parser     - hand-written recursive descent -> RawBinding list
//! resolve    - %/@ reference resolution -> BindingSet (last-write-wins)
//! store      - applied, read-only ConfigStore + typed parameter access
//! serialize  - binding table back to text; operative/inoperative reports
//! load       - file discovery, multi-file loading, override handling
//! error      - diagnostics with source snippets
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rigging_conf::{load_path, SymbolRegistry};
//! use std::path::Path;
//!
//! let mut registry = SymbolRegistry::new();
//! // ... register component factories ...
//!
//! let store = load_path(Path::new("configs/"), &registry)?;
//! let args = store.args(Some("ac"), "Adam");
//! let learning_rate = args.get_f64("learning_rate")?.unwrap_or(1e-3);
//! ```

pub mod binding;
pub mod error;
pub mod foundation;
pub mod lexer;
pub mod load;
pub mod parser;
pub mod registry;
pub mod resolve;
pub mod serialize;
pub mod store;
pub mod value;

pub use binding::{RawBinding, RawValue};
pub use error::{ConfigError, ConfigResult, DiagnosticFormatter, ErrorKind, Severity};
pub use foundation::{BindingKey, ParamKey, SourceMap, Span};
pub use lexer::Token;
pub use load::{
    discover_files, format_errors, load_path, load_path_with_overrides, load_str, LoadError,
};
pub use parser::{parse_bindings, ParseError, ParseErrorKind};
pub use registry::{FactoryFn, RegistryError, SymbolDescriptor, SymbolRegistry};
pub use resolve::resolve;
pub use serialize::{config_str, inoperative_config_str, markdownify, operative_config_str};
pub use store::{BindingSet, ConfigStore, ParamError, TargetArgs};
pub use value::{Object, ObjectHandle, SymbolValue, Value};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
