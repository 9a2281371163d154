//! Foundation types shared by every stage of the loader: source spans and
//! binding keys.

pub mod key;
pub mod span;

pub use key::{BindingKey, ParamKey};
pub use span::{SourceFile, SourceMap, Span};
