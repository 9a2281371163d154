//! Hand-written recursive descent parser for the binding format.
//!
//! ## Architecture
//!
//! - `stream`: [`TokenStream`] wrapper with lookahead and span tracking
//! - `error`: [`ParseError`] and recovery
//! - `bindings`: binding and value grammar
//!
//! ## Public API
//!
//! ```rust,ignore
//! pub fn parse_bindings(
//!     tokens: &[(Token, Range<usize>)],
//!     file_id: u16,
//! ) -> Result<Vec<RawBinding>, Vec<ParseError>>
//! ```

mod bindings;
mod error;
mod stream;

pub use error::{ParseError, ParseErrorKind};
use stream::TokenStream;

use crate::binding::RawBinding;
use crate::lexer::Token;
use std::ops::Range;

/// Parse tokens with byte spans into raw bindings.
///
/// # Parameters
/// - `tokens`: `(token, byte_span)` pairs as produced by the lexer
/// - `file_id`: file identifier for span tracking
///
/// # Returns
/// All bindings in file order, or every syntax error found in one pass.
pub fn parse_bindings(
    tokens: &[(Token, Range<usize>)],
    file_id: u16,
) -> Result<Vec<RawBinding>, Vec<ParseError>> {
    let mut stream = TokenStream::new(tokens, file_id);
    bindings::parse_bindings(&mut stream)
}
