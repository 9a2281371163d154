//! Token stream wrapper for the hand-written parser.

use crate::foundation::Span;
use crate::lexer::Token;
use std::ops::Range;

/// Token stream with lookahead and span tracking.
///
/// Each token is paired with its byte range in the source file, so errors
/// point at the offending text.
pub struct TokenStream<'src> {
    tokens: &'src [(Token, Range<usize>)],
    pos: usize,
    file_id: u16,
}

impl<'src> TokenStream<'src> {
    /// Create a stream over tokens with their byte spans.
    pub fn new(tokens: &'src [(Token, Range<usize>)], file_id: u16) -> Self {
        Self {
            tokens,
            pos: 0,
            file_id,
        }
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    /// Advance past the current token and return it.
    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos).map(|(tok, _)| tok);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Whether the current token has the same discriminant as `expected`.
    pub fn check(&self, expected: &Token) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    /// Consume a specific token, or fail with an "expected" error.
    pub fn expect(&mut self, expected: Token) -> Result<Span, super::ParseError> {
        if self.check(&expected) {
            let start = self.pos;
            self.advance();
            Ok(self.span_from(start))
        } else {
            Err(super::ParseError::expected_token(
                &expected,
                self.peek(),
                self.current_span(),
            ))
        }
    }

    /// Whether the stream is exhausted.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Current position (token index), for span bookkeeping.
    pub fn current_pos(&self) -> usize {
        self.pos
    }

    /// Span from a start position through the last consumed token.
    pub fn span_from(&self, start: usize) -> Span {
        let start_byte = match self.tokens.get(start) {
            Some((_, span)) => span.start,
            None => return self.current_span(),
        };
        let end_byte = if self.pos > start {
            self.tokens[self.pos - 1].1.end
        } else {
            start_byte
        };
        Span::new(self.file_id, start_byte as u32, end_byte as u32)
    }

    /// Span of the current token, or a zero-length span at EOF.
    pub fn current_span(&self) -> Span {
        if let Some((_, span)) = self.tokens.get(self.pos) {
            Span::new(self.file_id, span.start as u32, span.end as u32)
        } else if let Some((_, span)) = self.tokens.last() {
            Span::new(self.file_id, span.end as u32, span.end as u32)
        } else {
            Span::zero(self.file_id)
        }
    }

    /// Skip past the next newline for error recovery.
    ///
    /// One malformed line then produces one diagnostic instead of a cascade.
    pub fn synchronize(&mut self) {
        while let Some(token) = self.advance() {
            if matches!(token, Token::Newline) {
                break;
            }
        }
    }

    /// Skip any run of newline tokens.
    pub fn skip_newlines(&mut self) {
        while matches!(self.peek(), Some(Token::Newline)) {
            self.advance();
        }
    }
}
