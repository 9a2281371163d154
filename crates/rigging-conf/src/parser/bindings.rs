//! Binding and value parsers.
//!
//! The grammar is line-oriented: one `key = value` assignment per line,
//! except that newlines inside `( )` and `[ ]` are insignificant, allowing
//! multi-line tuple and list values.

use super::{ParseError, TokenStream};
use crate::binding::{RawBinding, RawValue};
use crate::foundation::BindingKey;
use crate::lexer::Token;

/// Parse every binding in a token stream.
///
/// Parsing continues past malformed lines (synchronizing at the next
/// newline), so a single pass reports all syntax errors in the file.
pub fn parse_bindings(stream: &mut TokenStream) -> Result<Vec<RawBinding>, Vec<ParseError>> {
    let mut bindings = Vec::new();
    let mut errors = Vec::new();

    loop {
        stream.skip_newlines();
        if stream.at_end() {
            break;
        }
        match parse_binding(stream) {
            Ok(binding) => bindings.push(binding),
            Err(e) => {
                errors.push(e);
                stream.synchronize();
            }
        }
    }

    if errors.is_empty() {
        Ok(bindings)
    } else {
        Err(errors)
    }
}

/// Parse one `key = value` assignment, consuming its terminating newline.
fn parse_binding(stream: &mut TokenStream) -> Result<RawBinding, ParseError> {
    let start = stream.current_pos();
    let key = parse_key(stream, start)?;
    stream.expect(Token::Eq)?;
    let value = parse_value(stream)?;
    let span = stream.span_from(start);

    match stream.peek() {
        None => {}
        Some(Token::Newline) => {
            stream.advance();
        }
        other => {
            return Err(ParseError::unexpected_token(
                other,
                "after binding value",
                stream.current_span(),
            ));
        }
    }

    Ok(RawBinding { key, value, span })
}

/// Parse a binding key: `name`, `Target.parameter`, or
/// `scope/Target.parameter`.
fn parse_key(stream: &mut TokenStream, start: usize) -> Result<BindingKey, ParseError> {
    let mut scope_parts: Vec<String> = Vec::new();
    let mut head = expect_ident(stream, "in binding key")?;

    while matches!(stream.peek(), Some(Token::Slash)) {
        stream.advance();
        scope_parts.push(head);
        head = expect_ident(stream, "in binding key")?;
    }

    let mut segments = vec![head];
    while matches!(stream.peek(), Some(Token::Dot)) {
        stream.advance();
        segments.push(expect_ident(stream, "in binding key")?);
    }

    if segments.len() == 1 {
        if !scope_parts.is_empty() {
            return Err(ParseError::invalid_syntax(
                "a scoped binding must name a Target.parameter, not a bare macro",
                stream.span_from(start),
            ));
        }
        let name = segments.remove(0);
        return Ok(BindingKey::Macro(name));
    }

    let parameter = segments.pop().expect("key segments checked non-empty");
    let target = segments.join(".");
    let scope = if scope_parts.is_empty() {
        None
    } else {
        Some(scope_parts.join("/"))
    };
    Ok(BindingKey::param(scope, target, parameter))
}

/// Parse a value: literal, reference, tuple, or list.
fn parse_value(stream: &mut TokenStream) -> Result<RawValue, ParseError> {
    let span = stream.current_span();
    match stream.peek() {
        Some(Token::Minus) => {
            stream.advance();
            let span = stream.current_span();
            match stream.advance() {
                Some(Token::Int(n)) => Ok(RawValue::Int(-n)),
                Some(Token::Float(x)) => Ok(RawValue::Float(-x)),
                other => Err(ParseError::unexpected_token(other, "after '-'", span)),
            }
        }
        Some(Token::Int(_)) | Some(Token::Float(_)) => match stream.advance() {
            Some(Token::Int(n)) => Ok(RawValue::Int(*n)),
            Some(Token::Float(x)) => Ok(RawValue::Float(*x)),
            other => Err(ParseError::unexpected_token(other, "numeric literal", span)),
        },
        Some(Token::Str(_)) => match stream.advance() {
            Some(Token::Str(s)) => Ok(RawValue::Str(s.clone())),
            other => Err(ParseError::unexpected_token(other, "string literal", span)),
        },
        Some(Token::True) => {
            stream.advance();
            Ok(RawValue::Bool(true))
        }
        Some(Token::False) => {
            stream.advance();
            Ok(RawValue::Bool(false))
        }
        Some(Token::NoneLit) => {
            stream.advance();
            Ok(RawValue::None)
        }
        Some(Token::Percent) => {
            stream.advance();
            let name = expect_ident(stream, "after '%'")?;
            Ok(RawValue::MacroRef(name))
        }
        Some(Token::At) => parse_symbol_ref(stream),
        Some(Token::LParen) => parse_tuple(stream),
        Some(Token::LBracket) => parse_list(stream),
        other => Err(ParseError::unexpected_token(other, "in binding value", span)),
    }
}

/// Parse `@[scope/]name` with an optional `()` suffix.
///
/// Both scope and name may be dotted paths; slashes separate nested scopes
/// from the symbol name.
fn parse_symbol_ref(stream: &mut TokenStream) -> Result<RawValue, ParseError> {
    stream.expect(Token::At)?;

    let mut parts = vec![parse_dotted(stream, "after '@'")?];
    while matches!(stream.peek(), Some(Token::Slash)) {
        stream.advance();
        parts.push(parse_dotted(stream, "in symbol reference")?);
    }

    let name = parts.pop().expect("symbol parts checked non-empty");
    let scope = if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    };

    let call = if matches!(stream.peek(), Some(Token::LParen)) {
        stream.advance();
        stream.expect(Token::RParen)?;
        true
    } else {
        false
    };

    Ok(RawValue::SymbolRef { scope, name, call })
}

/// Parse `( ... )`: a tuple, or a parenthesized single value.
///
/// As in Python literals, `(v)` is just `v`; a one-element tuple requires
/// the trailing comma `(v,)`.
fn parse_tuple(stream: &mut TokenStream) -> Result<RawValue, ParseError> {
    stream.expect(Token::LParen)?;
    let mut items = Vec::new();
    let mut trailing_comma = false;

    loop {
        stream.skip_newlines();
        if matches!(stream.peek(), Some(Token::RParen)) {
            stream.advance();
            break;
        }
        items.push(parse_value(stream)?);
        trailing_comma = false;
        stream.skip_newlines();
        match stream.peek() {
            Some(Token::Comma) => {
                stream.advance();
                trailing_comma = true;
            }
            Some(Token::RParen) => {
                stream.advance();
                break;
            }
            other => {
                return Err(ParseError::unexpected_token(
                    other,
                    "in tuple value",
                    stream.current_span(),
                ));
            }
        }
    }

    if items.len() == 1 && !trailing_comma {
        let inner = items.remove(0);
        Ok(inner)
    } else {
        Ok(RawValue::Tuple(items))
    }
}

/// Parse `[ ... ]`.
fn parse_list(stream: &mut TokenStream) -> Result<RawValue, ParseError> {
    stream.expect(Token::LBracket)?;
    let mut items = Vec::new();

    loop {
        stream.skip_newlines();
        if matches!(stream.peek(), Some(Token::RBracket)) {
            stream.advance();
            break;
        }
        items.push(parse_value(stream)?);
        stream.skip_newlines();
        match stream.peek() {
            Some(Token::Comma) => {
                stream.advance();
            }
            Some(Token::RBracket) => {
                stream.advance();
                break;
            }
            other => {
                return Err(ParseError::unexpected_token(
                    other,
                    "in list value",
                    stream.current_span(),
                ));
            }
        }
    }

    Ok(RawValue::List(items))
}

/// Parse a dotted identifier path into a `.`-joined string.
fn parse_dotted(stream: &mut TokenStream, context: &str) -> Result<String, ParseError> {
    let mut path = expect_ident(stream, context)?;
    while matches!(stream.peek(), Some(Token::Dot)) {
        stream.advance();
        path.push('.');
        path.push_str(&expect_ident(stream, context)?);
    }
    Ok(path)
}

/// Consume an identifier token.
fn expect_ident(stream: &mut TokenStream, context: &str) -> Result<String, ParseError> {
    let span = stream.current_span();
    match stream.advance() {
        Some(Token::Ident(s)) => Ok(s.clone()),
        other => Err(ParseError::unexpected_token(other, context, span)),
    }
}
