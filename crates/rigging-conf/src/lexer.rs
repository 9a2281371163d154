//! Lexical analysis for the binding configuration format.
//!
//! Tokenization uses logos. The format is line-oriented, so newlines are
//! tokens rather than skipped whitespace; the parser decides where they are
//! significant (binding boundaries) and where they are not (inside bracketed
//! values). `#` comments and intra-line whitespace are stripped during
//! lexing.
//!
//! Value literals follow the Python-like spellings of the source format:
//! `True`, `False`, `None`, quoted strings, and integer/float forms
//! including scientific notation (`1e-4`).

use logos::Logos;

/// A configuration file token.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")] // Intra-line whitespace
#[logos(skip r"#[^\n]*")] // Comments run to end of line
pub enum Token {
    /// Line break. Terminates a binding outside of brackets.
    #[token("\n")]
    Newline,

    // === Literal keywords ===
    /// Boolean literal `True`
    #[token("True")]
    True,
    /// Boolean literal `False`
    #[token("False")]
    False,
    /// Null literal `None`
    #[token("None")]
    NoneLit,

    // === Punctuation ===
    /// Assignment `=`
    #[token("=")]
    Eq,
    /// Key/path separator `.`
    #[token(".")]
    Dot,
    /// Scope separator `/`
    #[token("/")]
    Slash,
    /// Element separator `,`
    #[token(",")]
    Comma,
    /// Numeric negation `-`
    #[token("-")]
    Minus,
    /// Macro reference sigil `%`
    #[token("%")]
    Percent,
    /// Symbol reference sigil `@`
    #[token("@")]
    At,
    /// Delimiter `(`
    #[token("(")]
    LParen,
    /// Delimiter `)`
    #[token(")")]
    RParen,
    /// Delimiter `[`
    #[token("[")]
    LBracket,
    /// Delimiter `]`
    #[token("]")]
    RBracket,

    // === Literals with payload ===
    /// Integer literal. Overflowing literals fail to lex and surface as a
    /// syntax diagnostic.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    /// Float literal (`3.14`, `1e-4`, `5.67e8`).
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    /// Double-quoted string literal with backslash escapes.
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| {
        let s = lex.slice();
        unescape_string(&s[1..s.len() - 1])
    })]
    Str(String),

    /// Identifier: macro names, scopes, target and parameter path segments.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

/// Unescape the contents of a string literal.
fn unescape_string(s: &str) -> Option<String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                _ => return None,
            }
        } else {
            result.push(c);
        }
    }
    Some(result)
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Newline => write!(f, "end of line"),
            Token::True => write!(f, "True"),
            Token::False => write!(f, "False"),
            Token::NoneLit => write!(f, "None"),
            Token::Eq => write!(f, "="),
            Token::Dot => write!(f, "."),
            Token::Slash => write!(f, "/"),
            Token::Comma => write!(f, ","),
            Token::Minus => write!(f, "-"),
            Token::Percent => write!(f, "%"),
            Token::At => write!(f, "@"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Int(n) => write!(f, "{}", n),
            Token::Float(x) => write!(f, "{:?}", x),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::Ident(id) => write!(f, "{}", id),
        }
    }
}
