// Lexer for host violation messages.
//
// Tokenizes a raw message into words, single spaces and the few punctuation
// marks the violation grammar uses. Uses the `logos` crate for DFA-based
// lexing.
//
// Preconditions: input is valid UTF-8.
// Postconditions: every byte of the input is covered by exactly one token;
//   unrecognized characters become `Token::Unknown` in place so the parser
//   sees the gap.
// Failure modes: none (lexing is total).
// Side effects: none.

use logos::Logos;
use std::fmt;

/// Byte-offset span in the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Violation message tokens.
///
/// Spaces are significant: the grammar separates its fixed words by exactly
/// one space, so runs of spaces lex as several `Space` tokens.
#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    #[token(" ")]
    Space,
    #[token("::")]
    PathSep,
    #[token("()")]
    Parens,
    #[token(",")]
    Comma,

    /// Word: `[A-Za-z0-9_]+` (digits included, as in argument indices).
    #[regex(r"[A-Za-z0-9_]+", |lex| lex.slice().to_owned())]
    Word(String),

    /// Any character the patterns above do not cover.
    Unknown,
}

impl Token {
    /// The word text, if this is a word token.
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Token::Word(w) => Some(w),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Space => write!(f, "' '"),
            Token::PathSep => write!(f, "::"),
            Token::Parens => write!(f, "()"),
            Token::Comma => write!(f, ","),
            Token::Word(w) => write!(f, "{w}"),
            Token::Unknown => write!(f, "<unknown>"),
        }
    }
}

// ── Public API ──

/// Lex a violation message into tokens.
///
/// Lexing never fails: characters outside the grammar's alphabet are kept
/// as `Token::Unknown`.
pub fn lex(source: &str) -> Vec<(Token, Span)> {
    Token::lexer(source)
        .spanned()
        .map(|(result, range)| {
            let span = Span {
                start: range.start,
                end: range.end,
            };
            (result.unwrap_or(Token::Unknown), span)
        })
        .collect()
}

// ── Tests ──
