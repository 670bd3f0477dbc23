// Parser for host violation messages.
//
// Parses the token stream (from the lexer) against the one fixed message
// shape the interceptor understands:
//
//   Argument <digits> passed to [<Word>::]<Word>() must be an instance of
//   <Word>, <Word> given[...]
//
// Uses chumsky combinators. The grammar is anchored at the start; anything
// after `given` is ignored, including word characters glued onto it.
//
// Preconditions: none.
// Postconditions: either all five fields are extracted or `ParseFailure` is
//   returned.
// Failure modes: any deviation from the shape yields `ParseFailure`, which
//   callers treat as "not handled" rather than as an error.
// Side effects: none.

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;
use thiserror::Error;

use crate::lexer::Token;
use crate::violation::{ArgumentIndex, ParsedViolation};

type ParserExtra<'tokens> = extra::Err<Rich<'tokens, Token, SimpleSpan>>;

/// The message is not a violation this crate recognizes.
#[derive(Debug, Error)]
#[error("message does not match the violation grammar: {}", first_reason(.errors))]
pub struct ParseFailure {
    pub errors: Vec<Rich<'static, Token, SimpleSpan>>,
}

fn first_reason(errors: &[Rich<'static, Token, SimpleSpan>]) -> String {
    errors
        .first()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no output".to_string())
}

/// Parse a raw violation message. Lexes then parses.
pub fn parse(raw: &str) -> Result<ParsedViolation, ParseFailure> {
    let tokens = crate::lexer::lex(raw);
    let len = raw.len();

    let token_iter = tokens.into_iter().map(|(tok, span)| {
        let cspan: SimpleSpan = (span.start..span.end).into();
        (tok, cspan)
    });
    let eoi: SimpleSpan = (len..len).into();
    let stream = Stream::from_iter(token_iter).map(eoi, |(t, s): (_, _)| (t, s));

    let (parsed, errors) = violation_parser().parse(stream).into_output_errors();
    match parsed {
        Some(violation) if errors.is_empty() => Ok(violation),
        _ => Err(ParseFailure {
            errors: errors.into_iter().map(|e| e.into_owned()).collect(),
        }),
    }
}

// ── Grammar ──

fn violation_parser<'tokens, I>(
) -> impl Parser<'tokens, I, ParsedViolation, ParserExtra<'tokens>>
where
    I: ValueInput<'tokens, Token = Token, Span = SimpleSpan>,
{
    let space = just(Token::Space);
    let keyword = |text: &str| just(Token::Word(text.to_string())).ignored();
    let word = select! { Token::Word(w) => w };

    // `\d+`, 1-based. Digits are kept verbatim; oversized values saturate.
    let index = word.clone().try_map(|text: String, span| {
        match ArgumentIndex::from_digits(&text) {
            Some(index) if index.get() > 0 => Ok(index),
            Some(_) => Err(Rich::custom(span, "argument index must be at least 1")),
            None => Err(Rich::custom(
                span,
                format!("expected an argument index, found `{text}`"),
            )),
        }
    });

    // `given` may run straight into trailing word characters (`givenX`).
    let given = select! { Token::Word(w) if w.starts_with("given") => () };

    let header = keyword("Argument")
        .ignore_then(space.clone())
        .ignore_then(index)
        .then_ignore(space.clone())
        .then_ignore(keyword("passed"))
        .then_ignore(space.clone())
        .then_ignore(keyword("to"))
        .then_ignore(space.clone());

    let scope = word.clone().then_ignore(just(Token::PathSep)).or_not();
    let callee = scope.then(word.clone()).then_ignore(just(Token::Parens));

    let contract = space
        .clone()
        .ignore_then(keyword("must"))
        .then_ignore(space.clone())
        .then_ignore(keyword("be"))
        .then_ignore(space.clone())
        .then_ignore(keyword("an"))
        .then_ignore(space.clone())
        .then_ignore(keyword("instance"))
        .then_ignore(space.clone())
        .then_ignore(keyword("of"))
        .then_ignore(space.clone())
        .ignore_then(word.clone())
        .then_ignore(just(Token::Comma))
        .then_ignore(space.clone())
        .then(word)
        .then_ignore(space)
        .then_ignore(given);

    header
        .then(callee)
        .then(contract)
        .then_ignore(any().repeated())
        .map(|((argument_index, (scope_name, function_name)), (expected, given_type))| {
            ParsedViolation {
                argument_index,
                scope_name,
                function_name,
                expected_type_name: expected,
                given_type_name: given_type,
            }
        })
}
