use crate::ast::Span;
use crate::parser::{ErrorKind, SyntaxError};
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, multispace0, satisfy},
    combinator::{map, not, opt, recognize, value},
    sequence::{pair, terminated},
};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Async,
    Fun,
    Let,
    In,

    // Primitive functions
    And,
    Not,

    // Primitive types
    BoolType,
    NumberType,

    // Literals
    True,
    False,
    Number(String),

    Identifier(String),

    // Constructs
    ParenLeft,
    ParenRight,
    PairCar,
    PairCdr,
    Comma,
    Equal,
    Colon,
    Arrow,
    AsyncArrow,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Async => "async",
            Token::Fun => "fun",
            Token::Let => "let",
            Token::In => "in",
            Token::And => "and",
            Token::Not => "not",
            Token::BoolType => "Bool",
            Token::NumberType => "Number",
            Token::True => "true",
            Token::False => "false",
            Token::Number(digits) => digits,
            Token::Identifier(name) => name,
            Token::ParenLeft => "(",
            Token::ParenRight => ")",
            Token::PairCar => ".1",
            Token::PairCdr => ".2",
            Token::Comma => ",",
            Token::Equal => "=",
            Token::Colon => ":",
            Token::Arrow => "->",
            Token::AsyncArrow => "->a",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut rest = source;

    loop {
        rest = skip_whitespace(rest);
        if rest.is_empty() {
            break;
        }
        let offset = source.len() - rest.len();

        match token(rest) {
            Ok((remaining, token)) => {
                let length = rest.len() - remaining.len();
                tokens.push(SpannedToken {
                    token,
                    span: Span::new(offset, length),
                });
                rest = remaining;
            }
            Err(_) => {
                let word = invalid_word(rest);
                return Err(SyntaxError::new(
                    ErrorKind::TokenInvalid(word.to_string()),
                    Some(Span::new(offset, word.len())),
                ));
            }
        }
    }

    log::trace!("tokenized {} tokens", tokens.len());
    Ok(tokens)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn skip_whitespace(input: &str) -> &str {
    match multispace0::<&str, nom::error::Error<&str>>(input) {
        Ok((rest, _)) => rest,
        Err(_) => input,
    }
}

/// The text reported when no token matches: the run of word characters at
/// the cursor, or the single offending character.
fn invalid_word(input: &str) -> &str {
    match take_while1::<_, &str, nom::error::Error<&str>>(is_word_char)(input) {
        Ok((_, word)) => word,
        Err(_) => {
            let length = input.chars().next().map_or(0, char::len_utf8);
            &input[..length]
        }
    }
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((construct, number, word))(input)
}

fn construct(input: &str) -> IResult<&str, Token> {
    alt((
        value(
            Token::AsyncArrow,
            terminated(tag("->a"), not(satisfy(is_word_char))),
        ),
        value(Token::Arrow, tag("->")),
        value(Token::PairCar, tag(".1")),
        value(Token::PairCdr, tag(".2")),
        value(Token::ParenLeft, char('(')),
        value(Token::ParenRight, char(')')),
        value(Token::Comma, char(',')),
        value(Token::Equal, char('=')),
        value(Token::Colon, char(':')),
    ))(input)
}

fn number(input: &str) -> IResult<&str, Token> {
    map(
        terminated(
            recognize(pair(digit1, opt(pair(char('.'), digit1)))),
            not(satisfy(is_word_char)),
        ),
        |digits: &str| Token::Number(digits.to_string()),
    )(input)
}

fn word(input: &str) -> IResult<&str, Token> {
    map(
        recognize(pair(
            satisfy(|c: char| c.is_ascii_alphabetic() || c == '_'),
            take_while(is_word_char),
        )),
        keyword_or_identifier,
    )(input)
}

fn keyword_or_identifier(word: &str) -> Token {
    match word {
        "async" => Token::Async,
        "fun" => Token::Fun,
        "let" => Token::Let,
        "in" => Token::In,
        "and" => Token::And,
        "not" => Token::Not,
        "Bool" => Token::BoolType,
        "Number" => Token::NumberType,
        "true" => Token::True,
        "false" => Token::False,
        _ => Token::Identifier(word.to_string()),
    }
}
