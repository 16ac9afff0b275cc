use crate::ast::{Function, Literal, Span, Term, TermKind};
use crate::lexer::{SpannedToken, Token, tokenize};
use liquid_core::{Primitive, Type};

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Text that does not form any token
    TokenInvalid(String),
    UnexpectedToken {
        expected: Vec<String>,
        found: String,
    },
    UnexpectedEndOfInput {
        expected: Vec<String>,
    },
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::TokenInvalid(text) => {
                write!(f, "syntax error: couldn't tokenize \"{}\"", text)
            }
            ErrorKind::UnexpectedToken { expected, found } => write!(
                f,
                "syntax error: expected \"{}\" but got \"{}\"",
                expected.join("\", \""),
                found
            ),
            ErrorKind::UnexpectedEndOfInput { expected } => write!(
                f,
                "syntax error: expected \"{}\" but reached end of input",
                expected.join("\", \"")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub kind: ErrorKind,
    pub span: Option<Span>,
}

impl SyntaxError {
    pub fn new(kind: ErrorKind, span: Option<Span>) -> Self {
        Self { kind, span }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for SyntaxError {}

const IDENTIFIER: &str = "<identifier>";
const LITERAL: &str = "<literal>";

/// Tokens that may begin an operand of an application.
const TERM_START: &[&str] = &[
    "(", "async", "fun", "let", IDENTIFIER, "and", "not", LITERAL,
];
const TYPE_START: &[&str] = &["(", "Bool", "Number", IDENTIFIER];

pub fn parse_source(source: &str) -> Result<Term, SyntaxError> {
    parse(tokenize(source)?)
}

/// Parse a token stream into a single surface term. The whole stream must
/// be consumed.
pub fn parse(tokens: Vec<SpannedToken>) -> Result<Term, SyntaxError> {
    let mut parser = Parser::new(tokens);
    let term = parser.term()?;
    if let Some(token) = parser.peek_spanned() {
        return Err(SyntaxError::new(
            ErrorKind::UnexpectedToken {
                expected: vec!["<end of input>".to_string()],
                found: token.token.to_string(),
            },
            Some(token.span),
        ));
    }
    Ok(term)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek_spanned(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn peek(&self) -> Option<&Token> {
        self.peek_spanned().map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Error for the token at the cursor (or the end of input).
    fn unexpected(&self, expected: &[&str]) -> SyntaxError {
        let expected = expected.iter().map(|s| s.to_string()).collect();
        match self.peek_spanned() {
            Some(token) => SyntaxError::new(
                ErrorKind::UnexpectedToken {
                    expected,
                    found: token.token.to_string(),
                },
                Some(token.span),
            ),
            None => SyntaxError::new(
                ErrorKind::UnexpectedEndOfInput { expected },
                self.tokens.last().map(|t| t.span),
            ),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<Span, SyntaxError> {
        if self.peek() == Some(&expected)
            && let Some(token) = self.advance()
        {
            return Ok(token.span);
        }
        let expected = expected.to_string();
        Err(self.unexpected(&[expected.as_str()]))
    }

    fn expect_identifier(&mut self) -> Result<String, SyntaxError> {
        if let Some(Token::Identifier(name)) = self.peek() {
            let name = name.clone();
            self.advance();
            return Ok(name);
        }
        Err(self.unexpected(&[IDENTIFIER]))
    }

    fn starts_term(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::ParenLeft
                    | Token::Async
                    | Token::Fun
                    | Token::Let
                    | Token::Identifier(_)
                    | Token::And
                    | Token::Not
                    | Token::True
                    | Token::False
                    | Token::Number(_)
            )
        )
    }

    // term := single single*   (left-associative application)
    fn term(&mut self) -> Result<Term, SyntaxError> {
        let mut term = self.single()?;
        while self.starts_term() {
            let arg = self.single()?;
            let span = term.span.to(arg.span);
            term = Term::new(
                TermKind::Application {
                    callee: Box::new(term),
                    arg: Box::new(arg),
                },
                span,
            );
        }
        Ok(term)
    }

    // single := atom ('.1' | '.2')*
    fn single(&mut self) -> Result<Term, SyntaxError> {
        let mut term = self.atom()?;
        loop {
            let kind: fn(Box<Term>) -> TermKind = match self.peek() {
                Some(Token::PairCar) => TermKind::PairCar,
                Some(Token::PairCdr) => TermKind::PairCdr,
                _ => break,
            };
            let Some(suffix) = self.advance() else { break };
            let span = term.span.to(suffix.span);
            term = Term::new(kind(Box::new(term)), span);
        }
        Ok(term)
    }

    fn atom(&mut self) -> Result<Term, SyntaxError> {
        let Some(start) = self.peek_spanned().cloned() else {
            return Err(self.unexpected(TERM_START));
        };

        match start.token {
            Token::ParenLeft => {
                self.advance();
                let car = self.term()?;
                match self.peek() {
                    Some(Token::Comma) => {
                        self.advance();
                        let cdr = self.term()?;
                        let end = self.expect(Token::ParenRight)?;
                        Ok(Term::new(
                            TermKind::Pair {
                                car: Box::new(car),
                                cdr: Box::new(cdr),
                            },
                            start.span.to(end),
                        ))
                    }
                    Some(Token::ParenRight) => {
                        self.advance();
                        Ok(car)
                    }
                    _ => Err(self.unexpected(&[",", ")"])),
                }
            }
            Token::Async => {
                self.advance();
                self.expect(Token::Fun)?;
                let function = self.function()?;
                let span = start.span.to(function.body.span);
                Ok(Term::new(TermKind::AsyncFun(function), span))
            }
            Token::Fun => {
                self.advance();
                let function = self.function()?;
                let span = start.span.to(function.body.span);
                Ok(Term::new(TermKind::Fun(function), span))
            }
            Token::Let => {
                self.advance();
                let binder = self.expect_identifier()?;
                self.expect(Token::Equal)?;
                let bound = self.term()?;
                self.expect(Token::In)?;
                let body = self.term()?;
                let span = start.span.to(body.span);
                Ok(Term::new(
                    TermKind::Let {
                        binder,
                        bound: Box::new(bound),
                        body: Box::new(body),
                    },
                    span,
                ))
            }
            Token::Identifier(name) => {
                self.advance();
                Ok(Term::new(TermKind::Variable(name), start.span))
            }
            Token::And => {
                self.advance();
                Ok(Term::new(TermKind::Primitive(Primitive::And), start.span))
            }
            Token::Not => {
                self.advance();
                Ok(Term::new(TermKind::Primitive(Primitive::Not), start.span))
            }
            Token::True | Token::False => {
                self.advance();
                let literal = Literal::Bool(start.token == Token::True);
                Ok(Term::new(TermKind::Value(literal), start.span))
            }
            Token::Number(digits) => {
                self.advance();
                Ok(Term::new(
                    TermKind::Value(Literal::Number(digits)),
                    start.span,
                ))
            }
            _ => Err(self.unexpected(TERM_START)),
        }
    }

    // x ':' type '=' term, after `fun`
    fn function(&mut self) -> Result<Function, SyntaxError> {
        let arg = self.expect_identifier()?;
        self.expect(Token::Colon)?;
        let arg_type = self.parse_type()?;
        self.expect(Token::Equal)?;
        let body = self.term()?;
        Ok(Function {
            arg,
            arg_type,
            body: Box::new(body),
        })
    }

    // type := type_atom (('->' | '->a') type)?
    fn parse_type(&mut self) -> Result<Type, SyntaxError> {
        let domain = self.type_atom()?;
        match self.peek() {
            Some(Token::Arrow) => {
                self.advance();
                Ok(Type::fun(domain, self.parse_type()?))
            }
            Some(Token::AsyncArrow) => {
                self.advance();
                Ok(Type::async_fun(domain, self.parse_type()?))
            }
            _ => Ok(domain),
        }
    }

    fn type_atom(&mut self) -> Result<Type, SyntaxError> {
        match self.peek() {
            Some(Token::ParenLeft) => {
                self.advance();
                let car = self.parse_type()?;
                match self.peek() {
                    Some(Token::Comma) => {
                        self.advance();
                        let cdr = self.parse_type()?;
                        self.expect(Token::ParenRight)?;
                        Ok(Type::pair(car, cdr))
                    }
                    Some(Token::ParenRight) => {
                        self.advance();
                        Ok(car)
                    }
                    _ => Err(self.unexpected(&[",", ")"])),
                }
            }
            Some(Token::BoolType) => {
                self.advance();
                Ok(Type::bool())
            }
            Some(Token::NumberType) => {
                self.advance();
                Ok(Type::number())
            }
            Some(Token::Identifier(name)) => {
                let base = Type::Base(name.clone());
                self.advance();
                Ok(base)
            }
            _ => Err(self.unexpected(TYPE_START)),
        }
    }
}
