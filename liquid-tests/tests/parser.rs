mod common;
use common::*;
use liquid_compiler::ast::{Literal, TermKind};
use liquid_compiler::lexer::Token;
use liquid_compiler::{ErrorKind, Span, parse_source, tokenize};
use liquid_core::Type;

fn tokens(source: &str) -> Vec<Token> {
    tokenize(source)
        .unwrap()
        .into_iter()
        .map(|t| t.token)
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_async_arrow_token() {
    assert_eq!(
        tokens("Bool ->a Bool"),
        vec![Token::BoolType, Token::AsyncArrow, Token::BoolType]
    );
}

#[test]
fn test_arrow_followed_by_identifier() {
    assert_eq!(
        tokens("Bool ->abc"),
        vec![
            Token::BoolType,
            Token::Arrow,
            Token::Identifier("abc".to_string())
        ]
    );
}

#[test]
fn test_number_and_projection_tokens() {
    assert_eq!(tokens("1.25"), vec![Token::Number("1.25".to_string())]);
    assert_eq!(
        tokens("p.1.2"),
        vec![
            Token::Identifier("p".to_string()),
            Token::PairCar,
            Token::PairCdr
        ]
    );
}

#[test]
fn test_token_spans() {
    let spans: Vec<Span> = tokenize("let x = 10")
        .unwrap()
        .into_iter()
        .map(|t| t.span)
        .collect();
    assert_eq!(
        spans,
        vec![
            Span::new(0, 3),
            Span::new(4, 1),
            Span::new(6, 1),
            Span::new(8, 2)
        ]
    );
}

#[test]
fn test_invalid_character() {
    let error = tokenize("true # false").unwrap_err();
    assert_eq!(error.kind, ErrorKind::TokenInvalid("#".to_string()));
    assert_eq!(error.span, Some(Span::new(5, 1)));
}

#[test]
fn test_number_glued_to_word_is_invalid() {
    liquid()
        .evaluate("12ab")
        .expect_syntax_error(ErrorKind::TokenInvalid("12ab".to_string()));
}

#[test]
fn test_application_is_left_associative() {
    let term = parse_source("f x y").unwrap();
    let TermKind::Application { callee, arg } = term.kind else {
        panic!("expected an application");
    };
    assert_eq!(arg.kind, TermKind::Variable("y".to_string()));
    let TermKind::Application { callee, arg } = callee.kind else {
        panic!("expected a nested application");
    };
    assert_eq!(callee.kind, TermKind::Variable("f".to_string()));
    assert_eq!(arg.kind, TermKind::Variable("x".to_string()));
}

#[test]
fn test_projection_binds_tighter_than_application() {
    let term = parse_source("not p.1").unwrap();
    let TermKind::Application { arg, .. } = term.kind else {
        panic!("expected an application");
    };
    assert!(matches!(arg.kind, TermKind::PairCar(_)));
}

#[test]
fn test_function_type_is_right_associative() {
    let term = parse_source("fun f : Bool -> Bool -> Bool = f").unwrap();
    let TermKind::Fun(function) = term.kind else {
        panic!("expected a function");
    };
    assert_eq!(
        function.arg_type,
        Type::fun(Type::bool(), Type::fun(Type::bool(), Type::bool()))
    );
}

#[test]
fn test_parenthesised_function_domain() {
    let term = parse_source("fun f : (Bool -> Bool) -> Bool = f").unwrap();
    let TermKind::Fun(function) = term.kind else {
        panic!("expected a function");
    };
    assert_eq!(
        function.arg_type,
        Type::fun(Type::fun(Type::bool(), Type::bool()), Type::bool())
    );
}

#[test]
fn test_async_function() {
    let term = parse_source("async fun n : Number = n").unwrap();
    let TermKind::AsyncFun(function) = term.kind else {
        panic!("expected an async function");
    };
    assert_eq!(function.arg, "n");
    assert_eq!(function.arg_type, Type::number());
    assert_eq!(term.span, Span::new(0, 24));
}

#[test]
fn test_literals() {
    assert_eq!(
        parse_source("false").unwrap().kind,
        TermKind::Value(Literal::Bool(false))
    );
    assert_eq!(
        parse_source("42").unwrap().kind,
        TermKind::Value(Literal::Number("42".to_string()))
    );
}

#[test]
fn test_leftover_tokens() {
    liquid()
        .evaluate("(true) )")
        .expect_syntax_error(ErrorKind::UnexpectedToken {
            expected: strings(&["<end of input>"]),
            found: ")".to_string(),
        });
}

#[test]
fn test_unclosed_pair() {
    liquid()
        .evaluate("(true, false")
        .expect_syntax_error(ErrorKind::UnexpectedEndOfInput {
            expected: strings(&[")"]),
        });
}

#[test]
fn test_let_without_equals() {
    liquid()
        .evaluate("let x 5 in x")
        .expect_syntax_error(ErrorKind::UnexpectedToken {
            expected: strings(&["="]),
            found: "5".to_string(),
        });
}

#[test]
fn test_function_without_type() {
    liquid()
        .evaluate("fun x = x")
        .expect_syntax_error(ErrorKind::UnexpectedToken {
            expected: strings(&[":"]),
            found: "=".to_string(),
        });
}

#[test]
fn test_async_requires_fun() {
    liquid()
        .evaluate("async x")
        .expect_syntax_error(ErrorKind::UnexpectedToken {
            expected: strings(&["fun"]),
            found: "x".to_string(),
        });
}

#[test]
fn test_empty_program() {
    liquid()
        .evaluate("")
        .expect_syntax_error(ErrorKind::UnexpectedEndOfInput {
            expected: strings(&["(", "async", "fun", "let", "<identifier>", "and", "not", "<literal>"]),
        });
}

#[test]
fn test_syntax_error_message() {
    let error = parse_source("let x = in x").unwrap_err();
    assert_eq!(
        error.to_string(),
        "syntax error: expected \"(\", \"async\", \"fun\", \"let\", \"<identifier>\", \"and\", \"not\", \"<literal>\" but got \"in\""
    );
    assert_eq!(error.span, Some(Span::new(8, 2)));
}
