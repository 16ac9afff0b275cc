mod common;
use common::*;
use liquid_compiler::{TypeEnv, compile, parse_source};
use liquid_core::{Error, Outcome, Primitive, Term};
use liquid_tests::InlineSpawner;
use proptest::prelude::*;

#[test]
fn test_not() {
    liquid().evaluate("not true").expect("false").expect_type("Bool");
}

#[test]
fn test_and_false() {
    liquid().evaluate("and (true, false)").expect("false");
}

#[test]
fn test_and_true() {
    liquid().evaluate("and (true, true)").expect("true");
}

#[test]
fn test_let_number() {
    liquid()
        .evaluate("let x = 5 in x")
        .expect("5")
        .expect_type("Number");
}

#[test]
fn test_identity_application() {
    liquid()
        .evaluate("(fun x : Bool = x) true")
        .expect("true")
        .expect_type("Bool");
}

#[test]
fn test_decimal_literal() {
    liquid().evaluate("(true, 1.5).2").expect("1.5");
}

#[test]
fn test_projection_of_parameter() {
    liquid()
        .evaluate("(fun p : (Bool, Number) = p.1) (false, 3)")
        .expect("false");
}

#[test]
fn test_function_value_is_normal_form() {
    liquid()
        .evaluate("fun x : Bool = not x")
        .expect("(λx.(not x))")
        .expect_type("Bool -> Bool");
}

#[test]
fn test_higher_order_function() {
    liquid()
        .evaluate(
            "let twice = fun f : Bool -> Bool = fun x : Bool = f (f x) in twice not true",
        )
        .expect("true")
        .expect_type("Bool");
}

#[test]
fn test_primitive_as_argument() {
    liquid()
        .evaluate("(fun f : (Bool, Bool) -> Bool = f (true, true)) and")
        .expect("true");
}

#[test]
fn test_nested_pairs() {
    liquid()
        .evaluate("let p = ((true, 1), false) in (p.1.2, p.2)")
        .expect("(1, false)")
        .expect_type("(Number, Bool)");
}

#[test]
fn test_car_of_non_pair_fails() {
    let mut spawner = InlineSpawner::new();
    let result = Term::pair_car(Term::bool(true)).evaluate(&mut spawner);
    assert_eq!(result.unwrap_err(), Error::PairExpected("true".to_string()));
}

#[test]
fn test_cdr_of_lambda_fails() {
    let mut spawner = InlineSpawner::new();
    let result = Term::pair_cdr(Term::lambda("x", Term::variable("x"))).evaluate(&mut spawner);
    assert_eq!(result.unwrap_err(), Error::PairExpected("(λx.x)".to_string()));
}

#[test]
fn test_unbound_variable_fails() {
    let mut spawner = InlineSpawner::new();
    let result = Term::variable("y").evaluate(&mut spawner);
    assert_eq!(result.unwrap_err(), Error::VariableUnbound("y".to_string()));
}

#[test]
fn test_and_requires_pair_of_bools() {
    let mut spawner = InlineSpawner::new();
    let term = Term::application(
        Term::primitive(Primitive::And),
        Term::pair(Term::bool(true), Term::number(1.0)),
    );
    assert_eq!(
        term.evaluate(&mut spawner).unwrap_err(),
        Error::PrimitiveOperand {
            primitive: "and".to_string(),
            expected: "(<Bool>, <Bool>)".to_string(),
            found: "(true, 1)".to_string(),
        }
    );
}

#[test]
fn test_value_is_not_callable() {
    let mut spawner = InlineSpawner::new();
    let term = Term::application(Term::bool(true), Term::bool(false));
    assert_eq!(
        term.evaluate(&mut spawner).unwrap_err(),
        Error::CallInvalid("true".to_string())
    );
}

#[derive(Debug, Clone)]
enum BoolExpr {
    Lit(bool),
    Not(Box<BoolExpr>),
    And(Box<BoolExpr>, Box<BoolExpr>),
    Car(Box<BoolExpr>, Box<BoolExpr>),
    Identity(Box<BoolExpr>),
}

impl BoolExpr {
    fn source(&self) -> String {
        match self {
            BoolExpr::Lit(b) => b.to_string(),
            BoolExpr::Not(e) => format!("not ({})", e.source()),
            BoolExpr::And(a, b) => format!("and ({}, {})", a.source(), b.source()),
            BoolExpr::Car(a, b) => format!("({}, {}).1", a.source(), b.source()),
            BoolExpr::Identity(e) => format!("(fun x : Bool = x) ({})", e.source()),
        }
    }

    fn value(&self) -> bool {
        match self {
            BoolExpr::Lit(b) => *b,
            BoolExpr::Not(e) => !e.value(),
            BoolExpr::And(a, b) => a.value() && b.value(),
            BoolExpr::Car(a, _) => a.value(),
            BoolExpr::Identity(e) => e.value(),
        }
    }
}

fn arb_bool_expr() -> impl Strategy<Value = BoolExpr> {
    any::<bool>()
        .prop_map(BoolExpr::Lit)
        .prop_recursive(5, 32, 2, |inner| {
            prop_oneof![
                inner.clone().prop_map(|e| BoolExpr::Not(Box::new(e))),
                (inner.clone(), inner.clone())
                    .prop_map(|(a, b)| BoolExpr::And(Box::new(a), Box::new(b))),
                (inner.clone(), inner.clone())
                    .prop_map(|(a, b)| BoolExpr::Car(Box::new(a), Box::new(b))),
                inner.prop_map(|e| BoolExpr::Identity(Box::new(e))),
            ]
        })
}

proptest! {
    #[test]
    fn synchronous_programs_never_suspend(expr in arb_bool_expr()) {
        let mut term = parse_source(&expr.source()).unwrap();
        term.check_type(&mut TypeEnv::new()).unwrap();
        let core = compile(&term);

        let mut spawner = InlineSpawner::new();
        let outcome = core.evaluate(&mut spawner).unwrap();

        prop_assert_eq!(spawner.spawned(), 0);
        prop_assert!(matches!(outcome, Outcome::Ready(_)));
        prop_assert_eq!(outcome.into_ready(), Some(Term::bool(expr.value())));
    }
}
