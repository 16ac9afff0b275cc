use crate::ast::{Literal, Term, TermKind};
use liquid_core::Term as CoreTerm;

/// Lower a type-checked surface term to the core tree.
///
/// An application whose callee was checked as an async function is wrapped
/// in a `Future`; that is the only place the static type picks a runtime
/// strategy. `let x = e in b` lowers to `((λx.b) e)`.
pub fn compile(term: &Term) -> CoreTerm {
    match &term.kind {
        TermKind::Variable(label) => CoreTerm::variable(label),
        TermKind::Primitive(primitive) => CoreTerm::primitive(*primitive),
        TermKind::Value(Literal::Bool(b)) => CoreTerm::bool(*b),
        TermKind::Value(Literal::Number(digits)) => CoreTerm::number(parse_number(digits)),
        TermKind::Let {
            binder,
            bound,
            body,
        } => CoreTerm::application(CoreTerm::lambda(binder, compile(body)), compile(bound)),
        TermKind::Fun(function) | TermKind::AsyncFun(function) => {
            CoreTerm::lambda(&function.arg, compile(&function.body))
        }
        TermKind::Pair { car, cdr } => CoreTerm::pair(compile(car), compile(cdr)),
        TermKind::PairCar(pair) => CoreTerm::pair_car(compile(pair)),
        TermKind::PairCdr(pair) => CoreTerm::pair_cdr(compile(pair)),
        TermKind::Application { callee, arg } => {
            let is_async = callee.ty.as_ref().is_some_and(|ty| ty.is_async());
            if is_async {
                log::debug!("application at {} compiled as future", term.span.offset);
                CoreTerm::future(compile(callee), compile(arg))
            } else {
                CoreTerm::application(compile(callee), compile(arg))
            }
        }
    }
}

// The lexer only produces `\d+(\.\d+)?`, which always parses.
fn parse_number(digits: &str) -> f64 {
    digits
        .parse()
        .unwrap_or_else(|_| unreachable!("lexer produced invalid number {:?}", digits))
}
