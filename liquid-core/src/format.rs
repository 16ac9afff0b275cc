use crate::term::{Application, Literal, Term};
use crate::types::Type;
use std::fmt;

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Base(name) => write!(f, "{}", name),
            Type::Pair(pair) => write!(f, "({}, {})", pair.car, pair.cdr),
            Type::Fun(fun) | Type::AsyncFun(fun) => {
                let arrow = if self.is_async() { "->a" } else { "->" };
                if fun.domain.as_function().is_some() {
                    write!(f, "({}) {} {}", fun.domain, arrow, fun.codomain)
                } else {
                    write!(f, "{} {} {}", fun.domain, arrow, fun.codomain)
                }
            }
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Number(n) => write!(f, "{}", n),
        }
    }
}

impl fmt::Display for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.callee, self.arg)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable { label, .. } => write!(f, "{}", label),
            Term::Primitive { primitive } => write!(f, "{}", primitive.name()),
            Term::Value { value } => write!(f, "{}", value),
            Term::Lambda { arg, body } => write!(f, "(λ{}.{})", arg, body),
            Term::Pair { car, cdr } => write!(f, "({}, {})", car, cdr),
            Term::PairCar { pair } => write!(f, "{}.1", pair),
            Term::PairCdr { pair } => write!(f, "{}.2", pair),
            Term::Application(app) => write!(f, "{}", app),
            Term::Future(app) => write!(f, "(future {})", app),
        }
    }
}
