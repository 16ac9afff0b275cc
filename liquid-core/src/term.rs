use serde::{Deserialize, Serialize};

/// Built-in functions available to every program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    #[serde(rename = "and")]
    And,
    #[serde(rename = "not")]
    Not,
}

impl Primitive {
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::And => "and",
            Primitive::Not => "not",
        }
    }
}

/// Native payload carried by a `Value` node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Number(f64),
}

/// The callee/argument pair shared by plain applications and futures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub callee: Box<Term>,
    pub arg: Box<Term>,
}

/// Runtime term tree produced by compilation.
///
/// `Variable` is a binding cell: it starts unresolved and is filled by
/// `Term::bind` (see [`crate::evaluate`]). Evaluation consumes the tree and
/// yields a term in normal form (`Value`, `Primitive`, `Lambda`, or a
/// `Pair` of normal forms).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Term {
    Variable {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resolved: Option<Box<Term>>,
    },
    Primitive {
        primitive: Primitive,
    },
    Value {
        value: Literal,
    },
    Lambda {
        arg: String,
        body: Box<Term>,
    },
    Pair {
        car: Box<Term>,
        cdr: Box<Term>,
    },
    PairCar {
        pair: Box<Term>,
    },
    PairCdr {
        pair: Box<Term>,
    },
    Application(Application),
    Future(Application),
}

impl Term {
    pub fn variable(label: impl Into<String>) -> Self {
        Term::Variable {
            label: label.into(),
            resolved: None,
        }
    }

    pub fn primitive(primitive: Primitive) -> Self {
        Term::Primitive { primitive }
    }

    pub fn bool(value: bool) -> Self {
        Term::Value {
            value: Literal::Bool(value),
        }
    }

    pub fn number(value: f64) -> Self {
        Term::Value {
            value: Literal::Number(value),
        }
    }

    pub fn lambda(arg: impl Into<String>, body: Term) -> Self {
        Term::Lambda {
            arg: arg.into(),
            body: Box::new(body),
        }
    }

    pub fn pair(car: Term, cdr: Term) -> Self {
        Term::Pair {
            car: Box::new(car),
            cdr: Box::new(cdr),
        }
    }

    pub fn pair_car(pair: Term) -> Self {
        Term::PairCar {
            pair: Box::new(pair),
        }
    }

    pub fn pair_cdr(pair: Term) -> Self {
        Term::PairCdr {
            pair: Box::new(pair),
        }
    }

    pub fn application(callee: Term, arg: Term) -> Self {
        Term::Application(Application {
            callee: Box::new(callee),
            arg: Box::new(arg),
        })
    }

    pub fn future(callee: Term, arg: Term) -> Self {
        Term::Future(Application {
            callee: Box::new(callee),
            arg: Box::new(arg),
        })
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Term::Value {
                value: Literal::Bool(b),
            } => Some(*b),
            _ => None,
        }
    }

    /// Number of `Future` nodes anywhere in the tree, including inside
    /// resolved binding cells.
    pub fn future_count(&self) -> usize {
        match self {
            Term::Variable { resolved, .. } => resolved.as_ref().map_or(0, |t| t.future_count()),
            Term::Primitive { .. } | Term::Value { .. } => 0,
            Term::Lambda { body, .. } => body.future_count(),
            Term::Pair { car, cdr } => car.future_count() + cdr.future_count(),
            Term::PairCar { pair } | Term::PairCdr { pair } => pair.future_count(),
            Term::Application(app) => app.callee.future_count() + app.arg.future_count(),
            Term::Future(app) => 1 + app.callee.future_count() + app.arg.future_count(),
        }
    }
}
