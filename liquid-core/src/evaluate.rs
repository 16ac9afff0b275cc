use crate::builtins::BUILTIN_REGISTRY;
use crate::error::Error;
use crate::pending::{Outcome, Pending, Spawner, join};
use crate::term::{Application, Term};
use log::{debug, trace};

/// A label resolved to a term at an application site.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub label: String,
    pub term: Term,
}

impl Binding {
    pub fn new(label: impl Into<String>, term: Term) -> Self {
        Self {
            label: label.into(),
            term,
        }
    }
}

#[derive(Clone, Copy)]
enum Projection {
    Car,
    Cdr,
}

impl Term {
    /// Push binding records down into this tree, filling every matching
    /// variable cell with its own copy of the bound term.
    ///
    /// A lambda that re-binds a label stops that record at its boundary,
    /// so an inner parameter is never captured by an outer argument.
    pub fn bind(&mut self, bindings: &[Binding]) {
        match self {
            Term::Primitive { .. } | Term::Value { .. } => {}
            Term::Variable { label, resolved } => {
                if let Some(binding) = bindings.iter().find(|b| b.label == *label) {
                    *resolved = Some(Box::new(binding.term.clone()));
                }
            }
            Term::Lambda { arg, body } => {
                if bindings.iter().any(|b| b.label == *arg) {
                    let visible: Vec<Binding> = bindings
                        .iter()
                        .filter(|b| b.label != *arg)
                        .cloned()
                        .collect();
                    body.bind(&visible);
                } else {
                    body.bind(bindings);
                }
            }
            Term::Pair { car, cdr } => {
                car.bind(bindings);
                cdr.bind(bindings);
            }
            Term::PairCar { pair } | Term::PairCdr { pair } => pair.bind(bindings),
            Term::Application(app) | Term::Future(app) => {
                app.callee.bind(bindings);
                app.arg.bind(bindings);
            }
        }
    }

    /// Evaluate to normal form. Sibling sub-evaluations are all started
    /// before any of them is awaited; the result is pending if any of
    /// them is waiting on a worker.
    pub fn evaluate(self, spawner: &mut dyn Spawner) -> Result<Outcome, Error> {
        trace!("evaluate<{}>: {}", self.kind_name(), self);
        match self {
            term @ (Term::Primitive { .. } | Term::Value { .. } | Term::Lambda { .. }) => {
                Ok(Outcome::Ready(term))
            }
            Term::Variable { label, resolved } => match resolved {
                Some(term) => term.evaluate(spawner),
                None => Err(Error::VariableUnbound(label)),
            },
            Term::Pair { car, cdr } => {
                let car = car.evaluate(spawner)?;
                let cdr = cdr.evaluate(spawner)?;
                join([car, cdr], spawner, |[car, cdr], _| {
                    Ok(Outcome::Ready(Term::pair(car, cdr)))
                })
            }
            Term::PairCar { pair } => {
                let pair = pair.evaluate(spawner)?;
                join([pair], spawner, |[pair], _| project(pair, Projection::Car))
            }
            Term::PairCdr { pair } => {
                let pair = pair.evaluate(spawner)?;
                join([pair], spawner, |[pair], _| project(pair, Projection::Cdr))
            }
            Term::Application(Application { callee, arg }) => {
                let callee = callee.evaluate(spawner)?;
                let arg = arg.evaluate(spawner)?;
                join([callee, arg], spawner, |[callee, arg], spawner| {
                    apply(callee, arg, spawner)
                })
            }
            Term::Future(application) => {
                let application = Term::Application(application);
                debug!("dispatching future {}", application);
                let reply = spawner.spawn(application)?;
                Ok(Outcome::Pending(Pending::awaiting(reply)))
            }
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Term::Variable { .. } => "Variable",
            Term::Primitive { .. } => "Primitive",
            Term::Value { .. } => "Value",
            Term::Lambda { .. } => "Lambda",
            Term::Pair { .. } => "Pair",
            Term::PairCar { .. } => "PairCar",
            Term::PairCdr { .. } => "PairCdr",
            Term::Application(_) => "Application",
            Term::Future(_) => "Future",
        }
    }
}

fn apply(callee: Term, arg: Term, spawner: &mut dyn Spawner) -> Result<Outcome, Error> {
    match callee {
        Term::Lambda { arg: label, mut body } => {
            trace!("applying (λ{}.{}) to {}", label, body, arg);
            body.bind(&[Binding::new(label, arg)]);
            body.evaluate(spawner)
        }
        Term::Primitive { primitive } => BUILTIN_REGISTRY
            .apply(primitive, arg)
            .map(Outcome::Ready),
        other => Err(Error::CallInvalid(other.to_string())),
    }
}

fn project(pair: Term, projection: Projection) -> Result<Outcome, Error> {
    match (pair, projection) {
        (Term::Pair { car, .. }, Projection::Car) => Ok(Outcome::Ready(*car)),
        (Term::Pair { cdr, .. }, Projection::Cdr) => Ok(Outcome::Ready(*cdr)),
        (other, _) => Err(Error::PairExpected(other.to_string())),
    }
}
