use crate::ast::{Function, Literal, Span, Term, TermKind};
use liquid_core::{PairType, Type};
use liquid_core::builtins::BUILTIN_REGISTRY;

/// Variable types visible at a point in the program, innermost last.
#[derive(Debug, Clone, Default)]
pub struct TypeEnv {
    entries: Vec<(String, Type)>,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches from innermost to outermost binding.
    pub fn lookup(&self, label: &str) -> Option<&Type> {
        self.entries
            .iter()
            .rev()
            .find(|(name, _)| name == label)
            .map(|(_, ty)| ty)
    }

    pub fn push(&mut self, label: impl Into<String>, ty: Type) {
        self.entries.push((label.into(), ty));
    }

    pub fn pop(&mut self) {
        self.entries.pop();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run `f` with `label` bound, removing the binding afterwards even if
    /// `f` fails.
    fn scoped<T>(&mut self, label: &str, ty: Type, f: impl FnOnce(&mut Self) -> T) -> T {
        self.push(label, ty);
        let result = f(self);
        self.pop();
        result
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeErrorKind {
    VariableUndefined(String),
    FunctionExpected { found: Type },
    ArgumentMismatch { expected: Type, found: Type },
    PairExpected { found: Type },
}

impl std::fmt::Display for TypeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeErrorKind::VariableUndefined(label) => {
                write!(f, "type error: \"{}\" is not defined", label)
            }
            TypeErrorKind::FunctionExpected { found } => {
                write!(f, "type error: expected FunType but got \"{}\"", found)
            }
            TypeErrorKind::ArgumentMismatch { expected, found } => {
                write!(f, "type error: expected \"{}\" but got \"{}\"", expected, found)
            }
            TypeErrorKind::PairExpected { found } => {
                write!(f, "type error: expected PairType but got \"{}\"", found)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub span: Span,
}

impl TypeError {
    fn new(kind: TypeErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl std::fmt::Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for TypeError {}

impl Term {
    /// Check this term against `env`, recording the type of every node in
    /// its `ty` slot so the compiler can read it back.
    pub fn check_type(&mut self, env: &mut TypeEnv) -> Result<Type, TypeError> {
        let ty = self.infer(env)?;
        self.ty = Some(ty.clone());
        Ok(ty)
    }

    fn infer(&mut self, env: &mut TypeEnv) -> Result<Type, TypeError> {
        let span = self.span;
        match &mut self.kind {
            TermKind::Variable(label) => env.lookup(label).cloned().ok_or_else(|| {
                TypeError::new(TypeErrorKind::VariableUndefined(label.clone()), span)
            }),
            TermKind::Primitive(primitive) => Ok(BUILTIN_REGISTRY
                .signature(*primitive)
                .unwrap_or_else(|| unreachable!("every primitive is registered"))),
            TermKind::Value(literal) => Ok(match literal {
                Literal::Bool(_) => Type::bool(),
                Literal::Number(_) => Type::number(),
            }),
            TermKind::Let {
                binder,
                bound,
                body,
            } => {
                let bound_type = bound.check_type(env)?;
                env.scoped(binder, bound_type, |env| body.check_type(env))
            }
            TermKind::Fun(function) => {
                let (domain, codomain) = check_function(function, env)?;
                Ok(Type::fun(domain, codomain))
            }
            TermKind::AsyncFun(function) => {
                let (domain, codomain) = check_function(function, env)?;
                Ok(Type::async_fun(domain, codomain))
            }
            TermKind::Pair { car, cdr } => {
                let car = car.check_type(env)?;
                let cdr = cdr.check_type(env)?;
                Ok(Type::pair(car, cdr))
            }
            TermKind::PairCar(pair) => {
                let pair_type = pair.check_type(env)?;
                project(pair_type, span, |pair| pair.car.clone())
            }
            TermKind::PairCdr(pair) => {
                let pair_type = pair.check_type(env)?;
                project(pair_type, span, |pair| pair.cdr.clone())
            }
            TermKind::Application { callee, arg } => {
                let callee_type = callee.check_type(env)?;
                let Some(signature) = callee_type.as_function() else {
                    return Err(TypeError::new(
                        TypeErrorKind::FunctionExpected {
                            found: callee_type.clone(),
                        },
                        callee.span,
                    ));
                };
                let arg_type = arg.check_type(env)?;
                if !signature.domain.equal_to(&arg_type) {
                    return Err(TypeError::new(
                        TypeErrorKind::ArgumentMismatch {
                            expected: signature.domain.clone(),
                            found: arg_type,
                        },
                        arg.span,
                    ));
                }
                Ok(signature.codomain.clone())
            }
        }
    }
}

fn check_function(function: &mut Function, env: &mut TypeEnv) -> Result<(Type, Type), TypeError> {
    let domain = function.arg_type.clone();
    let codomain = env.scoped(&function.arg, domain.clone(), |env| {
        function.body.check_type(env)
    })?;
    Ok((domain, codomain))
}

fn project(
    pair_type: Type,
    span: Span,
    component: impl FnOnce(&PairType) -> Type,
) -> Result<Type, TypeError> {
    if let Some(pair) = pair_type.as_pair() {
        return Ok(component(pair));
    }
    Err(TypeError::new(
        TypeErrorKind::PairExpected { found: pair_type },
        span,
    ))
}
