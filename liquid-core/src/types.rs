use serde::{Deserialize, Serialize};

pub const BOOL: &str = "Bool";
pub const NUMBER: &str = "Number";

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct PairType {
    pub car: Type,
    pub cdr: Type,
}

/// Domain and codomain of a function type. Shared by synchronous and
/// asynchronous functions; the tag lives on `Type`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct FunType {
    pub domain: Type,
    pub codomain: Type,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub enum Type {
    #[serde(rename = "base")]
    Base(String),
    #[serde(rename = "pair")]
    Pair(Box<PairType>),
    #[serde(rename = "fn")]
    Fun(Box<FunType>),
    #[serde(rename = "async")]
    AsyncFun(Box<FunType>),
}

impl Type {
    pub fn bool() -> Self {
        Type::Base(BOOL.to_string())
    }

    pub fn number() -> Self {
        Type::Base(NUMBER.to_string())
    }

    pub fn pair(car: Type, cdr: Type) -> Self {
        Type::Pair(Box::new(PairType { car, cdr }))
    }

    pub fn fun(domain: Type, codomain: Type) -> Self {
        Type::Fun(Box::new(FunType { domain, codomain }))
    }

    pub fn async_fun(domain: Type, codomain: Type) -> Self {
        Type::AsyncFun(Box::new(FunType { domain, codomain }))
    }

    /// Structural equality. An async function type only equals another
    /// async function type, never a plain one with the same signature.
    pub fn equal_to(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Base(a), Type::Base(b)) => a == b,
            (Type::Pair(a), Type::Pair(b)) => a.car.equal_to(&b.car) && a.cdr.equal_to(&b.cdr),
            (Type::Fun(a), Type::Fun(b)) | (Type::AsyncFun(a), Type::AsyncFun(b)) => {
                a.domain.equal_to(&b.domain) && a.codomain.equal_to(&b.codomain)
            }
            _ => false,
        }
    }

    /// The signature of either kind of function type.
    pub fn as_function(&self) -> Option<&FunType> {
        match self {
            Type::Fun(fun) | Type::AsyncFun(fun) => Some(fun),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<&PairType> {
        match self {
            Type::Pair(pair) => Some(pair),
            _ => None,
        }
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Type::AsyncFun(_))
    }
}
