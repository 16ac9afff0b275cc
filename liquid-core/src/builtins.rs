use crate::error::Error;
use crate::term::{Primitive, Term};
use crate::types::Type;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Function signature for primitive implementations
pub type BuiltinFn = fn(Term) -> Result<Term, Error>;

/// Registry of the primitives and their fixed types
pub struct BuiltinRegistry {
    /// Primitive -> (implementation, parameter type, result type)
    functions: HashMap<Primitive, (BuiltinFn, Type, Type)>,
}

impl BuiltinRegistry {
    pub fn get_implementation(&self, primitive: Primitive) -> Option<BuiltinFn> {
        self.functions
            .get(&primitive)
            .map(|(implementation, _, _)| *implementation)
    }

    /// The function type of a primitive, e.g. `(Bool, Bool) -> Bool` for `and`.
    pub fn signature(&self, primitive: Primitive) -> Option<Type> {
        self.functions
            .get(&primitive)
            .map(|(_, parameter, result)| Type::fun(parameter.clone(), result.clone()))
    }

    pub fn apply(&self, primitive: Primitive, arg: Term) -> Result<Term, Error> {
        let implementation = self
            .get_implementation(primitive)
            .ok_or_else(|| Error::CallInvalid(primitive.name().to_string()))?;
        implementation(arg)
    }
}

fn builtin_and(arg: Term) -> Result<Term, Error> {
    if let Term::Pair { car, cdr } = &arg
        && let (Some(a), Some(b)) = (car.as_bool(), cdr.as_bool())
    {
        return Ok(Term::bool(a && b));
    }
    Err(Error::PrimitiveOperand {
        primitive: Primitive::And.name().to_string(),
        expected: "(<Bool>, <Bool>)".to_string(),
        found: arg.to_string(),
    })
}

fn builtin_not(arg: Term) -> Result<Term, Error> {
    match arg.as_bool() {
        Some(b) => Ok(Term::bool(!b)),
        None => Err(Error::PrimitiveOperand {
            primitive: Primitive::Not.name().to_string(),
            expected: "<Bool>".to_string(),
            found: arg.to_string(),
        }),
    }
}

fn create_builtin_registry() -> BuiltinRegistry {
    let mut functions: HashMap<Primitive, (BuiltinFn, Type, Type)> = HashMap::new();

    functions.insert(
        Primitive::And,
        (builtin_and, Type::pair(Type::bool(), Type::bool()), Type::bool()),
    );
    functions.insert(Primitive::Not, (builtin_not, Type::bool(), Type::bool()));

    BuiltinRegistry { functions }
}

/// Global builtin registry instance
pub static BUILTIN_REGISTRY: LazyLock<BuiltinRegistry> = LazyLock::new(create_builtin_registry);
