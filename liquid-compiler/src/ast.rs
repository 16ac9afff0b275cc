use liquid_core::{Primitive, Type};

/// Byte range of a node or token in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub offset: usize,
    pub length: usize,
}

impl Span {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// The smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        let start = self.offset.min(other.offset);
        let end = (self.offset + self.length).max(other.offset + other.length);
        Span::new(start, end - start)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    /// Digit string as written, e.g. `"5"` or `"1.25"`.
    Number(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub arg: String,
    pub arg_type: Type,
    pub body: Box<Term>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TermKind {
    Variable(String),
    Primitive(Primitive),
    Value(Literal),
    Let {
        binder: String,
        bound: Box<Term>,
        body: Box<Term>,
    },
    Fun(Function),
    AsyncFun(Function),
    Pair {
        car: Box<Term>,
        cdr: Box<Term>,
    },
    PairCar(Box<Term>),
    PairCdr(Box<Term>),
    Application {
        callee: Box<Term>,
        arg: Box<Term>,
    },
}

/// Surface term as produced by the parser. `ty` is filled in by the
/// type checker and read by the compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub kind: TermKind,
    pub span: Span,
    pub ty: Option<Type>,
}

impl Term {
    pub fn new(kind: TermKind, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: None,
        }
    }
}
