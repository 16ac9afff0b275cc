pub mod ast;
pub mod compiler;
pub mod lexer;
pub mod parser;
pub mod typing;

pub use ast::Span;
pub use compiler::compile;
pub use lexer::tokenize;
pub use parser::{ErrorKind, SyntaxError, parse, parse_source};
pub use typing::{TypeEnv, TypeError, TypeErrorKind};
