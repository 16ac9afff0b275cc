pub mod builtins;
pub mod error;
pub mod evaluate;
pub mod format;
pub mod pending;
pub mod term;
pub mod types;

pub use error::Error;
pub use evaluate::Binding;
pub use pending::{FutureReply, Outcome, Pending, Spawner, join, settle};
pub use term::{Literal, Primitive, Term};
pub use types::{FunType, PairType, Type};
