use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Error {
    // Binding errors
    VariableUnbound(String),

    // Shape errors
    PairExpected(String),
    CallInvalid(String),
    PrimitiveOperand {
        primitive: String,
        expected: String,
        found: String,
    },

    // Future errors
    FutureFailed(String),
    Transport(String),
    Decode(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::VariableUnbound(label) => {
                write!(f, "runtime error: given no bindings for \"{}\"", label)
            }
            Error::PairExpected(found) => {
                write!(f, "runtime error: expected <Pair> but got {}", found)
            }
            Error::CallInvalid(found) => {
                write!(f, "runtime error: {} is not callable", found)
            }
            Error::PrimitiveOperand {
                primitive,
                expected,
                found,
            } => write!(
                f,
                "runtime error: {} expected {} but got {}",
                primitive, expected, found
            ),
            Error::FutureFailed(message) => write!(f, "{}", message),
            Error::Transport(message) => write!(f, "transport error: {}", message),
            Error::Decode(message) => write!(f, "decode error: {}", message),
        }
    }
}

impl std::error::Error for Error {}
