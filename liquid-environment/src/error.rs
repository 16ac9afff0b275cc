use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnvironmentError {
    // Communication
    WorkerStartup(String),
    WorkerCommunication(String),
    ChannelDisconnected,

    // Wire format
    Decode(String),
    Encode(String),

    Config(String),
}

impl std::fmt::Display for EnvironmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvironmentError::WorkerStartup(msg) => write!(f, "failed to start worker: {}", msg),
            EnvironmentError::WorkerCommunication(msg) => {
                write!(f, "worker communication: {}", msg)
            }
            EnvironmentError::ChannelDisconnected => write!(f, "channel disconnected"),
            EnvironmentError::Decode(msg) => write!(f, "decode error: {}", msg),
            EnvironmentError::Encode(msg) => write!(f, "encode error: {}", msg),
            EnvironmentError::Config(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for EnvironmentError {}

impl From<EnvironmentError> for liquid_core::Error {
    fn from(error: EnvironmentError) -> Self {
        match error {
            EnvironmentError::Decode(msg) => liquid_core::Error::Decode(msg),
            other => liquid_core::Error::Transport(other.to_string()),
        }
    }
}
