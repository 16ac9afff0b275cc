use crate::error::EnvironmentError;
use liquid_core::{Error, Term};
use serde::{Deserialize, Serialize};

/// The one record exchanged with a worker, once in each direction.
///
/// Parent → worker carries the fully bound application in `term`. Worker →
/// parent carries either the evaluated `term` or an `error` string, never
/// both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<Term>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FutureMessage {
    pub fn request(application: Term) -> Self {
        Self {
            term: Some(application),
            error: None,
        }
    }

    pub fn success(result: Term) -> Self {
        Self {
            term: Some(result),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            term: None,
            error: Some(error.into()),
        }
    }

    /// Single-line JSON, suitable for a newline-delimited stream.
    pub fn encode(&self) -> Result<String, EnvironmentError> {
        serde_json::to_string(self)
            .map_err(|e| EnvironmentError::Encode(e.to_string()))
    }

    /// Terms nest one JSON level per node, so the parser's depth limit is
    /// lifted and the stack grows on demand instead.
    pub fn decode(text: &str) -> Result<Self, EnvironmentError> {
        let mut deserializer = serde_json::Deserializer::from_str(text.trim());
        deserializer.disable_recursion_limit();
        let message = Self::deserialize(serde_stacker::Deserializer::new(&mut deserializer))
            .map_err(|e| EnvironmentError::Decode(e.to_string()))?;
        deserializer
            .end()
            .map_err(|e| EnvironmentError::Decode(e.to_string()))?;
        Ok(message)
    }

    /// Interpret a worker's reply. An error string becomes a future failure
    /// carrying exactly that string.
    pub fn into_result(self) -> Result<Term, Error> {
        match (self.term, self.error) {
            (_, Some(error)) => Err(Error::FutureFailed(error)),
            (Some(term), None) => Ok(term),
            (None, None) => Err(Error::Decode(
                "message carries neither a term nor an error".to_string(),
            )),
        }
    }
}
