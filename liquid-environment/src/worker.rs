use crate::config::Config;
use crate::error::EnvironmentError;
use crate::messages::FutureMessage;
use crate::transport::{ReplySender, RequestReceiver};
use liquid_core::{Spawner, settle};
use log::{debug, warn};
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// How a worker finished. The process exit code mirrors it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    Success,
    Failure,
}

impl WorkerExit {
    pub fn code(self) -> i32 {
        match self {
            WorkerExit::Success => 0,
            WorkerExit::Failure => 1,
        }
    }
}

/// Child side of the protocol: receive one application, evaluate it to
/// completion, send one reply.
pub struct Worker<R: RequestReceiver, S: ReplySender> {
    receiver: R,
    sender: S,
    config: Config,
}

impl<R: RequestReceiver, S: ReplySender> Worker<R, S> {
    pub fn new(receiver: R, sender: S, config: Config) -> Self {
        Self {
            receiver,
            sender,
            config,
        }
    }

    /// Nested futures inside the received term are dispatched through
    /// `spawner`. Transport failures are returned; evaluation failures are
    /// reported to the parent and yield `WorkerExit::Failure`.
    pub fn run(mut self, spawner: &mut dyn Spawner) -> Result<WorkerExit, EnvironmentError> {
        let request = self.receiver.recv()?;
        let Some(term) = request.term else {
            warn!("worker received a message without a term");
            self.sender
                .send(FutureMessage::failure("decode error: request carries no term"))?;
            return Ok(WorkerExit::Failure);
        };

        if let Some(bound) = self.config.delay {
            let delay = random_delay(bound);
            debug!("worker delaying {:?}", delay);
            std::thread::sleep(delay);
        }

        let result = term
            .evaluate(spawner)
            .and_then(|outcome| settle(outcome, spawner, self.config.poll_interval));

        match result {
            Ok(value) => {
                debug!("worker result: {}", value);
                self.sender.send(FutureMessage::success(value))?;
                Ok(WorkerExit::Success)
            }
            Err(error) => {
                debug!("worker error: {}", error);
                self.sender.send(FutureMessage::failure(error.to_string()))?;
                Ok(WorkerExit::Failure)
            }
        }
    }
}

/// Uniform-ish duration in `[0, bound]`, seeded from the hasher's random
/// keys.
pub fn random_delay(bound: Duration) -> Duration {
    let mut hasher = RandomState::new().build_hasher();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    hasher.write_u128(nanos);
    let millis = u64::try_from(bound.as_millis()).unwrap_or(u64::MAX);
    Duration::from_millis(hasher.finish() % millis.saturating_add(1))
}
