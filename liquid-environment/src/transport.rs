use crate::error::EnvironmentError;
use crate::messages::FutureMessage;

/// Receive the request (Worker ← parent). Blocks until it arrives.
pub trait RequestReceiver {
    fn recv(&mut self) -> Result<FutureMessage, EnvironmentError>;
}

/// Send the reply (Worker → parent)
pub trait ReplySender {
    fn send(&mut self, message: FutureMessage) -> Result<(), EnvironmentError>;
}

/// Handle for communicating with one worker (parent side)
pub trait WorkerHandle {
    fn send(&mut self, message: FutureMessage) -> Result<(), EnvironmentError>;
    fn try_recv(&mut self) -> Result<Option<FutureMessage>, EnvironmentError>;
}

/// Starts a fresh, single-purpose worker per future
pub trait WorkerLauncher {
    type Handle: WorkerHandle + 'static;

    fn launch(&mut self) -> Result<Self::Handle, EnvironmentError>;
}
