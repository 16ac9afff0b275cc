mod config;
mod dispatcher;
mod error;
mod messages;
mod transport;
mod worker;

pub use config::Config;
pub use dispatcher::FutureDispatcher;
pub use error::EnvironmentError;
pub use messages::FutureMessage;
pub use transport::{ReplySender, RequestReceiver, WorkerHandle, WorkerLauncher};
pub use worker::{Worker, WorkerExit, random_delay};
