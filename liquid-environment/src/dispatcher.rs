use crate::messages::FutureMessage;
use crate::transport::{WorkerHandle, WorkerLauncher};
use liquid_core::{Error, FutureReply, Spawner, Term};
use log::debug;

/// Parent-side `Spawner`: one fresh worker per future, one request sent,
/// exactly one reply awaited.
pub struct FutureDispatcher<L: WorkerLauncher> {
    launcher: L,
    launched: usize,
}

impl<L: WorkerLauncher> FutureDispatcher<L> {
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            launched: 0,
        }
    }

    /// Number of workers started so far.
    pub fn launched(&self) -> usize {
        self.launched
    }
}

impl<L: WorkerLauncher> Spawner for FutureDispatcher<L> {
    fn spawn(&mut self, application: Term) -> Result<Box<dyn FutureReply>, Error> {
        let mut handle = self.launcher.launch()?;
        let id = self.launched;
        self.launched += 1;
        debug!("future #{} dispatched: {}", id, application);
        handle.send(FutureMessage::request(application))?;
        Ok(Box::new(DispatchedFuture { id, handle }))
    }
}

struct DispatchedFuture<H: WorkerHandle> {
    id: usize,
    handle: H,
}

impl<H: WorkerHandle> FutureReply for DispatchedFuture<H> {
    fn try_recv(&mut self) -> Result<Option<Term>, Error> {
        let Some(message) = self.handle.try_recv()? else {
            return Ok(None);
        };
        match message.into_result() {
            Ok(term) => {
                debug!("future #{} settled: {}", self.id, term);
                Ok(Some(term))
            }
            Err(error) => {
                debug!("future #{} failed: {}", self.id, error);
                Err(error)
            }
        }
    }
}
