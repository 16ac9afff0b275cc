use liquid_environment::{
    Config, EnvironmentError, FutureDispatcher, FutureMessage, ReplySender, RequestReceiver,
    Worker, WorkerHandle, WorkerLauncher,
};
use log::warn;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

/// Request receiver using mpsc::Receiver
pub struct NativeRequestReceiver {
    receiver: Receiver<FutureMessage>,
}

impl RequestReceiver for NativeRequestReceiver {
    fn recv(&mut self) -> Result<FutureMessage, EnvironmentError> {
        self.receiver
            .recv()
            .map_err(|_| EnvironmentError::ChannelDisconnected)
    }
}

/// Reply sender using mpsc::Sender
pub struct NativeReplySender {
    sender: Sender<FutureMessage>,
}

impl ReplySender for NativeReplySender {
    fn send(&mut self, message: FutureMessage) -> Result<(), EnvironmentError> {
        self.sender.send(message).map_err(|e| {
            EnvironmentError::WorkerCommunication(format!("failed to send reply: {}", e))
        })
    }
}

/// Worker handle for a worker thread
pub struct NativeWorkerHandle {
    request_sender: Sender<FutureMessage>,
    reply_receiver: Receiver<FutureMessage>,
    _thread_handle: JoinHandle<()>,
}

impl WorkerHandle for NativeWorkerHandle {
    fn send(&mut self, message: FutureMessage) -> Result<(), EnvironmentError> {
        self.request_sender.send(message).map_err(|e| {
            EnvironmentError::WorkerCommunication(format!("failed to send request: {}", e))
        })
    }

    fn try_recv(&mut self) -> Result<Option<FutureMessage>, EnvironmentError> {
        match self.reply_receiver.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(EnvironmentError::ChannelDisconnected),
        }
    }
}

/// Starts each future on a fresh thread. Messages still cross an owned
/// channel, so the worker gets its own copy of the term.
pub struct ThreadLauncher {
    config: Config,
}

impl ThreadLauncher {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl WorkerLauncher for ThreadLauncher {
    type Handle = NativeWorkerHandle;

    fn launch(&mut self) -> Result<NativeWorkerHandle, EnvironmentError> {
        Ok(spawn_worker(self.config.clone()))
    }
}

/// Spawn a native worker thread
pub fn spawn_worker(config: Config) -> NativeWorkerHandle {
    let (request_tx, request_rx) = mpsc::channel();
    let (reply_tx, reply_rx) = mpsc::channel();

    let thread_handle = thread::spawn(move || {
        let receiver = NativeRequestReceiver {
            receiver: request_rx,
        };
        let sender = NativeReplySender { sender: reply_tx };

        // Nested futures get threads of their own
        let mut dispatcher = FutureDispatcher::new(ThreadLauncher::new(config.clone()));
        let worker = Worker::new(receiver, sender, config);

        if let Err(e) = worker.run(&mut dispatcher) {
            warn!("worker thread stopped: {}", e);
        }
    });

    NativeWorkerHandle {
        request_sender: request_tx,
        reply_receiver: reply_rx,
        _thread_handle: thread_handle,
    }
}
