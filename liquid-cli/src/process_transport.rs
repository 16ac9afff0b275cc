use liquid_environment::{
    Config, EnvironmentError, FutureMessage, ReplySender, RequestReceiver, WorkerHandle,
    WorkerLauncher,
};
use log::{debug, warn};
use std::io::{BufRead, BufReader, Stdin, Stdout, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

pub const WORKER_SUBCOMMAND: &str = "worker";
pub const LOG_VAR: &str = "LIQUID_LOG";

/// Request receiver reading one JSON line from stdin
pub struct StdinReceiver {
    stdin: Stdin,
}

impl StdinReceiver {
    pub fn new() -> Self {
        Self {
            stdin: std::io::stdin(),
        }
    }
}

impl Default for StdinReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestReceiver for StdinReceiver {
    fn recv(&mut self) -> Result<FutureMessage, EnvironmentError> {
        let mut line = String::new();
        let read = self
            .stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| EnvironmentError::WorkerCommunication(e.to_string()))?;
        if read == 0 {
            return Err(EnvironmentError::ChannelDisconnected);
        }
        FutureMessage::decode(&line)
    }
}

/// Reply sender writing one JSON line to stdout
pub struct StdoutSender {
    stdout: Stdout,
}

impl StdoutSender {
    pub fn new() -> Self {
        Self {
            stdout: std::io::stdout(),
        }
    }
}

impl Default for StdoutSender {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplySender for StdoutSender {
    fn send(&mut self, message: FutureMessage) -> Result<(), EnvironmentError> {
        let line = message.encode()?;
        let mut stdout = self.stdout.lock();
        writeln!(stdout, "{}", line)
            .and_then(|_| stdout.flush())
            .map_err(|e| EnvironmentError::WorkerCommunication(e.to_string()))
    }
}

/// Parent's handle on a `liquid worker` child process
pub struct ProcessWorkerHandle {
    child: Child,
    stdin: Option<ChildStdin>,
    replies: Receiver<Result<FutureMessage, EnvironmentError>>,
}

impl WorkerHandle for ProcessWorkerHandle {
    fn send(&mut self, message: FutureMessage) -> Result<(), EnvironmentError> {
        let line = message.encode()?;
        // One request per worker: closing stdin afterwards marks the end.
        let mut stdin = self
            .stdin
            .take()
            .ok_or_else(|| EnvironmentError::WorkerCommunication("request already sent".into()))?;
        writeln!(stdin, "{}", line)
            .and_then(|_| stdin.flush())
            .map_err(|e| EnvironmentError::WorkerCommunication(e.to_string()))
    }

    fn try_recv(&mut self) -> Result<Option<FutureMessage>, EnvironmentError> {
        match self.replies.try_recv() {
            Ok(reply) => reply.map(Some),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(EnvironmentError::ChannelDisconnected),
        }
    }
}

impl Drop for ProcessWorkerHandle {
    fn drop(&mut self) {
        self.stdin.take();
        match self.child.wait() {
            Ok(status) => debug!("worker {} exited with {}", self.child.id(), status),
            Err(e) => warn!("failed to reap worker {}: {}", self.child.id(), e),
        }
    }
}

/// Starts each future as a `liquid worker` child process. The child
/// inherits the config through its environment.
pub struct ProcessLauncher {
    config: Config,
}

impl ProcessLauncher {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl WorkerLauncher for ProcessLauncher {
    type Handle = ProcessWorkerHandle;

    fn launch(&mut self) -> Result<ProcessWorkerHandle, EnvironmentError> {
        let program = match &self.config.worker_program {
            Some(program) => program.clone(),
            None => std::env::current_exe()
                .map_err(|e| EnvironmentError::WorkerStartup(e.to_string()))?,
        };

        let mut child = Command::new(&program)
            .arg(WORKER_SUBCOMMAND)
            .envs(self.config.to_env())
            .env(LOG_VAR, log::max_level().to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                EnvironmentError::WorkerStartup(format!("{}: {}", program.display(), e))
            })?;
        debug!("launched worker {}", child.id());

        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EnvironmentError::WorkerStartup("worker has no stdout".into()))?;

        let (reply_tx, reply_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut line = String::new();
            let reply = match BufReader::new(stdout).read_line(&mut line) {
                Ok(0) => Err(EnvironmentError::WorkerCommunication(
                    "worker exited without replying".into(),
                )),
                Ok(_) => FutureMessage::decode(&line),
                Err(e) => Err(EnvironmentError::WorkerCommunication(e.to_string())),
            };
            let _ = reply_tx.send(reply);
        });

        Ok(ProcessWorkerHandle {
            child,
            stdin,
            replies: reply_rx,
        })
    }
}
