pub mod diagnostics;
pub mod logger;
pub mod native_transport;
pub mod process_transport;

pub use liquid_compiler::{SyntaxError, TypeError};
pub use liquid_environment::Config;

use liquid_compiler::{TypeEnv, compile, parse_source};
use liquid_core::{Spawner, Term, Type, settle};
use liquid_environment::FutureDispatcher;
use log::debug;
use native_transport::ThreadLauncher;
use process_transport::ProcessLauncher;

/// How futures are isolated from the process that dispatches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerMode {
    /// One `liquid worker` child process per future
    Process,
    /// One thread per future, sharing nothing but the message channel
    Thread,
}

/// Whole-pipeline entry point: source text in, value (or error) out.
pub struct Liquid {
    config: Config,
    mode: WorkerMode,
}

impl Liquid {
    pub fn new(config: Config, mode: WorkerMode) -> Self {
        Self { config, mode }
    }

    /// Parse and type-check `source`, returning the program's type.
    pub fn check(&self, source: &str) -> Result<Type, Error> {
        let mut term = parse_source(source).map_err(Error::ParseError)?;
        debug!("parsed program");
        let ty = term
            .check_type(&mut TypeEnv::new())
            .map_err(Error::TypeError)?;
        debug!("program has type {}", ty);
        Ok(ty)
    }

    /// Parse, check and lower `source` to the core tree.
    pub fn compile(&self, source: &str) -> Result<(Term, Type), Error> {
        let mut term = parse_source(source).map_err(Error::ParseError)?;
        let ty = term
            .check_type(&mut TypeEnv::new())
            .map_err(Error::TypeError)?;
        let core = compile(&term);
        debug!("compiled with {} future(s): {}", core.future_count(), core);
        Ok((core, ty))
    }

    pub fn evaluate(&self, source: &str) -> Result<(Term, Type), Error> {
        let mut spawner = self.spawner();
        self.evaluate_with(source, spawner.as_mut())
    }

    /// Like `evaluate`, dispatching futures through a caller-supplied
    /// spawner.
    pub fn evaluate_with(
        &self,
        source: &str,
        spawner: &mut dyn Spawner,
    ) -> Result<(Term, Type), Error> {
        let (core, ty) = self.compile(source)?;
        let value = core
            .evaluate(spawner)
            .and_then(|outcome| settle(outcome, spawner, self.config.poll_interval))
            .map_err(Error::RuntimeError)?;
        debug!("evaluated to {}", value);
        Ok((value, ty))
    }

    pub fn spawner(&self) -> Box<dyn Spawner> {
        match self.mode {
            WorkerMode::Process => Box::new(FutureDispatcher::new(ProcessLauncher::new(
                self.config.clone(),
            ))),
            WorkerMode::Thread => Box::new(FutureDispatcher::new(ThreadLauncher::new(
                self.config.clone(),
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    ParseError(SyntaxError),
    TypeError(TypeError),
    RuntimeError(liquid_core::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ParseError(e) => write!(f, "{}", e),
            Error::TypeError(e) => write!(f, "{}", e),
            Error::RuntimeError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}
