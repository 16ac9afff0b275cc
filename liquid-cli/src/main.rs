mod repl_cli;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use colored::Colorize;
use liquid_cli::logger::{self, Role};
use liquid_cli::native_transport::ThreadLauncher;
use liquid_cli::process_transport::{ProcessLauncher, StdinReceiver, StdoutSender};
use liquid_cli::{Config, Error, Liquid, WorkerMode, diagnostics};
use liquid_core::Spawner;
use liquid_environment::{FutureDispatcher, Worker};
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "liquid", version, about = "Typed functional language with async functions")]
struct Cli {
    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Upper bound of a random delay applied by every worker
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// Run futures on threads instead of child processes
    #[arg(long, global = true)]
    threads: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a program and print its value
    Run {
        input: Option<String>,

        #[arg(short, long)]
        eval: Option<String>,
    },

    /// Type-check a program and print its type
    Check {
        input: Option<String>,

        #[arg(short, long)]
        eval: Option<String>,
    },

    /// Print the compiled core term
    Compile {
        input: Option<String>,

        #[arg(short, long)]
        eval: Option<String>,

        /// Print the serialized form used on the worker channel
        #[arg(long)]
        json: bool,
    },

    Repl,

    #[command(hide = true)]
    Worker,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(Commands::Worker) = cli.command {
        logger::init(cli.verbose, Role::Worker);
        return run_worker(cli.threads);
    }
    logger::init(cli.verbose, Role::Main);

    let config = match load_config(cli.delay_ms) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };
    let mode = if cli.threads {
        WorkerMode::Thread
    } else {
        WorkerMode::Process
    };
    let liquid = Liquid::new(config, mode);

    let result = match cli.command {
        Some(Commands::Run { input, eval }) => run_command(&liquid, input, eval),
        Some(Commands::Check { input, eval }) => check_command(&liquid, input, eval),
        Some(Commands::Compile { input, eval, json }) => {
            compile_command(&liquid, input, eval, json)
        }
        Some(Commands::Repl) => run_repl(liquid),
        Some(Commands::Worker) => unreachable!("handled above"),
        None => Cli::command().print_help().map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(delay_ms: Option<u64>) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::from_env()?;
    if let Some(ms) = delay_ms {
        config.delay = (ms > 0).then(|| Duration::from_millis(ms));
    }
    Ok(config)
}

/// Returns the source text and a name for it in diagnostics.
fn read_source(
    input: Option<String>,
    eval: Option<String>,
) -> Result<(String, String), Box<dyn std::error::Error>> {
    if let Some(code) = eval {
        Ok((code, "<eval>".to_string()))
    } else if let Some(path) = input {
        Ok((fs::read_to_string(&path)?, path))
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok((buffer, "<stdin>".to_string()))
    }
}

/// Print a pipeline error with its diagnostics and exit with status 1.
fn report(error: Error, source_id: &str, source: &str) -> ! {
    match &error {
        Error::ParseError(e) => diagnostics::eprint_syntax(e, source_id, source),
        Error::TypeError(e) => diagnostics::eprint_type(e, source_id, source),
        Error::RuntimeError(e) => eprintln!("{}", e.to_string().red()),
    }
    std::process::exit(1)
}

fn run_command(
    liquid: &Liquid,
    input: Option<String>,
    eval: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (source, source_id) = read_source(input, eval)?;
    match liquid.evaluate(&source) {
        Ok((value, _)) => println!("{}", value),
        Err(e) => report(e, &source_id, &source),
    }
    Ok(())
}

fn check_command(
    liquid: &Liquid,
    input: Option<String>,
    eval: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (source, source_id) = read_source(input, eval)?;
    match liquid.check(&source) {
        Ok(ty) => println!("{}", ty),
        Err(e) => report(e, &source_id, &source),
    }
    Ok(())
}

fn compile_command(
    liquid: &Liquid,
    input: Option<String>,
    eval: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (source, source_id) = read_source(input, eval)?;
    match liquid.compile(&source) {
        Ok((term, _)) if json => println!("{}", serde_json::to_string_pretty(&term)?),
        Ok((term, _)) => println!("{}", term),
        Err(e) => report(e, &source_id, &source),
    }
    Ok(())
}

fn run_repl(liquid: Liquid) -> Result<(), Box<dyn std::error::Error>> {
    let repl = repl_cli::ReplCli::new(liquid)?;
    repl.run()?;
    Ok(())
}

/// Child-process entry: one request on stdin, one reply on stdout.
fn run_worker(threads: bool) -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut spawner: Box<dyn Spawner> = if threads {
        Box::new(FutureDispatcher::new(ThreadLauncher::new(config.clone())))
    } else {
        Box::new(FutureDispatcher::new(ProcessLauncher::new(config.clone())))
    };

    let worker = Worker::new(StdinReceiver::new(), StdoutSender::new(), config);
    match worker.run(spawner.as_mut()) {
        Ok(exit) => ExitCode::from(exit.code() as u8),
        Err(e) => {
            log::error!("worker transport failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
