use crate::error::EnvironmentError;
use std::path::PathBuf;
use std::time::Duration;

pub const DELAY_VAR: &str = "LIQUID_FUTURE_DELAY_MS";
pub const POLL_INTERVAL_VAR: &str = "LIQUID_POLL_INTERVAL_US";
pub const WORKER_VAR: &str = "LIQUID_WORKER";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_micros(100);

/// Runtime settings shared by the top-level process and its workers.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Upper bound of the artificial delay a worker sleeps before
    /// evaluating. `None` in production.
    pub delay: Option<Duration>,
    /// Sleep between polling rounds that made no progress.
    pub poll_interval: Duration,
    /// Program launched as a worker. `None` means the running executable.
    pub worker_program: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delay: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            worker_program: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, EnvironmentError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source. Unset variables keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EnvironmentError> {
        let mut config = Config::default();
        if let Some(ms) = lookup(DELAY_VAR) {
            let ms = parse_u64(DELAY_VAR, &ms)?;
            config.delay = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(us) = lookup(POLL_INTERVAL_VAR) {
            config.poll_interval = Duration::from_micros(parse_u64(POLL_INTERVAL_VAR, &us)?);
        }
        if let Some(program) = lookup(WORKER_VAR)
            && !program.is_empty()
        {
            config.worker_program = Some(PathBuf::from(program));
        }
        Ok(config)
    }

    /// Variables that reproduce this config in a child process.
    pub fn to_env(&self) -> Vec<(&'static str, String)> {
        let mut vars = vec![
            (
                DELAY_VAR,
                self.delay.map_or(0, |d| saturating_u64(d.as_millis())).to_string(),
            ),
            (
                POLL_INTERVAL_VAR,
                saturating_u64(self.poll_interval.as_micros()).to_string(),
            ),
        ];
        if let Some(program) = &self.worker_program {
            vars.push((WORKER_VAR, program.display().to_string()));
        }
        vars
    }
}

fn saturating_u64(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

fn parse_u64(name: &str, value: &str) -> Result<u64, EnvironmentError> {
    value
        .trim()
        .parse()
        .map_err(|_| EnvironmentError::Config(format!("{} must be a whole number, got \"{}\"", name, value)))
}
