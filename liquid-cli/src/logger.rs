use colored::{Color, Colorize};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::time::{SystemTime, UNIX_EPOCH};

const PID_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Blue,
    Color::Green,
    Color::BrightRed,
];

/// Which process is writing, shown after the timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Main,
    Worker,
}

struct StderrLogger {
    label: String,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "error".red().bold(),
            Level::Warn => "warn".yellow().bold(),
            Level::Info => "info".green(),
            Level::Debug => "debug".blue(),
            Level::Trace => "trace".bright_black(),
        };
        eprintln!(
            "{} {} {} {}",
            timestamp().bright_black(),
            self.label,
            level,
            record.args()
        );
    }

    fn flush(&self) {}
}

/// Install the stderr logger. `LIQUID_LOG` wins over `verbosity`.
pub fn init(verbosity: u8, role: Role) {
    let level = std::env::var(crate::process_transport::LOG_VAR)
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        });

    let label = match role {
        Role::Main => "main".bold().to_string(),
        Role::Worker => {
            let pid = std::process::id();
            let color = PID_COLORS[pid as usize % PID_COLORS.len()];
            pid.to_string().color(color).bold().to_string()
        }
    };

    if log::set_boxed_logger(Box::new(StderrLogger { label })).is_ok() {
        log::set_max_level(level);
    }
}

// HH:MM:SS.mmm (UTC)
fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let seconds = now.as_secs() % 86_400;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        seconds / 3600,
        seconds / 60 % 60,
        seconds % 60,
        now.subsec_millis()
    )
}
