use std::fmt::Display;

use colored::Colorize;
use log::{Level, LevelFilter, Metadata, SetLoggerError};

/// Where the server middleware logs each request
const REQUEST_TARGET: &str = "lettings_server::requests";

/// Installs the logger. Lettings crates log up to `level`, anything else only warnings and errors.
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{:^5} {} {:^8} {}",
                level_badge(record.level()),
                chrono::Local::now().format("%H:%M:%S").to_string().bright_black(),
                Target::from_target(record.target()),
                message
            ))
        })
        .filter(move |meta| is_shown(meta, level))
        .chain(std::io::stdout())
        .apply()
}

fn is_shown(meta: &Metadata, level: LevelFilter) -> bool {
    if Target::from_target(meta.target()).is_local() {
        meta.level() <= level
    } else {
        meta.level() <= Level::Warn
    }
}

#[derive(Debug, PartialEq)]
enum Target {
    External(String),
    App,
    Core,
    Server,
    Request,
    Client,
}

impl Target {
    fn from_target(target: &str) -> Self {
        if target == REQUEST_TARGET {
            return Self::Request;
        }

        match target.split("::").next().unwrap_or_default() {
            "lettings" => Self::App,
            "lettings_core" => Self::Core,
            "lettings_server" => Self::Server,
            "lettings_client" => Self::Client,
            other => Self::External(other.to_string()),
        }
    }

    fn is_local(&self) -> bool {
        !matches!(self, Self::External(_))
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Target::External(x) => x.as_str().clear(),
            Target::App => "APP".bright_cyan(),
            Target::Core => "CORE".blue(),
            Target::Server => "SERVER".bright_green(),
            Target::Request => "HTTP".green(),
            Target::Client => "CLIENT".bright_purple(),
        };

        Display::fmt(&tag, f)
    }
}

fn level_badge(level: Level) -> String {
    match level {
        Level::Error => " ERR ".black().on_red().bold().to_string(),
        Level::Warn => " WRN ".black().on_yellow().bold().to_string(),
        Level::Info => " INF ".black().on_blue().bold().to_string(),
        Level::Debug => " DBG ".white().on_black().to_string(),
        Level::Trace => " TRC ".to_string(),
    }
}
