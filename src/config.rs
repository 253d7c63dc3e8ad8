//! Command-line and environment configuration

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::history::DEFAULT_HISTORY_FILE;

/// calc: interactive four-function calculator with a persistent history.
///
/// Without COMMAND an interactive prompt is started. With COMMAND the words
/// are executed as one calculator command and the program exits.
#[derive(Debug, Parser)]
#[command(name = "calc", version, about, long_about = None)]
pub struct Cli {
    /// Location of the history file.
    #[arg(long, env = "HISTORY_FILENAME", default_value = DEFAULT_HISTORY_FILE)]
    pub history_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Run a single command, e.g. `calc add 1 2`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    /// The one-shot command line, if any
    pub fn one_shot(&self) -> Option<String> {
        if self.command.is_empty() {
            None
        } else {
            Some(self.command.join(" "))
        }
    }
}

/// Install the `env_logger` backend
///
/// `RUST_LOG` wins over the level derived from `-v`. Calling this twice is
/// harmless.
pub fn init_logging(default_level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    let _ = builder.try_init();
}
