use std::io;
use std::process::ExitCode;

use calc_history::config::{self, Cli};
use calc_history::history::History;
use calc_history::repl::{Repl, Step};
use clap::Parser;
use eyre::{Result, WrapErr};

fn main() -> Result<ExitCode> {
    color_eyre::install().ok();
    let cli = Cli::parse();
    config::init_logging(cli.log_level());

    log::info!("Calculator starting");

    let mut history = History::open(&cli.history_file).wrap_err_with(|| {
        format!(
            "Failed to open history file {}",
            cli.history_file.display()
        )
    })?;
    log::info!("Recording history in {}", history.path().display());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut repl = Repl::new(stdin.lock(), stdout.lock(), &mut history);

    if let Some(line) = cli.one_shot() {
        let step = repl.execute(&line).wrap_err("Failed to run command")?;
        return Ok(if step == Step::Failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    repl.run().wrap_err("Calculator session ended unexpectedly")?;

    log::info!("Calculator stopping");

    Ok(ExitCode::SUCCESS)
}
