mod builtins;
mod config;
mod error;
mod history;
mod input;
mod launcher;
mod parser;
mod reaper;
mod repl;
mod util;

use anyhow::Context;
use config::ShellConfig;
use input::{BoundedReader, EditorSource, LineSource};
use launcher::ForkLauncher;
use repl::Shell;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status after a fatal error.
const FATAL_STATUS: u8 = 2;

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("catshell: {:#}", err);
            ExitCode::from(FATAL_STATUS)
        }
    }
}

fn run() -> anyhow::Result<()> {
    reaper::install().context("setting up background job reaping")?;

    let config = ShellConfig::default();
    let mut source: Box<dyn LineSource> = if io::stdin().is_terminal() {
        Box::new(EditorSource::new(config.line_budget()).context("opening terminal")?)
    } else {
        Box::new(BoundedReader::new(io::stdin().lock(), config.line_budget()))
    };

    let mut shell = Shell::new(config, ForkLauncher);
    let mut stdout = io::stdout();
    shell.run(source.as_mut(), &mut stdout)?;
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("catshell=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
