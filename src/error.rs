// error.rs

use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("child process could not be created: {0}")]
    Spawn(#[source] nix::Error),
    #[error("cannot install SIGCHLD handler: {0}")]
    Signal(#[source] nix::Error),
    #[error("cannot write to output: {0}")]
    Output(#[source] std::io::Error),
    #[error("cannot start line editor: {0}")]
    Editor(#[source] ReadlineError),
}

pub type Result<T> = std::result::Result<T, ShellError>;
