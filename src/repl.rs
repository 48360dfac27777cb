// repl.rs

use crate::builtins::{print_history, Builtin};
use crate::config::ShellConfig;
use crate::error::{Result, ShellError};
use crate::history::HistoryLedger;
use crate::input::{LineSource, ReadOutcome};
use crate::launcher::{exec_failure_message, ExecutionOutcome, Launcher};
use crate::parser::{is_separator, tokenize};
use crate::util::{flush_ignore_broken_pipe, notify};
use std::io::Write;
use tracing::{debug, trace};

pub const HISTORY_MARKER: u8 = b'!';
pub const EVENT_NOT_FOUND: &str = "Event not found.";
pub const UNREADABLE_INPUT: &str = "Command can not be read.";
pub const SPAWN_FAILED: &str = "Child process could not be created.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

pub struct Shell<L> {
    config: ShellConfig,
    history: HistoryLedger,
    launcher: L,
}

impl<L: Launcher> Shell<L> {
    pub fn new(config: ShellConfig, launcher: L) -> Self {
        let history = HistoryLedger::new(config.history_capacity);
        Self {
            config,
            history,
            launcher,
        }
    }

    #[cfg(test)]
    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    #[cfg(test)]
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Prompts and processes lines until `exit`, end of input, or a fatal error.
    pub fn run<S, W>(&mut self, source: &mut S, out: &mut W) -> Result<()>
    where
        S: LineSource + ?Sized,
        W: Write,
    {
        loop {
            if !source.prompts_itself() {
                write!(out, "{}", self.config.prompt).map_err(ShellError::Output)?;
                flush_ignore_broken_pipe(out).map_err(ShellError::Output)?;
            }
            let line = match source.read_line(&self.config.prompt) {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Eof => {
                    debug!("end of input");
                    return Ok(());
                }
                ReadOutcome::Failed(err) => {
                    debug!(%err, "read failed, treating as blank");
                    notify(out, UNREADABLE_INPUT).map_err(ShellError::Output)?;
                    continue;
                }
            };
            if self.step(&line, out)? == Control::Exit {
                return Ok(());
            }
        }
    }

    /// Handles one raw input line.
    pub fn step<W: Write>(&mut self, line: &[u8], out: &mut W) -> Result<Control> {
        let content = line.strip_suffix(b"\n").unwrap_or(line);
        if content.is_empty() {
            trace!("blank input");
            return Ok(Control::Continue);
        }
        let line = match content.strip_prefix(&[HISTORY_MARKER]) {
            Some(reference) => {
                let resolved = parse_reference(reference).and_then(|id| self.history.lookup(id));
                match resolved {
                    Some(text) => {
                        let shown = String::from_utf8_lossy(text);
                        debug!(text = shown.trim_end(), "history reference resolved");
                        text.to_vec()
                    }
                    None => {
                        notify(out, EVENT_NOT_FOUND).map_err(ShellError::Output)?;
                        return Ok(Control::Continue);
                    }
                }
            }
            None => line.to_vec(),
        };
        self.dispatch(line, out)
    }

    fn dispatch<W: Write>(&mut self, line: Vec<u8>, out: &mut W) -> Result<Control> {
        let tokens = tokenize(&line);
        if tokens.is_empty() {
            trace!("nothing to run");
            return Ok(Control::Continue);
        }
        trace!(id = self.history.next_id(), "recording command");
        self.history.append(line);
        let program = tokens.program().unwrap_or_default();

        match Builtin::lookup(program) {
            Some(Builtin::Exit) => {
                debug!("exit requested");
                Ok(Control::Exit)
            }
            Some(Builtin::History) => {
                debug!(records = self.history.len(), "listing history");
                print_history(&self.history, out).map_err(ShellError::Output)?;
                Ok(Control::Continue)
            }
            None => match self.launcher.execute(tokens.argv(), tokens.background()) {
                Ok(ExecutionOutcome::Completed) => Ok(Control::Continue),
                Ok(ExecutionOutcome::Dispatched { pid }) => {
                    debug!(
                        pid = pid.as_raw(),
                        program = %String::from_utf8_lossy(program),
                        "running in background"
                    );
                    Ok(Control::Continue)
                }
                Ok(ExecutionOutcome::Rejected) => {
                    let message = exec_failure_message(program);
                    let message = message.strip_suffix(b"\n").unwrap_or(&message);
                    notify(out, message).map_err(ShellError::Output)?;
                    Ok(Control::Continue)
                }
                Err(err) => {
                    if matches!(err, ShellError::Spawn(_)) {
                        notify(out, SPAWN_FAILED).map_err(ShellError::Output)?;
                    }
                    Err(err)
                }
            },
        }
    }
}

/// Id after the marker, up to the first separator.
fn parse_reference(reference: &[u8]) -> Option<u64> {
    let digits = reference.split(|&b| is_separator(b)).next()?;
    std::str::from_utf8(digits).ok()?.parse().ok()
}
