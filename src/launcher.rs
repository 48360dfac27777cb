// launcher.rs

use crate::error::{Result, ShellError};
use itertools::Itertools;
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, write, ForkResult, Pid};
use std::ffi::CString;
use tracing::{debug, trace, warn};

/// Status a child reports when its program could not be executed.
pub const EXEC_FAILED_STATUS: i32 = 127;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The foreground child has terminated.
    Completed,
    /// A background child is running; the reaper collects it.
    Dispatched { pid: Pid },
    /// The argv could not be handed to the OS and nothing was spawned.
    Rejected,
}

pub trait Launcher {
    /// Runs `argv[0]` with `argv`. An `Err` means the spawn primitive itself failed.
    fn execute(&mut self, argv: &[Vec<u8>], background: bool) -> Result<ExecutionOutcome>;
}

/// Launches programs with `fork` + `execvp`, inheriting environment and stdio.
#[derive(Debug, Default)]
pub struct ForkLauncher;

impl Launcher for ForkLauncher {
    fn execute(&mut self, argv: &[Vec<u8>], background: bool) -> Result<ExecutionOutcome> {
        let Some(program) = argv.first() else {
            return Ok(ExecutionOutcome::Rejected);
        };
        let args = match argv
            .iter()
            .map(|a| CString::new(a.as_slice()))
            .collect::<std::result::Result<Vec<_>, _>>()
        {
            Ok(args) => args,
            Err(_) => {
                debug!(program = %String::from_utf8_lossy(program), "argument contains a NUL byte");
                return Ok(ExecutionOutcome::Rejected);
            }
        };
        // Everything the child touches is built before fork; it must not allocate.
        let argv_ptrs: Vec<*const libc::c_char> = args
            .iter()
            .map(|a| a.as_ptr())
            .chain(std::iter::once(std::ptr::null()))
            .collect();
        let failure = exec_failure_message(program);

        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                unsafe { libc::execvp(argv_ptrs[0], argv_ptrs.as_ptr()) };
                let _ = write(libc::STDOUT_FILENO, &failure);
                unsafe { libc::_exit(EXEC_FAILED_STATUS) }
            }
            Ok(ForkResult::Parent { child }) => {
                debug!(
                    pid = child.as_raw(),
                    background,
                    argv = %argv.iter().map(|a| String::from_utf8_lossy(a)).join(" "),
                    "spawned"
                );
                if background {
                    return Ok(ExecutionOutcome::Dispatched { pid: child });
                }
                wait_for(child);
                Ok(ExecutionOutcome::Completed)
            }
            Err(err) => Err(ShellError::Spawn(err)),
        }
    }
}

pub fn exec_failure_message(program: &[u8]) -> Vec<u8> {
    [program, &b": execution failed\n"[..]].concat()
}

/// Blocks until `child` is gone. The reaper may collect it first, which
/// surfaces here as `ECHILD`.
fn wait_for(child: Pid) {
    loop {
        match waitpid(child, None) {
            Ok(WaitStatus::Exited(_, status)) => {
                trace!(pid = child.as_raw(), status, "foreground child exited");
                return;
            }
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                trace!(pid = child.as_raw(), ?signal, "foreground child killed");
                return;
            }
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => {
                trace!(pid = child.as_raw(), "foreground child already reaped");
                return;
            }
            Err(err) => {
                warn!(pid = child.as_raw(), %err, "waitpid failed");
                return;
            }
        }
    }
}
