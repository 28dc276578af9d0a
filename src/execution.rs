//! Command-tree executor.
//!
//! Walks a parsed `Command` tree exactly once: simple commands fork and exec
//! (after builtin dispatch), pipelines fork both sides around a single pipe,
//! and the logical/sequence nodes combine child statuses. The parent stays
//! single-threaded; all parallelism comes from child processes.

mod path;
mod redirection;
mod spawning;

pub use path::resolve;

use std::os::fd::AsRawFd;
use std::process;

use log::debug;
use nix::unistd::{dup2, fork, pipe, ForkResult};

use crate::parse::{Command, CommandKind};
use crate::state::ShellState;
use spawning::{exit_code, wait_child};

/// Execute a command tree and return its exit status. Absent commands (an
/// empty statement) are status 0.
pub fn execute(shell: &mut ShellState, command: &Command) -> i32 {
    match &command.kind {
        CommandKind::Simple(simple) => {
            spawning::execute_simple(shell, simple, command.background)
        }
        CommandKind::Pipe(left, right) => execute_pipe(shell, left, right),
        CommandKind::And(left, right) => {
            let status = execute(shell, left);
            if status == 0 {
                execute(shell, right)
            } else {
                status
            }
        }
        CommandKind::Or(left, right) => {
            let status = execute(shell, left);
            if status != 0 {
                execute(shell, right)
            } else {
                status
            }
        }
        CommandKind::Sequence(left, right) => {
            execute(shell, left);
            execute(shell, right)
        }
    }
}

/// Run `left | right`: one pipe, two forks. Each child dup2s its pipe end
/// onto stdin/stdout, closes both originals, and recursively executes its
/// subtree, exiting with that status. The parent closes both ends as soon as
/// both forks have happened (a full pipe buffer would otherwise deadlock the
/// waits), reaps the left child without inspecting its status, and reports
/// the right child's status as the pipeline's.
///
/// The node's `background` flag is not consulted here: only simple commands
/// detach, so a backgrounded pipeline still waits.
fn execute_pipe(shell: &mut ShellState, left: &Command, right: &Command) -> i32 {
    let (read_end, write_end) = match pipe() {
        Ok(ends) => ends,
        Err(err) => {
            eprintln!("{}: pipe failed: {}", shell.program_name, err.desc());
            return -1;
        }
    };

    let left_pid = match unsafe { fork() } {
        Ok(ForkResult::Child) => {
            if let Err(err) = dup2(write_end.as_raw_fd(), libc::STDOUT_FILENO) {
                eprintln!("{}: dup2 failed: {}", shell.program_name, err.desc());
                process::exit(1);
            }
            drop(write_end);
            drop(read_end);
            process::exit(exit_code(execute(shell, left)));
        }
        Ok(ForkResult::Parent { child }) => child,
        Err(err) => {
            eprintln!("{}: fork failed: {}", shell.program_name, err.desc());
            return -1;
        }
    };

    let right_pid = match unsafe { fork() } {
        Ok(ForkResult::Child) => {
            if let Err(err) = dup2(read_end.as_raw_fd(), libc::STDIN_FILENO) {
                eprintln!("{}: dup2 failed: {}", shell.program_name, err.desc());
                process::exit(1);
            }
            drop(read_end);
            drop(write_end);
            process::exit(exit_code(execute(shell, right)));
        }
        Ok(ForkResult::Parent { child }) => child,
        Err(err) => {
            eprintln!("{}: fork failed: {}", shell.program_name, err.desc());
            drop(read_end);
            drop(write_end);
            let _ = wait_child(shell, left_pid);
            return -1;
        }
    };

    drop(read_end);
    drop(write_end);
    debug!(
        "job event=pipeline left={} right={}",
        left_pid, right_pid
    );

    // Only the rightmost status is observed; the left side is reaped but its
    // status is discarded.
    let _ = wait_child(shell, left_pid);
    wait_child(shell, right_pid)
}
