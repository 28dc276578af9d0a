//! Fork/exec of a single simple command.
//!
//! Builtins and assignment-only statements run in the shell process; anything
//! else forks, sets up its redirections and environment in the child, and
//! execs the resolved program. The parent either waits (foreground) or
//! reports the pid and returns immediately (background).

use std::env;
use std::ffi::CString;
use std::process;

use log::debug;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{execve, fork, ForkResult, Pid};

use crate::builtins;
use crate::execution::path::resolve;
use crate::execution::redirection::apply_redirections;
use crate::parse::SimpleCommand;
use crate::state::ShellState;

pub(crate) fn execute_simple(
    shell: &mut ShellState,
    simple: &SimpleCommand,
    background: bool,
) -> i32 {
    if simple.argv.is_empty() {
        // Assignment-only statement: mutate the shell's own environment for
        // the rest of the session. No process is spawned.
        apply_assignments(&simple.assignments);
        return 0;
    }

    if let Some(builtin) = builtins::lookup(&simple.argv[0]) {
        return builtin(shell, simple, background);
    }

    match unsafe { fork() } {
        Ok(ForkResult::Child) => run_child(shell, simple),
        Ok(ForkResult::Parent { child }) => {
            debug!(
                "job event=spawn pid={} argv0={} background={}",
                child, simple.argv[0], background
            );
            if background {
                println!("[1] {child}");
                return 0;
            }
            wait_child(shell, child)
        }
        Err(err) => {
            eprintln!("{}: fork failed: {}", shell.program_name, err.desc());
            -1
        }
    }
}

fn apply_assignments(assignments: &[String]) {
    for assignment in assignments {
        if let Some((key, value)) = assignment.split_once('=') {
            env::set_var(key, value);
        }
    }
}

/// Child-side setup and exec. A failure here is fatal for this child only:
/// it reports to stderr and exits nonzero, the parent reaps it normally.
fn run_child(shell: &ShellState, simple: &SimpleCommand) -> ! {
    if let Err(message) = apply_redirections(simple) {
        eprintln!("{}: {}", shell.program_name, message);
        process::exit(1);
    }

    let path = resolve(&simple.argv[0], &env::var("PATH").unwrap_or_default());
    let (program, argv, envp) = match exec_image(&path, simple) {
        Ok(image) => image,
        Err(_) => {
            eprintln!(
                "{}: {}: embedded nul in argument or environment",
                shell.program_name, simple.argv[0]
            );
            process::exit(1);
        }
    };

    // execve only returns on failure.
    let err = match execve(&program, &argv, &envp) {
        Err(err) => err,
        Ok(never) => match never {},
    };
    eprintln!(
        "{}: {}: {}: {}",
        shell.program_name,
        shell.line_number,
        simple.argv[0],
        err.desc()
    );
    process::exit(127);
}

/// Freeze argv and the merged environment into the C-style arrays `execve`
/// needs. argv[0] becomes the resolved path; the command's assignments are
/// placed ahead of the inherited environment so they win on key collision.
fn exec_image(
    path: &str,
    simple: &SimpleCommand,
) -> Result<(CString, Vec<CString>, Vec<CString>), std::ffi::NulError> {
    let program = CString::new(path)?;
    let mut argv = Vec::with_capacity(simple.argv.len());
    argv.push(program.clone());
    for arg in &simple.argv[1..] {
        argv.push(CString::new(arg.as_str())?);
    }
    let mut envp = Vec::new();
    for assignment in &simple.assignments {
        envp.push(CString::new(assignment.as_str())?);
    }
    for (key, value) in env::vars() {
        envp.push(CString::new(format!("{key}={value}"))?);
    }
    Ok((program, argv, envp))
}

/// Block until `pid` exits and map its wait status to a shell exit status
/// (signal-terminated children report 128 + signal number).
pub(crate) fn wait_child(shell: &ShellState, pid: Pid) -> i32 {
    match waitpid(pid, None) {
        Ok(WaitStatus::Exited(_, code)) => code,
        Ok(WaitStatus::Signaled(_, signal, _)) => 128 + signal as i32,
        Ok(_) => 0,
        Err(err) => {
            eprintln!("{}: waitpid failed: {}", shell.program_name, err.desc());
            -1
        }
    }
}

/// Clamp an internal status to something a child process can exit with.
pub(crate) fn exit_code(status: i32) -> i32 {
    if status < 0 {
        1
    } else {
        status
    }
}
