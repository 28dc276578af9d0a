//! Builtin command dispatch.
//!
//! The executor consults `lookup` before fork/exec for any simple command
//! with arguments; a matched builtin runs in the shell process and its
//! return value becomes the statement's status.

use std::env;

use crate::parse::SimpleCommand;
use crate::state::ShellState;

pub type Builtin = fn(&mut ShellState, &SimpleCommand, bool) -> i32;

pub fn lookup(name: &str) -> Option<Builtin> {
    match name {
        "cd" => Some(builtin_cd),
        "exit" => Some(builtin_exit),
        _ => None,
    }
}

fn builtin_cd(shell: &mut ShellState, simple: &SimpleCommand, _background: bool) -> i32 {
    let target = match simple.argv.get(1) {
        Some(dir) => dir.clone(),
        None => match env::var("HOME") {
            Ok(home) => home,
            Err(_) => {
                eprintln!("{}: cd: HOME not set", shell.program_name);
                return 1;
            }
        },
    };
    match env::set_current_dir(&target) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{}: cd: {}: {}", shell.program_name, target, err);
            1
        }
    }
}

fn builtin_exit(shell: &mut ShellState, simple: &SimpleCommand, _background: bool) -> i32 {
    let code = simple
        .argv
        .get(1)
        .and_then(|arg| arg.parse::<i32>().ok())
        .unwrap_or(shell.last_status);
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_knows_the_builtin_table() {
        assert!(lookup("cd").is_some());
        assert!(lookup("exit").is_some());
        assert!(lookup("ls").is_none());
        assert!(lookup("").is_none());
    }
}
