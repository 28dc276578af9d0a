//! Child-side redirection plumbing.
//!
//! Runs between fork and exec: open the named files, dup2 them onto stdin
//! and stdout, and close the originals immediately so no descriptor leaks
//! across the exec boundary.

use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;

use nix::unistd::dup2;

use crate::parse::SimpleCommand;

/// Permission bits for created redirect targets (0644).
const REDIRECT_TARGET_MODE: u32 = 0o644;

/// Apply the command's input/output redirections to the current process.
/// The error string carries the offending path, ready for a
/// `<program>: <path>: <reason>` diagnostic.
pub(crate) fn apply_redirections(simple: &SimpleCommand) -> Result<(), String> {
    if let Some(ref path) = simple.input_file {
        let file = File::open(path).map_err(|err| format!("{path}: {err}"))?;
        redirect(file, libc::STDIN_FILENO).map_err(|err| format!("{path}: {err}"))?;
    }
    if let Some(ref path) = simple.output_file {
        let mut opts = OpenOptions::new();
        opts.write(true).create(true).mode(REDIRECT_TARGET_MODE);
        if simple.append {
            opts.append(true);
        } else {
            opts.truncate(true);
        }
        let file = opts.open(path).map_err(|err| format!("{path}: {err}"))?;
        redirect(file, libc::STDOUT_FILENO).map_err(|err| format!("{path}: {err}"))?;
    }
    Ok(())
}

/// dup2 the file onto `target_fd`; dropping `file` closes the original
/// descriptor right after duplication.
fn redirect(file: File, target_fd: i32) -> nix::Result<()> {
    dup2(file.as_raw_fd(), target_fd)?;
    drop(file);
    Ok(())
}
