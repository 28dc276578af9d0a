use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use minishell::repl::{run_interactive, run_stream};
use minishell::state::ShellState;

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [filename]", args[0]);
        return ExitCode::from(127);
    }

    let mut shell;
    let result = if let Some(script) = args.get(1) {
        // Diagnostics from a script run are prefixed with the script path.
        let file = match File::open(script) {
            Ok(file) => file,
            Err(_) => {
                eprintln!("Error: cannot open file {script}");
                return ExitCode::from(127);
            }
        };
        shell = ShellState::new(script.clone(), false);
        run_stream(&mut shell, BufReader::new(file))
    } else {
        let interactive = unsafe { libc::isatty(libc::STDIN_FILENO) == 1 };
        shell = ShellState::new(args[0].clone(), interactive);
        if interactive {
            run_interactive(&mut shell)
        } else {
            run_stream(&mut shell, BufReader::new(io::stdin()))
        }
    };

    if let Err(err) = result {
        eprintln!("{}: {}", shell.program_name, err);
        return ExitCode::from(2);
    }
    if shell.fatal_error {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging() {
    let env = env_logger::Env::default().filter_or("MINISHELL_LOG", "info");
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
