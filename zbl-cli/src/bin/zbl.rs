//! `zbl` -- capture a window or display via Windows.Graphics.Capture.
//!
//! Parses the command line, then hands the validated options to the
//! platform capture backend once.  Exit status: 0 on success, 2 on a bad
//! command line, 1 when the backend fails.

use std::io;
use std::process;

use env_logger::Env;
use zbl_core::args::{parse_args, usage, ParseOutcome};
use zbl_core::backend::default_backend;
use zbl_core::dispatch::run;
use zbl_core::errors::ZblError;

fn main() {
    let invocation = match parse_args(std::env::args_os()) {
        Ok(ParseOutcome::Run(invocation)) => invocation,
        Ok(ParseOutcome::Exit(text)) => {
            print!("{text}");
            return;
        }
        Err(e) => exit_with(e),
    };

    let log_level = if invocation.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let mut backend = default_backend();
    let stdout = io::stdout();
    if let Err(e) = run(&invocation, backend.as_mut(), &mut stdout.lock()) {
        exit_with(e);
    }
}

fn exit_with(err: ZblError) -> ! {
    eprintln!("zbl: {err}");
    if let ZblError::InvalidArgument(_) = err {
        eprintln!("{}", usage());
        eprintln!("For more information, try '--help'.");
    }
    process::exit(err.exit_code());
}
