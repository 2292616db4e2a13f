//! CLI entrypoint for the mender repair pipeline.
//!
//! The binary delegates to [`mender_cli::run`], which parses arguments,
//! initialises telemetry, opens the analysis session, and drives one
//! orchestrated repair run.

use std::io::{self, IsTerminal, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let stdout_is_terminal = io::stdout().is_terminal();
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    mender_cli::run(
        std::env::args_os(),
        &mut stdout,
        &mut stderr,
        stdout_is_terminal,
    )
}
