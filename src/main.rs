//! Snow - command-line snowfall renderer

use std::process::ExitCode;

use snowfall::cli;

fn main() -> ExitCode {
    cli::run()
}
