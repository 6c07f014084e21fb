//! Unibuild - command-line tool for dispatching engine batch builds

use std::process::ExitCode;

use unibuild::cli;

fn main() -> ExitCode {
    cli::run()
}
