//! dayplan - plain-text day planning from the command line

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = dayplan::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
