//! plz CLI - An extensible command-line tool

use std::process::ExitCode;

fn main() -> ExitCode {
    match plz_cli::cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
