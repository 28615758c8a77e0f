//! formforge CLI entry point
//!
//! Parses arguments, dispatches to the CLI command, prints errors to
//! stderr and exits with non-zero status on failure.

use formforge::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
