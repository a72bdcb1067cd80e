//! sizemap CLI entry point
//!
//! Minimal entrypoint:
//! 1. Delegates argument parsing and dispatch to `cli::run`
//! 2. Prints errors to stderr
//! 3. Exits with non-zero on failure

use sizemap::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
