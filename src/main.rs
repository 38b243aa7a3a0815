//! dupsweep - duplicate file remover
//!
//! Entry point for the dupsweep CLI.

use clap::Parser;
use dupsweep::cli::Cli;
use dupsweep::error::{render_error, ExitCode};

fn main() {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    let code = dupsweep::run_app(cli).unwrap_or_else(|err| {
        let code = ExitCode::for_error(&err);
        eprintln!("{}", render_error(&err, code, json_errors));
        code
    });
    std::process::exit(code.as_i32());
}
