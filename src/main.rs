//! dups - duplicate file finder
//!
//! Entry point for the dups CLI application.

use clap::Parser;
use dups::{
    cli::Cli,
    error::{ExitCode, StructuredError},
};

fn main() {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    match dups::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::from_error(&err);
            let structured = StructuredError::new(&err, exit_code);

            if json_errors {
                match serde_json::to_string_pretty(&structured) {
                    Ok(json) => eprintln!("{}", json),
                    Err(_) => eprintln!("{}", structured.plain_line()),
                }
            } else {
                eprintln!("{}", structured.plain_line());
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
