#![forbid(unsafe_code)]

//! mfeed — Material Feed CLI entry point.

use clap::Parser;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    if let Err(e) = cli_app::run(&args) {
        if !e.is_reported() {
            eprintln!("mfeed: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
