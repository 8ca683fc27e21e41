use std::process::ExitCode;

use clap::Parser;
use env_logger::init;
use fontbatch_cli::{FATAL_EXIT_CODE, cli::Cli};

fn main() -> ExitCode {
    init();
    match Cli::parse().run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:?}");
            ExitCode::from(FATAL_EXIT_CODE)
        }
    }
}
