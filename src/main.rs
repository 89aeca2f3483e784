use std::process::ExitCode;

use clap::Parser;
use glean::{
    cli::{Arguments, ExitStatus},
    logging,
};

fn main() -> ExitCode {
    logging::install_subscriber();
    let args = Arguments::parse();

    match glean::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}
