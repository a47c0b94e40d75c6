use std::process::ExitCode;

use clap::Parser;
use docqa_cli::{init_tracing, run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(&cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = %e.code, details = ?e.details, "docqa failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
