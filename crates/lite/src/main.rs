use std::process::ExitCode;

use clap::Parser;

mod cli;
mod delivery;
mod logging;
mod ui;

#[tokio::main]
async fn main() -> ExitCode {
    let app = cli::App::parse();
    let verbose = app.verbose;
    if verbose {
        logging::init_verbose();
    } else {
        logging::init();
    }

    match cli::run(app).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if verbose => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
