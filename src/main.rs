use std::process::ExitCode;

use clap::Parser;

use book_tracker::cli::{self, Cli};
use book_tracker::logging::{self, LogSettings};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let _log_guard = logging::init_tracing(&LogSettings::from_env(cli.command.is_server()));

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}
