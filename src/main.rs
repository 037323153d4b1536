use clap::Parser;
use serverpick::app_constants::{defaults, env};
use serverpick::cli::{Cli, CommandHandler};
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(env::LOG_FILTER).unwrap_or_else(|_| EnvFilter::new(defaults::LOG_LEVEL))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut handler = match CommandHandler::new() {
        Ok(handler) => handler,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let cancel = handler.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    if let Err(e) = handler.handle_command(cli.command).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
