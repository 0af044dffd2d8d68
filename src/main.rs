//! BSO-Scan - recurring OpenVAS quick scans with e-mailed PDF reports

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod notify;
mod scheduler;
mod workflow;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = cli::run::run(cli).await {
        log::debug!("Fatal: {:?}", err);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// Info by default, debug with `--debug`; `RUST_LOG` wins when set
fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}
