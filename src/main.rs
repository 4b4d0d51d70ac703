//! Reprompt CLI entry point.

use clap::Parser;

use reprompt::cli::{commands::optimize, handle_error, Cli};
use reprompt::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match optimize::load_config(&cli) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LogConfig::try_from(&config.logging).and_then(|log| LoggerImpl::init(&log)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    if let Err(err) = optimize::execute(&cli, config).await {
        handle_error(err, cli.json);
    }
}
