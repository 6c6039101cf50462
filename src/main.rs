use clap::Parser;
use std::process::ExitCode;

use sessed::cli::Cli;
use sessed::commands::{self, Console};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let mut console = Console::new();

    let success =
        commands::execute(cli.command, cli.state_dir, tokio::io::stdin(), &mut console).await;

    if let Err(e) = console.write_to(&mut std::io::stdout(), &mut std::io::stderr()) {
        log::error!("failed to write output: {}", e);
        return ExitCode::FAILURE;
    }

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
