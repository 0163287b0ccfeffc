//! Twitch Bridge CLI Binary

use anyhow::Context;
use clap::Parser;
use std::process;
use twitch_bridge::logging::init_logging;
use twitch_bridge::tooling::cli::{Cli, CliContext};

fn run(cli: &Cli) -> anyhow::Result<String> {
    let context = CliContext::new(cli.config.clone()).context("Failed to load configuration")?;

    let logging = cli.logging_overrides(&context.config().logging);
    init_logging(Some(&logging)).context("Failed to initialize logging")?;

    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
