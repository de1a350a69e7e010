#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use wordsquare::{cli, framework, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = Cli::parse();

    let config = framework::Config::load(options.config.as_deref()).context("loading config")?;
    framework::logging::init_tracing(&config.logs.filter);

    debug!(command = ?options.command, "starting");

    match &options.command {
        cli::Command::Generate(args) => cli::generate(&config, args)?,
        cli::Command::Play(args) => cli::play(&config, args).await?,
        cli::Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
