use std::{io, process};

use clap::Parser;
use lantern::{
    cli::{Cli, Commands},
    commands::{run_bootstrap, run_replay, run_update},
};
use serde_json::Value;
use tracing::error;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.verbosity.env_filter())
        .with_writer(io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Bootstrap(config) => run_bootstrap(config),
        Commands::Update(config) => run_update(config),
        Commands::Replay(config) => run_replay(config).map(Some),
    };

    match result {
        Ok(Some(json)) => print_json(&json),
        Ok(None) => {}
        Err(err) => {
            error!("{err:#}");
            process::exit(1);
        }
    }
}

fn print_json(json: &Value) {
    match serde_json::to_string_pretty(json) {
        Ok(text) => println!("{text}"),
        Err(err) => {
            error!("Failed to render output: {err}");
            process::exit(1);
        }
    }
}
