pub mod bootstrap;
pub mod constants;
pub mod replay;
pub mod update;
pub mod verbosity;

use clap::{Parser, Subcommand};

use crate::cli::{
    bootstrap::BootstrapConfig,
    constants::DEFAULT_VERBOSITY,
    replay::ReplayConfig,
    update::UpdateConfig,
    verbosity::{Verbosity, verbosity_parser},
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (1=error, 2=warn, 3=info, 4=debug, 5=trace). `RUST_LOG` takes precedence.
    #[arg(
        short,
        long,
        global = true,
        default_value = DEFAULT_VERBOSITY,
        value_parser = verbosity_parser
    )]
    pub verbosity: Verbosity,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a light client bootstrap from a beacon state
    #[command(name = "bootstrap")]
    Bootstrap(BootstrapConfig),

    /// Build a light client update, or one of its projections, from a block and two states
    #[command(name = "update")]
    Update(UpdateConfig),

    /// Import a directory of blocks and report the best updates kept
    #[command(name = "replay")]
    Replay(ReplayConfig),
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use lantern_network_spec::networks::Network;

    use super::*;
    use crate::cli::update::UpdateKind;

    #[test]
    fn test_cli_bootstrap_command() {
        let cli = Cli::parse_from([
            "program",
            "bootstrap",
            "--network",
            "sepolia",
            "--state",
            "state.ssz_snappy",
        ]);

        assert_eq!(cli.verbosity, Verbosity::Info);
        match cli.command {
            Commands::Bootstrap(config) => {
                assert_eq!(config.network.network, Network::Sepolia);
                assert_eq!(config.state, PathBuf::from("state.ssz_snappy"));
                assert!(config.output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_update_command() {
        let cli = Cli::parse_from([
            "program",
            "update",
            "--state",
            "state.ssz",
            "--block",
            "block.ssz",
            "--attested-state",
            "attested_state.ssz",
            "--kind",
            "finality",
            "--verbosity",
            "4",
        ]);

        assert_eq!(cli.verbosity, Verbosity::Debug);
        match cli.command {
            Commands::Update(config) => {
                assert_eq!(config.network.network, Network::Mainnet);
                assert_eq!(config.kind, UpdateKind::Finality);
                assert!(config.finalized_block.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_replay_command() {
        let cli = Cli::parse_from([
            "program",
            "-v",
            "5",
            "replay",
            "--network",
            "dev",
            "--data-dir",
            "blocks",
        ]);

        assert_eq!(cli.verbosity, Verbosity::Trace);
        match cli.command {
            Commands::Replay(config) => {
                assert_eq!(config.network.network, Network::Dev);
                assert_eq!(config.data_dir, PathBuf::from("blocks"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_verbosity() {
        let result = Cli::try_parse_from(["program", "-v", "9", "replay", "--data-dir", "blocks"]);
        assert!(result.is_err());
    }
}
