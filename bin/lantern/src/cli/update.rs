use std::{path::PathBuf, sync::Arc};

use clap::{Parser, ValueEnum};
use lantern_network_spec::{cli::beacon_network_parser, networks::BeaconNetworkSpec};

use crate::cli::constants::DEFAULT_NETWORK;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UpdateKind {
    Full,
    Finality,
    Optimistic,
}

#[derive(Debug, Parser)]
pub struct UpdateConfig {
    #[arg(
        long,
        help = "Choose mainnet, holesky, sepolia, hoodi, dev or provide a path to a YAML config file",
        default_value = DEFAULT_NETWORK,
        value_parser = beacon_network_parser
    )]
    pub network: Arc<BeaconNetworkSpec>,

    #[arg(long, help = "Post state of the signature block")]
    pub state: PathBuf,

    #[arg(long, help = "Signed block carrying the sync aggregate")]
    pub block: PathBuf,

    #[arg(long, help = "Post state of the parent of the signature block")]
    pub attested_state: PathBuf,

    #[arg(long, help = "Block named by the attested finalized checkpoint")]
    pub finalized_block: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = UpdateKind::Full)]
    pub kind: UpdateKind,

    #[arg(long, help = "Write the SSZ encoded update here instead of printing JSON")]
    pub output: Option<PathBuf>,
}
