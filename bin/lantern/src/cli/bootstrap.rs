use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use lantern_network_spec::{cli::beacon_network_parser, networks::BeaconNetworkSpec};

use crate::cli::constants::DEFAULT_NETWORK;

#[derive(Debug, Parser)]
pub struct BootstrapConfig {
    #[arg(
        long,
        help = "Choose mainnet, holesky, sepolia, hoodi, dev or provide a path to a YAML config file",
        default_value = DEFAULT_NETWORK,
        value_parser = beacon_network_parser
    )]
    pub network: Arc<BeaconNetworkSpec>,

    #[arg(long, help = "Beacon state to bootstrap from (.ssz or .ssz_snappy)")]
    pub state: PathBuf,

    #[arg(long, help = "Write the SSZ encoded bootstrap here instead of printing JSON")]
    pub output: Option<PathBuf>,
}
