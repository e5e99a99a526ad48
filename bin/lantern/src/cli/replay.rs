use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use lantern_network_spec::{cli::beacon_network_parser, networks::BeaconNetworkSpec};

use crate::cli::constants::DEFAULT_NETWORK;

#[derive(Debug, Parser)]
pub struct ReplayConfig {
    #[arg(
        long,
        help = "Choose mainnet, holesky, sepolia, hoodi, dev or provide a path to a YAML config file",
        default_value = DEFAULT_NETWORK,
        value_parser = beacon_network_parser
    )]
    pub network: Arc<BeaconNetworkSpec>,

    #[arg(
        long,
        help = "Directory with one sub directory per block, each holding block.ssz[_snappy] and state.ssz[_snappy]"
    )]
    pub data_dir: PathBuf,
}
