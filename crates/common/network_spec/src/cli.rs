use std::{fs, sync::Arc};

use crate::networks::{BeaconNetworkSpec, DEV, HOLESKY, HOODI, MAINNET, SEPOLIA};

pub fn beacon_network_parser(network_string: &str) -> Result<Arc<BeaconNetworkSpec>, String> {
    match network_string {
        "mainnet" => Ok(MAINNET.clone()),
        "holesky" => Ok(HOLESKY.clone()),
        "sepolia" => Ok(SEPOLIA.clone()),
        "hoodi" => Ok(HOODI.clone()),
        "dev" => Ok(DEV.clone()),
        path => read_network_spec(path),
    }
}

fn read_network_spec(path: &str) -> Result<Arc<BeaconNetworkSpec>, String> {
    let contents = fs::read_to_string(path).map_err(|err| format!("Failed to read file: {err}"))?;
    let network_spec: BeaconNetworkSpec = serde_yaml::from_str(&contents)
        .map_err(|err| format!("Failed to parse YAML from: {err}"))?;
    network_spec
        .validate()
        .map_err(|err| format!("Invalid network config {path}: {err}"))?;
    Ok(Arc::new(network_spec))
}
