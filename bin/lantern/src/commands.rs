use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, bail};
use lantern_consensus_beacon::{beacon_block::SignedBeaconBlock, beacon_state::BeaconState};
use lantern_light_client::{
    bootstrap::LightClientBootstrap,
    errors::ErrorKind,
    finality_update::LightClientFinalityUpdate,
    optimistic_update::LightClientOptimisticUpdate,
    provider::MemoryChain,
    service::LightClientUpdateProducer,
    update::LightClientUpdate,
};
use lantern_network_spec::networks::BeaconNetworkSpec;
use serde::Serialize;
use serde_json::{Value, json};
use ssz::Encode;
use tracing::{debug, info, warn};

use crate::{
    cli::{
        bootstrap::BootstrapConfig,
        replay::ReplayConfig,
        update::{UpdateConfig, UpdateKind},
    },
    input::{find_ssz_file, read_block, read_state},
};

/// Write `value` as SSZ to `output`, or return it as JSON when no output is given.
fn emit<T: Encode + Serialize>(
    value: &T,
    output: Option<&Path>,
) -> anyhow::Result<Option<Value>> {
    match output {
        Some(path) => {
            fs::write(path, value.as_ssz_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} bytes to {}", value.ssz_bytes_len(), path.display());
            Ok(None)
        }
        None => Ok(Some(serde_json::to_value(value)?)),
    }
}

pub fn run_bootstrap(config: &BootstrapConfig) -> anyhow::Result<Option<Value>> {
    let state = read_state(&config.state, &config.network)?;
    let bootstrap = LightClientBootstrap::new(&state, &config.network)?;
    info!(
        "Built bootstrap for slot {} (period {})",
        bootstrap.header.slot,
        bootstrap.sync_committee_period(&config.network)
    );
    emit(&bootstrap, config.output.as_deref())
}

pub fn run_update(config: &UpdateConfig) -> anyhow::Result<Option<Value>> {
    let network_spec = &config.network;
    let state = read_state(&config.state, network_spec)?;
    let block = read_block(&config.block, network_spec)?;
    let attested_state = read_state(&config.attested_state, network_spec)?;
    let finalized_block = config
        .finalized_block
        .as_deref()
        .map(|path| read_block(path, network_spec))
        .transpose()?;

    let update = LightClientUpdate::new(
        &state,
        &block,
        &attested_state,
        finalized_block.as_ref(),
        network_spec,
    )?;
    info!(
        "Built update signed at slot {} with {} participants",
        update.signature_slot,
        update.num_participants()
    );

    let output = config.output.as_deref();
    match config.kind {
        UpdateKind::Full => emit(&update, output),
        UpdateKind::Finality => emit(&LightClientFinalityUpdate::from(&update), output),
        UpdateKind::Optimistic => emit(&LightClientOptimisticUpdate::from(&update), output),
    }
}

pub fn run_replay(config: &ReplayConfig) -> anyhow::Result<Value> {
    let network_spec = config.network.clone();
    let mut blocks = load_blocks(&config.data_dir, &network_spec)?;
    if blocks.is_empty() {
        bail!("No blocks found in {}", config.data_dir.display());
    }
    blocks.sort_by_key(|(block, _)| block.slot());

    let chain = Arc::new(MemoryChain::new());
    let mut producer = LightClientUpdateProducer::new(chain.clone(), network_spec.clone());
    let mut rejected = 0;
    for (block, state) in blocks {
        let slot = block.slot();
        let block_root = chain.insert(block, state);
        match producer.on_block_imported(block_root) {
            Ok(outcome) => debug!("Imported block {block_root} at slot {slot}: {outcome:?}"),
            Err(err) if err.kind() == ErrorKind::Infrastructure => {
                return Err(err).with_context(|| format!("Failed to import block at slot {slot}"));
            }
            Err(err) => {
                warn!("Block {block_root} at slot {slot} produced no update: {err}");
                rejected += 1;
            }
        }
    }

    let store = producer.store();
    let periods = store.periods().collect::<Vec<_>>();
    info!(
        "Replayed {} blocks, best updates kept for {} periods",
        chain.len(),
        periods.len()
    );
    Ok(json!({
        "imported": chain.len(),
        "rejected": rejected,
        "periods": periods,
        "latest_finalized_slot": store
            .best_finalized_update()
            .map(|update| update.finalized_header().slot),
        "latest_optimistic_slot": store
            .best_non_finalized_update()
            .map(|update| update.attested_header.slot),
    }))
}

/// Every `<data_dir>/<entry>/` holding both a block and a state.
fn load_blocks(
    data_dir: &Path,
    network_spec: &BeaconNetworkSpec,
) -> anyhow::Result<Vec<(SignedBeaconBlock, BeaconState)>> {
    let mut blocks = vec![];
    let entries = fs::read_dir(data_dir)
        .with_context(|| format!("Failed to read directory {}", data_dir.display()))?;
    for entry in entries {
        let dir = entry?.path();
        if !dir.is_dir() {
            continue;
        }
        let (Some(block_path), Some(state_path)) =
            (find_ssz_file(&dir, "block"), find_ssz_file(&dir, "state"))
        else {
            warn!("Skipping {}: expected block and state files", dir.display());
            continue;
        };
        blocks.push((
            read_block(&block_path, network_spec)?,
            read_state(&state_path, network_spec)?,
        ));
    }
    Ok(blocks)
}
