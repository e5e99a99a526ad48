use std::sync::Arc;

use alloy_primitives::B256;
use lantern_consensus_misc::constants::GENESIS_SLOT;
use lantern_network_spec::networks::BeaconNetworkSpec;
use lantern_sync::rwlock::{Reader, Writer};
use tracing::{debug, info, warn};
use tree_hash::TreeHash;

use crate::{
    bootstrap::LightClientBootstrap,
    errors::LightClientError,
    finality_update::LightClientFinalityUpdate,
    optimistic_update::LightClientOptimisticUpdate,
    provider::ChainReader,
    store::{InsertOutcome, LightClientStore},
    update::LightClientUpdate,
};

/// Builds an update for every imported block and keeps the best ones in the shared store.
///
/// There is exactly one producer per store. It runs on the block import path, so insertions happen
/// in import order.
pub struct LightClientUpdateProducer {
    chain: Arc<dyn ChainReader>,
    network_spec: Arc<BeaconNetworkSpec>,
    store: Writer<LightClientStore>,
}

impl LightClientUpdateProducer {
    pub fn new(chain: Arc<dyn ChainReader>, network_spec: Arc<BeaconNetworkSpec>) -> Self {
        let (store, _) = Writer::new(LightClientStore::new(&network_spec));
        Self {
            chain,
            network_spec,
            store,
        }
    }

    /// Read side for request handlers.
    pub fn api(&self) -> LightClientApi {
        LightClientApi {
            chain: self.chain.clone(),
            network_spec: self.network_spec.clone(),
            store: self.store.reader(),
        }
    }

    pub fn store(&self) -> Arc<LightClientStore> {
        self.store.snapshot()
    }

    /// Build the update justified by the block `block_root` and offer it to the store.
    pub fn on_block_imported(&mut self, block_root: B256) -> Result<InsertOutcome, LightClientError> {
        let block = self
            .chain
            .block(block_root)?
            .ok_or_else(|| LightClientError::NotFound(format!("Block {block_root}")))?;
        if block.slot() == GENESIS_SLOT {
            debug!("Skipping light client update for genesis block {block_root}");
            return Ok(InsertOutcome::default());
        }
        let state = self
            .chain
            .state(block_root)?
            .ok_or_else(|| LightClientError::NotFound(format!("State of block {block_root}")))?;

        let attested_block_root = block.parent_root();
        let attested_state = self.chain.state(attested_block_root)?.ok_or_else(|| {
            LightClientError::NotFound(format!("State of attested block {attested_block_root}"))
        })?;

        let checkpoint_root = attested_state.finalized_checkpoint().root;
        let finalized_block_root = if checkpoint_root == B256::ZERO {
            self.chain.genesis_block_root()?
        } else {
            checkpoint_root
        };
        let finalized_block = self.chain.block(finalized_block_root)?;
        if finalized_block.is_none() {
            debug!("Finalized block {finalized_block_root} unknown, building update without finality");
        }

        let update = match LightClientUpdate::new(
            &state,
            &block,
            &attested_state,
            finalized_block.as_deref(),
            &self.network_spec,
        ) {
            Ok(update) => Arc::new(update),
            Err(err @ LightClientError::AttestedTooOld { .. }) => {
                debug!("Skipping light client update for block {block_root}: {err}");
                return Ok(InsertOutcome::default());
            }
            Err(err) => {
                warn!(
                    "Rejected light client update for block {block_root} ({:?}): {err}",
                    err.kind()
                );
                return Err(err);
            }
        };

        let mut outcome = InsertOutcome::default();
        self.store.update(|store| {
            outcome = store.insert(update.clone());
            outcome.changed()
        });

        if outcome.best_for_period {
            info!(
                "Stored best light client update for period {} (signature slot {}, participants {}, finalized {})",
                self.network_spec
                    .compute_sync_committee_period_at_slot(update.signature_slot),
                update.signature_slot,
                update.num_participants(),
                update.is_finalized(),
            );
        }
        if outcome.best_finalized {
            info!(
                "New latest finality update with finalized slot {}",
                update.finalized_header().slot
            );
        }

        Ok(outcome)
    }
}

/// The light client queries served to peers and API clients.
#[derive(Clone)]
pub struct LightClientApi {
    chain: Arc<dyn ChainReader>,
    network_spec: Arc<BeaconNetworkSpec>,
    store: Reader<LightClientStore>,
}

impl LightClientApi {
    pub fn get_bootstrap(&self, block_root: B256) -> Result<LightClientBootstrap, LightClientError> {
        let state = self
            .chain
            .state(block_root)?
            .ok_or_else(|| LightClientError::NotFound(format!("State of block {block_root}")))?;

        let bootstrap = LightClientBootstrap::new(&state, &self.network_spec)?;
        let header_root = bootstrap.header.tree_hash_root();
        if header_root != block_root {
            return Err(LightClientError::HeaderBlockMismatch {
                header_root,
                block_root,
            });
        }
        Ok(bootstrap)
    }

    /// Best updates for the `count` periods starting at `start_period`, skipping periods with none.
    pub fn get_updates(&self, start_period: u64, count: u64) -> Vec<Arc<LightClientUpdate>> {
        let count = count.min(self.network_spec.max_request_light_client_updates);
        self.store
            .snapshot()
            .updates_by_range(start_period, count)
    }

    pub fn get_finality_update(&self) -> Result<LightClientFinalityUpdate, LightClientError> {
        self.store
            .snapshot()
            .best_finalized_update()
            .map(|update| LightClientFinalityUpdate::from(update.as_ref()))
            .ok_or_else(|| LightClientError::NotFound("Light client finality update".to_string()))
    }

    pub fn get_optimistic_update(&self) -> Result<LightClientOptimisticUpdate, LightClientError> {
        self.store
            .snapshot()
            .best_non_finalized_update()
            .map(|update| LightClientOptimisticUpdate::from(update.as_ref()))
            .ok_or_else(|| {
                LightClientError::NotFound("Light client optimistic update".to_string())
            })
    }
}
