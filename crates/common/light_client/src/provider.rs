use std::{collections::HashMap, sync::Arc};

use alloy_primitives::B256;
use anyhow::anyhow;
use lantern_consensus_beacon::{beacon_block::SignedBeaconBlock, beacon_state::BeaconState};
use lantern_consensus_misc::constants::GENESIS_SLOT;
use parking_lot::RwLock;

/// Read access to imported blocks and their post states.
pub trait ChainReader: Send + Sync {
    fn block(&self, block_root: B256) -> anyhow::Result<Option<Arc<SignedBeaconBlock>>>;

    /// Post state of the block with root `block_root`.
    fn state(&self, block_root: B256) -> anyhow::Result<Option<Arc<BeaconState>>>;

    fn genesis_block_root(&self) -> anyhow::Result<B256>;
}

/// Blocks and states held in memory, keyed by block root.
#[derive(Debug, Default)]
pub struct MemoryChain {
    blocks: RwLock<HashMap<B256, Arc<SignedBeaconBlock>>>,
    states: RwLock<HashMap<B256, Arc<BeaconState>>>,
    genesis_block_root: RwLock<Option<B256>>,
}

impl MemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `block` with its post `state`. Returns the block root.
    pub fn insert(&self, block: SignedBeaconBlock, state: BeaconState) -> B256 {
        let block_root = block.block_root();
        if block.slot() == GENESIS_SLOT {
            *self.genesis_block_root.write() = Some(block_root);
        }
        self.blocks.write().insert(block_root, Arc::new(block));
        self.states.write().insert(block_root, Arc::new(state));
        block_root
    }

    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }
}

impl ChainReader for MemoryChain {
    fn block(&self, block_root: B256) -> anyhow::Result<Option<Arc<SignedBeaconBlock>>> {
        Ok(self.blocks.read().get(&block_root).cloned())
    }

    fn state(&self, block_root: B256) -> anyhow::Result<Option<Arc<BeaconState>>> {
        Ok(self.states.read().get(&block_root).cloned())
    }

    fn genesis_block_root(&self) -> anyhow::Result<B256> {
        (*self.genesis_block_root.read()).ok_or_else(|| anyhow!("Genesis block not imported"))
    }
}
