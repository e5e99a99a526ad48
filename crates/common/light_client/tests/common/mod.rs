#![allow(dead_code)]

use std::sync::Arc;

use alloy_primitives::B256;
use lantern_bls::PubKey;
use lantern_consensus_beacon::{
    beacon_block::SignedBeaconBlock, beacon_state::BeaconState, deneb,
    sync_aggregate::SyncAggregate, sync_committee::SyncCommittee,
};
use lantern_consensus_misc::{beacon_block_header::BeaconBlockHeader, checkpoint::Checkpoint};
use ssz_types::FixedVector;
use tree_hash::TreeHash;

/// A committee whose every key is `[seed; 48]`.
pub fn committee(seed: u8) -> Arc<SyncCommittee> {
    let pubkey = PubKey::try_from([seed; 48].as_slice()).unwrap();
    Arc::new(SyncCommittee {
        pubkeys: FixedVector::from(vec![pubkey.clone(); 512]),
        aggregate_pubkey: pubkey,
    })
}

pub fn sync_aggregate(participants: usize) -> SyncAggregate {
    let mut sync_aggregate = SyncAggregate::default();
    for index in 0..participants {
        sync_aggregate.sync_committee_bits.set(index, true).unwrap();
    }
    sync_aggregate
}

/// A Deneb block and its post state, consistent with each other.
#[derive(Debug, Clone)]
pub struct BlockAndState {
    pub block: SignedBeaconBlock,
    pub state: BeaconState,
}

impl BlockAndState {
    pub fn new(
        slot: u64,
        parent_root: B256,
        participants: usize,
        finalized_checkpoint: Checkpoint,
    ) -> Self {
        let period_seed = (slot / 8192) as u8;
        let mut message = deneb::beacon_block::BeaconBlock {
            slot,
            proposer_index: slot % 64,
            parent_root,
            state_root: B256::ZERO,
            body: deneb::beacon_block::BeaconBlockBody {
                graffiti: B256::repeat_byte(slot as u8),
                sync_aggregate: sync_aggregate(participants),
                ..Default::default()
            },
        };
        let state = deneb::beacon_state::BeaconState {
            slot,
            latest_block_header: BeaconBlockHeader {
                slot,
                proposer_index: message.proposer_index,
                parent_root,
                state_root: B256::ZERO,
                body_root: message.body.tree_hash_root(),
            },
            finalized_checkpoint,
            current_sync_committee: committee(2 * period_seed + 1),
            next_sync_committee: committee(2 * period_seed + 2),
            ..Default::default()
        };
        message.state_root = state.tree_hash_root();

        BlockAndState {
            block: SignedBeaconBlock::Deneb(deneb::beacon_block::SignedBeaconBlock {
                message,
                signature: Default::default(),
            }),
            state: BeaconState::Deneb(state),
        }
    }

    pub fn root(&self) -> B256 {
        self.block.block_root()
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            epoch: self.block.slot() / 32,
            root: if self.block.slot() == 0 {
                B256::ZERO
            } else {
                self.root()
            },
        }
    }
}

/// Finalized block, attested block and signature block, each the parent of the next.
#[derive(Debug, Clone)]
pub struct ChainFixture {
    pub finalized: BlockAndState,
    pub attested: BlockAndState,
    pub signature: BlockAndState,
}

impl ChainFixture {
    pub fn new(
        finalized_slot: u64,
        attested_slot: u64,
        signature_slot: u64,
        participants: usize,
    ) -> Self {
        let finalized = BlockAndState::new(
            finalized_slot,
            B256::repeat_byte(0x11),
            0,
            Checkpoint::default(),
        );
        let attested = BlockAndState::new(
            attested_slot,
            finalized.root(),
            0,
            finalized.checkpoint(),
        );
        let signature = BlockAndState::new(
            signature_slot,
            attested.root(),
            participants,
            finalized.checkpoint(),
        );
        ChainFixture {
            finalized,
            attested,
            signature,
        }
    }
}

pub fn deneb_state_mut(state: &mut BeaconState) -> &mut deneb::beacon_state::BeaconState {
    match state {
        BeaconState::Deneb(state) => state,
        other => panic!("expected a Deneb state, got {}", other.fork_name()),
    }
}

pub fn deneb_block_mut(
    block: &mut SignedBeaconBlock,
) -> &mut deneb::beacon_block::SignedBeaconBlock {
    match block {
        SignedBeaconBlock::Deneb(block) => block,
        other => panic!("expected a Deneb block, got {}", other.fork_name()),
    }
}
