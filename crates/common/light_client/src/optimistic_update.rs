use lantern_consensus_beacon::{
    beacon_block::SignedBeaconBlock, beacon_state::BeaconState, sync_aggregate::SyncAggregate,
};
use lantern_consensus_misc::beacon_block_header::BeaconBlockHeader;
use lantern_network_spec::networks::BeaconNetworkSpec;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

use crate::{errors::LightClientError, update::LightClientUpdate};

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct LightClientOptimisticUpdate {
    /// Header attested to by the sync committee
    pub attested_header: BeaconBlockHeader,
    /// Sync committee aggregate signature
    pub sync_aggregate: SyncAggregate,
    /// Slot at which the aggregate signature was created (untrusted)
    #[serde(with = "serde_utils::quoted_u64")]
    pub signature_slot: u64,
}

impl LightClientOptimisticUpdate {
    pub fn new(
        state: &BeaconState,
        block: &SignedBeaconBlock,
        attested_state: &BeaconState,
        network_spec: &BeaconNetworkSpec,
    ) -> Result<Self, LightClientError> {
        LightClientUpdate::new(state, block, attested_state, None, network_spec)
            .map(|update| Self::from(&update))
    }
}

impl From<&LightClientUpdate> for LightClientOptimisticUpdate {
    fn from(update: &LightClientUpdate) -> Self {
        LightClientOptimisticUpdate {
            attested_header: update.attested_header.clone(),
            sync_aggregate: update.sync_aggregate.clone(),
            signature_slot: update.signature_slot,
        }
    }
}
