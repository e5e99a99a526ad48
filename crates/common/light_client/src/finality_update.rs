use lantern_consensus_beacon::{
    beacon_block::SignedBeaconBlock, beacon_state::BeaconState, sync_aggregate::SyncAggregate,
};
use lantern_consensus_misc::beacon_block_header::BeaconBlockHeader;
use lantern_network_spec::networks::BeaconNetworkSpec;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

use crate::{
    codec::impl_wire_codec,
    errors::LightClientError,
    proof::FinalityBranch,
    update::{FinalityProof, LightClientUpdate},
};

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct LightClientFinalityUpdate {
    pub attested_header: BeaconBlockHeader,
    /// Finalized header corresponding to `attested_header.state_root`
    pub finality: Option<FinalityProof>,
    /// Sync committee aggregate signature
    pub sync_aggregate: SyncAggregate,
    /// Slot at which the aggregate signature was created (untrusted)
    pub signature_slot: u64,
}

impl LightClientFinalityUpdate {
    pub fn new(
        state: &BeaconState,
        block: &SignedBeaconBlock,
        attested_state: &BeaconState,
        finalized_block: Option<&SignedBeaconBlock>,
        network_spec: &BeaconNetworkSpec,
    ) -> Result<Self, LightClientError> {
        LightClientUpdate::new(state, block, attested_state, finalized_block, network_spec)
            .map(|update| Self::from(&update))
    }

    pub fn finalized_header(&self) -> &BeaconBlockHeader {
        match &self.finality {
            Some(finality) => finality.finalized_header.header(),
            None => &BeaconBlockHeader::ZERO,
        }
    }
}

impl From<&LightClientUpdate> for LightClientFinalityUpdate {
    fn from(update: &LightClientUpdate) -> Self {
        LightClientFinalityUpdate {
            attested_header: update.attested_header.clone(),
            finality: update.finality.clone(),
            sync_aggregate: update.sync_aggregate.clone(),
            signature_slot: update.signature_slot,
        }
    }
}

/// Wire layout of [`LightClientFinalityUpdate`].
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct LightClientFinalityUpdateContainer {
    pub attested_header: BeaconBlockHeader,
    pub finalized_header: BeaconBlockHeader,
    pub finality_branch: FinalityBranch,
    pub sync_aggregate: SyncAggregate,
    #[serde(with = "serde_utils::quoted_u64")]
    pub signature_slot: u64,
}

impl From<&LightClientFinalityUpdate> for LightClientFinalityUpdateContainer {
    fn from(update: &LightClientFinalityUpdate) -> Self {
        let (finalized_header, finality_branch) = FinalityProof::to_wire(update.finality.as_ref());
        LightClientFinalityUpdateContainer {
            attested_header: update.attested_header.clone(),
            finalized_header,
            finality_branch,
            sync_aggregate: update.sync_aggregate.clone(),
            signature_slot: update.signature_slot,
        }
    }
}

impl From<LightClientFinalityUpdateContainer> for LightClientFinalityUpdate {
    fn from(container: LightClientFinalityUpdateContainer) -> Self {
        LightClientFinalityUpdate {
            attested_header: container.attested_header,
            finality: FinalityProof::from_wire(
                container.finalized_header,
                container.finality_branch,
            ),
            sync_aggregate: container.sync_aggregate,
            signature_slot: container.signature_slot,
        }
    }
}

impl_wire_codec!(LightClientFinalityUpdate, LightClientFinalityUpdateContainer);
