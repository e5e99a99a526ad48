use std::sync::Arc;

use alloy_primitives::B256;
use anyhow::ensure;
use lantern_consensus_beacon::{beacon_state::BeaconState, sync_committee::SyncCommittee};
use lantern_consensus_misc::beacon_block_header::BeaconBlockHeader;
use lantern_network_spec::networks::BeaconNetworkSpec;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

use crate::{
    errors::{InvalidStateReason, LightClientError},
    header::{header_from_state, is_at_block_slot},
    proof::{self, StateField, SyncCommitteeBranch},
};

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct LightClientBootstrap {
    /// Header matching the requested beacon block root
    pub header: BeaconBlockHeader,
    /// Current sync committee corresponding to `header.state_root`
    pub current_sync_committee: Arc<SyncCommittee>,
    pub current_sync_committee_branch: SyncCommitteeBranch,
}

impl LightClientBootstrap {
    pub fn new(
        state: &BeaconState,
        network_spec: &BeaconNetworkSpec,
    ) -> Result<Self, LightClientError> {
        let epoch = network_spec.compute_epoch_at_slot(state.slot());
        if epoch < network_spec.altair_fork_epoch {
            return Err(LightClientError::InvalidState(
                InvalidStateReason::PreAltair {
                    epoch,
                    altair_fork_epoch: network_spec.altair_fork_epoch,
                },
            ));
        }
        if !is_at_block_slot(state) {
            return Err(LightClientError::InvalidState(
                InvalidStateReason::SlotMismatch {
                    slot: state.slot(),
                    header_slot: state.latest_block_header().slot,
                },
            ));
        }

        let current_sync_committee_branch = proof::current_sync_committee_branch(state)?;
        let current_sync_committee =
            state
                .current_sync_committee()
                .cloned()
                .ok_or_else(|| LightClientError::ProofUnavailable {
                    field: StateField::CurrentSyncCommittee,
                    fork: state.fork_name(),
                    reason: "state has no sync committees".to_string(),
                })?;

        Ok(LightClientBootstrap {
            header: header_from_state(state),
            current_sync_committee,
            current_sync_committee_branch,
        })
    }

    /// Check the bootstrap against a block root obtained out of band.
    pub fn verify(&self, trusted_block_root: B256) -> anyhow::Result<()> {
        let header_root = self.header.tree_hash_root();
        ensure!(
            header_root == trusted_block_root,
            "Header root {header_root} does not match trusted block root {trusted_block_root}"
        );
        ensure!(
            proof::is_valid_branch(
                self.current_sync_committee.tree_hash_root(),
                &self.current_sync_committee_branch,
                StateField::CurrentSyncCommittee,
                self.header.state_root,
            ),
            "Invalid current sync committee branch"
        );
        Ok(())
    }

    pub fn sync_committee_period(&self, network_spec: &BeaconNetworkSpec) -> u64 {
        network_spec.compute_sync_committee_period_at_slot(self.header.slot)
    }
}
