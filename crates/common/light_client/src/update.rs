use std::sync::{Arc, LazyLock};

use alloy_primitives::B256;
use anyhow::ensure;
use lantern_consensus_beacon::{
    beacon_block::SignedBeaconBlock, beacon_state::BeaconState, sync_aggregate::SyncAggregate,
    sync_committee::SyncCommittee,
};
use lantern_consensus_misc::{beacon_block_header::BeaconBlockHeader, constants::GENESIS_SLOT};
use lantern_network_spec::networks::BeaconNetworkSpec;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

use crate::{
    codec::impl_wire_codec,
    errors::LightClientError,
    header::{header_from_state, is_at_block_slot},
    proof::{self, FinalityBranch, StateField, SyncCommitteeBranch},
};

static ZERO_SYNC_COMMITTEE: LazyLock<Arc<SyncCommittee>> =
    LazyLock::new(|| Arc::new(SyncCommittee::default()));

/// Next sync committee of the attested state, with its branch.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NextSyncCommitteeProof {
    pub next_sync_committee: Arc<SyncCommittee>,
    pub next_sync_committee_branch: SyncCommitteeBranch,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum FinalizedHeader {
    /// The genesis block is finalized. Carried as the zero header.
    Genesis,
    Block(BeaconBlockHeader),
}

impl FinalizedHeader {
    /// The header as it appears on the wire.
    pub fn header(&self) -> &BeaconBlockHeader {
        match self {
            FinalizedHeader::Genesis => &BeaconBlockHeader::ZERO,
            FinalizedHeader::Block(header) => header,
        }
    }
}

/// Finalized header of the attested state, with the branch to its checkpoint root.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FinalityProof {
    pub finalized_header: FinalizedHeader,
    pub finality_branch: FinalityBranch,
}

impl FinalityProof {
    pub(crate) fn to_wire(proof: Option<&FinalityProof>) -> (BeaconBlockHeader, FinalityBranch) {
        match proof {
            Some(proof) => (
                proof.finalized_header.header().clone(),
                proof.finality_branch.clone(),
            ),
            None => (BeaconBlockHeader::ZERO, FinalityBranch::default()),
        }
    }

    pub(crate) fn from_wire(
        finalized_header: BeaconBlockHeader,
        finality_branch: FinalityBranch,
    ) -> Option<FinalityProof> {
        let has_branch = finality_branch.iter().any(|node| *node != B256::ZERO);
        let finalized_header = match (finalized_header.is_zero(), has_branch) {
            (true, false) => return None,
            (true, true) => FinalizedHeader::Genesis,
            (false, _) => FinalizedHeader::Block(finalized_header),
        };
        Some(FinalityProof {
            finalized_header,
            finality_branch,
        })
    }

    /// Check the branch proves the finalized header root under `attested_state_root`.
    pub fn verify(&self, attested_state_root: B256) -> anyhow::Result<()> {
        let finalized_root = match &self.finalized_header {
            FinalizedHeader::Genesis => B256::ZERO,
            FinalizedHeader::Block(header) => header.tree_hash_root(),
        };
        ensure!(
            proof::is_valid_branch(
                finalized_root,
                &self.finality_branch,
                StateField::FinalizedRoot,
                attested_state_root,
            ),
            "Invalid finality branch"
        );
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct LightClientUpdate {
    /// Header attested to by the sync committee
    pub attested_header: BeaconBlockHeader,
    /// Next sync committee corresponding to `attested_header.state_root`. Absent when the
    /// signature slot falls in a later period than the attested header.
    pub next_sync_committee: Option<NextSyncCommitteeProof>,
    /// Finalized header corresponding to `attested_header.state_root`
    pub finality: Option<FinalityProof>,
    /// Sync committee aggregate signature
    pub sync_aggregate: SyncAggregate,
    /// Slot at which the aggregate signature was created (untrusted)
    pub signature_slot: u64,
}

impl LightClientUpdate {
    /// Build the update justified by `block`.
    ///
    /// `state` is the post state of `block`, `attested_state` the post state of its parent, and
    /// `finalized_block` the block named by `attested_state.finalized_checkpoint`, if known.
    pub fn new(
        state: &BeaconState,
        block: &SignedBeaconBlock,
        attested_state: &BeaconState,
        finalized_block: Option<&SignedBeaconBlock>,
        network_spec: &BeaconNetworkSpec,
    ) -> Result<Self, LightClientError> {
        let attested_epoch = network_spec.compute_epoch_at_slot(attested_state.slot());
        if attested_epoch < network_spec.altair_fork_epoch {
            return Err(LightClientError::AttestedTooOld {
                epoch: attested_epoch,
                altair_fork_epoch: network_spec.altair_fork_epoch,
            });
        }

        let sync_aggregate =
            block
                .sync_aggregate()
                .ok_or(LightClientError::MissingSyncAggregate {
                    fork: block.fork_name(),
                })?;
        let participants = sync_aggregate.num_participants();
        if participants < network_spec.min_sync_committee_participants {
            return Err(LightClientError::InsufficientParticipation {
                participants,
                minimum: network_spec.min_sync_committee_participants,
            });
        }

        if !is_at_block_slot(state) {
            return Err(LightClientError::InconsistentState {
                slot: state.slot(),
                header_slot: state.latest_block_header().slot,
            });
        }
        let header_root = header_from_state(state).tree_hash_root();
        let block_root = block.block_root();
        if header_root != block_root {
            return Err(LightClientError::HeaderBlockMismatch {
                header_root,
                block_root,
            });
        }

        if !is_at_block_slot(attested_state) {
            return Err(LightClientError::InconsistentAttestedState {
                slot: attested_state.slot(),
                header_slot: attested_state.latest_block_header().slot,
            });
        }
        let attested_header = header_from_state(attested_state);
        let attested_header_root = attested_header.tree_hash_root();
        if attested_header_root != block.parent_root() {
            return Err(LightClientError::AttestedNotParent {
                attested_header_root,
                parent_root: block.parent_root(),
            });
        }

        let signature_period = network_spec.compute_sync_committee_period_at_slot(block.slot());
        let attested_period =
            network_spec.compute_sync_committee_period_at_slot(attested_header.slot);

        // `next_sync_committee` is only useful if the message is signed by the current sync
        // committee
        let next_sync_committee = if attested_period == signature_period {
            let next_sync_committee_branch = proof::next_sync_committee_branch(attested_state)?;
            let next_sync_committee = attested_state.next_sync_committee().cloned().ok_or_else(
                || LightClientError::ProofUnavailable {
                    field: StateField::NextSyncCommittee,
                    fork: attested_state.fork_name(),
                    reason: "state has no sync committees".to_string(),
                },
            )?;
            Some(NextSyncCommitteeProof {
                next_sync_committee,
                next_sync_committee_branch,
            })
        } else {
            None
        };

        // Indicate finality whenever possible
        let finality = match finalized_block {
            Some(finalized_block) => {
                let checkpoint_root = attested_state.finalized_checkpoint().root;
                let finalized_header = if finalized_block.slot() != GENESIS_SLOT {
                    let header = finalized_block.header();
                    let finalized_header_root = header.tree_hash_root();
                    if finalized_header_root != checkpoint_root {
                        return Err(LightClientError::FinalizedHeaderMismatch {
                            finalized_header_root,
                            checkpoint_root,
                        });
                    }
                    FinalizedHeader::Block(header)
                } else {
                    if checkpoint_root != B256::ZERO {
                        return Err(LightClientError::FinalizedCheckpointMismatch {
                            checkpoint_root,
                        });
                    }
                    FinalizedHeader::Genesis
                };
                Some(FinalityProof {
                    finalized_header,
                    finality_branch: proof::finality_branch(attested_state)?,
                })
            }
            None => None,
        };

        Ok(LightClientUpdate {
            attested_header,
            next_sync_committee,
            finality,
            sync_aggregate: sync_aggregate.clone(),
            signature_slot: block.slot(),
        })
    }

    /// The finalized header as carried on the wire, the zero header when there is none.
    pub fn finalized_header(&self) -> &BeaconBlockHeader {
        match &self.finality {
            Some(finality) => finality.finalized_header.header(),
            None => &BeaconBlockHeader::ZERO,
        }
    }

    /// Whether the update claims a finalized block other than genesis.
    pub fn is_finalized(&self) -> bool {
        self.finalized_header().state_root != B256::ZERO
    }

    pub fn is_sync_committee_update(&self) -> bool {
        self.next_sync_committee.is_some()
    }

    pub fn is_finality_update(&self) -> bool {
        self.finality.is_some()
    }

    pub fn num_participants(&self) -> u64 {
        self.sync_aggregate.num_participants()
    }

    pub fn signature_period(&self, network_spec: &BeaconNetworkSpec) -> u64 {
        network_spec.compute_sync_committee_period_at_slot(self.signature_slot)
    }

    pub fn attested_period(&self, network_spec: &BeaconNetworkSpec) -> u64 {
        network_spec.compute_sync_committee_period_at_slot(self.attested_header.slot)
    }

    /// Check every branch the update carries against `attested_header.state_root`.
    pub fn verify_branches(&self) -> anyhow::Result<()> {
        let attested_state_root = self.attested_header.state_root;
        if let Some(proof) = &self.next_sync_committee {
            ensure!(
                proof::is_valid_branch(
                    proof.next_sync_committee.tree_hash_root(),
                    &proof.next_sync_committee_branch,
                    StateField::NextSyncCommittee,
                    attested_state_root,
                ),
                "Invalid next sync committee branch"
            );
        }
        if let Some(finality) = &self.finality {
            finality.verify(attested_state_root)?;
        }
        Ok(())
    }
}

/// Wire layout of [`LightClientUpdate`], with zero sentinels in place of absent values.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct LightClientUpdateContainer {
    pub attested_header: BeaconBlockHeader,
    pub next_sync_committee: Arc<SyncCommittee>,
    pub next_sync_committee_branch: SyncCommitteeBranch,
    pub finalized_header: BeaconBlockHeader,
    pub finality_branch: FinalityBranch,
    pub sync_aggregate: SyncAggregate,
    #[serde(with = "serde_utils::quoted_u64")]
    pub signature_slot: u64,
}

impl From<&LightClientUpdate> for LightClientUpdateContainer {
    fn from(update: &LightClientUpdate) -> Self {
        let (next_sync_committee, next_sync_committee_branch) = match &update.next_sync_committee {
            Some(proof) => (
                proof.next_sync_committee.clone(),
                proof.next_sync_committee_branch.clone(),
            ),
            None => (ZERO_SYNC_COMMITTEE.clone(), SyncCommitteeBranch::default()),
        };
        let (finalized_header, finality_branch) = FinalityProof::to_wire(update.finality.as_ref());
        LightClientUpdateContainer {
            attested_header: update.attested_header.clone(),
            next_sync_committee,
            next_sync_committee_branch,
            finalized_header,
            finality_branch,
            sync_aggregate: update.sync_aggregate.clone(),
            signature_slot: update.signature_slot,
        }
    }
}

impl From<LightClientUpdateContainer> for LightClientUpdate {
    fn from(container: LightClientUpdateContainer) -> Self {
        let has_next_sync_committee = !container.next_sync_committee.is_zero()
            || container
                .next_sync_committee_branch
                .iter()
                .any(|node| *node != B256::ZERO);
        let next_sync_committee = has_next_sync_committee.then(|| NextSyncCommitteeProof {
            next_sync_committee: container.next_sync_committee,
            next_sync_committee_branch: container.next_sync_committee_branch,
        });
        LightClientUpdate {
            attested_header: container.attested_header,
            next_sync_committee,
            finality: FinalityProof::from_wire(
                container.finalized_header,
                container.finality_branch,
            ),
            sync_aggregate: container.sync_aggregate,
            signature_slot: container.signature_slot,
        }
    }
}

impl_wire_codec!(LightClientUpdate, LightClientUpdateContainer);
