use std::fmt::{self, Display, Formatter};

use alloy_primitives::B256;
use lantern_consensus_beacon::beacon_state::BeaconState;
use lantern_consensus_misc::constants::{
    CURRENT_SYNC_COMMITTEE_GINDEX, CURRENT_SYNC_COMMITTEE_INDEX, FINALIZED_CHECKPOINT_INDEX,
    FINALIZED_ROOT_GINDEX, NEXT_SYNC_COMMITTEE_GINDEX, NEXT_SYNC_COMMITTEE_INDEX,
};
use lantern_merkle::{
    index::{GeneralizedIndex, floorlog2, get_subtree_index},
    is_valid_merkle_branch,
};
use ssz_types::{
    FixedVector,
    typenum::{U5, U6},
};
use tree_hash::TreeHash;

use crate::errors::LightClientError;

pub type SyncCommitteeBranch = FixedVector<B256, U5>;
pub type FinalityBranch = FixedVector<B256, U6>;

/// State fields a light client can be given a proof for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
    CurrentSyncCommittee,
    NextSyncCommittee,
    FinalizedRoot,
}

impl StateField {
    /// Index of the containing top-level field of the state.
    pub fn field_index(&self) -> u64 {
        match self {
            StateField::CurrentSyncCommittee => CURRENT_SYNC_COMMITTEE_INDEX,
            StateField::NextSyncCommittee => NEXT_SYNC_COMMITTEE_INDEX,
            StateField::FinalizedRoot => FINALIZED_CHECKPOINT_INDEX,
        }
    }

    pub fn generalized_index(&self) -> GeneralizedIndex {
        match self {
            StateField::CurrentSyncCommittee => CURRENT_SYNC_COMMITTEE_GINDEX,
            StateField::NextSyncCommittee => NEXT_SYNC_COMMITTEE_GINDEX,
            StateField::FinalizedRoot => FINALIZED_ROOT_GINDEX,
        }
    }

    /// Number of sibling hashes in a branch for this field.
    pub fn depth(&self) -> u64 {
        floorlog2(self.generalized_index())
    }

    pub fn subtree_index(&self) -> u64 {
        get_subtree_index(self.generalized_index())
    }

    fn is_sync_committee(&self) -> bool {
        matches!(
            self,
            StateField::CurrentSyncCommittee | StateField::NextSyncCommittee
        )
    }
}

impl Display for StateField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StateField::CurrentSyncCommittee => write!(f, "current_sync_committee"),
            StateField::NextSyncCommittee => write!(f, "next_sync_committee"),
            StateField::FinalizedRoot => write!(f, "finalized_checkpoint.root"),
        }
    }
}

/// Merkle branch from `field` up to the state root, `field.depth()` hashes long.
pub fn branch(state: &BeaconState, field: StateField) -> Result<Vec<B256>, LightClientError> {
    let unavailable = |reason: String| LightClientError::ProofUnavailable {
        field,
        fork: state.fork_name(),
        reason,
    };

    if field.is_sync_committee() && !state.fork_name().supports_light_client() {
        return Err(unavailable("state has no sync committees".to_string()));
    }

    let field_proof = state
        .field_proof(field.field_index())
        .map_err(|err| unavailable(format!("{err:#}")))?;

    Ok(match field {
        StateField::CurrentSyncCommittee | StateField::NextSyncCommittee => field_proof,
        // `root` is the second field of the checkpoint, so its sibling is the epoch
        StateField::FinalizedRoot => {
            let mut branch = Vec::with_capacity(field_proof.len() + 1);
            branch.push(state.finalized_checkpoint().epoch.tree_hash_root());
            branch.extend(field_proof);
            branch
        }
    })
}

pub fn current_sync_committee_branch(
    state: &BeaconState,
) -> Result<SyncCommitteeBranch, LightClientError> {
    fixed_branch(state, StateField::CurrentSyncCommittee)
}

pub fn next_sync_committee_branch(
    state: &BeaconState,
) -> Result<SyncCommitteeBranch, LightClientError> {
    fixed_branch(state, StateField::NextSyncCommittee)
}

pub fn finality_branch(state: &BeaconState) -> Result<FinalityBranch, LightClientError> {
    fixed_branch(state, StateField::FinalizedRoot)
}

fn fixed_branch<N: ssz_types::typenum::Unsigned>(
    state: &BeaconState,
    field: StateField,
) -> Result<FixedVector<B256, N>, LightClientError> {
    FixedVector::new(branch(state, field)?).map_err(|err| LightClientError::ProofUnavailable {
        field,
        fork: state.fork_name(),
        reason: format!("unexpected branch length: {err:?}"),
    })
}

/// Check `branch` proves `leaf` at `field` under `root`.
pub fn is_valid_branch(leaf: B256, branch: &[B256], field: StateField, root: B256) -> bool {
    is_valid_merkle_branch(leaf, branch, field.depth(), field.subtree_index(), root)
}
