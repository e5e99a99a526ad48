use std::sync::Arc;

use alloy_primitives::B256;
use anyhow::anyhow;
use lantern_consensus_misc::{
    beacon_block_header::BeaconBlockHeader, checkpoint::Checkpoint,
    constants::BEACON_STATE_MERKLE_DEPTH, fork_name::ForkName,
};
use lantern_merkle::{generate_proof, merkle_tree};
use lantern_network_spec::networks::BeaconNetworkSpec;
use ssz::Decode;
use ssz_derive::Encode;
use tree_hash_derive::TreeHash;

use crate::{
    altair, beacon_block::read_slot, bellatrix, capella, deneb, phase0,
    sync_committee::SyncCommittee,
};

/// Byte range of ``slot`` inside an encoded ``BeaconState``, after ``genesis_time`` and
/// ``genesis_validators_root``.
const STATE_SLOT_RANGE: std::ops::Range<usize> = 40..48;

/// A beacon state of any supported fork.
#[derive(Debug, PartialEq, Eq, Clone, Encode, TreeHash)]
#[ssz(enum_behaviour = "transparent")]
#[tree_hash(enum_behaviour = "transparent")]
pub enum BeaconState {
    Phase0(phase0::beacon_state::BeaconState),
    Altair(altair::beacon_state::BeaconState),
    Bellatrix(bellatrix::beacon_state::BeaconState),
    Capella(capella::beacon_state::BeaconState),
    Deneb(deneb::beacon_state::BeaconState),
}

macro_rules! map_state {
    ($state:expr, $inner:ident => $body:expr) => {
        match $state {
            BeaconState::Phase0($inner) => $body,
            BeaconState::Altair($inner) => $body,
            BeaconState::Bellatrix($inner) => $body,
            BeaconState::Capella($inner) => $body,
            BeaconState::Deneb($inner) => $body,
        }
    };
}

impl BeaconState {
    pub fn fork_name(&self) -> ForkName {
        match self {
            BeaconState::Phase0(_) => ForkName::Phase0,
            BeaconState::Altair(_) => ForkName::Altair,
            BeaconState::Bellatrix(_) => ForkName::Bellatrix,
            BeaconState::Capella(_) => ForkName::Capella,
            BeaconState::Deneb(_) => ForkName::Deneb,
        }
    }

    pub fn slot(&self) -> u64 {
        map_state!(self, state => state.slot)
    }

    pub fn latest_block_header(&self) -> &BeaconBlockHeader {
        map_state!(self, state => &state.latest_block_header)
    }

    pub fn finalized_checkpoint(&self) -> Checkpoint {
        map_state!(self, state => state.finalized_checkpoint)
    }

    /// `None` for Phase0 states, which predate sync committees.
    pub fn current_sync_committee(&self) -> Option<&Arc<SyncCommittee>> {
        match self {
            BeaconState::Phase0(_) => None,
            BeaconState::Altair(state) => Some(&state.current_sync_committee),
            BeaconState::Bellatrix(state) => Some(&state.current_sync_committee),
            BeaconState::Capella(state) => Some(&state.current_sync_committee),
            BeaconState::Deneb(state) => Some(&state.current_sync_committee),
        }
    }

    /// `None` for Phase0 states, which predate sync committees.
    pub fn next_sync_committee(&self) -> Option<&Arc<SyncCommittee>> {
        match self {
            BeaconState::Phase0(_) => None,
            BeaconState::Altair(state) => Some(&state.next_sync_committee),
            BeaconState::Bellatrix(state) => Some(&state.next_sync_committee),
            BeaconState::Capella(state) => Some(&state.next_sync_committee),
            BeaconState::Deneb(state) => Some(&state.next_sync_committee),
        }
    }

    /// Hash tree roots of the state fields in declaration order.
    pub fn merkle_leaves(&self) -> Vec<B256> {
        map_state!(self, state => state.merkle_leaves())
    }

    /// Branch proving the field at `field_index` against the state root.
    pub fn field_proof(&self, field_index: u64) -> anyhow::Result<Vec<B256>> {
        let leaves = self.merkle_leaves();
        anyhow::ensure!(
            field_index < leaves.len() as u64,
            "{} state has no field at index {field_index}",
            self.fork_name()
        );
        let tree = merkle_tree(&leaves, BEACON_STATE_MERKLE_DEPTH)?;
        generate_proof(&tree, field_index, BEACON_STATE_MERKLE_DEPTH)
    }

    /// SSZ decode with explicit fork variant.
    pub fn from_ssz_bytes(bytes: &[u8], fork_name: ForkName) -> Result<Self, ssz::DecodeError> {
        Ok(match fork_name {
            ForkName::Phase0 => {
                Self::Phase0(phase0::beacon_state::BeaconState::from_ssz_bytes(bytes)?)
            }
            ForkName::Altair => {
                Self::Altair(altair::beacon_state::BeaconState::from_ssz_bytes(bytes)?)
            }
            ForkName::Bellatrix => {
                Self::Bellatrix(bellatrix::beacon_state::BeaconState::from_ssz_bytes(bytes)?)
            }
            ForkName::Capella => {
                Self::Capella(capella::beacon_state::BeaconState::from_ssz_bytes(bytes)?)
            }
            ForkName::Deneb => Self::Deneb(deneb::beacon_state::BeaconState::from_ssz_bytes(bytes)?),
        })
    }

    /// SSZ decode, picking the fork from the slot embedded in the encoding.
    pub fn from_ssz_bytes_with_spec(
        bytes: &[u8],
        network_spec: &BeaconNetworkSpec,
    ) -> anyhow::Result<Self> {
        let slot = read_slot(bytes, STATE_SLOT_RANGE)?;
        let fork_name = network_spec.fork_name_at_slot(slot)?;
        Self::from_ssz_bytes(bytes, fork_name)
            .map_err(|err| anyhow!("Failed to decode {fork_name} state at slot {slot}: {err:?}"))
    }
}

impl From<phase0::beacon_state::BeaconState> for BeaconState {
    fn from(state: phase0::beacon_state::BeaconState) -> Self {
        Self::Phase0(state)
    }
}

impl From<altair::beacon_state::BeaconState> for BeaconState {
    fn from(state: altair::beacon_state::BeaconState) -> Self {
        Self::Altair(state)
    }
}

impl From<bellatrix::beacon_state::BeaconState> for BeaconState {
    fn from(state: bellatrix::beacon_state::BeaconState) -> Self {
        Self::Bellatrix(state)
    }
}

impl From<capella::beacon_state::BeaconState> for BeaconState {
    fn from(state: capella::beacon_state::BeaconState) -> Self {
        Self::Capella(state)
    }
}

impl From<deneb::beacon_state::BeaconState> for BeaconState {
    fn from(state: deneb::beacon_state::BeaconState) -> Self {
        Self::Deneb(state)
    }
}

#[cfg(test)]
mod tests {
    use lantern_consensus_misc::constants::{
        CURRENT_SYNC_COMMITTEE_INDEX, FINALIZED_CHECKPOINT_INDEX, NEXT_SYNC_COMMITTEE_INDEX,
    };
    use lantern_merkle::is_valid_merkle_branch;
    use lantern_network_spec::networks::MAINNET;
    use rstest::rstest;
    use ssz::Encode;
    use tree_hash::TreeHash;

    use super::*;

    fn default_state(fork_name: ForkName) -> BeaconState {
        match fork_name {
            ForkName::Phase0 => phase0::beacon_state::BeaconState::default().into(),
            ForkName::Altair => altair::beacon_state::BeaconState::default().into(),
            ForkName::Bellatrix => bellatrix::beacon_state::BeaconState::default().into(),
            ForkName::Capella => capella::beacon_state::BeaconState::default().into(),
            ForkName::Deneb => deneb::beacon_state::BeaconState::default().into(),
        }
    }

    #[rstest]
    fn test_merkle_leaves_match_tree_hash_root(
        #[values(
            ForkName::Phase0,
            ForkName::Altair,
            ForkName::Bellatrix,
            ForkName::Capella,
            ForkName::Deneb
        )]
        fork_name: ForkName,
    ) {
        let state = default_state(fork_name);
        assert_eq!(state.fork_name(), fork_name);

        let tree = merkle_tree(&state.merkle_leaves(), BEACON_STATE_MERKLE_DEPTH).unwrap();
        assert_eq!(tree[1], state.tree_hash_root());
    }

    #[test]
    fn test_field_proofs_verify() {
        let mut state = altair::beacon_state::BeaconState {
            slot: 77,
            ..Default::default()
        };
        state.finalized_checkpoint.root = B256::repeat_byte(3);
        let state = BeaconState::from(state);
        let root = state.tree_hash_root();

        let checkpoint = state.finalized_checkpoint();
        let proof = state.field_proof(FINALIZED_CHECKPOINT_INDEX).unwrap();
        assert!(is_valid_merkle_branch(
            checkpoint.tree_hash_root(),
            &proof,
            BEACON_STATE_MERKLE_DEPTH,
            FINALIZED_CHECKPOINT_INDEX,
            root
        ));

        for (index, committee) in [
            (CURRENT_SYNC_COMMITTEE_INDEX, state.current_sync_committee()),
            (NEXT_SYNC_COMMITTEE_INDEX, state.next_sync_committee()),
        ] {
            let proof = state.field_proof(index).unwrap();
            assert!(is_valid_merkle_branch(
                committee.unwrap().tree_hash_root(),
                &proof,
                BEACON_STATE_MERKLE_DEPTH,
                index,
                root
            ));
        }
    }

    #[rstest]
    #[case::phase0_next_sync_committee(ForkName::Phase0, NEXT_SYNC_COMMITTEE_INDEX)]
    #[case::one_past_deneb_fields(ForkName::Deneb, 28)]
    #[case::wraps_in_32_bits(ForkName::Deneb, (1 << 32) + 1)]
    #[case::max_index(ForkName::Altair, u64::MAX)]
    fn test_field_proof_rejects_missing_field(#[case] fork_name: ForkName, #[case] index: u64) {
        let state = default_state(fork_name);
        let err = state.field_proof(index).unwrap_err();
        assert!(err.to_string().contains("has no field at index"));
    }

    #[test]
    fn test_phase0_has_no_sync_committees() {
        let state = default_state(ForkName::Phase0);
        assert!(state.current_sync_committee().is_none());
        assert!(state.next_sync_committee().is_none());
        assert!(state.field_proof(NEXT_SYNC_COMMITTEE_INDEX).is_err());
    }

    #[test]
    fn test_decode_with_spec() {
        let altair_slot = MAINNET.compute_start_slot_at_epoch(MAINNET.altair_fork_epoch);
        let state = BeaconState::from(altair::beacon_state::BeaconState {
            slot: altair_slot,
            genesis_time: 1606824023,
            ..Default::default()
        });

        let decoded =
            BeaconState::from_ssz_bytes_with_spec(&state.as_ssz_bytes(), &MAINNET).unwrap();
        assert_eq!(decoded.fork_name(), ForkName::Altair);
        assert_eq!(decoded, state);
    }
}
