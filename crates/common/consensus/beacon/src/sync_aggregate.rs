use lantern_bls::BlsSignature;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{BitVector, typenum::U512};
use tree_hash_derive::TreeHash;

#[derive(
    Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct SyncAggregate {
    pub sync_committee_bits: BitVector<U512>,
    pub sync_committee_signature: BlsSignature,
}

impl SyncAggregate {
    /// Number of committee members that took part in the aggregate signature.
    pub fn num_participants(&self) -> u64 {
        self.sync_committee_bits.num_set_bits() as u64
    }
}
