use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{FixedVector, serde_utils::hex_fixed_vec, typenum::U48};
use tree_hash_derive::TreeHash;

#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(transparent)]
pub struct KZGCommitment {
    #[serde(with = "hex_fixed_vec")]
    pub inner: FixedVector<u8, U48>,
}
