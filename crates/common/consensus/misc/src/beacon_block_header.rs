use alloy_primitives::B256;
use lantern_bls::BlsSignature;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct SignedBeaconBlockHeader {
    pub message: BeaconBlockHeader,
    pub signature: BlsSignature,
}

#[derive(
    Debug, Default, PartialEq, Eq, Hash, Clone, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct BeaconBlockHeader {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub proposer_index: u64,
    pub parent_root: B256,
    pub state_root: B256,
    pub body_root: B256,
}

impl BeaconBlockHeader {
    /// Header with every field zeroed. Stands for "no header" on the wire.
    pub const ZERO: BeaconBlockHeader = BeaconBlockHeader {
        slot: 0,
        proposer_index: 0,
        parent_root: B256::ZERO,
        state_root: B256::ZERO,
        body_root: B256::ZERO,
    };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use ssz::Encode;
    use tree_hash::TreeHash;

    use super::*;

    #[test]
    fn test_zero_header() {
        assert_eq!(BeaconBlockHeader::default(), BeaconBlockHeader::ZERO);
        assert!(BeaconBlockHeader::ZERO.is_zero());
        assert_eq!(BeaconBlockHeader::ZERO.as_ssz_bytes(), vec![0u8; 112]);
        assert_ne!(BeaconBlockHeader::ZERO.tree_hash_root(), B256::ZERO);
    }

    #[test]
    fn test_serde_quoted_integers() {
        let header = BeaconBlockHeader {
            slot: 12,
            proposer_index: 3,
            ..Default::default()
        };
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["slot"], "12");
        assert_eq!(json["proposer_index"], "3");
        assert_eq!(
            serde_json::from_value::<BeaconBlockHeader>(json).unwrap(),
            header
        );
    }
}
