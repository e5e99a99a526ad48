use lantern_bls::PubKey;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{FixedVector, typenum::U512};
use tree_hash_derive::TreeHash;

/// Committee membership for one sync committee period.
///
/// The default value, with every key zeroed, is the "no committee" sentinel used on the wire.
#[derive(
    Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct SyncCommittee {
    pub pubkeys: FixedVector<PubKey, U512>,
    pub aggregate_pubkey: PubKey,
}

impl SyncCommittee {
    pub fn is_zero(&self) -> bool {
        self.aggregate_pubkey.is_zero() && self.pubkeys.iter().all(PubKey::is_zero)
    }
}

#[cfg(test)]
mod tests {
    use ssz::Encode;

    use super::*;

    #[test]
    fn test_zero_committee() {
        let committee = SyncCommittee::default();
        assert!(committee.is_zero());
        assert_eq!(committee.pubkeys.len(), 512);
        assert_eq!(committee.as_ssz_bytes(), vec![0u8; 513 * 48]);

        let mut pubkeys = committee.pubkeys.to_vec();
        pubkeys[511] = PubKey::try_from([1u8; 48].as_slice()).unwrap();
        let committee = SyncCommittee {
            pubkeys: FixedVector::new(pubkeys).unwrap(),
            aggregate_pubkey: PubKey::default(),
        };
        assert!(!committee.is_zero());
    }
}
