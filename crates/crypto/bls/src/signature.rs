use std::str::FromStr;

use alloy_primitives::hex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssz_derive::{Decode, Encode};
use ssz_types::{FixedVector, typenum::U96};
use tree_hash_derive::TreeHash;

use crate::errors::BLSError;

pub const SIGNATURE_BYTES_LEN: usize = 96;

/// Compressed G2 point.
#[derive(Debug, PartialEq, Clone, Encode, Decode, TreeHash, Default, Eq, Hash)]
pub struct BlsSignature {
    pub inner: FixedVector<u8, U96>,
}

impl Serialize for BlsSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(self.to_bytes())))
    }
}

impl<'de> Deserialize<'de> for BlsSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let result: String = Deserialize::deserialize(deserializer)?;
        result.parse().map_err(serde::de::Error::custom)
    }
}

impl BlsSignature {
    /// The point at infinity, used for empty sync aggregates.
    pub fn infinity() -> Self {
        let mut bytes = vec![0u8; SIGNATURE_BYTES_LEN];
        bytes[0] = 0xc0;
        Self {
            inner: FixedVector::from(bytes),
        }
    }

    pub fn to_bytes(&self) -> &[u8] {
        &self.inner
    }
}

impl FromStr for BlsSignature {
    type Err = BLSError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clean_str = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(clean_str).map_err(|_| BLSError::InvalidHexString)?;
        let actual = bytes.len();
        Ok(BlsSignature {
            inner: FixedVector::new(bytes).map_err(|_| BLSError::InvalidByteLength {
                expected: SIGNATURE_BYTES_LEN,
                actual,
            })?,
        })
    }
}

#[cfg(test)]
mod tests {
    use ssz::Encode;

    use super::*;

    #[test]
    fn test_infinity() {
        let signature = BlsSignature::infinity();
        let bytes = signature.as_ssz_bytes();
        assert_eq!(bytes.len(), SIGNATURE_BYTES_LEN);
        assert_eq!(bytes[0], 0xc0);
        assert!(bytes[1..].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn test_serde_round_trip() {
        let signature = BlsSignature::infinity();
        let json = serde_json::to_string(&signature).unwrap();
        assert!(json.starts_with("\"0xc000"));
        assert_eq!(
            serde_json::from_str::<BlsSignature>(&json).unwrap(),
            signature
        );
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            BlsSignature::from_str("0x00"),
            Err(BLSError::InvalidByteLength {
                expected: 96,
                actual: 1
            })
        );
    }
}
