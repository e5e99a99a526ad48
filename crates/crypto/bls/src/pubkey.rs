use std::str::FromStr;

use alloy_primitives::hex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssz_derive::{Decode, Encode};
use ssz_types::{FixedVector, typenum::U48};
use tree_hash_derive::TreeHash;

use crate::errors::BLSError;

pub const PUBKEY_BYTES_LEN: usize = 48;

/// Compressed G1 point. The all-zero value is never a valid key.
#[derive(Debug, PartialEq, Clone, Encode, Decode, TreeHash, Default, Eq, Hash)]
pub struct PubKey {
    pub inner: FixedVector<u8, U48>,
}

impl Serialize for PubKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(self.to_bytes())))
    }
}

impl<'de> Deserialize<'de> for PubKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let result: String = Deserialize::deserialize(deserializer)?;
        result.parse().map_err(serde::de::Error::custom)
    }
}

impl PubKey {
    pub fn to_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn is_zero(&self) -> bool {
        self.inner.iter().all(|byte| *byte == 0)
    }
}

impl TryFrom<&[u8]> for PubKey {
    type Error = BLSError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(PubKey {
            inner: FixedVector::new(bytes.to_vec()).map_err(|_| BLSError::InvalidByteLength {
                expected: PUBKEY_BYTES_LEN,
                actual: bytes.len(),
            })?,
        })
    }
}

impl FromStr for PubKey {
    type Err = BLSError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clean_str = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(clean_str).map_err(|_| BLSError::InvalidHexString)?;
        PubKey::try_from(bytes.as_slice())
    }
}
