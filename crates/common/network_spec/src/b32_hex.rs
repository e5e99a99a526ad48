//! Serde for 4-byte fork versions written as `0x`-prefixed hex in config files.

use alloy_primitives::aliases::B32;
use serde::{Deserializer, Serializer};
use serde_utils::hex::{self, PrefixedHexVisitor};

pub fn serialize<S>(version: &B32, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(version))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<B32, D::Error>
where
    D: Deserializer<'de>,
{
    let bytes = deserializer.deserialize_str(PrefixedHexVisitor)?;
    B32::try_from(bytes.as_slice()).map_err(|_| {
        serde::de::Error::custom(format!(
            "fork version must be 4 bytes, got {}",
            bytes.len()
        ))
    })
}
