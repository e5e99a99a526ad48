use alloy_primitives::B256;

/// Parent node of `left` and `right`: `sha256(left ++ right)`.
pub(crate) fn hash_concat(left: &[u8], right: &[u8]) -> B256 {
    ethereum_hashing::hash32_concat(left, right).into()
}
