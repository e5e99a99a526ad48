/// Implement SSZ, tree hashing and serde for a domain type by converting through its flat wire
/// container.
///
/// The domain type must implement `From<$container>` and `From<&Self>` must exist for the
/// container.
macro_rules! impl_wire_codec {
    ($domain:ty, $container:ty) => {
        impl ssz::Encode for $domain {
            fn is_ssz_fixed_len() -> bool {
                <$container as ssz::Encode>::is_ssz_fixed_len()
            }

            fn ssz_fixed_len() -> usize {
                <$container as ssz::Encode>::ssz_fixed_len()
            }

            fn ssz_bytes_len(&self) -> usize {
                ssz::Encode::ssz_bytes_len(&<$container>::from(self))
            }

            fn ssz_append(&self, buf: &mut Vec<u8>) {
                ssz::Encode::ssz_append(&<$container>::from(self), buf)
            }
        }

        impl ssz::Decode for $domain {
            fn is_ssz_fixed_len() -> bool {
                <$container as ssz::Decode>::is_ssz_fixed_len()
            }

            fn ssz_fixed_len() -> usize {
                <$container as ssz::Decode>::ssz_fixed_len()
            }

            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ssz::DecodeError> {
                <$container as ssz::Decode>::from_ssz_bytes(bytes).map(Self::from)
            }
        }

        impl tree_hash::TreeHash for $domain {
            fn tree_hash_type() -> tree_hash::TreeHashType {
                <$container as tree_hash::TreeHash>::tree_hash_type()
            }

            fn tree_hash_packed_encoding(&self) -> tree_hash::PackedEncoding {
                tree_hash::TreeHash::tree_hash_packed_encoding(&<$container>::from(self))
            }

            fn tree_hash_packing_factor() -> usize {
                <$container as tree_hash::TreeHash>::tree_hash_packing_factor()
            }

            fn tree_hash_root(&self) -> tree_hash::Hash256 {
                tree_hash::TreeHash::tree_hash_root(&<$container>::from(self))
            }
        }

        impl serde::Serialize for $domain {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serde::Serialize::serialize(&<$container>::from(self), serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $domain {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                <$container as serde::Deserialize>::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

pub(crate) use impl_wire_codec;
