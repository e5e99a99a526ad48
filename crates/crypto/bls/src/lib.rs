//! Opaque BLS12-381 byte containers.
//!
//! Keys and signatures are carried as compressed bytes only. Nothing in this workspace performs
//! pairing checks, so there is no curve backend here.

pub mod errors;
pub mod pubkey;
pub mod signature;

pub use errors::BLSError;
pub use pubkey::PubKey;
pub use signature::BlsSignature;
