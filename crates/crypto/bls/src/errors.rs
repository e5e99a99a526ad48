use thiserror::Error;

#[derive(Error, PartialEq, Eq, Debug)]
pub enum BLSError {
    #[error("invalid hex string")]
    InvalidHexString,
    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidByteLength { expected: usize, actual: usize },
}
