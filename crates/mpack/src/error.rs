//! Encoder and decoder error types.

use thiserror::Error;

/// Errors raised while decoding MessagePack bytes.
///
/// [`DecodeError::Underflow`] is the only recoverable variant: the caller may
/// feed more bytes and retry from the rolled-back position. Everything else
/// indicates data that more bytes cannot repair.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("insufficient bytes for the value being parsed")]
    Underflow,
    #[error("illegal byte sequence at offset {0}")]
    IllegalByte(usize),
    #[error("invalid UTF-8 in string payload")]
    InvalidUtf8,
    #[error("unknown extension type {0}")]
    UnknownExtType(i8),
    #[error("nesting depth limit {0} exceeded")]
    DepthLimitExceeded(usize),
}

/// Errors raised while encoding a value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    #[error("integer {0} does not fit in a 64-bit MessagePack integer")]
    IntegerOutOfRange(i128),
    #[error("no encoding rule for value of category `{0}`")]
    UnencodableValue(String),
    #[error("payload of {0} bytes exceeds the 32-bit wire length limit")]
    PayloadTooLarge(usize),
    #[error("map size changed during encoding")]
    ConcurrentMutation,
    #[error("nesting depth limit {0} exceeded")]
    DepthLimitExceeded(usize),
}
