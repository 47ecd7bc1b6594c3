//! One-shot convenience entry points.

use crate::decoder::MsgPackDecoder;
use crate::encoder::MsgPackEncoder;
use crate::error::{DecodeError, EncodeError};
use crate::value::Value;

/// Options for [`pack`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PackOptions {
    pub compatibility_mode: bool,
}

/// Options for [`unpack`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnpackOptions {
    pub symbolize_keys: bool,
    pub allow_unknown_ext: bool,
}

/// Encodes a single value to a fresh byte vector.
pub fn pack(value: &Value, options: &PackOptions) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = MsgPackEncoder::new();
    encoder.compatibility_mode = options.compatibility_mode;
    encoder.encode(value)
}

/// Decodes a single value from the front of `data`. Trailing bytes are
/// ignored.
pub fn unpack(data: &[u8], options: &UnpackOptions) -> Result<Value, DecodeError> {
    let mut decoder = MsgPackDecoder::new(data);
    decoder.symbolize_keys = options.symbolize_keys;
    decoder.allow_unknown_ext = options.allow_unknown_ext;
    decoder.read_any()
}
