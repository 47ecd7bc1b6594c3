//! Standard timestamp extension (reserved type id -1).
//!
//! Three wire layouts, chosen by range: 4 bytes (unsigned 32-bit seconds),
//! 8 bytes (30-bit nanoseconds packed above 34-bit seconds), 12 bytes
//! (32-bit nanoseconds then signed 64-bit seconds).

use std::any::Any;
use std::sync::Arc;

use crate::error::{DecodeError, EncodeError};
use crate::extension::{Category, CustomValue};
use crate::registry::ExtensionRegistry;
use crate::value::Value;

pub const TIMESTAMP_TYPE_ID: i8 = -1;
pub const TIMESTAMP_CATEGORY: Category = Category("msgpack.timestamp");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub sec: i64,
    pub nsec: u32,
}

impl Timestamp {
    pub fn new(sec: i64, nsec: u32) -> Self {
        Timestamp { sec, nsec }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        if self.sec >> 34 == 0 {
            let packed = ((self.nsec as u64) << 34) | self.sec as u64;
            if packed & 0xffff_ffff_0000_0000 == 0 {
                (packed as u32).to_be_bytes().to_vec()
            } else {
                packed.to_be_bytes().to_vec()
            }
        } else {
            let mut out = Vec::with_capacity(12);
            out.extend_from_slice(&self.nsec.to_be_bytes());
            out.extend_from_slice(&self.sec.to_be_bytes());
            out
        }
    }

    pub fn from_bytes(payload: &[u8]) -> Result<Self, DecodeError> {
        match payload.len() {
            4 => {
                let sec = u32::from_be_bytes(payload.try_into().unwrap());
                Ok(Timestamp::new(sec as i64, 0))
            }
            8 => {
                let packed = u64::from_be_bytes(payload.try_into().unwrap());
                Ok(Timestamp::new(
                    (packed & 0x3_ffff_ffff) as i64,
                    (packed >> 34) as u32,
                ))
            }
            12 => {
                let nsec = u32::from_be_bytes(payload[..4].try_into().unwrap());
                let sec = i64::from_be_bytes(payload[4..].try_into().unwrap());
                Ok(Timestamp::new(sec, nsec))
            }
            _ => Err(DecodeError::IllegalByte(0)),
        }
    }
}

impl CustomValue for Timestamp {
    fn category(&self) -> Category {
        TIMESTAMP_CATEGORY
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Wires the timestamp hooks into `registry` under type id -1. Decoded
/// timestamps surface as `Value::Custom`.
pub fn register(registry: &mut ExtensionRegistry) {
    registry.register_pack(
        TIMESTAMP_CATEGORY,
        TIMESTAMP_TYPE_ID,
        Arc::new(|custom| {
            custom
                .as_any()
                .downcast_ref::<Timestamp>()
                .map(Timestamp::to_bytes)
                .ok_or_else(|| {
                    EncodeError::UnencodableValue(TIMESTAMP_CATEGORY.0.to_owned())
                })
        }),
    );
    registry.register_unpack(
        TIMESTAMP_TYPE_ID,
        TIMESTAMP_CATEGORY,
        Arc::new(|payload| {
            Ok(Value::Custom(Arc::new(Timestamp::from_bytes(payload)?)))
        }),
    );
}
