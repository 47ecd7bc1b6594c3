//! MessagePack codec: a compact binary object-serialization format with
//! first-class application extension types and streaming sessions.
//!
//! The quick path is the one-shot [`pack`] / [`unpack`] pair:
//!
//! ```
//! use mpack::{pack, unpack, PackOptions, UnpackOptions, Value};
//!
//! let value = Value::Array(vec![Value::Int(1), Value::Str("two".into())]);
//! let bytes = pack(&value, &PackOptions::default()).unwrap();
//! assert_eq!(unpack(&bytes, &UnpackOptions::default()).unwrap(), value);
//! ```
//!
//! For incremental work use [`Packer`] and [`Unpacker`] sessions, and
//! [`Factory`] to share extension-type registrations across sessions.

pub mod constants;
mod decoder;
mod encoder;
mod error;
mod extension;
mod factory;
mod packer;
mod registry;
pub mod timestamp;
mod unpacker;
mod util;
mod value;

pub use decoder::MsgPackDecoder;
pub use encoder::{MsgPackEncoder, DEFAULT_MAX_DEPTH};
pub use error::{DecodeError, EncodeError};
pub use extension::{Category, CustomValue, ExtensionValue};
pub use factory::Factory;
pub use packer::Packer;
pub use registry::{
    ExtensionRegistry, PackEntry, PackHook, RegisteredType, UnpackEntry, UnpackHook,
};
pub use timestamp::Timestamp;
pub use unpacker::Unpacker;
pub use util::{pack, unpack, PackOptions, UnpackOptions};
pub use value::Value;
