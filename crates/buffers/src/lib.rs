//! Binary buffer utilities for mpack.
//!
//! This crate provides the byte-level plumbing shared by the MessagePack
//! encoder and decoder:
//!
//! - [`Writer`] - Writes binary data to an auto-growing buffer
//! - [`StreamingReader`] - Accumulates fed chunks for incremental decoding
//!
//! # Example
//!
//! ```
//! use mpack_buffers::Writer;
//!
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.u16(0x0203);
//! writer.utf8("hello");
//! let data = writer.flush();
//! assert_eq!(&data[..3], &[0x01, 0x02, 0x03]);
//! assert_eq!(&data[3..], b"hello");
//! ```

mod streaming_reader;
mod writer;

pub use streaming_reader::StreamingReader;
pub use writer::Writer;
