//! MessagePack wire marker constants.
//!
//! The leading byte of every value either is one of the fixed markers below
//! or falls into one of the fix-families where the payload is packed into
//! the spare bits of the marker itself.

pub const NIL: u8 = 0xc0;
/// Reserved by the format; never produced, illegal on decode.
pub const NEVER_USED: u8 = 0xc1;
pub const FALSE: u8 = 0xc2;
pub const TRUE: u8 = 0xc3;
pub const BIN8: u8 = 0xc4;
pub const BIN16: u8 = 0xc5;
pub const BIN32: u8 = 0xc6;
pub const EXT8: u8 = 0xc7;
pub const EXT16: u8 = 0xc8;
pub const EXT32: u8 = 0xc9;
pub const FLOAT32: u8 = 0xca;
pub const FLOAT64: u8 = 0xcb;
pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;
pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;
pub const FIXEXT1: u8 = 0xd4;
pub const FIXEXT2: u8 = 0xd5;
pub const FIXEXT4: u8 = 0xd6;
pub const FIXEXT8: u8 = 0xd7;
pub const FIXEXT16: u8 = 0xd8;
pub const STR8: u8 = 0xd9;
pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;
pub const ARRAY16: u8 = 0xdc;
pub const ARRAY32: u8 = 0xdd;
pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;

/// Fixmap marker base; size goes in the low nibble.
pub const FIXMAP_PREFIX: u8 = 0x80;
/// Fixarray marker base; size goes in the low nibble.
pub const FIXARRAY_PREFIX: u8 = 0x90;
/// Fixstr marker base; length goes in the low 5 bits.
pub const FIXSTR_PREFIX: u8 = 0xa0;

/// Positive fixint: `0x00..=0x7f`, value is the byte itself.
#[inline]
pub fn is_positive_fixint(byte: u8) -> bool {
    byte <= 0x7f
}

/// Negative fixint: `0xe0..=0xff`, value is `byte - 256`.
#[inline]
pub fn is_negative_fixint(byte: u8) -> bool {
    byte >= 0xe0
}

/// Fixmap: `0x80..=0x8f`, size in the low nibble.
#[inline]
pub fn is_fixmap(byte: u8) -> bool {
    byte & 0xf0 == 0x80
}

/// Fixarray: `0x90..=0x9f`, size in the low nibble.
#[inline]
pub fn is_fixarray(byte: u8) -> bool {
    byte & 0xf0 == 0x90
}

/// Fixstr: `0xa0..=0xbf`, length in the low 5 bits.
#[inline]
pub fn is_fixstr(byte: u8) -> bool {
    byte & 0xe0 == 0xa0
}
