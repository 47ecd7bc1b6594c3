//! MessagePack encoder. Writes values into a growable [`Writer`] using the
//! smallest wire representation each value admits.

use mpack_buffers::Writer;

use crate::constants::*;
use crate::error::EncodeError;
use crate::registry::ExtensionRegistry;
use crate::value::Value;

/// Maximum nesting depth accepted before encoding aborts.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// A reusable MessagePack encoder.
///
/// In compatibility mode the `str8` and `bin` families are suppressed: all
/// string and binary payloads are emitted through the legacy raw family
/// (`fixraw`, `raw16`, `raw32`) so that pre-2013 decoders can read the
/// output.
pub struct MsgPackEncoder {
    pub writer: Writer,
    pub registry: ExtensionRegistry,
    pub compatibility_mode: bool,
    pub max_depth: usize,
}

impl MsgPackEncoder {
    pub fn new() -> Self {
        Self::with_registry(ExtensionRegistry::new())
    }

    pub fn with_registry(registry: ExtensionRegistry) -> Self {
        MsgPackEncoder {
            writer: Writer::new(),
            registry,
            compatibility_mode: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Encodes a single value and returns the encoded bytes.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.writer.reset();
        self.write_any(value, 0)?;
        Ok(self.writer.flush())
    }

    pub fn write_any(&mut self, value: &Value, depth: usize) -> Result<(), EncodeError> {
        if depth > self.max_depth {
            return Err(EncodeError::DepthLimitExceeded(self.max_depth));
        }
        match value {
            Value::Nil => Ok(self.write_nil()),
            Value::Bool(b) => Ok(self.write_bool(*b)),
            Value::Int(i) => Ok(self.write_int(*i)),
            Value::UInt(u) => Ok(self.write_uint(*u)),
            Value::BigInt(i) => self.write_big_int(*i),
            Value::Float(f) => Ok(self.write_float(*f)),
            Value::Str(s) | Value::Sym(s) => self.write_str(s),
            Value::Bin(b) => self.write_bin(b),
            Value::Array(items) => self.write_array(items, depth),
            Value::Map(pairs) => self.write_map(pairs, depth),
            Value::Ext(ext) => Ok(self.write_ext(ext.type_id, &ext.payload)),
            Value::Custom(custom) => self.write_custom(custom.as_ref()),
            Value::Prepacked(bytes) => Ok(self.writer.buf(bytes)),
        }
    }

    pub fn write_nil(&mut self) {
        self.writer.u8(NIL);
    }

    pub fn write_bool(&mut self, b: bool) {
        self.writer.u8(if b { TRUE } else { FALSE });
    }

    /// Writes a non-negative integer known to fit in 32 bits.
    fn u32_int(&mut self, u: u32) {
        if u <= 0x7f {
            self.writer.u8(u as u8);
        } else if u <= 0xff {
            self.writer.u16((UINT8 as u16) << 8 | u as u16);
        } else if u <= 0xffff {
            self.writer.u8u16(UINT16, u as u16);
        } else {
            self.writer.u8u32(UINT32, u);
        }
    }

    /// Writes a negative integer known to fit in 32 bits.
    fn n32_int(&mut self, i: i32) {
        if i >= -0x20 {
            self.writer.u8(i as u8);
        } else if i >= -0x80 {
            self.writer.u16((INT8 as u16) << 8 | (i as u8) as u16);
        } else if i >= -0x8000 {
            self.writer.u8u16(INT16, i as u16);
        } else {
            self.writer.u8u32(INT32, i as u32);
        }
    }

    pub fn write_int(&mut self, i: i64) {
        if i >= 0 {
            self.write_uint(i as u64);
        } else if i >= -0x8000_0000 {
            self.n32_int(i as i32);
        } else {
            self.writer.u8u64(INT64, i as u64);
        }
    }

    pub fn write_uint(&mut self, u: u64) {
        if u <= u32::MAX as u64 {
            self.u32_int(u as u32);
        } else {
            self.writer.u8u64(UINT64, u);
        }
    }

    pub fn write_big_int(&mut self, i: i128) -> Result<(), EncodeError> {
        if i >= 0 {
            let u = u64::try_from(i).map_err(|_| EncodeError::IntegerOutOfRange(i))?;
            self.write_uint(u);
        } else {
            let n = i64::try_from(i).map_err(|_| EncodeError::IntegerOutOfRange(i))?;
            self.write_int(n);
        }
        Ok(())
    }

    pub fn write_float(&mut self, f: f64) {
        self.writer.u8f64(FLOAT64, f);
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), EncodeError> {
        let len = u32::try_from(s.len()).map_err(|_| EncodeError::PayloadTooLarge(s.len()))?;
        self.write_str_header(len);
        self.writer.utf8(s);
        Ok(())
    }

    pub fn write_str_header(&mut self, len: u32) {
        if self.compatibility_mode {
            self.write_raw_header(len);
            return;
        }
        if len <= 0x1f {
            self.writer.u8(FIXSTR_PREFIX | len as u8);
        } else if len <= 0xff {
            self.writer.u16((STR8 as u16) << 8 | len as u16);
        } else if len <= 0xffff {
            self.writer.u8u16(STR16, len as u16);
        } else {
            self.writer.u8u32(STR32, len);
        }
    }

    /// Legacy raw family header. `str8` does not exist here so lengths in
    /// 32..=0xffff all go through `raw16`.
    fn write_raw_header(&mut self, len: u32) {
        if len < 32 {
            self.writer.u8(FIXSTR_PREFIX | len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(STR16, len as u16);
        } else {
            self.writer.u8u32(STR32, len);
        }
    }

    pub fn write_bin(&mut self, b: &[u8]) -> Result<(), EncodeError> {
        let len = u32::try_from(b.len()).map_err(|_| EncodeError::PayloadTooLarge(b.len()))?;
        self.write_bin_header(len);
        self.writer.buf(b);
        Ok(())
    }

    pub fn write_bin_header(&mut self, len: u32) {
        if self.compatibility_mode {
            self.write_raw_header(len);
        } else if len <= 0xff {
            self.writer.u16((BIN8 as u16) << 8 | len as u16);
        } else if len <= 0xffff {
            self.writer.u8u16(BIN16, len as u16);
        } else {
            self.writer.u8u32(BIN32, len);
        }
    }

    fn write_array(&mut self, items: &[Value], depth: usize) -> Result<(), EncodeError> {
        self.write_array_header(items.len() as u32);
        for item in items {
            self.write_any(item, depth + 1)?;
        }
        Ok(())
    }

    pub fn write_array_header(&mut self, len: u32) {
        if len <= 0xf {
            self.writer.u8(FIXARRAY_PREFIX | len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(ARRAY16, len as u16);
        } else {
            self.writer.u8u32(ARRAY32, len);
        }
    }

    fn write_map(&mut self, pairs: &[(Value, Value)], depth: usize) -> Result<(), EncodeError> {
        self.write_map_header(pairs.len() as u32);
        for (k, v) in pairs {
            self.write_any(k, depth + 1)?;
            self.write_any(v, depth + 1)?;
        }
        Ok(())
    }

    pub fn write_map_header(&mut self, len: u32) {
        if len <= 0xf {
            self.writer.u8(FIXMAP_PREFIX | len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(MAP16, len as u16);
        } else {
            self.writer.u8u32(MAP32, len);
        }
    }

    pub fn write_ext(&mut self, type_id: i8, payload: &[u8]) {
        self.write_ext_header(type_id, payload.len() as u32);
        self.writer.buf(payload);
    }

    pub fn write_ext_header(&mut self, type_id: i8, len: u32) {
        let id = type_id as u8 as u16;
        match len {
            1 => self.writer.u16((FIXEXT1 as u16) << 8 | id),
            2 => self.writer.u16((FIXEXT2 as u16) << 8 | id),
            4 => self.writer.u16((FIXEXT4 as u16) << 8 | id),
            8 => self.writer.u16((FIXEXT8 as u16) << 8 | id),
            16 => self.writer.u16((FIXEXT16 as u16) << 8 | id),
            _ => {
                if len <= 0xff {
                    self.writer.u16((EXT8 as u16) << 8 | len as u16);
                } else if len <= 0xffff {
                    self.writer.u8u16(EXT16, len as u16);
                } else {
                    self.writer.u8u32(EXT32, len);
                }
                self.writer.u8(type_id as u8);
            }
        }
    }

    /// Serializes a custom value through the registry, falling back to the
    /// value's own pre-encoded representation if no entry matches.
    fn write_custom(&mut self, custom: &dyn crate::CustomValue) -> Result<(), EncodeError> {
        let category = custom.category();
        let hit = self
            .registry
            .lookup_pack(category, custom.ancestors())
            .map(|entry| (entry.type_id, entry.hook.clone()));
        if let Some((type_id, hook)) = hit {
            let payload = hook(custom)?;
            self.write_ext(type_id, &payload);
            return Ok(());
        }
        if let Some(bytes) = custom.to_msgpack() {
            self.writer.buf(&bytes);
            return Ok(());
        }
        Err(EncodeError::UnencodableValue(category.0.to_owned()))
    }
}

impl Default for MsgPackEncoder {
    fn default() -> Self {
        Self::new()
    }
}
