//! Streaming serialization session.
//!
//! A [`Packer`] accumulates encoded values in its internal buffer until the
//! caller takes them with [`Packer::flush`]. It owns an isolated registry
//! copy, so type registrations made through one session never leak into
//! another.

use crate::encoder::MsgPackEncoder;
use crate::error::EncodeError;
use crate::registry::{ExtensionRegistry, PackHook};
use crate::extension::Category;
use crate::value::Value;

pub struct Packer {
    encoder: MsgPackEncoder,
}

impl Packer {
    pub fn new() -> Self {
        Self::with_registry(&ExtensionRegistry::new())
    }

    /// Session seeded with an isolated copy of `registry`.
    pub fn with_registry(registry: &ExtensionRegistry) -> Self {
        Packer {
            encoder: MsgPackEncoder::with_registry(registry.dup()),
        }
    }

    pub fn compatibility_mode(&self) -> bool {
        self.encoder.compatibility_mode
    }

    pub fn set_compatibility_mode(&mut self, on: bool) {
        self.encoder.compatibility_mode = on;
    }

    pub fn register_type(&mut self, type_id: i8, category: Category, hook: PackHook) {
        self.encoder.registry.register_pack(category, type_id, hook);
    }

    /// Appends one encoded value to the session buffer.
    pub fn write(&mut self, value: &Value) -> Result<(), EncodeError> {
        self.encoder.write_any(value, 0)
    }

    pub fn write_nil(&mut self) {
        self.encoder.write_nil();
    }

    pub fn write_bool(&mut self, b: bool) {
        self.encoder.write_bool(b);
    }

    pub fn write_int(&mut self, i: i64) {
        self.encoder.write_int(i);
    }

    pub fn write_uint(&mut self, u: u64) {
        self.encoder.write_uint(u);
    }

    pub fn write_float(&mut self, f: f64) {
        self.encoder.write_float(f);
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), EncodeError> {
        self.encoder.write_str(s)
    }

    pub fn write_bin(&mut self, b: &[u8]) -> Result<(), EncodeError> {
        self.encoder.write_bin(b)
    }

    /// Writes an array header only; the caller then writes `n` elements.
    pub fn write_array_header(&mut self, n: u32) {
        self.encoder.write_array_header(n);
    }

    /// Writes a map header only; the caller then writes `n` key-value pairs.
    pub fn write_map_header(&mut self, n: u32) {
        self.encoder.write_map_header(n);
    }

    pub fn write_ext(&mut self, type_id: i8, payload: &[u8]) {
        self.encoder.write_ext(type_id, payload);
    }

    /// Encoded bytes accumulated so far, without consuming them.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encoder.writer.contents().to_vec()
    }

    /// Takes the accumulated bytes and starts a fresh region.
    pub fn flush(&mut self) -> Vec<u8> {
        self.encoder.writer.flush()
    }

    /// Discards everything written since the last flush.
    pub fn reset(&mut self) {
        self.encoder.writer.reset();
    }

    pub fn size(&self) -> usize {
        self.encoder.writer.contents().len()
    }
}

impl Default for Packer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_accumulate_until_flush() {
        let mut p = Packer::new();
        p.write(&Value::Int(1)).unwrap();
        p.write(&Value::Str("ab".into())).unwrap();
        assert_eq!(p.size(), 4);
        assert_eq!(p.to_bytes(), [0x01, 0xa2, b'a', b'b']);
        assert_eq!(p.flush(), [0x01, 0xa2, b'a', b'b']);
        assert_eq!(p.size(), 0);
    }

    #[test]
    fn manual_headers_compose_with_elements() {
        let mut p = Packer::new();
        p.write_map_header(1);
        p.write_str("k").unwrap();
        p.write_array_header(2);
        p.write_int(-1);
        p.write_nil();
        assert_eq!(p.flush(), [0x81, 0xa1, b'k', 0x92, 0xff, 0xc0]);
    }

    #[test]
    fn reset_discards_unflushed_bytes() {
        let mut p = Packer::new();
        p.write_int(7);
        p.reset();
        assert_eq!(p.size(), 0);
        p.write_bool(true);
        assert_eq!(p.flush(), [0xc3]);
    }

    #[test]
    fn session_registry_is_isolated() {
        let mut seed = ExtensionRegistry::new();
        seed.register_pack(
            Category("point"),
            1,
            std::sync::Arc::new(|_| Ok(vec![0])),
        );
        let mut p = Packer::with_registry(&seed);
        p.register_type(2, Category("line"), std::sync::Arc::new(|_| Ok(vec![])));
        assert!(!seed.category_registered(Category("line")));
    }
}
