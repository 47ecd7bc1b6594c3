//! MessagePack decoder over a borrowed byte slice.
//!
//! Every read is bounds-checked and returns [`DecodeError::Underflow`] when
//! the slice ends mid-value, which lets streaming callers retry after more
//! bytes arrive. The cursor `x` only reflects bytes actually consumed, so a
//! failed decode leaves a well-defined resume point.

use std::sync::Arc;

use crate::constants::*;
use crate::encoder::DEFAULT_MAX_DEPTH;
use crate::error::DecodeError;
use crate::extension::ExtensionValue;
use crate::registry::ExtensionRegistry;
use crate::value::Value;

pub struct MsgPackDecoder<'a> {
    data: &'a [u8],
    /// Cursor into `data`; index of the next unread byte.
    pub x: usize,
    pub symbolize_keys: bool,
    pub allow_unknown_ext: bool,
    pub max_depth: usize,
    registry: Option<&'a ExtensionRegistry>,
}

impl<'a> MsgPackDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        MsgPackDecoder {
            data,
            x: 0,
            symbolize_keys: false,
            allow_unknown_ext: false,
            max_depth: DEFAULT_MAX_DEPTH,
            registry: None,
        }
    }

    pub fn with_registry(data: &'a [u8], registry: &'a ExtensionRegistry) -> Self {
        let mut dec = Self::new(data);
        dec.registry = Some(registry);
        dec
    }

    fn check(&self, n: usize) -> Result<(), DecodeError> {
        if self.x + n > self.data.len() {
            return Err(DecodeError::Underflow);
        }
        Ok(())
    }

    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        self.check(1)?;
        let val = self.data[self.x];
        self.x += 1;
        Ok(val)
    }

    pub fn i8(&mut self) -> Result<i8, DecodeError> {
        Ok(self.u8()? as i8)
    }

    pub fn u16(&mut self) -> Result<u16, DecodeError> {
        self.check(2)?;
        let val = u16::from_be_bytes([self.data[self.x], self.data[self.x + 1]]);
        self.x += 2;
        Ok(val)
    }

    pub fn i16(&mut self) -> Result<i16, DecodeError> {
        Ok(self.u16()? as i16)
    }

    pub fn u32(&mut self) -> Result<u32, DecodeError> {
        self.check(4)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[self.x..self.x + 4]);
        self.x += 4;
        Ok(u32::from_be_bytes(bytes))
    }

    pub fn i32(&mut self) -> Result<i32, DecodeError> {
        Ok(self.u32()? as i32)
    }

    pub fn u64(&mut self) -> Result<u64, DecodeError> {
        self.check(8)?;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.data[self.x..self.x + 8]);
        self.x += 8;
        Ok(u64::from_be_bytes(bytes))
    }

    pub fn i64(&mut self) -> Result<i64, DecodeError> {
        Ok(self.u64()? as i64)
    }

    pub fn f32(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_bits(self.u32()?))
    }

    pub fn f64(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_bits(self.u64()?))
    }

    pub fn buf(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.check(len)?;
        let slice = &self.data[self.x..self.x + len];
        self.x += len;
        Ok(slice)
    }

    pub fn utf8(&mut self, len: usize) -> Result<&'a str, DecodeError> {
        let bytes = self.buf(len)?;
        std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)
    }

    /// Decodes the next complete value.
    pub fn read_any(&mut self) -> Result<Value, DecodeError> {
        self.read_at(0)
    }

    fn read_at(&mut self, depth: usize) -> Result<Value, DecodeError> {
        if depth > self.max_depth {
            return Err(DecodeError::DepthLimitExceeded(self.max_depth));
        }
        let byte = self.u8()?;
        if is_positive_fixint(byte) {
            return Ok(Value::Int(byte as i64));
        }
        if is_negative_fixint(byte) {
            return Ok(Value::Int(byte as i8 as i64));
        }
        if is_fixstr(byte) {
            return self.read_str((byte & 0x1f) as usize);
        }
        if is_fixarray(byte) {
            return self.read_array((byte & 0xf) as usize, depth);
        }
        if is_fixmap(byte) {
            return self.read_map((byte & 0xf) as usize, depth);
        }
        match byte {
            NIL => Ok(Value::Nil),
            FALSE => Ok(Value::Bool(false)),
            TRUE => Ok(Value::Bool(true)),
            BIN8 => {
                let len = self.u8()? as usize;
                Ok(Value::Bin(self.buf(len)?.to_vec()))
            }
            BIN16 => {
                let len = self.u16()? as usize;
                Ok(Value::Bin(self.buf(len)?.to_vec()))
            }
            BIN32 => {
                let len = self.u32()? as usize;
                Ok(Value::Bin(self.buf(len)?.to_vec()))
            }
            EXT8 => {
                let len = self.u8()? as usize;
                self.read_ext(len)
            }
            EXT16 => {
                let len = self.u16()? as usize;
                self.read_ext(len)
            }
            EXT32 => {
                let len = self.u32()? as usize;
                self.read_ext(len)
            }
            FLOAT32 => Ok(Value::Float(self.f32()? as f64)),
            FLOAT64 => Ok(Value::Float(self.f64()?)),
            UINT8 => Ok(Value::Int(self.u8()? as i64)),
            UINT16 => Ok(Value::Int(self.u16()? as i64)),
            UINT32 => Ok(Value::Int(self.u32()? as i64)),
            UINT64 => {
                let val = self.u64()?;
                if val <= i64::MAX as u64 {
                    Ok(Value::Int(val as i64))
                } else {
                    Ok(Value::UInt(val))
                }
            }
            INT8 => Ok(Value::Int(self.i8()? as i64)),
            INT16 => Ok(Value::Int(self.i16()? as i64)),
            INT32 => Ok(Value::Int(self.i32()? as i64)),
            INT64 => Ok(Value::Int(self.i64()?)),
            FIXEXT1 => self.read_ext(1),
            FIXEXT2 => self.read_ext(2),
            FIXEXT4 => self.read_ext(4),
            FIXEXT8 => self.read_ext(8),
            FIXEXT16 => self.read_ext(16),
            STR8 => {
                let len = self.u8()? as usize;
                self.read_str(len)
            }
            STR16 => {
                let len = self.u16()? as usize;
                self.read_str(len)
            }
            STR32 => {
                let len = self.u32()? as usize;
                self.read_str(len)
            }
            ARRAY16 => {
                let len = self.u16()? as usize;
                self.read_array(len, depth)
            }
            ARRAY32 => {
                let len = self.u32()? as usize;
                self.read_array(len, depth)
            }
            MAP16 => {
                let len = self.u16()? as usize;
                self.read_map(len, depth)
            }
            MAP32 => {
                let len = self.u32()? as usize;
                self.read_map(len, depth)
            }
            _ => Err(DecodeError::IllegalByte(self.x - 1)),
        }
    }

    fn read_str(&mut self, len: usize) -> Result<Value, DecodeError> {
        Ok(Value::Str(self.utf8(len)?.to_owned()))
    }

    fn read_array(&mut self, len: usize, depth: usize) -> Result<Value, DecodeError> {
        let mut items = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            items.push(self.read_at(depth + 1)?);
        }
        Ok(Value::Array(items))
    }

    fn read_map(&mut self, len: usize, depth: usize) -> Result<Value, DecodeError> {
        let mut pairs = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            let mut key = self.read_at(depth + 1)?;
            if self.symbolize_keys {
                if let Value::Str(s) = key {
                    key = Value::Sym(s);
                }
            }
            let val = self.read_at(depth + 1)?;
            pairs.push((key, val));
        }
        Ok(Value::Map(pairs))
    }

    fn read_ext(&mut self, len: usize) -> Result<Value, DecodeError> {
        let type_id = self.i8()?;
        let payload = self.buf(len)?;
        if let Some(entry) = self.registry.and_then(|r| r.lookup_unpack(type_id)) {
            let hook = Arc::clone(&entry.hook);
            return hook(payload);
        }
        if self.allow_unknown_ext {
            return Ok(Value::Ext(ExtensionValue::new(type_id, payload.to_vec())));
        }
        Err(DecodeError::UnknownExtType(type_id))
    }

    /// Advances the cursor past the next complete value without materializing
    /// it, returning the number of bytes consumed. Extension hooks are not
    /// invoked.
    pub fn skip_any(&mut self) -> Result<usize, DecodeError> {
        let start = self.x;
        self.skip_at(0)?;
        Ok(self.x - start)
    }

    fn skip_at(&mut self, depth: usize) -> Result<(), DecodeError> {
        if depth > self.max_depth {
            return Err(DecodeError::DepthLimitExceeded(self.max_depth));
        }
        let byte = self.u8()?;
        if is_positive_fixint(byte) || is_negative_fixint(byte) {
            return Ok(());
        }
        if is_fixstr(byte) {
            return self.skip_bytes((byte & 0x1f) as usize);
        }
        if is_fixarray(byte) {
            return self.skip_items((byte & 0xf) as usize, depth);
        }
        if is_fixmap(byte) {
            return self.skip_items((byte & 0xf) as usize * 2, depth);
        }
        match byte {
            NIL | FALSE | TRUE => Ok(()),
            UINT8 | INT8 => self.skip_bytes(1),
            UINT16 | INT16 => self.skip_bytes(2),
            FLOAT32 | UINT32 | INT32 => self.skip_bytes(4),
            FLOAT64 | UINT64 | INT64 => self.skip_bytes(8),
            FIXEXT1 => self.skip_bytes(2),
            FIXEXT2 => self.skip_bytes(3),
            FIXEXT4 => self.skip_bytes(5),
            FIXEXT8 => self.skip_bytes(9),
            FIXEXT16 => self.skip_bytes(17),
            STR8 | BIN8 => {
                let len = self.u8()? as usize;
                self.skip_bytes(len)
            }
            STR16 | BIN16 => {
                let len = self.u16()? as usize;
                self.skip_bytes(len)
            }
            STR32 | BIN32 => {
                let len = self.u32()? as usize;
                self.skip_bytes(len)
            }
            EXT8 => {
                let len = self.u8()? as usize;
                self.skip_bytes(len + 1)
            }
            EXT16 => {
                let len = self.u16()? as usize;
                self.skip_bytes(len + 1)
            }
            EXT32 => {
                let len = self.u32()? as usize;
                self.skip_bytes(len + 1)
            }
            ARRAY16 => {
                let len = self.u16()? as usize;
                self.skip_items(len, depth)
            }
            ARRAY32 => {
                let len = self.u32()? as usize;
                self.skip_items(len, depth)
            }
            MAP16 => {
                let len = self.u16()? as usize;
                self.skip_items(len * 2, depth)
            }
            MAP32 => {
                let len = self.u32()? as usize;
                self.skip_items(len * 2, depth)
            }
            _ => Err(DecodeError::IllegalByte(self.x - 1)),
        }
    }

    fn skip_bytes(&mut self, n: usize) -> Result<(), DecodeError> {
        self.check(n)?;
        self.x += n;
        Ok(())
    }

    fn skip_items(&mut self, n: usize, depth: usize) -> Result<(), DecodeError> {
        if n > self.data.len() - self.x {
            // More items than remaining bytes; cannot be complete.
            return Err(DecodeError::Underflow);
        }
        for _ in 0..n {
            self.skip_at(depth + 1)?;
        }
        Ok(())
    }

    /// Reads an array header and returns the element count.
    pub fn read_array_header(&mut self) -> Result<usize, DecodeError> {
        let byte = self.u8()?;
        if is_fixarray(byte) {
            return Ok((byte & 0xf) as usize);
        }
        match byte {
            ARRAY16 => Ok(self.u16()? as usize),
            ARRAY32 => Ok(self.u32()? as usize),
            _ => Err(DecodeError::IllegalByte(self.x - 1)),
        }
    }

    /// Reads a map header and returns the pair count.
    pub fn read_map_header(&mut self) -> Result<usize, DecodeError> {
        let byte = self.u8()?;
        if is_fixmap(byte) {
            return Ok((byte & 0xf) as usize);
        }
        match byte {
            MAP16 => Ok(self.u16()? as usize),
            MAP32 => Ok(self.u32()? as usize),
            _ => Err(DecodeError::IllegalByte(self.x - 1)),
        }
    }

    /// Reads a string header and returns the byte length.
    pub fn read_str_header(&mut self) -> Result<usize, DecodeError> {
        let byte = self.u8()?;
        if is_fixstr(byte) {
            return Ok((byte & 0x1f) as usize);
        }
        match byte {
            STR8 => Ok(self.u8()? as usize),
            STR16 => Ok(self.u16()? as usize),
            STR32 => Ok(self.u32()? as usize),
            _ => Err(DecodeError::IllegalByte(self.x - 1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(bytes: &[u8]) -> Result<Value, DecodeError> {
        MsgPackDecoder::new(bytes).read_any()
    }

    #[test]
    fn fixint_families_decode() {
        assert_eq!(dec(&[0x00]).unwrap(), Value::Int(0));
        assert_eq!(dec(&[0x7f]).unwrap(), Value::Int(127));
        assert_eq!(dec(&[0xff]).unwrap(), Value::Int(-1));
        assert_eq!(dec(&[0xe0]).unwrap(), Value::Int(-32));
    }

    #[test]
    fn uint64_above_i64_range_yields_uint() {
        let mut bytes = vec![0xcf];
        bytes.extend_from_slice(&u64::MAX.to_be_bytes());
        assert_eq!(dec(&bytes).unwrap(), Value::UInt(u64::MAX));

        let mut bytes = vec![0xcf];
        bytes.extend_from_slice(&1u64.to_be_bytes());
        assert_eq!(dec(&bytes).unwrap(), Value::Int(1));
    }

    #[test]
    fn reserved_byte_reports_offset() {
        let err = dec(&[0x91, 0xc1]).unwrap_err();
        assert!(matches!(err, DecodeError::IllegalByte(1)));
    }

    #[test]
    fn truncated_input_is_underflow() {
        assert!(matches!(dec(&[0xcd, 0x01]), Err(DecodeError::Underflow)));
        assert!(matches!(
            dec(&[0xa5, b'h', b'i']),
            Err(DecodeError::Underflow)
        ));
        assert!(matches!(dec(&[]), Err(DecodeError::Underflow)));
    }

    #[test]
    fn invalid_utf8_in_str_is_rejected() {
        assert!(matches!(
            dec(&[0xa2, 0xff, 0xfe]),
            Err(DecodeError::InvalidUtf8)
        ));
        // The same bytes are fine as bin.
        assert_eq!(
            dec(&[0xc4, 0x02, 0xff, 0xfe]).unwrap(),
            Value::Bin(vec![0xff, 0xfe])
        );
    }

    #[test]
    fn symbolize_keys_converts_str_map_keys() {
        let bytes = [0x81, 0xa1, b'k', 0x01];
        let mut d = MsgPackDecoder::new(&bytes);
        d.symbolize_keys = true;
        assert_eq!(
            d.read_any().unwrap(),
            Value::Map(vec![(Value::Sym("k".into()), Value::Int(1))])
        );
    }

    #[test]
    fn unknown_ext_is_opaque_or_error() {
        let bytes = [0xd4, 0x2a, 0x07];
        assert!(matches!(dec(&bytes), Err(DecodeError::UnknownExtType(42))));

        let mut d = MsgPackDecoder::new(&bytes);
        d.allow_unknown_ext = true;
        assert_eq!(
            d.read_any().unwrap(),
            Value::Ext(ExtensionValue::new(42, vec![7]))
        );
    }

    #[test]
    fn skip_any_spans_nested_values() {
        // [[1, "ab"], {"k": nil}] followed by 0x2a
        let bytes = [
            0x92, 0x92, 0x01, 0xa2, b'a', b'b', 0x81, 0xa1, b'k', 0xc0, 0x2a,
        ];
        let mut d = MsgPackDecoder::new(&bytes);
        assert_eq!(d.skip_any().unwrap(), 10);
        assert_eq!(d.x, 10);
        assert_eq!(d.read_any().unwrap(), Value::Int(0x2a));
    }

    #[test]
    fn headers_read_standalone() {
        let mut d = MsgPackDecoder::new(&[0xdc, 0x01, 0x00]);
        assert_eq!(d.read_array_header().unwrap(), 256);
        let mut d = MsgPackDecoder::new(&[0x83]);
        assert_eq!(d.read_map_header().unwrap(), 3);
        let mut d = MsgPackDecoder::new(&[0xd9, 0x20]);
        assert_eq!(d.read_str_header().unwrap(), 32);
    }

    #[test]
    fn depth_limit_bounds_recursion() {
        // 600 nested single-element arrays around nil.
        let mut bytes = vec![0x91; 600];
        bytes.push(0xc0);
        assert!(matches!(
            dec(&bytes),
            Err(DecodeError::DepthLimitExceeded(_))
        ));
    }
}
