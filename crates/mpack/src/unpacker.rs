//! Streaming deserialization session.
//!
//! An [`Unpacker`] accumulates fed bytes and decodes complete values out of
//! the front. Reads are transactional: when a decode fails because the
//! buffer ends mid-value, the cursor stays at its pre-attempt position, so
//! the caller can feed more bytes and retry.

use mpack_buffers::StreamingReader;

use crate::decoder::MsgPackDecoder;
use crate::encoder::DEFAULT_MAX_DEPTH;
use crate::error::DecodeError;
use crate::extension::Category;
use crate::registry::{ExtensionRegistry, UnpackHook};
use crate::value::Value;

pub struct Unpacker {
    reader: StreamingReader,
    registry: ExtensionRegistry,
    pub symbolize_keys: bool,
    pub allow_unknown_ext: bool,
    pub max_depth: usize,
}

impl Unpacker {
    pub fn new() -> Self {
        Self::with_registry(&ExtensionRegistry::new())
    }

    /// Session seeded with an isolated copy of `registry`.
    pub fn with_registry(registry: &ExtensionRegistry) -> Self {
        Unpacker {
            reader: StreamingReader::new(),
            registry: registry.dup(),
            symbolize_keys: false,
            allow_unknown_ext: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn register_type(&mut self, type_id: i8, category: Category, hook: UnpackHook) {
        self.registry.register_unpack(type_id, category, hook);
    }

    /// Appends raw bytes to the accumulation buffer.
    pub fn feed(&mut self, data: &[u8]) {
        self.reader.push(data);
    }

    /// Number of buffered, not-yet-read bytes.
    pub fn remaining(&self) -> usize {
        self.reader.remaining().len()
    }

    fn decoder<'a>(&'a self, data: &'a [u8]) -> MsgPackDecoder<'a> {
        let mut dec = MsgPackDecoder::with_registry(data, &self.registry);
        dec.symbolize_keys = self.symbolize_keys;
        dec.allow_unknown_ext = self.allow_unknown_ext;
        dec.max_depth = self.max_depth;
        dec
    }

    /// Decodes exactly one value. On any error the cursor does not move, so
    /// an [`DecodeError::Underflow`] can be retried after another `feed`.
    pub fn read(&mut self) -> Result<Value, DecodeError> {
        let (value, consumed) = {
            let mut dec = self.decoder(self.reader.remaining());
            let value = dec.read_any()?;
            (value, dec.x)
        };
        self.reader.skip(consumed);
        Ok(value)
    }

    /// Skips one complete value, returning its encoded length. Same
    /// transactional contract as [`Unpacker::read`].
    pub fn skip(&mut self) -> Result<usize, DecodeError> {
        let consumed = {
            let mut dec = self.decoder(self.reader.remaining());
            dec.skip_any()?
        };
        self.reader.skip(consumed);
        Ok(consumed)
    }

    /// Consuming array-header read for manual traversal.
    pub fn read_array_header(&mut self) -> Result<usize, DecodeError> {
        let (len, consumed) = {
            let mut dec = self.decoder(self.reader.remaining());
            (dec.read_array_header()?, dec.x)
        };
        self.reader.skip(consumed);
        Ok(len)
    }

    /// Consuming map-header read for manual traversal.
    pub fn read_map_header(&mut self) -> Result<usize, DecodeError> {
        let (len, consumed) = {
            let mut dec = self.decoder(self.reader.remaining());
            (dec.read_map_header()?, dec.x)
        };
        self.reader.skip(consumed);
        Ok(len)
    }

    /// Drains every complete value currently buffered, stopping cleanly at
    /// the first incomplete one. Consumed bytes are released.
    pub fn each<F>(&mut self, mut callback: F) -> Result<(), DecodeError>
    where
        F: FnMut(Value),
    {
        loop {
            match self.read() {
                Ok(value) => {
                    self.reader.consume();
                    callback(value);
                }
                Err(DecodeError::Underflow) => return Ok(()),
                Err(err) => return Err(err),
            }
        }
    }

    /// Rewinds the cursor to the start of the buffered region without
    /// discarding bytes. Bytes released by `each` are gone for good.
    pub fn reset(&mut self) {
        self.reader.rewind();
    }
}

impl Default for Unpacker {
    fn default() -> Self {
        Self::new()
    }
}
