//! Extension values and application-defined categories.

use std::any::Any;
use std::fmt;

/// A raw MessagePack extension: a signed type id plus opaque payload bytes.
///
/// The decoder produces these for syntactically valid ext blocks whose type
/// id has no registered handler (when unknown extensions are allowed), and
/// the encoder writes them back out unchanged, so unknown extensions survive
/// a decode/re-encode round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionValue {
    pub type_id: i8,
    pub payload: Vec<u8>,
}

impl ExtensionValue {
    pub fn new(type_id: i8, payload: Vec<u8>) -> Self {
        Self { type_id, payload }
    }
}

/// Stable identifier for an application value category.
///
/// Categories play the role a concrete class plays in a dynamic runtime:
/// the packer side of the [`crate::ExtensionRegistry`] is keyed by them, and
/// a value's [`CustomValue::ancestors`] chain provides the supertype
/// fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category(pub &'static str);

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// An application-defined value the core codec cannot encode on its own.
///
/// The encoder resolves a `CustomValue` through the extension registry:
/// first by exact [`CustomValue::category`], then along the
/// [`CustomValue::ancestors`] chain. If no registration matches, the
/// value's [`CustomValue::to_msgpack`] output (already-encoded MessagePack
/// bytes) is appended verbatim; if that is `None` too, encoding fails with
/// [`crate::EncodeError::UnencodableValue`].
pub trait CustomValue: fmt::Debug + Send + Sync {
    /// The concrete category this value belongs to.
    fn category(&self) -> Category;

    /// Supertype chain, most specific first. Consulted only when no exact
    /// category registration exists.
    fn ancestors(&self) -> &[Category] {
        &[]
    }

    /// Generic pre-encoded fallback. Must return complete, valid
    /// MessagePack bytes; they are appended without inspection.
    fn to_msgpack(&self) -> Option<Vec<u8>> {
        None
    }

    /// Downcasting access for registered pack hooks.
    fn as_any(&self) -> &dyn Any;
}
