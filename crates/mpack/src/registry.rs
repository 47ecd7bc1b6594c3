//! Extension-type registry mapping application categories to wire type
//! identifiers in both directions.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{DecodeError, EncodeError};
use crate::extension::{Category, CustomValue};
use crate::value::Value;

/// Serializer hook. Receives the custom value and returns the extension
/// payload bytes.
pub type PackHook = Arc<dyn Fn(&dyn CustomValue) -> Result<Vec<u8>, EncodeError> + Send + Sync>;

/// Deserializer hook. Receives the extension payload bytes and reconstructs
/// a value.
pub type UnpackHook = Arc<dyn Fn(&[u8]) -> Result<Value, DecodeError> + Send + Sync>;

#[derive(Clone)]
pub struct PackEntry {
    pub category: Category,
    pub type_id: i8,
    pub hook: PackHook,
}

#[derive(Clone)]
pub struct UnpackEntry {
    pub type_id: i8,
    pub category: Category,
    pub hook: UnpackHook,
}

/// Summary of one registered type id, for introspection.
pub struct RegisteredType {
    pub type_id: i8,
    pub category: Option<Category>,
    pub pack: bool,
    pub unpack: bool,
}

/// Bidirectional extension registry.
///
/// The pack side is keyed by exact [`Category`] with a fallback scan over a
/// custom value's declared ancestors; ancestor hits are cached under the
/// queried category. Any registration invalidates the cache, since a new
/// exact entry may shadow a previously cached ancestor match. The unpack
/// side is a flat 256-slot table indexed by type id.
pub struct ExtensionRegistry {
    by_category: HashMap<Category, PackEntry>,
    ancestor_cache: HashMap<Category, PackEntry>,
    by_type_id: Vec<Option<UnpackEntry>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        ExtensionRegistry {
            by_category: HashMap::new(),
            ancestor_cache: HashMap::new(),
            by_type_id: vec![None; 256],
        }
    }

    /// Isolated copy. Later registrations on the copy do not affect the
    /// original, and vice versa.
    pub fn dup(&self) -> Self {
        ExtensionRegistry {
            by_category: self.by_category.clone(),
            ancestor_cache: HashMap::new(),
            by_type_id: self.by_type_id.clone(),
        }
    }

    fn slot(type_id: i8) -> usize {
        (type_id as i16 + 128) as usize
    }

    /// Registers a serializer for `category`. Replaces any previous entry
    /// for the same category.
    pub fn register_pack(&mut self, category: Category, type_id: i8, hook: PackHook) {
        self.by_category.insert(
            category,
            PackEntry {
                category,
                type_id,
                hook,
            },
        );
        self.ancestor_cache.clear();
    }

    /// Registers a deserializer for `type_id`. Last registration wins.
    pub fn register_unpack(&mut self, type_id: i8, category: Category, hook: UnpackHook) {
        self.by_type_id[Self::slot(type_id)] = Some(UnpackEntry {
            type_id,
            category,
            hook,
        });
    }

    /// Looks up the serializer for `category`, falling back to the first
    /// ancestor (in declaration order) with a registered entry.
    pub fn lookup_pack(
        &mut self,
        category: Category,
        ancestors: &[Category],
    ) -> Option<&PackEntry> {
        if self.by_category.contains_key(&category) {
            return self.by_category.get(&category);
        }
        if self.ancestor_cache.contains_key(&category) {
            return self.ancestor_cache.get(&category);
        }
        for ancestor in ancestors {
            if let Some(entry) = self.by_category.get(ancestor) {
                let entry = entry.clone();
                return Some(self.ancestor_cache.entry(category).or_insert(entry));
            }
        }
        None
    }

    pub fn lookup_unpack(&self, type_id: i8) -> Option<&UnpackEntry> {
        self.by_type_id[Self::slot(type_id)].as_ref()
    }

    /// True if either direction is registered for `type_id`.
    pub fn type_registered(&self, type_id: i8) -> bool {
        self.by_type_id[Self::slot(type_id)].is_some()
            || self.by_category.values().any(|e| e.type_id == type_id)
    }

    /// True if a serializer is registered for `category` (exact match only).
    pub fn category_registered(&self, category: Category) -> bool {
        self.by_category.contains_key(&category)
    }

    /// Enumerates every type id with at least one registered direction.
    pub fn registered_types(&self) -> Vec<RegisteredType> {
        let mut out: Vec<RegisteredType> = Vec::new();
        for entry in self.by_category.values() {
            out.push(RegisteredType {
                type_id: entry.type_id,
                category: Some(entry.category),
                pack: true,
                unpack: false,
            });
        }
        for entry in self.by_type_id.iter().flatten() {
            if let Some(existing) = out.iter_mut().find(|t| t.type_id == entry.type_id) {
                existing.unpack = true;
                if existing.category.is_none() {
                    existing.category = Some(entry.category);
                }
            } else {
                out.push(RegisteredType {
                    type_id: entry.type_id,
                    category: Some(entry.category),
                    pack: false,
                    unpack: true,
                });
            }
        }
        out.sort_by_key(|t| t.type_id);
        out
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
