//! [`Factory`] — shared extension configuration handed out to sessions.

use crate::extension::Category;
use crate::packer::Packer;
use crate::registry::{ExtensionRegistry, PackHook, RegisteredType, UnpackHook};
use crate::unpacker::Unpacker;

/// Owns a seed registry. Sessions created from the factory receive isolated
/// copies, so registrations made on a live session never mutate the seed,
/// and later factory registrations never reach already-created sessions.
pub struct Factory {
    registry: ExtensionRegistry,
}

impl Factory {
    pub fn new() -> Self {
        Factory {
            registry: ExtensionRegistry::new(),
        }
    }

    /// Registers both directions of an extension type on the seed.
    pub fn register_type(
        &mut self,
        type_id: i8,
        category: Category,
        pack: PackHook,
        unpack: UnpackHook,
    ) {
        self.registry.register_pack(category, type_id, pack);
        self.registry.register_unpack(type_id, category, unpack);
    }

    pub fn registered_types(&self) -> Vec<RegisteredType> {
        self.registry.registered_types()
    }

    pub fn type_registered(&self, type_id: i8) -> bool {
        self.registry.type_registered(type_id)
    }

    pub fn packer(&self) -> Packer {
        Packer::with_registry(&self.registry)
    }

    pub fn unpacker(&self) -> Unpacker {
        Unpacker::with_registry(&self.registry)
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}
