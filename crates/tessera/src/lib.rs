//! Tessera: fixed-slot object and tile cross-reference tables.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Tessera sub-crates. Everything lives in pre-sized arrays addressed
//! by 16-bit indices, and every table encodes to a flat little-endian
//! buffer that round-trips byte for byte.
//!
//! # Quick start
//!
//! ```rust
//! use tessera::prelude::*;
//!
//! let config = LevelConfig::new(32, 32).with_class(ClassId(1));
//! let mut level = Level::new(config.clone()).unwrap();
//!
//! // A 2x1 object and a 1x1 object sharing tile (1, 0).
//! let bench = level
//!     .spawn(ClassId(1), &[TileCoord::new(0, 0), TileCoord::new(1, 0)])
//!     .unwrap();
//! let lamp = level.spawn(ClassId(1), &[TileCoord::new(1, 0)]).unwrap();
//! assert_eq!(
//!     level.objects_at(TileCoord::new(1, 0)).collect::<Vec<_>>(),
//!     vec![lamp, bench]
//! );
//!
//! // Save and restore.
//! let image = level.encode();
//! let restored = Level::decode(config, &image).unwrap();
//! assert_eq!(restored.encode(), image);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessera-core` | IDs, tile coordinates, `SlotError`, core traits |
//! | [`codec`] | `tessera-codec` | Flat records, table encode/decode, hashing |
//! | [`slots`] | `tessera-slots` | Fixed tables, free-list allocator, object chains |
//! | [`xref`] | `tessera-xref` | Tile/object cross-reference index and checker |
//! | [`level`] | `tessera-level` | Level glue, tile map, configuration, save images |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits and IDs (`tessera-core`).
pub use tessera_core as types;

/// Flat record codec (`tessera-codec`).
///
/// Every table is an array of little-endian `u16` records; see
/// [`codec::RawRecord`].
pub use tessera_codec as codec;

/// Slot tables and allocation (`tessera-slots`).
///
/// [`slots::FreeListAllocator`] is generic over any [`types::FreeSlot`]
/// slot type; [`slots::ObjectChain`] keeps one class's objects in order.
pub use tessera_slots as slots;

/// Cross-reference index (`tessera-xref`).
pub use tessera_xref as xref;

/// Level glue and save images (`tessera-level`).
pub use tessera_level as level;

/// Common imports for typical Tessera usage.
///
/// ```rust
/// use tessera::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use tessera_core::{ClassId, FreeSlot, ObjectId, SlotIndex, TileCoord, TileGrid};

    // Errors
    pub use tessera_codec::CodecError;
    pub use tessera_core::SlotError;
    pub use tessera_level::{ConfigError, LevelError};
    pub use tessera_xref::ConsistencyError;

    // Tables
    pub use tessera_slots::{FreeListAllocator, ObjectChain};
    pub use tessera_xref::{check_consistency, CrossReferenceIndex};

    // Level
    pub use tessera_level::{Level, LevelConfig, LevelImage, TileMap};
}
