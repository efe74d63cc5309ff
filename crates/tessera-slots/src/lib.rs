//! Fixed-capacity slot tables for Tessera level saves.
//!
//! Level tables are sized once, when a level is built or loaded, and
//! never grow. Linked structures inside them are expressed as 16-bit
//! slot indices, with slot 0 reserved as the sentinel of every table.
//!
//! # Architecture
//!
//! ```text
//! ObjectChain (one per object class)
//! └── FreeListAllocator<ChainSlot>
//!     └── FixedSlotTable<ChainSlot> (Box<[T]>, sized at construction)
//! ```
//!
//! - [`FixedSlotTable`]: plain indexed storage, slot 0 reserved.
//! - [`FreeListAllocator`]: O(1) acquire/release through a LIFO stack
//!   embedded in the free slots themselves.
//! - [`ObjectChain`]: tail-appended doubly-linked ring of live links.
//!
//! In memory every slot is a tagged variant (free or in use). The flat,
//! field-reusing save layout is produced only by the `encode`/`decode`
//! functions of each table.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod alloc;
pub mod chain;
pub mod table;

pub use alloc::{free_chain_mask, FreeListAllocator};
pub use chain::{ChainIter, ChainLink, ChainSlot, ObjectChain};
pub use table::FixedSlotTable;
