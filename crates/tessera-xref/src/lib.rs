//! Tile/object cross-reference index for Tessera levels.
//!
//! A [`CrossReferenceIndex`] answers two questions in a bounded number of
//! pointer edits, regardless of map size:
//!
//! - which objects stand on a tile (a singly-linked **bucket chain** per
//!   tile, headed from the [`TileGrid`](tessera_core::TileGrid));
//! - which tiles an object covers (a circular **membership ring** per
//!   placement, anchored at the handle returned by
//!   [`place_object`](CrossReferenceIndex::place_object)).
//!
//! Every entry lives in one fixed-capacity table and is either free or a
//! member of exactly one bucket chain and one ring.
//!
//! # Format
//!
//! ```text
//! [entry 0: sentinel] [entry 1] ... [entry capacity-1]
//! entry = tileX u16 | tileY u16 | owner u16 | bucketNext u16 | ringNext u16
//! ```
//!
//! Free entries are `FFFF FFFF 0000 <nextFree> 0000`; the sentinel holds
//! the free-stack head in its `bucketNext` field.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod check;
pub mod entry;
pub mod index;
pub mod iter;

pub use check::{check_consistency, ConsistencyError};
pub use entry::{Placement, XrefEntry};
pub use index::CrossReferenceIndex;
pub use iter::{BucketIter, RingIter};
