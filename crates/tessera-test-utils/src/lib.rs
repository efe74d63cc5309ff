//! Test utilities and mock types for Tessera development.
//!
//! Provides [`MockTileGrid`], a map-backed [`TileGrid`] that needs no
//! level dimensions, and footprint builders in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashMap;

use tessera_core::{SlotIndex, TileCoord, TileGrid};

pub use fixtures::{line_footprint, square_footprint};

/// Mock implementation of [`TileGrid`].
///
/// Only tiles with a non-empty bucket are stored, so two mocks compare
/// equal exactly when every bucket head matches. Unbounded by default;
/// [`bounded`](MockTileGrid::bounded) rejects tiles outside a rectangle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockTileGrid {
    heads: HashMap<TileCoord, SlotIndex>,
    bounds: Option<(u16, u16)>,
}

impl MockTileGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// A grid that only contains tiles with `x < width` and `y < height`.
    pub fn bounded(width: u16, height: u16) -> Self {
        Self {
            heads: HashMap::new(),
            bounds: Some((width, height)),
        }
    }

    /// Whether no tile has a bucket head.
    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    /// Number of tiles with a bucket head.
    pub fn occupied(&self) -> usize {
        self.heads.len()
    }

    /// Tiles with a bucket head, in no particular order.
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.heads.keys().copied()
    }
}

impl TileGrid for MockTileGrid {
    fn bucket_head(&self, tile: TileCoord) -> SlotIndex {
        self.heads.get(&tile).copied().unwrap_or(SlotIndex::NONE)
    }

    fn set_bucket_head(&mut self, tile: TileCoord, head: SlotIndex) {
        if head.is_none() {
            self.heads.remove(&tile);
        } else {
            self.heads.insert(tile, head);
        }
    }

    fn contains(&self, tile: TileCoord) -> bool {
        if tile.is_sentinel() {
            return false;
        }
        match self.bounds {
            Some((w, h)) => tile.x < w && tile.y < h,
            None => true,
        }
    }
}
