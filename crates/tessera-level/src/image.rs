//! Raw table buffers of an encoded level.

use indexmap::IndexMap;
use tessera_codec::table_hash;
use tessera_core::ClassId;

/// The byte buffers a level is saved as.
///
/// Each buffer is one flat table in its wire layout; storing them (and
/// compressing or chunking them) is left to the caller's container.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelImage {
    /// Master object table.
    pub objects: Vec<u8>,
    /// One chain table per class, in registration order.
    pub chains: IndexMap<ClassId, Vec<u8>>,
    /// Cross-reference table.
    pub xref: Vec<u8>,
    /// Tile bucket heads.
    pub tiles: Vec<u8>,
}

impl LevelImage {
    /// Every table buffer in save order.
    pub fn tables(&self) -> impl Iterator<Item = &[u8]> + '_ {
        std::iter::once(self.objects.as_slice())
            .chain(self.chains.values().map(Vec::as_slice))
            .chain([self.xref.as_slice(), self.tiles.as_slice()])
    }

    /// Total encoded size in bytes.
    pub fn byte_len(&self) -> usize {
        self.tables().map(<[u8]>::len).sum()
    }

    /// FNV-1a fingerprint over every table, for cheap equality checks.
    pub fn hash(&self) -> u64 {
        table_hash(self.tables())
    }
}
