//! Row-major per-tile bucket heads.

use tessera_codec::{CodecError, RawRecord};
use tessera_core::{SlotIndex, TileCoord, TileGrid};

/// The level map as seen by the cross-reference index: one bucket head
/// per tile, row-major, `NONE` for an empty tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    width: u16,
    height: u16,
    heads: Box<[SlotIndex]>,
}

/// Row-major offset of `tile`, or `None` if it is off the map.
fn offset(tile: TileCoord, width: u16, height: u16) -> Option<usize> {
    if tile.x >= width || tile.y >= height {
        return None;
    }
    Some(tile.y as usize * width as usize + tile.x as usize)
}

impl TileMap {
    /// An empty `width` by `height` map.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            heads: vec![SlotIndex::NONE; width as usize * height as usize].into_boxed_slice(),
        }
    }

    /// Map width in tiles.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Map height in tiles.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Reset every tile to empty.
    pub fn clear(&mut self) {
        self.heads.fill(SlotIndex::NONE);
    }

    /// Tiles with a non-empty bucket, row-major, with their heads.
    pub fn occupied_tiles(&self) -> impl Iterator<Item = (TileCoord, SlotIndex)> + '_ {
        let width = self.width as usize;
        self.heads
            .iter()
            .enumerate()
            .filter(|(_, head)| head.is_some())
            .map(move |(i, &head)| {
                let tile = TileCoord::new((i % width) as u16, (i / width) as u16);
                (tile, head)
            })
    }

    /// Encode to `width * height * 2` bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.heads.len() * 2);
        for head in self.heads.iter() {
            RawRecord([head.0]).encode_into(&mut out);
        }
        out
    }

    /// Restore a `width` by `height` map from its encoded form.
    pub fn decode_from(width: u16, height: u16, bytes: &[u8]) -> Result<Self, CodecError> {
        let tiles = width as usize * height as usize;
        if bytes.len() != tiles * RawRecord::<1>::SIZE {
            return Err(CodecError::CapacityMismatch {
                expected: tiles,
                found: bytes.len() / RawRecord::<1>::SIZE,
            });
        }
        let heads = bytes
            .chunks_exact(RawRecord::<1>::SIZE)
            .filter_map(RawRecord::<1>::from_le_slice)
            .map(|raw| SlotIndex(raw.field(0)))
            .collect();
        Ok(Self {
            width,
            height,
            heads,
        })
    }
}

impl TileGrid for TileMap {
    fn bucket_head(&self, tile: TileCoord) -> SlotIndex {
        offset(tile, self.width, self.height)
            .map(|i| self.heads[i])
            .unwrap_or(SlotIndex::NONE)
    }

    fn set_bucket_head(&mut self, tile: TileCoord, head: SlotIndex) {
        match offset(tile, self.width, self.height) {
            Some(i) => self.heads[i] = head,
            None => {
                log::warn!("ignoring bucket head for off-map tile {tile}");
                debug_assert!(false, "bucket head written for off-map tile {tile}");
            }
        }
    }

    fn contains(&self, tile: TileCoord) -> bool {
        offset(tile, self.width, self.height).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heads_are_row_major() {
        let mut map = TileMap::new(3, 2);
        map.set_bucket_head(TileCoord::new(2, 1), SlotIndex(7));
        map.set_bucket_head(TileCoord::new(1, 0), SlotIndex(0x0102));
        assert_eq!(
            map.encode(),
            vec![0, 0, 0x02, 0x01, 0, 0, 0, 0, 0, 0, 7, 0]
        );
        assert_eq!(
            map.occupied_tiles().collect::<Vec<_>>(),
            vec![
                (TileCoord::new(1, 0), SlotIndex(0x0102)),
                (TileCoord::new(2, 1), SlotIndex(7)),
            ]
        );
    }

    #[test]
    fn off_map_tiles_are_empty_and_excluded() {
        let map = TileMap::new(4, 4);
        assert!(!map.contains(TileCoord::new(4, 0)));
        assert!(!map.contains(TileCoord::FREE));
        assert_eq!(map.bucket_head(TileCoord::new(9, 9)), SlotIndex::NONE);
    }

    #[test]
    fn decode_round_trip() {
        let mut map = TileMap::new(5, 3);
        map.set_bucket_head(TileCoord::new(4, 2), SlotIndex(33));
        let bytes = map.encode();
        let decoded = TileMap::decode_from(5, 3, &bytes).unwrap();
        assert_eq!(decoded, map);
        assert_eq!(decoded.encode(), bytes);
    }

    #[test]
    fn decode_rejects_wrong_size() {
        assert!(matches!(
            TileMap::decode_from(2, 2, &[0; 6]),
            Err(CodecError::CapacityMismatch {
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn clear_empties_every_tile() {
        let mut map = TileMap::new(2, 2);
        map.set_bucket_head(TileCoord::new(0, 1), SlotIndex(1));
        map.clear();
        assert_eq!(map.occupied_tiles().count(), 0);
    }
}
