//! Footprint builders for placement tests.
//!
//! - [`square_footprint`]: a filled `w` by `h` rectangle, row-major.
//! - [`line_footprint`]: `len` tiles in a horizontal run.

use tessera_core::TileCoord;

/// Every tile of the `w` by `h` rectangle anchored at `(x, y)`, row-major.
pub fn square_footprint(x: u16, y: u16, w: u16, h: u16) -> Vec<TileCoord> {
    (y..y + h)
        .flat_map(|ty| (x..x + w).map(move |tx| TileCoord::new(tx, ty)))
        .collect()
}

/// `len` tiles from `(x, y)` going right.
pub fn line_footprint(x: u16, y: u16, len: u16) -> Vec<TileCoord> {
    (x..x + len).map(|tx| TileCoord::new(tx, y)).collect()
}
