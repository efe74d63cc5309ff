//! Structural consistency check for a cross-reference index and its grid.
//!
//! Used by tests and by level loading to confirm that every placed entry
//! sits in exactly one bucket chain (the one of its own tile) and in
//! exactly one closed single-owner ring.

use std::error::Error;
use std::fmt;

use indexmap::IndexSet;
use tessera_core::{ObjectId, SlotIndex, TileCoord, TileGrid};

use crate::entry::XrefEntry;
use crate::index::CrossReferenceIndex;

/// First inconsistency found by [`check_consistency`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsistencyError {
    /// An entry is chained under a tile other than its own.
    BucketMismatch {
        /// Offending entry.
        entry: SlotIndex,
        /// Bucket it was found in.
        bucket: TileCoord,
        /// Tile the entry records.
        tile: TileCoord,
    },
    /// An entry appears twice in one bucket chain.
    DuplicateInBucket {
        /// Offending entry.
        entry: SlotIndex,
        /// Bucket that loops.
        bucket: TileCoord,
    },
    /// A placed entry is missing from its tile's bucket chain.
    NotInBucket {
        /// Offending entry.
        entry: SlotIndex,
    },
    /// A bucket chain reaches a free or out-of-range entry.
    BrokenBucket {
        /// Bucket being walked.
        bucket: TileCoord,
        /// The link that could not be followed.
        link: SlotIndex,
    },
    /// A membership ring leaves the placed entries or never closes.
    BrokenRing {
        /// Entry the walk started from.
        start: SlotIndex,
    },
    /// A membership ring links entries of different owners.
    MixedOwners {
        /// Entry the walk started from.
        start: SlotIndex,
        /// Owner of the start entry.
        expected: ObjectId,
        /// Owner found further along the ring.
        found: ObjectId,
    },
    /// The free stack length disagrees with the number of free entries.
    FreeCountMismatch {
        /// Length of the free stack.
        stack: usize,
        /// Free entries found by scanning.
        scanned: usize,
    },
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BucketMismatch {
                entry,
                bucket,
                tile,
            } => write!(f, "entry {entry} for tile {tile} is chained under {bucket}"),
            Self::DuplicateInBucket { entry, bucket } => {
                write!(f, "entry {entry} appears twice in the bucket at {bucket}")
            }
            Self::NotInBucket { entry } => {
                write!(f, "entry {entry} is missing from its tile's bucket")
            }
            Self::BrokenBucket { bucket, link } => {
                write!(f, "bucket at {bucket} links to unplaced entry {link}")
            }
            Self::BrokenRing { start } => {
                write!(f, "membership ring through {start} does not close")
            }
            Self::MixedOwners {
                start,
                expected,
                found,
            } => write!(
                f,
                "ring through {start} mixes owners {expected} and {found}"
            ),
            Self::FreeCountMismatch { stack, scanned } => write!(
                f,
                "free stack holds {stack} entries but {scanned} are free"
            ),
        }
    }
}

impl Error for ConsistencyError {}

/// Verify every structural invariant of `index` against the bucket heads
/// in `grid`. Returns the first violation found.
pub fn check_consistency<G: TileGrid + ?Sized>(
    index: &CrossReferenceIndex,
    grid: &G,
) -> Result<(), ConsistencyError> {
    let capacity = index.capacity();

    let scanned = (1..capacity)
        .filter(|&i| matches!(index.entry(SlotIndex(i as u16)), Some(XrefEntry::Free { .. })))
        .count();
    if scanned != index.free_len() {
        return Err(ConsistencyError::FreeCountMismatch {
            stack: index.free_len(),
            scanned,
        });
    }

    // Buckets.
    let tiles: IndexSet<TileCoord> = index.placements().map(|(_, p)| p.tile).collect();
    let mut chained = vec![false; capacity];
    for &bucket in &tiles {
        let mut cursor = grid.bucket_head(bucket);
        let mut steps = 0;
        while cursor.is_some() {
            let placement = index
                .placement(cursor)
                .ok_or(ConsistencyError::BrokenBucket {
                    bucket,
                    link: cursor,
                })?;
            if placement.tile != bucket {
                return Err(ConsistencyError::BucketMismatch {
                    entry: cursor,
                    bucket,
                    tile: placement.tile,
                });
            }
            let i = cursor.as_usize();
            if chained[i] || steps >= capacity {
                return Err(ConsistencyError::DuplicateInBucket {
                    entry: cursor,
                    bucket,
                });
            }
            chained[i] = true;
            steps += 1;
            cursor = placement.bucket_next;
        }
    }
    if let Some((entry, _)) = index.placements().find(|(i, _)| !chained[i.as_usize()]) {
        return Err(ConsistencyError::NotInBucket { entry });
    }

    // Rings.
    let mut ringed = vec![false; capacity];
    for (start, first) in index.placements() {
        if ringed[start.as_usize()] {
            continue;
        }
        let mut cursor = start;
        for _ in 0..capacity {
            let i = cursor.as_usize();
            let placement = index
                .placement(cursor)
                .filter(|_| !ringed[i])
                .ok_or(ConsistencyError::BrokenRing { start })?;
            if placement.owner != first.owner {
                return Err(ConsistencyError::MixedOwners {
                    start,
                    expected: first.owner,
                    found: placement.owner,
                });
            }
            ringed[i] = true;
            cursor = placement.ring_next;
            if cursor == start {
                break;
            }
        }
        if cursor != start {
            return Err(ConsistencyError::BrokenRing { start });
        }
    }

    Ok(())
}
