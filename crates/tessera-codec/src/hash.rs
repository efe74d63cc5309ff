//! Hashing utilities for encoded table comparison.
//!
//! Uses FNV-1a for fast, deterministic fingerprints of save tables.
//! These hashes are not cryptographically secure; they are used for
//! cheap equality checks between encoded level images.

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

/// Feed a single byte into an FNV-1a hash state.
#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

/// Feed a u64 (as 8 LE bytes) into an FNV-1a hash state.
#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

/// Hash a sequence of encoded tables.
///
/// Each table's length is folded in before its bytes so that moving a
/// byte across a table boundary changes the hash.
pub fn table_hash<'a>(tables: impl IntoIterator<Item = &'a [u8]>) -> u64 {
    let mut hash = FNV_OFFSET;
    for table in tables {
        hash = fnv1a_u64(hash, table.len() as u64);
        for &b in table {
            hash = fnv1a_byte(hash, b);
        }
    }
    hash
}
