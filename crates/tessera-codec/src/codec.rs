//! Binary encode/decode for flat save tables.
//!
//! All integers are little-endian `u16`. Records are written back to back
//! in slot order; the format has no header, no length prefix and no
//! padding, so a table's capacity is its byte length divided by the
//! record size.

use std::io::{Read, Write};

use tessera_core::MAX_CAPACITY;

use crate::error::CodecError;

// ── Primitives ──────────────────────────────────────────────────

/// Write a little-endian u16.
pub fn write_u16_le(w: &mut dyn Write, v: u16) -> Result<(), CodecError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Read a little-endian u16.
pub fn read_u16_le(r: &mut dyn Read) -> Result<u16, CodecError> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

// ── Records ─────────────────────────────────────────────────────

/// One flat record of `N` little-endian `u16` fields, in wire order.
///
/// Table types translate their in-memory slot variants to and from this
/// view only at the encode/decode boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawRecord<const N: usize>(pub [u16; N]);

impl<const N: usize> RawRecord<N> {
    /// Encoded size in bytes.
    pub const SIZE: usize = N * 2;

    /// Field `i` of the record.
    pub fn field(&self, i: usize) -> u16 {
        self.0[i]
    }

    /// Append the record's bytes to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        for v in self.0 {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    /// Decode a record from exactly [`Self::SIZE`] bytes.
    ///
    /// Returns `None` if `chunk` has the wrong length.
    pub fn from_le_slice(chunk: &[u8]) -> Option<Self> {
        if chunk.len() != Self::SIZE {
            return None;
        }
        let mut fields = [0u16; N];
        for (field, pair) in fields.iter_mut().zip(chunk.chunks_exact(2)) {
            *field = u16::from_le_bytes([pair[0], pair[1]]);
        }
        Some(Self(fields))
    }

    /// Stream the record to a writer.
    pub fn write_to(&self, w: &mut dyn Write) -> Result<(), CodecError> {
        for v in self.0 {
            write_u16_le(w, v)?;
        }
        Ok(())
    }

    /// Read one record from a reader.
    pub fn read_from(r: &mut dyn Read) -> Result<Self, CodecError> {
        let mut fields = [0u16; N];
        for field in fields.iter_mut() {
            *field = read_u16_le(r)?;
        }
        Ok(Self(fields))
    }
}

// ── Tables ──────────────────────────────────────────────────────

/// Number of records in a buffer of `len` bytes.
///
/// Fails if the length is zero, not a multiple of `record_size`, or holds
/// more records than a 16-bit slot index can address.
pub fn table_capacity(len: usize, record_size: usize) -> Result<usize, CodecError> {
    if len == 0 || record_size == 0 || len % record_size != 0 {
        return Err(CodecError::LengthMismatch { len, record_size });
    }
    let capacity = len / record_size;
    if capacity > MAX_CAPACITY {
        return Err(CodecError::CapacityOutOfRange { capacity });
    }
    Ok(capacity)
}

/// Encode a table of records into a fresh buffer.
pub fn encode_table<const N: usize>(records: impl IntoIterator<Item = RawRecord<N>>) -> Vec<u8> {
    let records = records.into_iter();
    let mut out = Vec::with_capacity(records.size_hint().0 * RawRecord::<N>::SIZE);
    for record in records {
        record.encode_into(&mut out);
    }
    out
}

/// Decode a whole table. The capacity is taken from the buffer length.
pub fn decode_table<const N: usize>(bytes: &[u8]) -> Result<Vec<RawRecord<N>>, CodecError> {
    let capacity = table_capacity(bytes.len(), RawRecord::<N>::SIZE)?;
    let mut records = Vec::with_capacity(capacity);
    for chunk in bytes.chunks_exact(RawRecord::<N>::SIZE) {
        let record = RawRecord::from_le_slice(chunk).ok_or(CodecError::LengthMismatch {
            len: bytes.len(),
            record_size: RawRecord::<N>::SIZE,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Stream a table of records to a writer.
pub fn write_table<const N: usize>(
    w: &mut dyn Write,
    records: impl IntoIterator<Item = RawRecord<N>>,
) -> Result<(), CodecError> {
    for record in records {
        record.write_to(w)?;
    }
    Ok(())
}

/// Read a table of `capacity` records from a reader.
pub fn read_table<const N: usize>(
    r: &mut dyn Read,
    capacity: usize,
) -> Result<Vec<RawRecord<N>>, CodecError> {
    if capacity == 0 || capacity > MAX_CAPACITY {
        return Err(CodecError::CapacityOutOfRange { capacity });
    }
    let mut records = Vec::with_capacity(capacity);
    for _ in 0..capacity {
        records.push(RawRecord::read_from(r)?);
    }
    Ok(records)
}
