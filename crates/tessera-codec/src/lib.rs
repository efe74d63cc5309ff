//! Flat record codec for Tessera save tables.
//!
//! Every table in a level save is an array of fixed-width records made of
//! little-endian `u16` fields, with no header, no padding and no
//! alignment. A table of `capacity` records is exactly
//! `capacity * record_size` bytes, and the capacity is recovered from the
//! buffer length on decode.
//!
//! # Architecture
//!
//! - [`RawRecord`] is the flat, field-order view of one slot
//! - [`encode_table`] / [`decode_table`] convert whole tables to and from bytes
//! - [`write_table`] / [`read_table`] stream tables through `Write` / `Read`
//! - [`table_hash`] fingerprints encoded tables for determinism checks

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod hash;

pub use codec::{
    decode_table, encode_table, read_table, read_u16_le, table_capacity, write_table,
    write_u16_le, RawRecord,
};
pub use error::CodecError;
pub use hash::table_hash;
