//! Level glue for Tessera.
//!
//! A [`Level`] ties the fixed save tables of one game level together:
//!
//! - the master object table, one [`ObjectRecord`] per live object;
//! - one [`ObjectChain`](tessera_slots::ObjectChain) per object class,
//!   listing that class's objects in spawn order;
//! - the [`CrossReferenceIndex`](tessera_xref::CrossReferenceIndex)
//!   between objects and tiles;
//! - the [`TileMap`] holding each tile's bucket head.
//!
//! Every operation keeps all four consistent, and [`Level::encode`]
//! produces the raw table buffers of a [`LevelImage`] for an external
//! container to store.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod image;
pub mod level;
pub mod object;
pub mod tilemap;

pub use config::{ClassSpec, ConfigError, LevelConfig};
pub use error::LevelError;
pub use image::LevelImage;
pub use level::Level;
pub use object::{ObjectRecord, ObjectSlot};
pub use tilemap::TileMap;
