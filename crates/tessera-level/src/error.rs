//! Errors raised by level operations and level decoding.

use std::error::Error;
use std::fmt;

use tessera_codec::CodecError;
use tessera_core::{ClassId, ObjectId, SlotError};
use tessera_xref::ConsistencyError;

use crate::config::ConfigError;

/// Errors that can occur while editing, encoding or restoring a level.
#[derive(Debug)]
pub enum LevelError {
    /// The level configuration is invalid.
    Config(ConfigError),
    /// A slot table ran out of room or a tile was outside the map.
    Slots(SlotError),
    /// A table buffer could not be decoded.
    Codec(CodecError),
    /// The cross-reference index disagrees with the tile map.
    Inconsistent(ConsistencyError),
    /// The class is not registered in this level.
    UnknownClass {
        /// The requested class.
        class: ClassId,
    },
    /// No live object has this id.
    UnknownObject {
        /// The requested object.
        object: ObjectId,
    },
    /// A level image has no chain table for a registered class.
    MissingChain {
        /// The class without a table.
        class: ClassId,
    },
    /// An object record, its chain link and its placement disagree.
    ObjectMismatch {
        /// The object whose tables disagree.
        object: ObjectId,
    },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Slots(e) => write!(f, "slots: {e}"),
            Self::Codec(e) => write!(f, "codec: {e}"),
            Self::Inconsistent(e) => write!(f, "cross-reference: {e}"),
            Self::UnknownClass { class } => write!(f, "class {class} is not registered"),
            Self::UnknownObject { object } => write!(f, "object {object} is not live"),
            Self::MissingChain { class } => {
                write!(f, "level image has no chain table for class {class}")
            }
            Self::ObjectMismatch { object } => {
                write!(f, "tables disagree about object {object}")
            }
        }
    }
}

impl Error for LevelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Slots(e) => Some(e),
            Self::Codec(e) => Some(e),
            Self::Inconsistent(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for LevelError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SlotError> for LevelError {
    fn from(e: SlotError) -> Self {
        Self::Slots(e)
    }
}

impl From<CodecError> for LevelError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

impl From<ConsistencyError> for LevelError {
    fn from(e: ConsistencyError) -> Self {
        Self::Inconsistent(e)
    }
}
