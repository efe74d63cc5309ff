//! Level dimensions and table capacities.

use std::error::Error;
use std::fmt;

use tessera_core::{ClassId, MAX_CAPACITY};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`LevelConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Width or height is zero.
    EmptyMap,
    /// An axis reaches the free-entry marker `0xFFFF`, or the map has more
    /// than [`LevelConfig::MAX_TILES`] tiles.
    MapTooLarge {
        /// Configured width.
        width: u16,
        /// Configured height.
        height: u16,
    },
    /// A table capacity is outside `1..=65536`, or leaves no usable slot.
    InvalidCapacity {
        /// Which table.
        table: &'static str,
        /// The configured capacity.
        capacity: usize,
    },
    /// No object classes registered.
    NoClasses,
    /// The same class is registered twice.
    DuplicateClass {
        /// The repeated class.
        class: ClassId,
    },
    /// A class uses the id reserved for free object records.
    ReservedClass {
        /// The offending class.
        class: ClassId,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMap => write!(f, "map has zero tiles"),
            Self::MapTooLarge { width, height } => {
                write!(
                    f,
                    "map {width}x{height} exceeds 65534 tiles on an axis or {} tiles in total",
                    LevelConfig::MAX_TILES
                )
            }
            Self::InvalidCapacity { table, capacity } => {
                write!(f, "{table} capacity {capacity} is outside 2..=65536")
            }
            Self::NoClasses => write!(f, "no object classes registered"),
            Self::DuplicateClass { class } => write!(f, "class {class} registered twice"),
            Self::ReservedClass { class } => {
                write!(f, "class {class} is reserved for free object records")
            }
        }
    }
}

impl Error for ConfigError {}

// ── ClassSpec ──────────────────────────────────────────────────────

/// One object class and the size of its chain table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassSpec {
    /// The class id stored in object records.
    pub class: ClassId,
    /// Chain table capacity, sentinel included.
    pub capacity: usize,
}

// ── LevelConfig ────────────────────────────────────────────────────

/// Shape of a level's save tables.
///
/// Capacities include the sentinel slot, so a table of capacity `n` holds
/// at most `n - 1` live entries. All values are fixed once a level is
/// built; decoding checks that every table buffer matches them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelConfig {
    /// Map width in tiles.
    pub width: u16,
    /// Map height in tiles.
    pub height: u16,
    /// Cross-reference table capacity.
    ///
    /// Default: 1600. Each placed tile of each object uses one entry.
    pub xref_capacity: usize,
    /// Master object table capacity.
    ///
    /// Default: 872.
    pub object_capacity: usize,
    /// Registered classes, in chain encoding order.
    pub classes: Vec<ClassSpec>,
}

impl LevelConfig {
    /// Default cross-reference capacity.
    pub const DEFAULT_XREF_CAPACITY: usize = 1600;

    /// Default object table capacity.
    pub const DEFAULT_OBJECT_CAPACITY: usize = 872;

    /// Default per-class chain capacity used by [`with_class`](Self::with_class).
    pub const DEFAULT_CLASS_CAPACITY: usize = 256;

    /// Largest tile count a map may have (a 2048x2048 square, 8 MiB of
    /// bucket heads).
    pub const MAX_TILES: usize = 1 << 22;

    /// Default map side used by `Default`.
    pub const DEFAULT_MAP_SIDE: u16 = 64;

    /// A `width` by `height` level with default capacities and no classes.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            xref_capacity: Self::DEFAULT_XREF_CAPACITY,
            object_capacity: Self::DEFAULT_OBJECT_CAPACITY,
            classes: Vec::new(),
        }
    }

    /// Register `class` with the default chain capacity.
    pub fn with_class(self, class: ClassId) -> Self {
        self.with_class_capacity(class, Self::DEFAULT_CLASS_CAPACITY)
    }

    /// Register `class` with a chain table of `capacity` slots.
    pub fn with_class_capacity(mut self, class: ClassId, capacity: usize) -> Self {
        self.classes.push(ClassSpec { class, capacity });
        self
    }

    /// Number of tiles in the map.
    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check every structural requirement without building any table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyMap);
        }
        if self.width == u16::MAX
            || self.height == u16::MAX
            || self.tile_count() > Self::MAX_TILES
        {
            return Err(ConfigError::MapTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        check_capacity("cross-reference", self.xref_capacity)?;
        check_capacity("object", self.object_capacity)?;
        if self.classes.is_empty() {
            return Err(ConfigError::NoClasses);
        }
        for (i, spec) in self.classes.iter().enumerate() {
            if spec.class.0 == u16::MAX {
                return Err(ConfigError::ReservedClass { class: spec.class });
            }
            if self.classes[..i].iter().any(|s| s.class == spec.class) {
                return Err(ConfigError::DuplicateClass { class: spec.class });
            }
            check_capacity("class chain", spec.capacity)?;
        }
        Ok(())
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAP_SIDE, Self::DEFAULT_MAP_SIDE)
    }
}

fn check_capacity(table: &'static str, capacity: usize) -> Result<(), ConfigError> {
    if (2..=MAX_CAPACITY).contains(&capacity) {
        Ok(())
    } else {
        Err(ConfigError::InvalidCapacity { table, capacity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> LevelConfig {
        LevelConfig::new(32, 24)
            .with_class(ClassId(1))
            .with_class_capacity(ClassId(2), 16)
    }

    #[test]
    fn validate_valid_config_succeeds() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn defaults_match_standard_save() {
        let cfg = LevelConfig::default();
        assert_eq!(cfg.xref_capacity, 1600);
        assert_eq!(cfg.object_capacity, 872);
        assert_eq!(cfg.tile_count(), 64 * 64);
        assert_eq!(cfg.validate(), Err(ConfigError::NoClasses));
    }

    #[test]
    fn validate_empty_map_fails() {
        let mut cfg = valid_config();
        cfg.height = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyMap));
    }

    #[test]
    fn validate_marker_axis_fails() {
        let mut cfg = valid_config();
        cfg.width = u16::MAX;
        assert!(matches!(cfg.validate(), Err(ConfigError::MapTooLarge { .. })));
    }

    #[test]
    fn validate_tile_count_cap() {
        let mut cfg = valid_config();
        cfg.width = 65_534;
        cfg.height = 65_534;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::MapTooLarge {
                width: 65_534,
                height: 65_534
            })
        );
        cfg.width = 2048;
        cfg.height = 2048;
        assert!(cfg.validate().is_ok());
        cfg.height = 2049;
        assert!(matches!(cfg.validate(), Err(ConfigError::MapTooLarge { .. })));
        cfg.width = 1;
        cfg.height = 65_534;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_capacity_bounds() {
        let mut cfg = valid_config();
        cfg.xref_capacity = 1;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidCapacity {
                table: "cross-reference",
                capacity: 1
            })
        );
        cfg.xref_capacity = 65_537;
        assert!(cfg.validate().is_err());
        cfg.xref_capacity = 65_536;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_duplicate_class_fails() {
        let cfg = valid_config().with_class(ClassId(1));
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DuplicateClass { class: ClassId(1) })
        );
    }

    #[test]
    fn validate_reserved_class_fails() {
        let cfg = LevelConfig::new(4, 4).with_class(ClassId(0xFFFF));
        assert!(matches!(cfg.validate(), Err(ConfigError::ReservedClass { .. })));
    }
}
