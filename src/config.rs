//! Texture bounds and codec options
//!
//! Both structs are plain values handed to each call. Nothing here is
//! process-wide: two callers with different bounds never see each other's
//! settings.

use crate::compression::{CompressionLevel, CompressionMethod};
use crate::error::{Result, TileError};
use serde::{Deserialize, Serialize};

/// Default lower bound for the atlas width, in pixels
pub const DEFAULT_MIN_TEXTURE_WIDTH: usize = 64;

/// Default upper bound for the atlas width, in pixels
pub const DEFAULT_MAX_TEXTURE_WIDTH: usize = 2048 * 8;

/// Bounds on the atlas texture width used by the planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Smallest allowed atlas width (and height), power of two
    pub min_texture_width: usize,
    /// Largest allowed atlas width, power of two
    pub max_texture_width: usize,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            min_texture_width: DEFAULT_MIN_TEXTURE_WIDTH,
            max_texture_width: DEFAULT_MAX_TEXTURE_WIDTH,
        }
    }
}

impl TextureConfig {
    /// Create a config with explicit bounds
    pub fn new(min_texture_width: usize, max_texture_width: usize) -> Self {
        Self {
            min_texture_width,
            max_texture_width,
        }
    }

    /// Set the minimum texture width
    pub fn with_min_width(mut self, width: usize) -> Self {
        self.min_texture_width = width;
        self
    }

    /// Set the maximum texture width
    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_texture_width = width;
        self
    }

    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that both bounds are non-zero powers of two and `min <= max`
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_texture_width", self.min_texture_width),
            ("max_texture_width", self.max_texture_width),
        ] {
            if !value.is_power_of_two() {
                return Err(TileError::Configuration(format!(
                    "{} must be a non-zero power of two, got {}",
                    name, value
                )));
            }
        }

        if self.min_texture_width > self.max_texture_width {
            return Err(TileError::Configuration(format!(
                "min_texture_width ({}) exceeds max_texture_width ({})",
                self.min_texture_width, self.max_texture_width
            )));
        }

        Ok(())
    }
}

/// Options steering [`crate::codec::encode_with`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Whether the receiving channel accepts binary buffers
    pub binary: bool,
    /// Lossless compression applied to binary buffers
    pub compression: CompressionMethod,
    /// Compression level for `compression`
    #[serde(with = "level_serde")]
    pub level: CompressionLevel,
    /// Cast 64-bit element types to their 32-bit counterparts before encoding.
    /// Integer values outside the 32-bit range fail the encode.
    pub narrow_for_webgl: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            binary: true,
            compression: CompressionMethod::None,
            level: CompressionLevel::default(),
            narrow_for_webgl: false,
        }
    }
}

impl CodecOptions {
    /// Options for channels without binary transport
    pub fn json_only() -> Self {
        Self {
            binary: false,
            ..Self::default()
        }
    }

    /// Set the compression method and level
    pub fn with_compression(mut self, method: CompressionMethod, level: CompressionLevel) -> Self {
        self.compression = method;
        self.level = level;
        self
    }

    /// Enable or disable 64-bit narrowing
    pub fn with_webgl_narrowing(mut self, narrow: bool) -> Self {
        self.narrow_for_webgl = narrow;
        self
    }
}

mod level_serde {
    use crate::compression::CompressionLevel;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(level: &CompressionLevel, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(level.value())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<CompressionLevel, D::Error> {
        u8::deserialize(d).map(CompressionLevel::new)
    }
}
