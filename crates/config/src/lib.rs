//! Shared configuration for the surface chain
//!
//! This crate is the single source of truth for how a surface chain is laid
//! out (tile counts, tile world size, texel resolution and format) and for the
//! process-wide brush and displacement settings. Every value is plain data,
//! serializable, and passed explicitly into the painting engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default brush radius in world units
pub const DEFAULT_BRUSH_SIZE: f32 = 15.0;

/// Default width of the brush's soft rim in world units
pub const DEFAULT_BRUSH_SMOOTH: f32 = 2.0;

/// Default brush strength
pub const DEFAULT_BRUSH_STRENGTH: f32 = 1.0;

/// Default tessellation factor handed to the surface material
pub const DEFAULT_TESSELLATION: f32 = 4.0;

/// Default displacement scale handed to the surface material
pub const DEFAULT_DISPLACEMENT: f32 = 1.0;

/// Default splatmap resolution (square, per tile)
pub const DEFAULT_TEXTURE_SIZE: u32 = 2048;

/// Default texel density used when deriving tile counts from a world extent
pub const DEFAULT_TEXELS_PER_WORLD_UNIT: u32 = 16;

/// Default world extent of a whole chain along x and z
pub const DEFAULT_EXTENT: f32 = 100.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Texel storage format of a splatmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TexelFormat {
    /// Single 8-bit normalized channel
    #[default]
    R8,
    /// Single 16-bit normalized channel
    R16,
    /// Single 32-bit float channel
    RFloat,
    /// Two 16-bit normalized channels
    Rg16,
    /// Four 8-bit normalized channels
    Rgba8,
    /// Four 16-bit float channels
    RgbaHalf,
    /// Four 32-bit float channels
    RgbaFloat,
}

impl TexelFormat {
    /// Number of channels per texel
    pub fn channels(self) -> usize {
        match self {
            TexelFormat::R8 | TexelFormat::R16 | TexelFormat::RFloat => 1,
            TexelFormat::Rg16 => 2,
            TexelFormat::Rgba8 | TexelFormat::RgbaHalf | TexelFormat::RgbaFloat => 4,
        }
    }

    /// Whether stored values are clamped to 0..1
    pub fn is_normalized(self) -> bool {
        matches!(
            self,
            TexelFormat::R8 | TexelFormat::R16 | TexelFormat::Rg16 | TexelFormat::Rgba8
        )
    }

    /// Bytes per texel on the GPU side
    pub fn bytes_per_texel(self) -> usize {
        match self {
            TexelFormat::R8 => 1,
            TexelFormat::R16 => 2,
            TexelFormat::RFloat | TexelFormat::Rg16 | TexelFormat::Rgba8 => 4,
            TexelFormat::RgbaHalf => 8,
            TexelFormat::RgbaFloat => 16,
        }
    }
}

/// Brush parameters, set once and read by every stroke
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct BrushConfig {
    /// Brush radius in world units
    pub size: f32,
    /// Width of the soft rim in world units (0 = hard stamp)
    pub smooth: f32,
    /// Amount added at the stamp centre
    pub strength: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BRUSH_SIZE,
            smooth: DEFAULT_BRUSH_SMOOTH,
            strength: DEFAULT_BRUSH_STRENGTH,
        }
    }
}

/// Displacement material parameters copied into each canvas at creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplacementConfig {
    pub tessellation: f32,
    pub displacement: f32,
}

impl Default for DisplacementConfig {
    fn default() -> Self {
        Self {
            tessellation: DEFAULT_TESSELLATION,
            displacement: DEFAULT_DISPLACEMENT,
        }
    }
}

/// Partition of a terrain into a uniform grid of tiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    /// Tile count along x
    pub x_tiles: u32,
    /// Tile count along z
    pub z_tiles: u32,
    /// World size of one tile along x
    pub tile_width: f32,
    /// World size of one tile along z
    pub tile_length: f32,
    /// Splatmap resolution per tile (square)
    pub texture_size: u32,
    /// Splatmap storage format
    pub format: TexelFormat,
    /// World position of the chain's minimum corner
    pub origin: [f32; 3],
}

impl Default for GridLayout {
    fn default() -> Self {
        // 100 x 100 world units at 16 texels per unit with 2048 textures
        Self {
            x_tiles: 1,
            z_tiles: 1,
            tile_width: DEFAULT_EXTENT,
            tile_length: DEFAULT_EXTENT,
            texture_size: DEFAULT_TEXTURE_SIZE,
            format: TexelFormat::default(),
            origin: [0.0; 3],
        }
    }
}

impl GridLayout {
    /// Derive a layout from the total world extent and a target texel density.
    ///
    /// The tile count per axis is the smallest number of `texture_size`
    /// textures that reaches `texels_per_world_unit`; the extent is then split
    /// evenly between them.
    pub fn from_extent(
        total_width: f32,
        total_length: f32,
        texture_size: u32,
        texels_per_world_unit: u32,
        format: TexelFormat,
    ) -> Result<Self, ConfigError> {
        if !(total_width > 0.0 && total_length > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "extent must be positive, got {total_width} x {total_length}"
            )));
        }
        if texture_size == 0 || texels_per_world_unit == 0 {
            return Err(ConfigError::Invalid(
                "texture size and texel density must be non-zero".to_string(),
            ));
        }

        let density = texels_per_world_unit as f32;
        let size = texture_size as f32;
        let x_tiles = ((total_width * density / size).ceil() as u32).max(1);
        let z_tiles = ((total_length * density / size).ceil() as u32).max(1);

        Ok(Self {
            x_tiles,
            z_tiles,
            tile_width: total_width / x_tiles as f32,
            tile_length: total_length / z_tiles as f32,
            texture_size,
            format,
            origin: [0.0; 3],
        })
    }

    /// [`Self::from_extent`] with the default texture size, texel density and format
    pub fn from_extent_default(total_width: f32, total_length: f32) -> Result<Self, ConfigError> {
        Self::from_extent(
            total_width,
            total_length,
            DEFAULT_TEXTURE_SIZE,
            DEFAULT_TEXELS_PER_WORLD_UNIT,
            TexelFormat::default(),
        )
    }

    /// Total number of tiles
    pub fn tile_count(&self) -> usize {
        self.x_tiles as usize * self.z_tiles as usize
    }

    /// Total world extent along x and z
    pub fn extent(&self) -> (f32, f32) {
        (
            self.tile_width * self.x_tiles as f32,
            self.tile_length * self.z_tiles as f32,
        )
    }

    /// GPU memory needed for every splatmap in the grid
    pub fn texture_bytes(&self) -> usize {
        let per_tile = self.texture_size as usize * self.texture_size as usize;
        per_tile * self.format.bytes_per_texel() * self.tile_count()
    }
}

/// Complete configuration for one surface chain
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct ChainConfig {
    pub layout: GridLayout,
    pub brush: BrushConfig,
    pub displacement: DisplacementConfig,
}

impl ChainConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
