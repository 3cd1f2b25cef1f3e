//! Setup-time validation of grid layouts and canvas sets

use glam::Vec3;
use surface_chain_config::{GridLayout, TexelFormat};
use thiserror::Error;

use crate::canvas::Canvas;
use crate::constants::TILE_SIZE_EPSILON;
use crate::grid::GridCoord;

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("Grid needs at least one tile per axis, got {x_tiles} x {z_tiles}")]
    ZeroTiles { x_tiles: u32, z_tiles: u32 },
    #[error("Invalid tile size: {width} x {length}")]
    InvalidTileSize { width: f32, length: f32 },
    #[error("Splatmap resolution must be non-zero")]
    ZeroResolution,
    #[error("Expected {expected} canvases, got {actual}")]
    CanvasCountMismatch { expected: usize, actual: usize },
    #[error("Canvas at ({x}, {z}) lies outside the grid")]
    CoordinateOutOfRange { x: u32, z: u32 },
    #[error("Two canvases claim grid cell ({x}, {z})")]
    DuplicateCoordinate { x: u32, z: u32 },
    #[error("Canvas at ({x}, {z}) has tile size {width} x {length}, grid uses {expected_width} x {expected_length}")]
    NonUniformTileSize {
        x: u32,
        z: u32,
        width: f32,
        length: f32,
        expected_width: f32,
        expected_length: f32,
    },
    #[error("Canvas at ({x}, {z}) has resolution {width} x {height}, grid uses {expected_width} x {expected_height}")]
    NonUniformResolution {
        x: u32,
        z: u32,
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },
    #[error("Canvas at ({x}, {z}) uses {actual:?}, grid uses {expected:?}")]
    FormatMismatch {
        x: u32,
        z: u32,
        actual: TexelFormat,
        expected: TexelFormat,
    },
    #[error("Canvas at ({x}, {z}) starts at {actual}, its grid cell starts at {expected}")]
    MisplacedCanvas {
        x: u32,
        z: u32,
        actual: Vec3,
        expected: Vec3,
    },
}

/// Check a layout before any canvas is allocated
pub fn validate_layout(layout: &GridLayout) -> Result<(), GridError> {
    if layout.x_tiles == 0 || layout.z_tiles == 0 {
        return Err(GridError::ZeroTiles {
            x_tiles: layout.x_tiles,
            z_tiles: layout.z_tiles,
        });
    }
    if !is_valid_extent(layout.tile_width) || !is_valid_extent(layout.tile_length) {
        return Err(GridError::InvalidTileSize {
            width: layout.tile_width,
            length: layout.tile_length,
        });
    }
    if layout.texture_size == 0 {
        return Err(GridError::ZeroResolution);
    }
    Ok(())
}

/// Check that every canvas shares the first canvas's tile size, resolution
/// and format, and sits in its own grid cell.
///
/// The grid origin is the minimum corner of canvas (0, 0); canvas `(x, z)`
/// must start at `origin + (x * width, 0, z * length)`.
pub fn validate_uniform(canvases: &[Canvas]) -> Result<(), GridError> {
    let Some(first) = canvases.first() else {
        return Ok(());
    };
    let expected_size = first.bounds().ground_size();
    let origin = canvases
        .iter()
        .find(|canvas| canvas.coord() == GridCoord::new(0, 0))
        .map_or(first.bounds().min(), |canvas| canvas.bounds().min());
    let expected_map = first.splatmap();

    if !is_valid_extent(expected_size.x) || !is_valid_extent(expected_size.y) {
        return Err(GridError::InvalidTileSize {
            width: expected_size.x,
            length: expected_size.y,
        });
    }
    if expected_map.width == 0 || expected_map.height == 0 {
        return Err(GridError::ZeroResolution);
    }

    for canvas in canvases {
        let coord = canvas.coord();
        let size = canvas.bounds().ground_size();
        if !size.abs_diff_eq(expected_size, TILE_SIZE_EPSILON) {
            return Err(GridError::NonUniformTileSize {
                x: coord.x,
                z: coord.z,
                width: size.x,
                length: size.y,
                expected_width: expected_size.x,
                expected_length: expected_size.y,
            });
        }

        let map = canvas.splatmap();
        if map.width != expected_map.width || map.height != expected_map.height {
            return Err(GridError::NonUniformResolution {
                x: coord.x,
                z: coord.z,
                width: map.width,
                height: map.height,
                expected_width: expected_map.width,
                expected_height: expected_map.height,
            });
        }
        if map.format() != expected_map.format() {
            return Err(GridError::FormatMismatch {
                x: coord.x,
                z: coord.z,
                actual: map.format(),
                expected: expected_map.format(),
            });
        }

        let expected = origin
            + Vec3::new(
                coord.x as f32 * expected_size.x,
                0.0,
                coord.z as f32 * expected_size.y,
            );
        let actual = canvas.bounds().min();
        // Tolerance grows with distance from the world origin
        let tolerance = TILE_SIZE_EPSILON * expected.abs().max_element().max(1.0);
        if !actual.abs_diff_eq(expected, tolerance) {
            return Err(GridError::MisplacedCanvas {
                x: coord.x,
                z: coord.z,
                actual,
                expected,
            });
        }
    }
    Ok(())
}

#[inline]
fn is_valid_extent(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
