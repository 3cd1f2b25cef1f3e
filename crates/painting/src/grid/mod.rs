//! Grid of canvases covering the whole terrain
//!
//! Canvases are stored row by row (`z` outer, `x` inner) and addressed by
//! [`CanvasId`]. `x` grows left to right and `z` bottom to top, so a canvas's
//! `left` neighbour is `(x - 1, z)` and its `top` neighbour `(x, z + 1)`.

mod dirty_tracking;
mod topology;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use surface_chain_config::{DisplacementConfig, GridLayout};
use tracing::{info, trace};

use crate::bounds::TileBounds;
use crate::canvas::Canvas;
use crate::validation::{validate_layout, validate_uniform, GridError};

/// Index of a canvas within its grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanvasId(pub usize);

/// Grid cell of a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: u32,
    pub z: u32,
}

impl GridCoord {
    pub fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }
}

/// Uniform 2D grid of canvases, built once and never resized
#[derive(Debug, Clone)]
pub struct SurfaceGrid {
    canvases: Vec<Canvas>,
    x_tiles: u32,
    z_tiles: u32,
    /// World size of one tile on the ground plane (x, z)
    tile_size: Vec2,
}

impl SurfaceGrid {
    /// Allocate every canvas of a layout and wire neighbours.
    ///
    /// Each tile is offset by `(x * tile_width, 0, z * tile_length)` from the
    /// layout origin. `material` is copied into every canvas when present.
    pub fn new(
        layout: &GridLayout,
        material: Option<&DisplacementConfig>,
    ) -> Result<Self, GridError> {
        validate_layout(layout)?;

        let origin = Vec3::from_array(layout.origin);
        let size = Vec3::new(layout.tile_width, 0.0, layout.tile_length);
        let mut canvases = Vec::with_capacity(layout.tile_count());
        for z in 0..layout.z_tiles {
            for x in 0..layout.x_tiles {
                let offset = Vec3::new(
                    x as f32 * layout.tile_width,
                    0.0,
                    z as f32 * layout.tile_length,
                );
                canvases.push(Canvas::new(
                    GridCoord::new(x, z),
                    TileBounds::new(origin + offset, size),
                    layout.texture_size,
                    layout.format,
                    material,
                ));
            }
        }

        let grid = Self::assemble(canvases, layout.x_tiles, layout.z_tiles)?;
        info!(
            "SurfaceGrid: {} x {} tiles of {:.2} x {:.2}, {}px {:?} splatmaps ({} bytes)",
            layout.x_tiles,
            layout.z_tiles,
            layout.tile_width,
            layout.tile_length,
            layout.texture_size,
            layout.format,
            layout.texture_bytes()
        );
        Ok(grid)
    }

    /// Build a grid from canvases the host created from existing tile geometry.
    ///
    /// Canvases may arrive in any order; each is placed by its own coordinate.
    /// Every cell must be filled exactly once and all canvases must share tile
    /// size, resolution and format.
    pub fn from_canvases(
        x_tiles: u32,
        z_tiles: u32,
        canvases: Vec<Canvas>,
    ) -> Result<Self, GridError> {
        if x_tiles == 0 || z_tiles == 0 {
            return Err(GridError::ZeroTiles { x_tiles, z_tiles });
        }
        let expected = x_tiles as usize * z_tiles as usize;
        if canvases.len() != expected {
            return Err(GridError::CanvasCountMismatch {
                expected,
                actual: canvases.len(),
            });
        }

        let mut slots: Vec<Option<Canvas>> = vec![None; expected];
        for canvas in canvases {
            let GridCoord { x, z } = canvas.coord();
            if x >= x_tiles || z >= z_tiles {
                return Err(GridError::CoordinateOutOfRange { x, z });
            }
            let slot = &mut slots[z as usize * x_tiles as usize + x as usize];
            if slot.is_some() {
                return Err(GridError::DuplicateCoordinate { x, z });
            }
            *slot = Some(canvas);
        }

        // Count matched and no duplicates, so every slot is filled
        let ordered: Vec<Canvas> = slots.into_iter().flatten().collect();
        Self::assemble(ordered, x_tiles, z_tiles)
    }

    /// Validate uniformity of row-ordered canvases and wire their neighbours
    fn assemble(mut canvases: Vec<Canvas>, x_tiles: u32, z_tiles: u32) -> Result<Self, GridError> {
        validate_uniform(&canvases)?;
        topology::wire_neighbours(&mut canvases, x_tiles, z_tiles);

        let tile_size = canvases
            .first()
            .map(|canvas| canvas.bounds().ground_size())
            .unwrap_or(Vec2::ZERO);

        Ok(Self {
            canvases,
            x_tiles,
            z_tiles,
            tile_size,
        })
    }

    #[inline]
    pub fn x_tiles(&self) -> u32 {
        self.x_tiles
    }

    #[inline]
    pub fn z_tiles(&self) -> u32 {
        self.z_tiles
    }

    /// Shared world size of every tile (x, z)
    #[inline]
    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.canvases.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.canvases.is_empty()
    }

    /// Id of the canvas at a grid cell
    pub fn id_at(&self, x: u32, z: u32) -> Option<CanvasId> {
        if x >= self.x_tiles || z >= self.z_tiles {
            return None;
        }
        Some(CanvasId(z as usize * self.x_tiles as usize + x as usize))
    }

    /// Canvas at a grid cell
    pub fn get(&self, coord: GridCoord) -> Option<&Canvas> {
        self.id_at(coord.x, coord.z).and_then(|id| self.canvas(id))
    }

    #[inline]
    pub fn canvas(&self, id: CanvasId) -> Option<&Canvas> {
        self.canvases.get(id.0)
    }

    #[inline]
    pub fn canvas_mut(&mut self, id: CanvasId) -> Option<&mut Canvas> {
        self.canvases.get_mut(id.0)
    }

    /// All canvases with their ids, in storage order
    pub fn iter(&self) -> impl Iterator<Item = (CanvasId, &Canvas)> {
        self.canvases
            .iter()
            .enumerate()
            .map(|(index, canvas)| (CanvasId(index), canvas))
    }

    /// Id of the first canvas whose ground footprint contains a world point.
    /// Height is ignored since painted tiles are displaced
    pub fn locate(&self, point: Vec3) -> Option<CanvasId> {
        self.iter()
            .find(|(_, canvas)| {
                let bounds = canvas.bounds();
                let ground = Vec3::new(point.x, bounds.min().y, point.z);
                bounds.sqr_distance(ground) == 0.0
            })
            .map(|(id, _)| id)
    }

    /// If `id` has a left neighbour, copy the neighbour's rightmost column
    /// into `id`'s leftmost column. No-op otherwise
    pub fn fetch_left_edge(&mut self, id: CanvasId) {
        let Some(left) = self.canvas(id).and_then(Canvas::left) else {
            trace!("fetch_left_edge: {:?} has no left neighbour", id);
            return;
        };
        if let Some((canvas, neighbour)) = self.pair_mut(id, left) {
            canvas.pull_left_edge(neighbour);
        }
    }

    /// If `id` has a top neighbour, copy the neighbour's bottom row into
    /// `id`'s top row. No-op otherwise
    pub fn fetch_top_edge(&mut self, id: CanvasId) {
        let Some(top) = self.canvas(id).and_then(Canvas::top) else {
            trace!("fetch_top_edge: {:?} has no top neighbour", id);
            return;
        };
        if let Some((canvas, neighbour)) = self.pair_mut(id, top) {
            canvas.pull_top_edge(neighbour);
        }
    }

    /// Borrow one canvas mutably and another immutably
    fn pair_mut(&mut self, target: CanvasId, source: CanvasId) -> Option<(&mut Canvas, &Canvas)> {
        let (t, s) = (target.0, source.0);
        if t == s || t >= self.canvases.len() || s >= self.canvases.len() {
            return None;
        }
        if t < s {
            let (head, tail) = self.canvases.split_at_mut(s);
            Some((&mut head[t], &tail[0]))
        } else {
            let (head, tail) = self.canvases.split_at_mut(t);
            Some((&mut tail[0], &head[s]))
        }
    }
}
