//! Canvas: one tile's splatmap, bounds and neighbour links

use glam::{Vec2, Vec3};
use surface_chain_config::{DisplacementConfig, TexelFormat};
use tracing::{debug, trace};

use crate::bounds::TileBounds;
use crate::brush::BrushStamp;
use crate::constants::EDGE_WIDTH;
use crate::grid::{CanvasId, GridCoord};
use crate::scratch::ScratchPool;
use crate::texels::TexelBuffer;

/// A paintable tile of the surface chain.
///
/// Neighbour links are ids into the owning grid, never ownership. They are
/// wired once by the grid and stay `None` at the outer edges.
#[derive(Debug, Clone)]
pub struct Canvas {
    coord: GridCoord,
    bounds: TileBounds,
    splatmap: TexelBuffer,
    pub(crate) left: Option<CanvasId>,
    pub(crate) top: Option<CanvasId>,
    material: Option<DisplacementConfig>,
    pub(crate) dirty: bool,
}

impl Canvas {
    /// Create a canvas with a zeroed `resolution` x `resolution` splatmap.
    ///
    /// `material` is the displacement state of the managing chain, when there
    /// is one; it is copied once and never read back.
    pub fn new(
        coord: GridCoord,
        bounds: TileBounds,
        resolution: u32,
        format: TexelFormat,
        material: Option<&DisplacementConfig>,
    ) -> Self {
        Self {
            coord,
            bounds,
            splatmap: TexelBuffer::new(resolution, resolution, format),
            left: None,
            top: None,
            material: material.copied(),
            dirty: false,
        }
    }

    #[inline]
    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    #[inline]
    pub fn bounds(&self) -> &TileBounds {
        &self.bounds
    }

    #[inline]
    pub fn splatmap(&self) -> &TexelBuffer {
        &self.splatmap
    }

    /// Mutable splatmap access for seeding initial data. Marks the canvas dirty
    pub fn splatmap_mut(&mut self) -> &mut TexelBuffer {
        self.dirty = true;
        &mut self.splatmap
    }

    #[inline]
    pub fn left(&self) -> Option<CanvasId> {
        self.left
    }

    #[inline]
    pub fn top(&self) -> Option<CanvasId> {
        self.top
    }

    /// Displacement parameters copied at creation
    #[inline]
    pub fn material(&self) -> Option<&DisplacementConfig> {
        self.material.as_ref()
    }

    /// Whether the splatmap changed since the last upload
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// World units to UV units.
    ///
    /// Uses the larger of the per-axis factors so a stamp is never smaller
    /// than requested on the more compressed axis.
    pub fn world_to_uv_scale(&self) -> f32 {
        let size = self.bounds.ground_size();
        (1.0 / size.x).max(1.0 / size.y)
    }

    /// UV coordinate of a world position (unclamped)
    pub fn world_to_uv(&self, point: Vec3) -> Vec2 {
        let min = self.bounds.min();
        (Vec2::new(point.x, point.z) - Vec2::new(min.x, min.z)) / self.bounds.ground_size()
    }

    /// World position of a UV coordinate on the ground plane
    pub fn uv_to_world(&self, uv: Vec2) -> Vec3 {
        let min = self.bounds.min();
        let offset = uv * self.bounds.ground_size();
        Vec3::new(min.x + offset.x, min.y, min.z + offset.y)
    }

    /// Composite a brush stamp onto the splatmap.
    ///
    /// The current texels are snapshotted into a pooled scratch buffer, the
    /// stamp composites scratch into the splatmap, and the scratch goes back
    /// to the pool when this returns.
    ///
    /// # Arguments
    /// * `uv` - Stamp centre in this canvas's UV space (may lie outside 0..1)
    /// * `brush` - Compositing primitive
    /// * `radius` - Brush radius in world units
    /// * `scratch` - Pool providing the snapshot buffer
    pub fn apply_brush(
        &mut self,
        uv: Vec2,
        brush: &dyn BrushStamp,
        radius: f32,
        scratch: &mut ScratchPool,
    ) {
        let size = radius * self.world_to_uv_scale();
        debug!(
            "Canvas::apply_brush: coord=({}, {}), uv=({:.3}, {:.3}), size={:.4}",
            self.coord.x, self.coord.z, uv.x, uv.y, size
        );

        let snapshot = scratch.snapshot(&self.splatmap);
        brush.composite(&snapshot, &mut self.splatmap, uv, size);
        self.dirty = true;
    }

    /// Copy the left neighbour's rightmost column into this canvas's leftmost column
    pub(crate) fn pull_left_edge(&mut self, left: &Canvas) {
        let source = &left.splatmap;
        for i in 0..EDGE_WIDTH.min(source.width) {
            self.splatmap
                .copy_column_from(source, source.width - 1 - i, i);
        }
        trace!(
            "Canvas ({}, {}) pulled left edge from ({}, {})",
            self.coord.x, self.coord.z, left.coord.x, left.coord.z
        );
        self.dirty = true;
    }

    /// Copy the top neighbour's bottom row into this canvas's top row
    pub(crate) fn pull_top_edge(&mut self, top: &Canvas) {
        let height = self.splatmap.height;
        for i in 0..EDGE_WIDTH.min(height) {
            self.splatmap.copy_row_from(&top.splatmap, i, height - 1 - i);
        }
        trace!(
            "Canvas ({}, {}) pulled top edge from ({}, {})",
            self.coord.x, self.coord.z, top.coord.x, top.coord.z
        );
        self.dirty = true;
    }
}
