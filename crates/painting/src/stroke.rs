//! Stroke coordination across tile boundaries
//!
//! One input sample produces one [`StrokeEvent`]. The coordinator finds every
//! canvas within brush reach of the hit point, reprojects the hit UV into each
//! canvas's own UV frame, paints them and stitches the shared borders.

use glam::{Vec2, Vec3};
use surface_chain_config::BrushConfig;
use tracing::{debug, warn};

use crate::brush::BrushStamp;
use crate::grid::{CanvasId, SurfaceGrid};
use crate::scratch::ScratchPool;
use crate::stitch::stitch;

/// A single ray hit against the tile geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeEvent {
    /// World-space hit point
    pub point: Vec3,
    /// Canvas whose tile was struck, if any
    pub canvas: Option<CanvasId>,
    /// Hit coordinate in the struck canvas's UV space (0..1)
    pub uv: Vec2,
}

impl StrokeEvent {
    pub fn new(point: Vec3, canvas: CanvasId, uv: Vec2) -> Self {
        Self {
            point,
            canvas: Some(canvas),
            uv,
        }
    }

    /// A hit that landed on geometry which is not part of the chain
    pub fn missed(point: Vec3) -> Self {
        Self {
            point,
            canvas: None,
            uv: Vec2::ZERO,
        }
    }
}

/// What a stroke did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrokeOutcome {
    /// No paint input this tick
    Idle,
    /// The stroke hit no canvas and was discarded
    Missed,
    /// Canvases were painted; `affected` starts with `origin`
    Painted {
        origin: CanvasId,
        affected: Vec<CanvasId>,
    },
}

impl StrokeOutcome {
    /// Canvases painted by the stroke
    pub fn affected(&self) -> &[CanvasId] {
        match self {
            StrokeOutcome::Painted { affected, .. } => affected,
            _ => &[],
        }
    }
}

/// Maps strokes onto the canvases of a grid
#[derive(Debug, Clone)]
pub struct StrokeCoordinator {
    brush: BrushConfig,
}

impl StrokeCoordinator {
    pub fn new(brush: BrushConfig) -> Self {
        Self { brush }
    }

    /// Brush parameters used by every stroke
    pub fn brush(&self) -> &BrushConfig {
        &self.brush
    }

    /// Origin plus every other canvas whose bounds lie within brush size of
    /// `point` (inclusive), in grid order
    pub fn affected_set(&self, grid: &SurfaceGrid, origin: CanvasId, point: Vec3) -> Vec<CanvasId> {
        let reach = self.brush.size * self.brush.size;
        let mut affected = vec![origin];
        affected.extend(
            grid.iter()
                .filter(|(id, canvas)| {
                    *id != origin && canvas.bounds().sqr_distance(point) <= reach
                })
                .map(|(id, _)| id),
        );
        affected
    }

    /// Reproject a UV from the origin canvas into `target`'s UV frame.
    ///
    /// Relies on every tile sharing one world size.
    pub fn reproject_uv(grid: &SurfaceGrid, origin: CanvasId, target: CanvasId, uv: Vec2) -> Vec2 {
        if origin == target {
            return uv;
        }
        let (Some(origin), Some(target)) = (grid.canvas(origin), grid.canvas(target)) else {
            return uv;
        };
        let delta = target.bounds().min() - origin.bounds().min();
        uv - Vec2::new(delta.x, delta.z) / grid.tile_size()
    }

    /// Paint one stroke and stitch the canvases it touched.
    ///
    /// A stroke without an origin canvas, or with an origin the grid does not
    /// contain, is discarded.
    pub fn handle_stroke(
        &self,
        hit: &StrokeEvent,
        grid: &mut SurfaceGrid,
        stamp: &dyn BrushStamp,
        scratch: &mut ScratchPool,
    ) -> StrokeOutcome {
        let Some(origin) = hit.canvas else {
            return StrokeOutcome::Missed;
        };
        if grid.canvas(origin).is_none() {
            warn!("handle_stroke: {:?} is not part of the grid, stroke discarded", origin);
            return StrokeOutcome::Missed;
        }

        let affected = self.affected_set(grid, origin, hit.point);
        debug!(
            "handle_stroke: origin={:?}, point=({:.2}, {:.2}, {:.2}), {} canvases affected",
            origin,
            hit.point.x,
            hit.point.y,
            hit.point.z,
            affected.len()
        );

        for &id in &affected {
            let uv = Self::reproject_uv(grid, origin, id, hit.uv);
            if let Some(canvas) = grid.canvas_mut(id) {
                canvas.apply_brush(uv, stamp, self.brush.size, scratch);
            }
        }

        stitch(grid, &affected);

        StrokeOutcome::Painted { origin, affected }
    }
}
