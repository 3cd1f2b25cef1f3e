//! Surface chain: the host-facing painting entry point
//!
//! This module connects:
//! - Host input (paint button state and a ray hit, via [`PaintInput`])
//! - The stroke coordinator (affected set, UV reprojection, stitching)
//! - The grid of canvases and their dirty tracking for texture upload
//!
//! The host calls [`SurfaceChain::tick`] once per input sample, or
//! [`SurfaceChain::handle_stroke`] directly when it already has a hit.

use surface_chain_config::ChainConfig;
use tracing::debug;

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

use crate::brush::{BrushStamp, RadialBrush};
use crate::grid::{CanvasId, SurfaceGrid};
use crate::scratch::ScratchPool;
use crate::stroke::{StrokeCoordinator, StrokeEvent, StrokeOutcome};
use crate::validation::GridError;

/// Input collaborator sampled once per tick
pub trait PaintInput {
    /// Whether the paint button is held
    fn paint_held(&self) -> bool;

    /// Cast the pointer ray against the tile geometry.
    /// `None` if the ray hit nothing at all
    fn raycast(&self) -> Option<StrokeEvent>;
}

/// A painted terrain: grid, brush and stroke handling
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct SurfaceChain {
    grid: SurfaceGrid,
    coordinator: StrokeCoordinator,
    stamp: Box<dyn BrushStamp>,
    scratch: ScratchPool,
}

impl SurfaceChain {
    /// Build a chain with the default radial brush
    pub fn new(config: &ChainConfig) -> Result<Self, GridError> {
        let stamp = RadialBrush::from_config(&config.brush);
        Self::with_stamp(config, Box::new(stamp))
    }

    /// Build a chain with a custom brush stamp
    pub fn with_stamp(config: &ChainConfig, stamp: Box<dyn BrushStamp>) -> Result<Self, GridError> {
        let grid = SurfaceGrid::new(&config.layout, Some(&config.displacement))?;
        Ok(Self::from_grid(grid, config, stamp))
    }

    /// Wrap an existing grid, e.g. one built with [`SurfaceGrid::from_canvases`]
    pub fn from_grid(grid: SurfaceGrid, config: &ChainConfig, stamp: Box<dyn BrushStamp>) -> Self {
        Self {
            grid,
            coordinator: StrokeCoordinator::new(config.brush),
            stamp,
            scratch: ScratchPool::new(),
        }
    }

    /// Process one input sample
    pub fn tick(&mut self, input: &impl PaintInput) -> StrokeOutcome {
        if !input.paint_held() {
            return StrokeOutcome::Idle;
        }
        let Some(hit) = input.raycast() else {
            debug!("SurfaceChain::tick: ray hit nothing");
            return StrokeOutcome::Missed;
        };
        self.handle_stroke(&hit)
    }

    /// Paint one stroke event
    pub fn handle_stroke(&mut self, hit: &StrokeEvent) -> StrokeOutcome {
        self.coordinator
            .handle_stroke(hit, &mut self.grid, self.stamp.as_ref(), &mut self.scratch)
    }

    /// Get reference to the grid
    pub fn grid(&self) -> &SurfaceGrid {
        &self.grid
    }

    /// Get mutable access to the grid (for seeding splatmaps)
    pub fn grid_mut(&mut self) -> &mut SurfaceGrid {
        &mut self.grid
    }

    /// Get the stroke coordinator
    pub fn coordinator(&self) -> &StrokeCoordinator {
        &self.coordinator
    }

    /// Replace the brush stamp
    pub fn set_stamp(&mut self, stamp: Box<dyn BrushStamp>) {
        self.stamp = stamp;
    }

    /// Take dirty canvases for texture upload
    pub fn take_dirty(&mut self) -> Vec<CanvasId> {
        self.grid.take_dirty()
    }

    /// Get raw splatmap bytes of a canvas for texture upload
    pub fn splatmap_bytes(&self, id: CanvasId) -> Option<&[u8]> {
        self.grid.canvas(id).map(|canvas| canvas.splatmap().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use surface_chain_config::{BrushConfig, GridLayout, TexelFormat};

    struct FakeInput {
        held: bool,
        hit: Option<StrokeEvent>,
    }

    impl PaintInput for FakeInput {
        fn paint_held(&self) -> bool {
            self.held
        }

        fn raycast(&self) -> Option<StrokeEvent> {
            self.hit
        }
    }

    fn config() -> ChainConfig {
        ChainConfig {
            layout: GridLayout {
                x_tiles: 2,
                z_tiles: 2,
                tile_width: 10.0,
                tile_length: 10.0,
                texture_size: 4,
                format: TexelFormat::R8,
                origin: [0.0; 3],
            },
            brush: BrushConfig {
                size: 3.0,
                smooth: 1.0,
                strength: 0.5,
            },
            ..Default::default()
        }
    }

    fn centre_hit(chain: &SurfaceChain) -> StrokeEvent {
        let id = chain.grid().id_at(0, 0).unwrap();
        StrokeEvent::new(Vec3::new(5.0, 0.0, 5.0), id, Vec2::splat(0.5))
    }

    #[test]
    fn test_chain_creation() {
        let config = config();
        let chain = SurfaceChain::new(&config).unwrap();
        assert_eq!(chain.grid().len(), 4);
        assert_eq!(chain.coordinator().brush().size, 3.0);
        // Displacement state copied into every canvas
        assert!(chain
            .grid()
            .iter()
            .all(|(_, c)| c.material() == Some(&config.displacement)));
    }

    #[test]
    fn test_chain_rejects_bad_layout() {
        let mut config = config();
        config.layout.texture_size = 0;
        assert!(matches!(SurfaceChain::new(&config), Err(GridError::ZeroResolution)));
    }

    #[test]
    fn test_tick_idle_without_button() {
        let mut chain = SurfaceChain::new(&config()).unwrap();
        let input = FakeInput {
            held: false,
            hit: Some(centre_hit(&chain)),
        };
        assert_eq!(chain.tick(&input), StrokeOutcome::Idle);
        assert!(chain.take_dirty().is_empty());
    }

    #[test]
    fn test_tick_missed_ray() {
        let mut chain = SurfaceChain::new(&config()).unwrap();
        let input = FakeInput { held: true, hit: None };
        assert_eq!(chain.tick(&input), StrokeOutcome::Missed);
    }

    #[test]
    fn test_tick_paints() {
        let mut chain = SurfaceChain::new(&config()).unwrap();
        let input = FakeInput {
            held: true,
            hit: Some(centre_hit(&chain)),
        };

        let outcome = chain.tick(&input);
        let origin = chain.grid().id_at(0, 0).unwrap();
        assert_eq!(outcome.affected(), &[origin]);

        let dirty = chain.take_dirty();
        assert_eq!(dirty, vec![origin]);
        let canvas = chain.grid().canvas(origin).unwrap();
        assert!(canvas.splatmap().total() > 0.0);
    }

    #[test]
    fn test_repeated_strokes_accumulate_and_clamp() {
        let mut chain = SurfaceChain::new(&config()).unwrap();
        let hit = centre_hit(&chain);
        let origin = hit.canvas.unwrap();

        chain.handle_stroke(&hit);
        let once = chain.grid().canvas(origin).unwrap().splatmap().value(1, 1).unwrap();
        for _ in 0..5 {
            chain.handle_stroke(&hit);
        }
        let many = chain.grid().canvas(origin).unwrap().splatmap().value(1, 1).unwrap();

        assert!(once > 0.0);
        assert!(many > once);
        // R8 is normalized
        assert!(many <= 1.0);
    }

    #[test]
    fn test_custom_stamp() {
        struct Fill;
        impl BrushStamp for Fill {
            fn composite(
                &self,
                _base: &crate::texels::TexelBuffer,
                target: &mut crate::texels::TexelBuffer,
                _center: Vec2,
                _size: f32,
            ) {
                target.fill(1.0);
            }
        }

        let mut chain = SurfaceChain::with_stamp(&config(), Box::new(Fill)).unwrap();
        let hit = centre_hit(&chain);
        chain.handle_stroke(&hit);

        let bytes = chain.splatmap_bytes(hit.canvas.unwrap()).unwrap();
        assert_eq!(bytes.len(), 16 * 4);
        assert_eq!(chain.grid().canvas(hit.canvas.unwrap()).unwrap().splatmap().total(), 16.0);
    }

    #[test]
    fn test_set_stamp_replaces_brush() {
        struct Clear;
        impl BrushStamp for Clear {
            fn composite(
                &self,
                _base: &crate::texels::TexelBuffer,
                target: &mut crate::texels::TexelBuffer,
                _center: Vec2,
                _size: f32,
            ) {
                target.fill(0.0);
            }
        }

        let mut chain = SurfaceChain::new(&config()).unwrap();
        let hit = centre_hit(&chain);
        let origin = hit.canvas.unwrap();
        chain.handle_stroke(&hit);
        assert!(chain.grid().canvas(origin).unwrap().splatmap().total() > 0.0);

        chain.set_stamp(Box::new(Clear));
        chain.handle_stroke(&hit);
        assert_eq!(chain.grid().canvas(origin).unwrap().splatmap().total(), 0.0);
    }

    #[test]
    fn test_strokes_reuse_scratch_buffers() {
        let mut chain = SurfaceChain::new(&config()).unwrap();
        // On the shared border so two canvases are painted per stroke
        let origin = chain.grid().id_at(0, 0).unwrap();
        let hit = StrokeEvent::new(Vec3::new(10.0, 0.0, 5.0), origin, Vec2::new(1.0, 0.5));

        chain.handle_stroke(&hit);
        let after_first = chain.scratch.pooled_count();
        for _ in 0..10 {
            chain.handle_stroke(&hit);
        }

        assert_eq!(after_first, 1);
        assert_eq!(chain.scratch.pooled_count(), after_first);
    }
}
