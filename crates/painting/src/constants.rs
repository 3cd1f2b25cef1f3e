/// Width in texels of the border copied between neighbouring canvases.
pub const EDGE_WIDTH: u32 = 1;

/// Tolerance when comparing tile world sizes for grid uniformity.
pub const TILE_SIZE_EPSILON: f32 = 1e-4;

/// Maximum number of pooled scratch buffers kept per buffer shape.
pub const MAX_SCRATCH_PER_SHAPE: usize = 4;
