//! Surface chain painting - tiled splatmaps with seamless brush strokes
//!
//! This crate splits a terrain into a uniform grid of canvases and paints
//! across their boundaries:
//! - [`texels`] - CPU splatmap storage
//! - [`canvas`] - One tile's splatmap, bounds and neighbour links
//! - [`grid`] - Grid construction, neighbour topology and dirty tracking
//! - [`brush`] - Brush stamp compositing primitive
//! - [`stroke`] - Maps one input sample onto every canvas in reach
//! - [`stitch`] - Copies shared borders between painted neighbours
//! - [`chain`] - Host-facing entry point

pub mod bounds;
pub mod brush;
pub mod canvas;
pub mod chain;
pub mod constants;
pub mod grid;
pub mod scratch;
pub mod stitch;
pub mod stroke;
pub mod texels;
pub mod validation;

pub use bounds::*;
pub use brush::*;
pub use canvas::*;
pub use chain::*;
pub use constants::*;
pub use grid::*;
pub use scratch::*;
pub use stitch::*;
pub use stroke::*;
pub use texels::*;
pub use validation::*;

pub use surface_chain_config::{
    BrushConfig, ChainConfig, DisplacementConfig, GridLayout, TexelFormat,
};
