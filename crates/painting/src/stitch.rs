//! Edge stitching between canvases painted by the same stroke
//!
//! After a stroke, each affected canvas pulls the one-texel border from its
//! `top` and then its `left` neighbour so adjacent tiles meet seamlessly.
//! A border is only pulled when the neighbour was painted by the same stroke.

use std::collections::HashSet;

use tracing::trace;

use crate::grid::{CanvasId, SurfaceGrid};

/// Stitch the borders of a set of freshly painted canvases.
///
/// Runs a full top pass before the left pass. Canvases outside `affected`
/// are never read or written. Returns the number of borders copied.
pub fn stitch(grid: &mut SurfaceGrid, affected: &[CanvasId]) -> usize {
    let painted: HashSet<CanvasId> = affected.iter().copied().collect();
    let mut copied = 0;

    for &id in affected {
        let top = grid.canvas(id).and_then(|canvas| canvas.top());
        if top.is_some_and(|top| painted.contains(&top)) {
            grid.fetch_top_edge(id);
            copied += 1;
        }
    }

    for &id in affected {
        let left = grid.canvas(id).and_then(|canvas| canvas.left());
        if left.is_some_and(|left| painted.contains(&left)) {
            grid.fetch_left_edge(id);
            copied += 1;
        }
    }

    trace!("stitch: {} canvases, {} borders copied", affected.len(), copied);
    copied
}
