//! Dirty tracking for splatmap upload

use super::{CanvasId, SurfaceGrid};

impl SurfaceGrid {
    /// Get all dirty canvases and clear their dirty flags
    pub fn take_dirty(&mut self) -> Vec<CanvasId> {
        self.canvases
            .iter_mut()
            .enumerate()
            .filter(|(_, canvas)| canvas.dirty)
            .map(|(index, canvas)| {
                canvas.dirty = false;
                CanvasId(index)
            })
            .collect()
    }

    /// Check if any canvas is dirty
    #[inline]
    pub fn has_dirty(&self) -> bool {
        self.canvases.iter().any(|canvas| canvas.dirty)
    }

    /// Get the number of dirty canvases
    pub fn dirty_count(&self) -> usize {
        self.canvases.iter().filter(|canvas| canvas.dirty).count()
    }

    /// Mark every canvas dirty (e.g. after the renderer lost its textures)
    pub fn mark_all_dirty(&mut self) {
        for canvas in &mut self.canvases {
            canvas.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::SurfaceGrid;
    use surface_chain_config::GridLayout;

    fn grid() -> SurfaceGrid {
        let layout = GridLayout {
            x_tiles: 2,
            z_tiles: 2,
            texture_size: 4,
            ..Default::default()
        };
        SurfaceGrid::new(&layout, None).unwrap()
    }

    #[test]
    fn test_fresh_grid_clean() {
        let grid = grid();
        assert!(!grid.has_dirty());
        assert_eq!(grid.dirty_count(), 0);
    }

    #[test]
    fn test_take_dirty() {
        let mut grid = grid();
        let id = grid.id_at(1, 0).unwrap();
        grid.canvas_mut(id).unwrap().splatmap_mut().fill(0.5);

        assert_eq!(grid.take_dirty(), vec![id]);
        // After taking, should be empty
        assert!(!grid.has_dirty());
    }

    #[test]
    fn test_mark_all_dirty() {
        let mut grid = grid();
        grid.mark_all_dirty();
        assert_eq!(grid.dirty_count(), 4);
        assert_eq!(grid.take_dirty().len(), 4);
    }
}
