//! Neighbour wiring between canvases

use super::CanvasId;
use crate::canvas::Canvas;

/// Wire `left` and `top` links for row-ordered canvases.
///
/// For `x >= 1` and `z < z_tiles - 1`, `(x, z)` gets `left = (x - 1, z)` and
/// `top = (x, z + 1)`. Every other link stays `None`: the first column has no
/// left neighbour, and the topmost row is never wired, so it has neither link.
pub(super) fn wire_neighbours(canvases: &mut [Canvas], x_tiles: u32, z_tiles: u32) {
    let index = |x: u32, z: u32| z as usize * x_tiles as usize + x as usize;

    for canvas in canvases.iter_mut() {
        canvas.left = None;
        canvas.top = None;
    }

    for z in 0..z_tiles.saturating_sub(1) {
        for x in 1..x_tiles {
            let current = &mut canvases[index(x, z)];
            current.left = Some(CanvasId(index(x - 1, z)));
            current.top = Some(CanvasId(index(x, z + 1)));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::{GridCoord, SurfaceGrid};
    use surface_chain_config::{GridLayout, TexelFormat};

    fn grid(x_tiles: u32, z_tiles: u32) -> SurfaceGrid {
        let layout = GridLayout {
            x_tiles,
            z_tiles,
            tile_width: 10.0,
            tile_length: 10.0,
            texture_size: 4,
            format: TexelFormat::R8,
            origin: [0.0; 3],
        };
        SurfaceGrid::new(&layout, None).unwrap()
    }

    #[test]
    fn test_wired_range() {
        let grid = grid(4, 3);
        for x in 1..4 {
            for z in 0..2 {
                let canvas = grid.get(GridCoord::new(x, z)).unwrap();
                assert_eq!(canvas.left(), grid.id_at(x - 1, z));
                assert_eq!(canvas.top(), grid.id_at(x, z + 1));
            }
        }
    }

    #[test]
    fn test_first_column_unwired() {
        let grid = grid(4, 3);
        for z in 0..3 {
            let canvas = grid.get(GridCoord::new(0, z)).unwrap();
            assert_eq!(canvas.left(), None);
            assert_eq!(canvas.top(), None);
        }
    }

    #[test]
    fn test_top_row_unwired() {
        let grid = grid(4, 3);
        for x in 0..4 {
            let canvas = grid.get(GridCoord::new(x, 2)).unwrap();
            assert_eq!(canvas.left(), None);
            assert_eq!(canvas.top(), None);
        }
    }

    #[test]
    fn test_single_row_has_no_links() {
        let grid = grid(3, 1);
        assert!(grid.iter().all(|(_, c)| c.left().is_none() && c.top().is_none()));
    }

    #[test]
    fn test_links_point_at_neighbour_cells() {
        let grid = grid(3, 3);
        for (_, canvas) in grid.iter() {
            let coord = canvas.coord();
            if let Some(left) = canvas.left() {
                assert_eq!(grid.canvas(left).unwrap().coord(), GridCoord::new(coord.x - 1, coord.z));
            }
            if let Some(top) = canvas.top() {
                assert_eq!(grid.canvas(top).unwrap().coord(), GridCoord::new(coord.x, coord.z + 1));
            }
        }
    }
}
