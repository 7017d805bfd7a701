//! Turning grid-space mesh vertices into world-space `(x, y, z)`
//! triples, optionally rescaled into a geographic bounding box.

/// A target 2D bounding box to linearly rescale grid-space `(x, y)`
/// coordinates into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

/// Attaches an elevation to each emitted `(x, y)` vertex, sampling
/// `heightmap` at `(x, y)` (column, then row), and optionally rescales
/// `x`/`y` from grid space (`[0, grid_size - 1]`) into `bounds`.
///
/// `flip_y` mirrors the grid's `y` axis before any rescale is applied,
/// for raster sources whose row order runs opposite to the target
/// coordinate system.
///
/// `vertices` must hold `2 * n` entries (flat `(x, y)` pairs) and
/// `heightmap` must hold `grid_size * grid_size` elevations.
pub fn rescale_positions(
    vertices: &[u16],
    heightmap: &[f32],
    grid_size: usize,
    bounds: Option<Bounds>,
    flip_y: bool,
) -> Vec<[f32; 3]> {
    assert_eq!(vertices.len() % 2, 0, "vertices must be flat (x, y) pairs");
    assert_eq!(heightmap.len(), grid_size * grid_size);

    let tile_size = (grid_size - 1) as f32;

    vertices
        .chunks_exact(2)
        .map(|pair| {
            let (x, y) = (pair[0], pair[1]);
            let z = heightmap[y as usize * grid_size + x as usize];

            let mut fx = x as f32;
            let mut fy = y as f32;
            if flip_y {
                fy = tile_size - fy;
            }

            if let Some(b) = bounds {
                fx = b.min_x + (fx / tile_size) * (b.max_x - b.min_x);
                fy = b.min_y + (fy / tile_size) * (b.max_y - b.min_y);
            }

            [fx, fy, z]
        })
        .collect()
}
