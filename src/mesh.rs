//! Top-down extraction of an indexed triangle mesh from an [`ErrorMap`]
//! at a caller-chosen tolerance.

use tracing::debug;

use crate::{error_map::ErrorMap, tileset::Tileset};

/// One fully-expanded RTIN triangle, as carried on the explicit
/// traversal stack: `a`/`b` form the long edge, `c` is the right angle.
#[derive(Debug, Clone, Copy)]
struct Triangle {
    ax: i32,
    ay: i32,
    bx: i32,
    by: i32,
    cx: i32,
    cy: i32,
}

/// A deduplicated triangle mesh: grid-space vertex positions plus
/// 0-based triangle indices into them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mesh {
    /// `(x, y)` pairs, flattened, in emission order.
    vertices: Vec<u16>,
    /// Vertex ids, grouped by three per triangle, in emission order.
    triangles: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Flat `(x, y)` vertex coordinates.
    pub fn vertices(&self) -> &[u16] {
        &self.vertices
    }

    /// Flat vertex-id triples, one per triangle.
    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    pub fn vertex(&self, id: u32) -> (u16, u16) {
        let i = id as usize * 2;
        (self.vertices[i], self.vertices[i + 1])
    }
}

/// Which of the two top-down passes a [`traverse`] call is performing.
///
/// Both passes walk the identical tree in the identical order; only what
/// happens to each emitted leaf triangle differs, so [`Extraction`] owns
/// that behavior as two plain methods rather than the traversal taking a
/// closure over whichever mutable state the caller happens to need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// First pass: assign vertex ids and count triangles.
    Count,
    /// Second pass: fill the now fully-sized output buffers.
    Fill,
}

/// Mutable state threaded through both top-down passes of [`extract_mesh`].
///
/// Phase 1 ([`Pass::Count`]) assigns every distinct grid position a
/// 1-based output vertex id via `index_grid` and tallies `triangle_count`.
/// Phase 2 ([`Pass::Fill`]) re-walks the same tree, reads the now-complete
/// `index_grid` back, and writes `vertices`/`triangles`.
struct Extraction {
    grid_size: usize,
    index_grid: Vec<u32>,
    vertex_count: u32,
    triangle_count: u32,
    vertices: Vec<u16>,
    triangles: Vec<u32>,
    next_triangle: usize,
}

impl Extraction {
    fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            index_grid: vec![0u32; grid_size * grid_size],
            vertex_count: 0,
            triangle_count: 0,
            vertices: Vec::new(),
            triangles: Vec::new(),
            next_triangle: 0,
        }
    }

    /// Allocates the output buffers once phase 1 has determined their
    /// final size, and resets the phase-2 write cursor.
    fn allocate_output(&mut self) {
        self.vertices = vec![0u16; 2 * self.vertex_count as usize];
        self.triangles = vec![0u32; 3 * self.triangle_count as usize];
        self.next_triangle = 0;
    }

    fn on_triangle(&mut self, tri: Triangle, pass: Pass) {
        match pass {
            Pass::Count => {
                for (x, y) in [(tri.ax, tri.ay), (tri.bx, tri.by), (tri.cx, tri.cy)] {
                    let idx = y as usize * self.grid_size + x as usize;
                    if self.index_grid[idx] == 0 {
                        self.vertex_count += 1;
                        self.index_grid[idx] = self.vertex_count;
                    }
                }
                self.triangle_count += 1;
            }
            Pass::Fill => {
                let va = self.index_grid[tri.ay as usize * self.grid_size + tri.ax as usize] - 1;
                let vb = self.index_grid[tri.by as usize * self.grid_size + tri.bx as usize] - 1;
                let vc = self.index_grid[tri.cy as usize * self.grid_size + tri.cx as usize] - 1;

                self.vertices[2 * va as usize] = tri.ax as u16;
                self.vertices[2 * va as usize + 1] = tri.ay as u16;
                self.vertices[2 * vb as usize] = tri.bx as u16;
                self.vertices[2 * vb as usize + 1] = tri.by as u16;
                self.vertices[2 * vc as usize] = tri.cx as u16;
                self.vertices[2 * vc as usize + 1] = tri.cy as u16;

                let t_idx = self.next_triangle;
                self.triangles[t_idx] = va;
                self.triangles[t_idx + 1] = vb;
                self.triangles[t_idx + 2] = vc;
                self.next_triangle += 3;
            }
        }
    }

    fn into_mesh(self) -> Mesh {
        Mesh {
            vertices: self.vertices,
            triangles: self.triangles,
        }
    }
}

/// Walks the RTIN tree top-down from the two coarsest triangles, in the
/// fixed order (top-right half, then bottom-left half), feeding every
/// triangle whose long edge is unit length or whose midpoint error is
/// within tolerance to `ctx` for the given `pass`.
///
/// Driven by an explicit stack (rather than native recursion) so that
/// traversal depth never threatens the call stack, regardless of grid
/// size; children are pushed right-then-left so a LIFO pop order
/// matches the left-before-right descent of the reference recursion.
fn traverse(tile_size: usize, errors: &ErrorMap, tolerance: f32, ctx: &mut Extraction, pass: Pass) {
    let t = tile_size as i32;

    let mut stack = Vec::with_capacity(2 * (tile_size.max(1).ilog2() as usize + 1));
    // Bottom-left half, pushed first so the top-right half (pushed next)
    // is popped and visited first.
    stack.push(Triangle {
        ax: t,
        ay: t,
        bx: 0,
        by: 0,
        cx: 0,
        cy: t,
    });
    stack.push(Triangle {
        ax: 0,
        ay: 0,
        bx: t,
        by: t,
        cx: t,
        cy: 0,
    });

    while let Some(tri) = stack.pop() {
        let mx = (tri.ax + tri.bx) >> 1;
        let my = (tri.ay + tri.by) >> 1;

        let long_edge = (tri.ax - tri.cx).abs() + (tri.ay - tri.cy).abs();
        let subdivide = long_edge > 1 && errors.get(mx as usize, my as usize) > tolerance;

        if subdivide {
            // Right child: (b, c, m). Pushed first so the left child
            // (pushed second) is popped first.
            stack.push(Triangle {
                ax: tri.bx,
                ay: tri.by,
                bx: tri.cx,
                by: tri.cy,
                cx: mx,
                cy: my,
            });
            // Left child: (c, a, m).
            stack.push(Triangle {
                ax: tri.cx,
                ay: tri.cy,
                bx: tri.ax,
                by: tri.ay,
                cx: mx,
                cy: my,
            });
        } else {
            ctx.on_triangle(tri, pass);
        }
    }
}

/// Extracts the coarsest mesh covering `error_map` that keeps every
/// non-leaf triangle's midpoint error within `tolerance`.
///
/// The same `(tileset, error_map, tolerance)` triple always yields a
/// bit-identical result; distinct tilesets of equal grid size and equal
/// heightmaps yield identical output too, since extraction allocates its
/// own scratch index grid rather than reusing one owned by the tileset.
pub fn extract_mesh(tileset: &Tileset, error_map: &ErrorMap, tolerance: f32) -> Mesh {
    let grid_size = tileset.grid_size();
    let tile_size = tileset.tile_size();

    let mut ctx = Extraction::new(grid_size);

    // Phase 1: count vertices/triangles and assign each distinct grid
    // position a 1-based output vertex id.
    traverse(tile_size, error_map, tolerance, &mut ctx, Pass::Count);

    // Phase 2: fill the now fully-sized output buffers, reusing the
    // index grid computed above as the handoff from phase 1.
    ctx.allocate_output();
    traverse(tile_size, error_map, tolerance, &mut ctx, Pass::Fill);

    debug!(
        "extracted RTIN mesh: grid_size={grid_size}, tolerance={tolerance}, \
         vertex_count={}, triangle_count={}",
        ctx.vertex_count, ctx.triangle_count
    );

    ctx.into_mesh()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tileset::Tileset;

    fn spike_error_map() -> (Tileset, ErrorMap) {
        let tileset = Tileset::new(3).unwrap();
        #[rustfmt::skip]
        let heightmap = vec![
            0.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 0.0,
        ];
        let error_map = ErrorMap::build(&tileset, &heightmap).unwrap();
        (tileset, error_map)
    }

    #[test]
    fn zero_tolerance_subdivides_around_the_spike() {
        let (tileset, error_map) = spike_error_map();
        let mesh = extract_mesh(&tileset, &error_map, 0.0);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.vertex_count(), 5);
    }

    #[test]
    fn tolerance_equal_to_error_still_collapses() {
        // The decision rule is strict: E[m] > tau, so tau == max error
        // does not force a subdivision.
        let (tileset, error_map) = spike_error_map();
        let mesh = extract_mesh(&tileset, &error_map, 1.0);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn constant_heightmap_collapses_to_two_triangles() {
        let tileset = Tileset::new(5).unwrap();
        let heightmap = vec![42.0f32; 25];
        let error_map = ErrorMap::build(&tileset, &heightmap).unwrap();
        let mesh = extract_mesh(&tileset, &error_map, 0.0);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn covers_the_tile_exactly() {
        use approx::assert_abs_diff_eq;

        let (tileset, error_map) = spike_error_map();
        for tolerance in [0.0, 0.5, 1.0, 2.0] {
            let mesh = extract_mesh(&tileset, &error_map, tolerance);
            let area: f64 = triangle_areas(&mesh).sum();
            let tile_size = tileset.tile_size() as f64;
            assert_abs_diff_eq!(area, tile_size * tile_size, epsilon = 1e-9);
        }
    }

    #[test]
    fn vertices_are_deduplicated_and_ids_in_range() {
        let (tileset, error_map) = spike_error_map();
        let mesh = extract_mesh(&tileset, &error_map, 0.0);

        let mut seen = std::collections::HashSet::new();
        for id in 0..mesh.vertex_count() as u32 {
            assert!(seen.insert(mesh.vertex(id)));
        }
        for &id in mesh.triangles() {
            assert!((id as usize) < mesh.vertex_count());
        }
    }

    #[test]
    fn extraction_is_deterministic() {
        let (tileset, error_map) = spike_error_map();
        let a = extract_mesh(&tileset, &error_map, 0.0);
        let b = extract_mesh(&tileset, &error_map, 0.0);
        assert_eq!(a, b);

        let tileset2 = Tileset::new(3).unwrap();
        let c = extract_mesh(&tileset2, &error_map, 0.0);
        assert_eq!(a, c);
    }

    #[test]
    fn increasing_tolerance_never_increases_mesh_size() {
        let (tileset, error_map) = spike_error_map();
        let tolerances = [0.0, 0.25, 0.5, 0.75, 1.0, 2.0];
        let mut prev_triangles = usize::MAX;
        let mut prev_vertices = usize::MAX;
        for tolerance in tolerances {
            let mesh = extract_mesh(&tileset, &error_map, tolerance);
            assert!(mesh.triangle_count() <= prev_triangles);
            assert!(mesh.vertex_count() <= prev_vertices);
            prev_triangles = mesh.triangle_count();
            prev_vertices = mesh.vertex_count();
        }
    }

    fn triangle_areas(mesh: &Mesh) -> impl Iterator<Item = f64> + '_ {
        mesh.triangles().chunks(3).map(move |t| {
            let (ax, ay) = mesh.vertex(t[0]);
            let (bx, by) = mesh.vertex(t[1]);
            let (cx, cy) = mesh.vertex(t[2]);
            let (ax, ay, bx, by, cx, cy) = (
                ax as f64, ay as f64, bx as f64, by as f64, cx as f64, cy as f64,
            );
            ((bx - ax) * (cy - ay) - (cx - ax) * (by - ay)).abs() / 2.0
        })
    }
}
