//! Precomputed, tolerance-independent triangle coordinate table for a
//! square grid of a given size.
//!
//! A [`Tileset`] holds nothing but the implicit-binary-tree coordinate
//! table described in the crate's module-level documentation. It is
//! immutable after construction and can be shared (by reference) across
//! any number of [`crate::error_map::ErrorMap`] builds and mesh
//! extractions.

use tracing::debug;

use crate::errors::{Result, RtinError};

/// Largest grid size this crate supports.
///
/// `grid_size` is bounded so that `u16` coordinate storage never wraps:
/// coordinates run from `0` to `grid_size - 1`, and `grid_size - 1` must
/// therefore fit in a `u16` with one value to spare for the `grid_size`
/// itself when used as a length.
pub const MAX_GRID_SIZE: usize = 32769;

/// Coordinates of a single RTIN triangle: `a` and `b` form the long edge
/// (hypotenuse); `c` is the right-angle vertex, recoverable from `a`/`b`
/// but not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleCoords {
    pub ax: i32,
    pub ay: i32,
    pub bx: i32,
    pub by: i32,
}

/// The precomputed coordinate table for every triangle in the recursive
/// bisection of a `tile_size x tile_size` tile.
///
/// Construction fails if `grid_size - 1` is not a positive power of two
/// (see [`RtinError::InvalidGridSize`]).
#[derive(Debug, Clone)]
pub struct Tileset {
    grid_size: usize,
    tile_size: usize,
    num_triangles: usize,
    num_parent_triangles: usize,
    /// `4 * num_triangles` entries: `(ax, ay, bx, by)` per triangle, in
    /// tree-id order (coarsest first).
    coords: Vec<u16>,
}

impl Tileset {
    /// Builds the coordinate table for a grid of side `grid_size`
    /// vertices (`grid_size = tile_size + 1`, `tile_size` a power of two).
    pub fn new(grid_size: usize) -> Result<Self> {
        if grid_size < 2 || grid_size > MAX_GRID_SIZE {
            return Err(RtinError::InvalidGridSize {
                grid_size,
                max: MAX_GRID_SIZE,
            });
        }
        let tile_size = grid_size - 1;
        if tile_size < 2 || !tile_size.is_power_of_two() {
            return Err(RtinError::InvalidGridSize {
                grid_size,
                max: MAX_GRID_SIZE,
            });
        }

        let num_triangles = 2 * tile_size * tile_size - 2;
        let num_parent_triangles = num_triangles - tile_size * tile_size;
        let mut coords = vec![0u16; 4 * num_triangles];

        let t = tile_size as i32;
        for i in 0..num_triangles {
            let mut id = i + 2;

            let (mut ax, mut ay, mut bx, mut by, mut cx, mut cy): (i32, i32, i32, i32, i32, i32) =
                (0, 0, 0, 0, 0, 0);

            if id & 1 == 1 {
                // bottom-left half
                bx = t;
                by = t;
                cx = t;
            } else {
                // top-right half
                ax = t;
                ay = t;
                cy = t;
            }

            id >>= 1;
            while id > 1 {
                let mx = (ax + bx) >> 1;
                let my = (ay + by) >> 1;

                if id & 1 == 1 {
                    // descend left
                    bx = ax;
                    by = ay;
                    ax = cx;
                    ay = cy;
                } else {
                    // descend right
                    ax = bx;
                    ay = by;
                    bx = cx;
                    by = cy;
                }
                cx = mx;
                cy = my;

                id >>= 1;
            }

            let k = i * 4;
            coords[k] = ax as u16;
            coords[k + 1] = ay as u16;
            coords[k + 2] = bx as u16;
            coords[k + 3] = by as u16;
        }

        debug!(
            "built RTIN tileset: grid_size={grid_size}, tile_size={tile_size}, \
             num_triangles={num_triangles}, num_parent_triangles={num_parent_triangles}"
        );

        Ok(Self {
            grid_size,
            tile_size,
            num_triangles,
            num_parent_triangles,
            coords,
        })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Total number of triangles across every level of subdivision.
    pub fn num_triangles(&self) -> usize {
        self.num_triangles
    }

    /// Number of triangles that have children (all but the finest level).
    pub fn num_parent_triangles(&self) -> usize {
        self.num_parent_triangles
    }

    /// Raw `(ax, ay, bx, by)` coordinate table, four `u16`s per triangle.
    pub fn coords(&self) -> &[u16] {
        &self.coords
    }

    /// Coordinates of triangle `i`, widened to `i32` for arithmetic.
    pub(crate) fn triangle(&self, i: usize) -> TriangleCoords {
        let k = i * 4;
        TriangleCoords {
            ax: self.coords[k] as i32,
            ay: self.coords[k + 1] as i32,
            bx: self.coords[k + 2] as i32,
            by: self.coords[k + 3] as i32,
        }
    }
}
