//! Bottom-up computation of per-grid-cell maximum approximation error.

use tracing::debug;

use crate::{
    errors::{Result, RtinError},
    tileset::Tileset,
};

/// Maximum approximation error observed at every grid cell, for one
/// heightmap bound to one [`Tileset`].
///
/// `E[y * grid_size + x]` is the worst-case error over all triangles
/// whose long-edge midpoint lands on `(x, y)`, propagated upward so that
/// every ancestor's slot is at least as large as both its children's.
#[derive(Debug, Clone)]
pub struct ErrorMap {
    grid_size: usize,
    errors: Vec<f32>,
}

impl ErrorMap {
    /// Builds the error map for `heightmap` against `tileset`.
    ///
    /// `heightmap` must hold exactly `grid_size * grid_size` elevations
    /// in row-major order, stride `grid_size`.
    pub fn build(tileset: &Tileset, heightmap: &[f32]) -> Result<Self> {
        let grid_size = tileset.grid_size();
        let expected = grid_size * grid_size;
        if heightmap.len() != expected {
            return Err(RtinError::HeightmapSizeMismatch {
                grid_size,
                expected,
                actual: heightmap.len(),
            });
        }

        let mut errors = vec![0f32; expected];
        let num_triangles = tileset.num_triangles();
        let num_parent_triangles = tileset.num_parent_triangles();

        // Leaves first: by the time a parent triangle is visited, both of
        // its children's midpoint slots are already final.
        for i in (0..num_triangles).rev() {
            let tri = tileset.triangle(i);
            let (ax, ay, bx, by) = (tri.ax as usize, tri.ay as usize, tri.bx as usize, tri.by as usize);

            let mx = (tri.ax + tri.bx) >> 1;
            let my = (tri.ay + tri.by) >> 1;
            let cx = mx + my - tri.ay;
            let cy = my + tri.ax - mx;

            let m_idx = my as usize * grid_size + mx as usize;

            let interpolated = (heightmap[ay * grid_size + ax] + heightmap[by * grid_size + bx]) / 2.0;
            let err = (interpolated - heightmap[m_idx]).abs();
            if err > errors[m_idx] {
                errors[m_idx] = err;
            }

            if i < num_parent_triangles {
                let left_idx = (((tri.ay + cy) >> 1) as usize) * grid_size + (((tri.ax + cx) >> 1) as usize);
                let right_idx = (((tri.by + cy) >> 1) as usize) * grid_size + (((tri.bx + cx) >> 1) as usize);
                let child_max = errors[left_idx].max(errors[right_idx]);
                if child_max > errors[m_idx] {
                    errors[m_idx] = child_max;
                }
            }
        }

        debug!("built RTIN error map: grid_size={grid_size}, num_triangles={num_triangles}");

        Ok(Self { grid_size, errors })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Error at grid cell `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.errors[y * self.grid_size + x]
    }

    /// Largest error anywhere in the map (the tolerance above which a
    /// mesh collapses to the two coarsest triangles).
    pub fn max_error(&self) -> f32 {
        self.errors.iter().copied().fold(0.0, f32::max)
    }

    pub(crate) fn errors(&self) -> &[f32] {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_heightmap_length() {
        let tileset = Tileset::new(5).unwrap();
        let heightmap = vec![0f32; 5 * 5 - 1];
        assert!(matches!(
            ErrorMap::build(&tileset, &heightmap),
            Err(RtinError::HeightmapSizeMismatch {
                grid_size: 5,
                expected: 25,
                actual: 24,
            })
        ));
    }

    #[test]
    fn constant_heightmap_has_zero_error() {
        let tileset = Tileset::new(5).unwrap();
        let heightmap = vec![42.0f32; 5 * 5];
        let error_map = ErrorMap::build(&tileset, &heightmap).unwrap();
        assert_eq!(error_map.max_error(), 0.0);
        for y in 0..5 {
            for x in 0..5 {
                assert_eq!(error_map.get(x, y), 0.0);
            }
        }
    }

    #[test]
    fn single_spike_produces_expected_center_error() {
        // G = 3, heightmap with a +1 spike at the center.
        let tileset = Tileset::new(3).unwrap();
        #[rustfmt::skip]
        let heightmap = vec![
            0.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 0.0,
        ];
        let error_map = ErrorMap::build(&tileset, &heightmap).unwrap();
        // The center vertex is the midpoint of both coarsest triangles'
        // long edges; its interpolated height is 0, actual is 1.
        assert_eq!(error_map.get(1, 1), 1.0);
        // Corners are never anybody's midpoint at this grid size.
        assert_eq!(error_map.get(0, 0), 0.0);
    }

    #[test]
    fn monotone_upward_over_children() {
        let tileset = Tileset::new(17).unwrap();
        let heightmap: Vec<f32> = (0..17 * 17).map(|i| ((i * 37) % 13) as f32).collect();
        let error_map = ErrorMap::build(&tileset, &heightmap).unwrap();

        for i in 0..tileset.num_parent_triangles() {
            let tri = tileset.triangle(i);
            let mx = (tri.ax + tri.bx) >> 1;
            let my = (tri.ay + tri.by) >> 1;
            let cx = mx + my - tri.ay;
            let cy = my + tri.ax - mx;
            let left = error_map.get(
                ((tri.ax + cx) >> 1) as usize,
                ((tri.ay + cy) >> 1) as usize,
            );
            let right = error_map.get(
                ((tri.bx + cx) >> 1) as usize,
                ((tri.by + cy) >> 1) as usize,
            );
            let parent = error_map.get(mx as usize, my as usize);
            assert!(parent >= left && parent >= right);
        }
    }
}
