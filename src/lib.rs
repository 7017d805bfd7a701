//! Adaptive triangle mesh generation for square heightmaps, using the
//! Right-Triangulated Irregular Network (RTIN) scheme.
//!
//! The crate precomputes every right-isoceles triangle produced by
//! recursive long-edge bisection of a power-of-two tile
//! ([`tileset::Tileset`]), assigns each an approximation error against a
//! concrete heightmap ([`error_map::ErrorMap`]), and extracts the
//! coarsest covering mesh that keeps every error within a caller-given
//! tolerance ([`mesh::extract_mesh`]).
//!
//! ```
//! use rtin_mesh::{error_map::ErrorMap, mesh::extract_mesh, tileset::Tileset};
//!
//! let tileset = Tileset::new(5).unwrap();
//! let heightmap = vec![0.0f32; 5 * 5];
//! let error_map = ErrorMap::build(&tileset, &heightmap).unwrap();
//! let mesh = extract_mesh(&tileset, &error_map, 0.0);
//! assert_eq!(mesh.triangle_count(), 2);
//! ```
//!
//! The core ([`tileset`], [`error_map`], [`mesh`]) has no knowledge of
//! any raster file format. Decoding 8-bit elevation-encoded rasters into
//! heightmaps, and rescaling emitted vertices back into geographic
//! space, live in [`providers`] as plain byte/float transforms — neither
//! of the core modules depends on them.

pub mod error_map;
pub mod errors;
pub mod mesh;
pub mod providers;
pub mod tileset;

pub use error_map::ErrorMap;
pub use errors::{Result, RtinError};
pub use mesh::{extract_mesh, Mesh};
pub use tileset::Tileset;
