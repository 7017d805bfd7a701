//! External collaborators for the RTIN core: decoding elevation-encoded
//! rasters into heightmaps, and rescaling emitted mesh vertices back
//! into geographic space.
//!
//! Neither [`crate::tileset`], [`crate::error_map`], nor [`crate::mesh`]
//! depends on anything in this module — it consumes the core's public
//! types and produces plain `Vec`s, the way an application would.

pub mod heightmap;
pub mod rescale;

pub use heightmap::{decode_heightmap, Encoding};
pub use rescale::{rescale_positions, Bounds};
