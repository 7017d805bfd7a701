//! Decoding 8-bit RGB-encoded elevation rasters into a grid the RTIN
//! core can consume.
//!
//! Grounded in `util.py`'s `mapbox_terrain_to_grid`: a side-`s` raster
//! (three or more 8-bit channels per pixel) decodes into a side-`(s+1)`
//! heightmap, with the extra row/column backfilled from the last real
//! one so every grid cell the core touches has a defined elevation.

/// Elevation encoding used by a source raster's RGB channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// `height = (R * 65536 + G * 256 + B) / 10 - 10000`.
    Mapbox,
    /// `height = R * 256 + G + B / 256 - 32768`.
    Terrarium,
}

impl Encoding {
    fn decode(self, r: u8, g: u8, b: u8) -> f32 {
        match self {
            Encoding::Mapbox => {
                (r as f32 * 65536.0 + g as f32 * 256.0 + b as f32) / 10.0 - 10000.0
            }
            Encoding::Terrarium => r as f32 * 256.0 + g as f32 + b as f32 / 256.0 - 32768.0,
        }
    }
}

/// Decodes a row-major `side x side` raster with `channels` (>= 3)
/// 8-bit components per pixel into a `(side + 1) x (side + 1)`
/// row-major heightmap, backfilling the extra row and column.
///
/// `raster` must have exactly `side * side * channels` bytes. Only the
/// first three channels of each pixel (R, G, B) are read.
///
/// # Panics
///
/// Panics if `raster.len() != side * side * channels` or `channels < 3`.
pub fn decode_heightmap(raster: &[u8], side: usize, channels: usize, encoding: Encoding) -> Vec<f32> {
    assert!(channels >= 3, "raster must carry at least 3 channels");
    assert_eq!(
        raster.len(),
        side * side * channels,
        "raster length does not match side * side * channels"
    );

    let grid_size = side + 1;
    let mut heightmap = vec![0f32; grid_size * grid_size];

    for y in 0..side {
        for x in 0..side {
            let p = (y * side + x) * channels;
            let height = encoding.decode(raster[p], raster[p + 1], raster[p + 2]);
            heightmap[y * grid_size + x] = height;
        }
    }

    // Backfill the bottom row from the row above it...
    for x in 0..grid_size - 1 {
        heightmap[grid_size * (grid_size - 1) + x] = heightmap[grid_size * (grid_size - 2) + x];
    }
    // ...then the right column from the column to its left, including
    // the corner, which now picks up the bottom row's backfilled value.
    for y in 0..grid_size {
        heightmap[grid_size * y + grid_size - 1] = heightmap[grid_size * y + grid_size - 2];
    }

    heightmap
}
