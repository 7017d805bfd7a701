//! Builds an RTIN mesh from a PNG elevation raster and dumps the
//! resulting vertex/triangle buffers as raw little-endian binary files.
//!
//! Not part of the library's public surface — a thin CLI wrapper around
//! the out-of-scope raster/I-O collaborators plus the core engine, in
//! the shape of `field/examples/noise.rs`: parse args, sample/derive a
//! field, write the derived output back to disk.

use std::{fs::File, io::Write, path::PathBuf};

use clap::{Parser, ValueEnum};
use rtin_mesh::{
    error_map::ErrorMap,
    mesh::extract_mesh,
    providers::{decode_heightmap, Encoding as DecodeEncoding},
    tileset::Tileset,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliEncoding {
    Mapbox,
    Terrarium,
}

impl From<CliEncoding> for DecodeEncoding {
    fn from(value: CliEncoding) -> Self {
        match value {
            CliEncoding::Mapbox => DecodeEncoding::Mapbox,
            CliEncoding::Terrarium => DecodeEncoding::Terrarium,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// PNG elevation raster (side must be a power of two).
    input: PathBuf,

    /// Elevation encoding of the raster's RGB channels.
    #[arg(long, value_enum, default_value = "mapbox")]
    encoding: CliEncoding,

    /// Maximum allowed per-triangle approximation error.
    #[arg(long, default_value = "5.0")]
    tolerance: f32,

    /// Directory the `.vertices` and `.triangles` dumps are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let image = image::open(&args.input)?.into_rgb8();
    let (width, height) = image.dimensions();
    anyhow::ensure!(width == height, "raster must be square, got {width}x{height}");

    let side = width as usize;
    let heightmap = decode_heightmap(image.as_raw(), side, 3, args.encoding.into());

    let tileset = Tileset::new(side + 1)?;
    let error_map = ErrorMap::build(&tileset, &heightmap)?;
    let mesh = extract_mesh(&tileset, &error_map, args.tolerance);

    tracing::info!(
        "extracted mesh: {} vertices, {} triangles at tolerance {}",
        mesh.vertex_count(),
        mesh.triangle_count(),
        args.tolerance
    );

    let stem = args
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".to_string());

    let vertices_path = args.out_dir.join(format!("{stem}.vertices"));
    let mut vertices_file = File::create(&vertices_path)?;
    for &v in mesh.vertices() {
        vertices_file.write_all(&v.to_le_bytes())?;
    }

    let triangles_path = args.out_dir.join(format!("{stem}.triangles"));
    let mut triangles_file = File::create(&triangles_path)?;
    for &t in mesh.triangles() {
        triangles_file.write_all(&t.to_le_bytes())?;
    }

    println!(
        "wrote {} vertices, {} triangles to {} / {}",
        mesh.vertex_count(),
        mesh.triangle_count(),
        vertices_path.display(),
        triangles_path.display(),
    );

    Ok(())
}
