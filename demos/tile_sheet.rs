//! Example: pack a synthetic volume into a tile sheet and write it as PNG
//!
//! Run with: RUST_LOG=voxel_atlas=debug cargo run --example tile_sheet

use anyhow::Context;
use ndarray::Array3;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing_subscriber::EnvFilter;
use voxel_atlas::{
    array_sequence_to_binary_or_json, cube_to_png, cube_to_tile_sheet, CodecOptions,
    CompressionLevel, CompressionMethod, Encoded, PngOptions, TextureConfig,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("voxel-atlas Example: Tile Sheet");
    println!("===============================\n");

    // A 96^3 volume holding a soft-edged sphere
    let size = 96usize;
    let center = size as f32 / 2.0;
    let volume = Array3::from_shape_fn((size, size, size), |(i, j, k)| {
        let d = ((i as f32 - center).powi(2) + (j as f32 - center).powi(2) + (k as f32 - center).powi(2))
            .sqrt();
        (1.0 - d / center).max(0.0)
    });

    let config = TextureConfig::default().with_max_width(2048);
    let temp_dir = tempfile::tempdir()?;
    let png_path = temp_dir.path().join("tile_sheet.png");

    let grid = {
        let file = File::create(&png_path)
            .with_context(|| format!("creating {}", png_path.display()))?;
        let mut writer = BufWriter::new(file);
        let grid = cube_to_png(
            volume.view().into_dyn(),
            0,
            1,
            &config,
            &PngOptions::default(),
            &mut writer,
        )?;
        writer.flush()?;
        grid
    };

    println!("Tile grid:");
    println!("  Tiles:  {} rows x {} columns", grid.rows, grid.columns);
    println!("  Tile:   {} x {} px", grid.tile_width, grid.tile_height);
    println!("  Atlas:  {} x {} px", grid.image_width, grid.image_height);
    println!("  Unused: {} cells", grid.wasted_cells());
    println!("  PNG:    {} ({} bytes)\n", png_path.display(), std::fs::metadata(&png_path)?.len());

    let sheet = cube_to_tile_sheet(volume.view().into_dyn(), 2, 1, &config, &PngOptions::default())?;
    println!("Tile sheet sliced along axis 2:");
    println!(
        "  image_shape={:?} slice_shape={:?} src={} chars\n",
        sheet.image_shape,
        sheet.slice_shape,
        sheet.src.len()
    );

    let raw = array_sequence_to_binary_or_json(volume.clone().into_dyn())?;
    let options = CodecOptions::default().with_compression(CompressionMethod::Zstd, CompressionLevel::fast());
    let compressed = voxel_atlas::encode_with(volume.into_dyn(), &options)?;

    println!("Binary transport:");
    for (name, encoded) in [("raw", raw), ("zstd", compressed)] {
        if let Encoded::Binary(binary) = encoded {
            println!(
                "  {:<5} {} bytes, descriptor {}",
                name,
                binary.data.len(),
                serde_json::to_string(&binary.descriptor())?
            );
        }
    }

    println!("\n✓ Example complete!");
    Ok(())
}
