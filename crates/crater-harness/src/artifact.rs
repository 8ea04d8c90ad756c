//! File artifacts: headerless raw maps and binary P6 images.
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder};

use crater_core::ByteMap;

/// Read a raw height map that must hold exactly `width × height` bytes.
pub fn read_height_map(path: &Path, width: usize, height: usize) -> Result<ByteMap> {
    let data = fs::read(path).with_context(|| format!("cannot read height map {}", path.display()))?;
    ByteMap::from_raw(data, width, height)
        .with_context(|| format!("height map {} does not match {width}×{height}", path.display()))
}

pub fn write_raw(path: &Path, map: &ByteMap) -> Result<()> {
    fs::write(path, map.as_bytes()).with_context(|| format!("cannot write {}", path.display()))
}

/// Write packed RGB as a binary PPM (`P6`, maxval 255).
pub fn write_ppm(path: &Path, rgb: &[u8], width: usize, height: usize) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let encoder = PnmEncoder::new(BufWriter::new(file))
        .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary));
    encoder
        .write_image(rgb, width as u32, height as u32, ExtendedColorType::Rgb8)
        .with_context(|| format!("cannot encode {}", path.display()))
}

/// Load a PPM as packed RGB plus its dimensions.
pub fn read_ppm(path: &Path) -> Result<(Vec<u8>, usize, usize)> {
    let reader = image::ImageReader::open(path)
        .with_context(|| format!("cannot open {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("cannot probe {}", path.display()))?;
    let img = reader.decode().with_context(|| format!("cannot decode {}", path.display()))?.to_rgb8();
    let (w, h) = img.dimensions();
    Ok((img.into_raw(), w as usize, h as usize))
}
