/// Image diff: compares two P6 previews pixel by pixel and writes an amplified
/// grayscale difference map.
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use crater_core::compare::compare_pixels;
use crater_harness::artifact::{read_ppm, write_ppm};
use crater_harness::colormap::grayscale;
use crater_harness::init_logging;

#[derive(Parser, Debug)]
#[command(name = "ppm_diff", about = "Compare two PPM images and write a visual difference map")]
struct Args {
    baseline: PathBuf,
    candidate: PathBuf,

    /// Where to write the difference map
    #[arg(long, default_value = "diff.ppm")]
    diff_out: PathBuf,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let (a, w, h) = read_ppm(&args.baseline)?;
    let (b, bw, bh) = read_ppm(&args.candidate)?;
    if (w, h) != (bw, bh) {
        bail!("image dimensions differ: {w}x{h} vs {bw}x{bh}");
    }

    let d = compare_pixels(&a, &b, w, h)?;
    println!("--- Image Difference Report ---");
    println!("Dimensions: {w}x{h}");
    println!(
        "Mismatched Pixels: {} / {} ({:.4}%)",
        d.mismatched,
        d.pixels(),
        d.mismatch_ratio() * 100.0
    );
    println!("Max Absolute Error (per channel): {}", d.max_abs_error);
    println!("Root Mean Square Error (RMSE): {:.4}", d.rmse);
    println!("Peak Signal-to-Noise Ratio (PSNR): {:.4} dB", d.psnr);

    match write_ppm(&args.diff_out, &grayscale(&d.diff_map), w, h) {
        Ok(()) => log::info!("visual difference map saved to {}", args.diff_out.display()),
        Err(e) => log::warn!("{e:#}"),
    }
    Ok(())
}
