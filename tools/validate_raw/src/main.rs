/// Raw-map validation: compares a candidate output byte by byte against a
/// baseline with a ±1 tolerance. Exits 1 when the mismatch ratio is too high.
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crater_core::compare::{compare_raw, RawComparison, MAX_MISMATCH_RATIO, TOLERANCE};

#[derive(Parser, Debug)]
#[command(name = "validate_raw", about = "Compare a raw output map against a baseline")]
struct Args {
    baseline: PathBuf,
    candidate: PathBuf,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    tolerance: u8,
    max_mismatch_ratio: f64,
    #[serde(flatten)]
    comparison: &'a RawComparison,
}

fn print_text(r: &RawComparison) {
    println!("--- Validation Report ---");
    println!("  Bytes compared: {}", r.len);
    println!("  Max absolute error: {}", r.max_abs_error);
    println!("  RMSE: {:.4}", r.rmse);
    println!(
        "  Mismatched bytes (error > {TOLERANCE}): {} / {} ({:.4}%)",
        r.mismatches,
        r.len,
        r.mismatch_ratio * 100.0
    );
    if r.passed() {
        println!("PASS: all differences within limits");
    } else {
        println!(
            "FAIL: mismatch ratio {:.4}% exceeds {:.4}%",
            r.mismatch_ratio * 100.0,
            MAX_MISMATCH_RATIO * 100.0
        );
        if let Some((offset, expected, got)) = r.first_mismatch {
            println!("  first mismatch at byte {offset}: expected {expected}, got {got}");
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let baseline = fs::read(&args.baseline).with_context(|| format!("cannot read {}", args.baseline.display()))?;
    let candidate = fs::read(&args.candidate).with_context(|| format!("cannot read {}", args.candidate.display()))?;
    let report = compare_raw(&baseline, &candidate).context("file size mismatch")?;

    if args.json {
        let json = JsonReport {
            passed: report.passed(),
            tolerance: TOLERANCE,
            max_mismatch_ratio: MAX_MISMATCH_RATIO,
            comparison: &report,
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        print_text(&report);
    }

    Ok(if report.passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
