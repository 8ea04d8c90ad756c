/// Speedup benchmark: feeds one configuration line to a baseline and a
/// candidate pipeline binary (typically the sequential and the `threading`
/// builds), reads `time_sec=` from each one's stderr and rates the speedup.
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode, Stdio};

use anyhow::{bail, Context, Result};
use clap::Parser;

use crater_harness::{init_logging, read_stdin};

#[derive(Parser, Debug)]
#[command(name = "bench_speedup", about = "Time a baseline and a candidate binary on the same configuration")]
struct Args {
    baseline: PathBuf,
    candidate: PathBuf,

    /// Configuration line; read from stdin when omitted (e.g. piped from gen_config)
    #[arg(long)]
    config: Option<String>,

    /// Extra arguments passed to both binaries, after `--`
    #[arg(last = true)]
    extra: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct Run {
    hash: String,
    time_sec: f64,
}

/// Value of the first `time_sec=` line.
fn parse_time_sec(stderr: &str) -> Option<f64> {
    stderr
        .lines()
        .find_map(|line| line.trim().strip_prefix("time_sec="))
        .and_then(|v| v.trim().parse().ok())
}

fn run(binary: &Path, config: &str, extra: &[String]) -> Result<Run> {
    let mut child = Command::new(binary)
        .args(extra)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("cannot start {}", binary.display()))?;
    if let Some(mut stdin) = child.stdin.take() {
        writeln!(stdin, "{config}").context("cannot write configuration")?;
    }
    let out = child.wait_with_output()?;
    let stderr = String::from_utf8_lossy(&out.stderr);
    if !out.status.success() {
        bail!("{} exited with {}: {}", binary.display(), out.status, stderr.trim());
    }
    let Some(time_sec) = parse_time_sec(&stderr) else {
        bail!("no time_sec= line in the output of {}", binary.display());
    };
    Ok(Run { hash: String::from_utf8_lossy(&out.stdout).trim().to_string(), time_sec })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rating {
    Excellent,
    Good,
    Pass,
    NeedsWork,
}

impl Rating {
    fn of(speedup: f64) -> Self {
        if speedup >= 2.0 {
            Rating::Excellent
        } else if speedup >= 1.5 {
            Rating::Good
        } else if speedup >= 1.0 {
            Rating::Pass
        } else {
            Rating::NeedsWork
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Pass => "Pass",
            Rating::NeedsWork => "Needs work",
        })
    }
}

/// Baseline time over candidate time; a zero candidate time counts as infinite.
fn speedup(baseline: f64, candidate: f64) -> f64 {
    if candidate == 0.0 {
        f64::INFINITY
    } else {
        baseline / candidate
    }
}

/// "Performance gain" or "Performance loss" line, `None` at exactly 1x.
fn change_line(speedup: f64) -> Option<String> {
    if speedup > 1.0 {
        Some(format!("Performance gain: {:.1}%", (speedup - 1.0) * 100.0))
    } else if speedup < 1.0 {
        Some(format!("Performance loss: {:.1}%", (1.0 - speedup) * 100.0))
    } else {
        None
    }
}

fn main() -> Result<ExitCode> {
    init_logging();
    let args = Args::parse();

    let config = match args.config {
        Some(line) => line,
        None => read_stdin()?,
    };
    let config = config.trim();
    log::info!("configuration: {config}");

    let base = run(&args.baseline, config, &args.extra)?;
    println!("  {:<10} hash={} time_sec={:.6}", "baseline", base.hash, base.time_sec);
    let cand = run(&args.candidate, config, &args.extra)?;
    println!("  {:<10} hash={} time_sec={:.6}", "candidate", cand.hash, cand.time_sec);

    let s = speedup(base.time_sec, cand.time_sec);
    println!();
    println!("  Speedup: {s:.2}x  [{}]", Rating::of(s));
    if let Some(line) = change_line(s) {
        println!("  {line}");
    }

    if base.hash != cand.hash {
        log::error!("digests differ: {} vs {}", base.hash, cand.hash);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
