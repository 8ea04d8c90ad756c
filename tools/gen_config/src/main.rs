/// Benchmark configuration generator: prints one stdin line for the `terrain`
/// or `splat` binary at a named problem size.
use anyhow::Result;
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Problem {
    Terrain,
    Splat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Size {
    #[value(name = "S")]
    S,
    #[value(name = "M")]
    M,
    #[value(name = "L")]
    L,
}

impl Size {
    fn side(self) -> usize {
        match self {
            Size::S => 4096,
            Size::M => 8192,
            Size::L => 16384,
        }
    }

    /// Bomb and bullet counts for the splat problem.
    fn event_counts(self) -> (usize, usize) {
        match self {
            Size::S => (100_000, 500_000),
            Size::M => (300_000, 600_000),
            Size::L => (500_000, 800_000),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "gen_config", about = "Print a benchmark configuration line for terrain or splat")]
struct Args {
    #[arg(long, value_enum)]
    problem: Problem,

    #[arg(long, value_enum)]
    size: Size,

    /// Seed for the configuration draw (not the run seed it prints)
    #[arg(long, default_value = "42")]
    seed: u64,
}

fn config_line(problem: Problem, size: Size, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let side = size.side();
    match problem {
        Problem::Terrain => {
            let octaves: u32 = rng.gen_range(3..6);
            let perlin_seed: u64 = rng.gen_range(1..1u64 << 32);
            format!("{side} {side} {octaves} 0.5 2.0 0.015625 40 {perlin_seed}")
        }
        Problem::Splat => {
            let (bombs, bullets) = size.event_counts();
            let gaussian = u8::from(rng.gen_bool(0.5));
            let events_seed: u64 = rng.gen_range(1..1u64 << 32);
            format!("{side} {side} {bombs} 10 40 {gaussian} {bullets} 1 4 {events_seed}")
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    println!("{}", config_line(args.problem, args.size, args.seed));
    Ok(())
}
