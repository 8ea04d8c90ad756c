//! Run configuration and the two whitespace-separated stdin formats.
//!
//! terrain stream: `H W octaves persistence lacunarity base_freq height_scale perlin_seed`
//! splat stream:   `H W bomb_count bomb_r_min bomb_r_max gaussian_flag
//!                  bullet_count bullet_r_min bullet_r_max events_seed`
//!
//! Fields a stream does not carry keep their defaults.

use std::str::{FromStr, SplitWhitespace};

use serde::{Deserialize, Serialize};

use crate::error::{CraterError, Result};

/// Fractal noise parameters for the terrain pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainParams {
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    pub base_freq: f64,
    /// Read from the terrain stream and reported, but never applied to the height map.
    pub height_scale: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BombParams {
    pub count: usize,
    pub r_min: i32,
    pub r_max: i32,
    /// Gaussian falloff when set, linear falloff otherwise.
    pub gaussian: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletParams {
    pub count: usize,
    pub r_min: i32,
    pub r_max: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seeds {
    /// Drives event placement and erosion droplet spawning.
    pub events: u64,
    /// Drives the primary noise permutation; the warp field uses `terrain + 1`.
    pub terrain: u64,
}

/// Immutable run configuration, passed by reference to every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub height: usize,
    pub width: usize,
    pub terrain: TerrainParams,
    pub bombs: BombParams,
    pub bullets: BulletParams,
    pub seeds: Seeds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            height: 1024,
            width: 1024,
            terrain: TerrainParams {
                octaves: 4,
                persistence: 0.5,
                lacunarity: 2.0,
                base_freq: 0.015625,
                height_scale: 40,
            },
            bombs: BombParams { count: 3000, r_min: 6, r_max: 32, gaussian: true },
            bullets: BulletParams { count: 200_000, r_min: 1, r_max: 3 },
            seeds: Seeds { events: 123_456_789, terrain: 987_654_321 },
        }
    }
}

// ── Stream parsing ────────────────────────────────────────────────────────────

/// Sequential reader over whitespace-separated tokens, one named field at a time.
struct Fields<'a> {
    tokens: SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn new(text: &'a str) -> Self {
        Self { tokens: text.split_whitespace() }
    }

    fn next<T: FromStr>(&mut self, field: &'static str) -> Result<T> {
        let token = self.tokens.next().ok_or(CraterError::MissingField { field })?;
        token
            .parse()
            .map_err(|_| CraterError::InvalidField { field, token: token.to_string() })
    }
}

impl Config {
    /// Parse the terrain pipeline stream and validate the result.
    pub fn from_terrain_stream(text: &str) -> Result<Self> {
        let mut f = Fields::new(text);
        let mut cfg = Config::default();
        cfg.height = f.next("H")?;
        cfg.width = f.next("W")?;
        cfg.terrain.octaves = f.next("octaves")?;
        cfg.terrain.persistence = f.next("persistence")?;
        cfg.terrain.lacunarity = f.next("lacunarity")?;
        cfg.terrain.base_freq = f.next("base_freq")?;
        cfg.terrain.height_scale = f.next("height_scale")?;
        cfg.seeds.terrain = f.next("perlin_seed")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse the splat pipeline stream and validate the result.
    pub fn from_splat_stream(text: &str) -> Result<Self> {
        let mut f = Fields::new(text);
        let mut cfg = Config::default();
        cfg.height = f.next("H")?;
        cfg.width = f.next("W")?;
        cfg.bombs.count = f.next("bomb_count")?;
        cfg.bombs.r_min = f.next("bomb_r_min")?;
        cfg.bombs.r_max = f.next("bomb_r_max")?;
        cfg.bombs.gaussian = f.next::<i64>("gaussian_flag")? == 1;
        cfg.bullets.count = f.next("bullet_count")?;
        cfg.bullets.r_min = f.next("bullet_r_min")?;
        cfg.bullets.r_max = f.next("bullet_r_max")?;
        cfg.seeds.events = f.next("events_seed")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the numeric stages have no defined behaviour for.
    pub fn validate(&self) -> Result<()> {
        if self.height == 0 {
            return Err(invalid("H", "grid height must be positive"));
        }
        if self.width == 0 {
            return Err(invalid("W", "grid width must be positive"));
        }
        if self.terrain.octaves == 0 {
            return Err(invalid("octaves", "at least one octave is required"));
        }
        positive_finite("persistence", self.terrain.persistence)?;
        positive_finite("lacunarity", self.terrain.lacunarity)?;
        positive_finite("base_freq", self.terrain.base_freq)?;
        radius_range("bomb_r_min", "bomb_r_max", self.bombs.r_min, self.bombs.r_max)?;
        radius_range("bullet_r_min", "bullet_r_max", self.bullets.r_min, self.bullets.r_max)?;
        Ok(())
    }

    /// Number of grid cells.
    pub fn cells(&self) -> usize {
        self.width * self.height
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> CraterError {
    CraterError::InvalidParameter { field, reason: reason.into() }
}

fn positive_finite(field: &'static str, v: f64) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite and positive, got {v}")))
    }
}

fn radius_range(min_field: &'static str, max_field: &'static str, lo: i32, hi: i32) -> Result<()> {
    if lo < 1 {
        return Err(invalid(min_field, format!("radius must be at least 1, got {lo}")));
    }
    if hi < lo {
        return Err(invalid(max_field, format!("maximum radius {hi} is below minimum {lo}")));
    }
    Ok(())
}
