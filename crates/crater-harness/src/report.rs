//! JSON run report written next to the artifacts.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crater_core::digest::digest_hex;
use crater_core::{ByteMap, Config};

#[derive(Debug, Clone, Serialize)]
pub struct MapDigest {
    pub name: &'static str,
    pub digest: String,
    /// Non-zero cells.
    pub coverage: usize,
}

impl MapDigest {
    pub fn of(name: &'static str, map: &ByteMap) -> Self {
        Self { name, digest: digest_hex(map.as_bytes()), coverage: map.coverage() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub pipeline: &'static str,
    pub width: usize,
    pub height: usize,
    pub elapsed_sec: f64,
    pub digests: Vec<MapDigest>,
    pub config: Config,
}

impl RunReport {
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("cannot write report {}", path.display()))
    }
}
