//! Seeded terrain synthesis and impact compositing.
//!
//! Two pipelines share one configuration:
//!   * terrain: warped fractal noise → droplet erosion → 8-bit height map
//!   * splat:   bomb/bullet events → damage + occlusion maps, attenuated by height
//!
//! Everything here is deterministic for a given [`Config`]; the output digests
//! are the reproducibility checkpoint.

pub mod bytemap;
pub mod compare;
pub mod config;
pub mod digest;
pub mod error;
pub mod events;
pub mod generator;
pub mod heightfield;
pub mod hydraulic;
pub mod noise;
pub mod prng;
pub mod quantize;
pub mod splat;

pub use bytemap::ByteMap;
pub use config::Config;
pub use error::{CraterError, Result};
pub use generator::{composite_splat, generate_splat, generate_terrain, place_splat_events};
pub use heightfield::HeightField;
pub use prng::XorShift64;
pub use splat::SplatMaps;
