//! Impact event placement.
//!
//! All bombs are drawn before all bullets from a single generator; each event
//! consumes four draws in the order x, y, rx, ry. Changing that order changes
//! every downstream digest.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::prng::XorShift64;

pub const BOMB_INTENSITY: f32 = 40.0;
pub const BULLET_INTENSITY: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Bullet,
    Bomb,
}

/// One impact: continuous centre, elliptical radii, intensity and kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub x: f32,
    pub y: f32,
    pub rx: f32,
    pub ry: f32,
    pub intensity: f32,
    pub kind: EventKind,
}

fn draw_event(
    rng: &mut XorShift64,
    config: &Config,
    r_min: i32,
    r_max: i32,
    intensity: f32,
    kind: EventKind,
) -> Event {
    let span_x = config.width.saturating_sub(1) as f64;
    let span_y = config.height.saturating_sub(1) as f64;
    let x = (rng.uniform_double() * span_x) as f32;
    let y = (rng.uniform_double() * span_y) as f32;
    let rx = rng.uniform_int(r_min, r_max) as f32;
    let ry = rng.uniform_int(r_min, r_max) as f32;
    Event { x, y, rx, ry, intensity, kind }
}

/// Draw every bomb then every bullet from `rng`, in generation order.
pub fn generate_events(config: &Config, rng: &mut XorShift64) -> Vec<Event> {
    let mut events = Vec::with_capacity(config.bombs.count + config.bullets.count);
    let b = &config.bombs;
    for _ in 0..b.count {
        events.push(draw_event(rng, config, b.r_min, b.r_max, BOMB_INTENSITY, EventKind::Bomb));
    }
    let b = &config.bullets;
    for _ in 0..b.count {
        events.push(draw_event(rng, config, b.r_min, b.r_max, BULLET_INTENSITY, EventKind::Bullet));
    }
    events
}

/// Event list for a run, seeded from `config.seeds.events`.
pub fn generate_scene_events(config: &Config) -> Vec<Event> {
    let mut rng = XorShift64::new(config.seeds.events);
    generate_events(config, &mut rng)
}
