//! Per-pixel contribution of one event.
use crate::events::EventKind;

/// Share of damage absorbed by the highest terrain (height 255).
pub const MAX_ABSORPTION: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Falloff {
    /// `intensity · exp(−3 · dist²)`
    Gaussian,
    /// `intensity · (1 − dist)`
    Linear,
}

/// Footprint shape, resolved once per event before rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Footprint {
    /// Flat damage over the whole ellipse, occlusion 1.
    Bullet,
    /// Falloff damage, occlusion 2 wherever damage survives rounding.
    Bomb(Falloff),
}

/// Amounts to add to the damage and occlusion maps at one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub damage: i32,
    pub occlusion: i32,
}

impl Footprint {
    pub fn resolve(kind: EventKind, gaussian: bool) -> Self {
        match kind {
            EventKind::Bullet => Footprint::Bullet,
            EventKind::Bomb if gaussian => Footprint::Bomb(Falloff::Gaussian),
            EventKind::Bomb => Footprint::Bomb(Falloff::Linear),
        }
    }

    /// Contribution at normalized squared distance `dist_sq` (≤ 1) over terrain `height`.
    ///
    /// Damage is rounded before attenuation and truncated after it.
    #[inline]
    pub fn contribution(self, intensity: f32, dist_sq: f32, height: u8) -> Contribution {
        let (damage, occlusion) = match self {
            Footprint::Bullet => (intensity.round() as i32, 1),
            Footprint::Bomb(falloff) => {
                let raw = match falloff {
                    Falloff::Gaussian => intensity * (-3.0 * dist_sq).exp(),
                    Falloff::Linear => intensity * (1.0 - dist_sq.sqrt()),
                };
                let damage = raw.round() as i32;
                (damage, if damage > 0 { 2 } else { 0 })
            }
        };
        let attenuation = 1.0 - (height as f32 / 255.0) * MAX_ABSORPTION;
        Contribution { damage: (damage as f32 * attenuation) as i32, occlusion }
    }
}
