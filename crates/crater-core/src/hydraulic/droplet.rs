//! Per-droplet state and the single erosion step.
use super::ErosionParams;
use crate::heightfield::HeightField;

/// Transient state of one simulated water droplet. Lives for one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Droplet {
    pub pos_x: f32,
    pub pos_y: f32,
    pub dir_x: f32,
    pub dir_y: f32,
    pub velocity: f32,
    pub water: f32,
    pub sediment: f32,
}

/// Bilinear footprint of a droplet: the NW corner index and the offsets inside the cell.
#[derive(Debug, Clone, Copy)]
struct Cell {
    idx: usize,
    u: f32,
    v: f32,
}

impl Droplet {
    pub fn spawn(pos_x: f32, pos_y: f32, params: &ErosionParams) -> Self {
        Self {
            pos_x,
            pos_y,
            dir_x: 0.0,
            dir_y: 0.0,
            velocity: params.initial_speed,
            water: params.initial_water,
            sediment: 0.0,
        }
    }

    /// The containing cell, or `None` once the droplet has left the interior.
    ///
    /// The node is the truncated position, so positions in (-1, 0) still map to
    /// column/row 0. A NaN position has no cell.
    #[inline]
    fn cell(&self, hf: &HeightField) -> Option<Cell> {
        if self.pos_x.is_nan() || self.pos_y.is_nan() {
            return None;
        }
        let node_x = self.pos_x as i32;
        let node_y = self.pos_y as i32;
        if node_x < 0 || node_x >= hf.width as i32 - 1 || node_y < 0 || node_y >= hf.height as i32 - 1 {
            return None;
        }
        Some(Cell {
            idx: node_y as usize * hf.width + node_x as usize,
            u: self.pos_x - node_x as f32,
            v: self.pos_y - node_y as f32,
        })
    }

    /// Advance one step, eroding or depositing into the four surrounding cells.
    ///
    /// Returns `false` (with no effect on the field) when the droplet is outside
    /// the interior.
    pub fn step(&mut self, hf: &mut HeightField, params: &ErosionParams) -> bool {
        let Some(Cell { idx, u, v }) = self.cell(hf) else {
            return false;
        };
        let w = hf.width;
        let map = &mut hf.data;

        let h_nw = map[idx];
        let h_ne = map[idx + 1];
        let h_sw = map[idx + w];
        let h_se = map[idx + w + 1];
        let grad_x = (h_ne - h_nw) * (1.0 - v) + (h_se - h_sw) * v;
        let grad_y = (h_sw - h_nw) * (1.0 - u) + (h_se - h_ne) * u;

        let inertia = params.inertia;
        self.dir_x = self.dir_x * inertia - grad_x * (1.0 - inertia);
        self.dir_y = self.dir_y * inertia - grad_y * (1.0 - inertia);
        let len = (self.dir_x * self.dir_x + self.dir_y * self.dir_y).sqrt();
        if len > 1e-6 {
            self.dir_x /= len;
            self.dir_y /= len;
        }

        // Empirical update on the y slope only; kept as-is to match baselines.
        self.velocity = (self.velocity * self.velocity + grad_y.abs() * params.gravity).sqrt();

        // Once velocity overflows these values go NaN. The comparisons below keep
        // NaN in the first operand, so the droplet carries it until it leaves.
        let slope = pick_max(-grad_y, params.min_slope);
        let capacity = slope * self.velocity * self.water * params.capacity_factor;

        if self.sediment > capacity || grad_y > 0.0 {
            let deposit = if grad_y > 0.0 {
                pick_min(self.sediment, params.deposit_speed)
            } else {
                (self.sediment - capacity) * params.deposit_speed
            };
            self.sediment -= deposit;

            map[idx] += deposit * (1.0 - u) * (1.0 - v);
            map[idx + 1] += deposit * u * (1.0 - v);
            map[idx + w] += deposit * (1.0 - u) * v;
            map[idx + w + 1] += deposit * u * v;
        } else {
            let erode = pick_min((capacity - self.sediment) * params.erode_speed, -grad_y);

            let w_nw = (1.0 - u) * (1.0 - v);
            let w_ne = u * (1.0 - v);
            let w_sw = (1.0 - u) * v;
            let w_se = u * v;
            map[idx] -= erode * w_nw;
            map[idx + 1] -= erode * w_ne;
            map[idx + w] -= erode * w_sw;
            map[idx + w + 1] -= erode * w_se;
            self.sediment += erode;
        }

        self.pos_x += self.dir_x;
        self.pos_y += self.dir_y;
        self.water *= 1.0 - params.evaporate_speed;
        true
    }
}

/// `b` if `a < b`, else `a`. Unlike `f32::max`, a NaN `a` is returned as is.
#[inline]
fn pick_max(a: f32, b: f32) -> f32 {
    if a < b {
        b
    } else {
        a
    }
}

/// `b` if `b < a`, else `a`. Unlike `f32::min`, a NaN `a` is returned as is.
#[inline]
fn pick_min(a: f32, b: f32) -> f32 {
    if b < a {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Plane rising along +y: every cell is `y * slope`.
    fn tilted(width: usize, height: usize, slope: f32) -> HeightField {
        let mut hf = HeightField::flat(width, height);
        for r in 0..height {
            for c in 0..width {
                hf.set(r, c, r as f32 * slope);
            }
        }
        hf
    }

    #[test]
    fn boundary_droplet_has_no_effect() {
        let params = ErosionParams::default();
        let mut hf = tilted(8, 8, 0.1);
        let before = hf.clone();
        let mut d = Droplet::spawn(7.0, 3.0, &params);
        assert!(!d.step(&mut hf, &params));
        assert_eq!(hf, before);

        let mut d = Droplet::spawn(-1.5, 3.0, &params);
        assert!(!d.step(&mut hf, &params));
        assert_eq!(hf, before);
    }

    #[test]
    fn downhill_droplet_moves_downhill_and_erodes() {
        let params = ErosionParams::default();
        // Height falls with y.
        let mut hf = HeightField::flat(16, 16);
        for r in 0..16 {
            for c in 0..16 {
                hf.set(r, c, (15 - r) as f32 * 0.1);
            }
        }
        let before = hf.get(8, 8);
        let mut d = Droplet::spawn(8.0, 8.0, &params);
        assert!(d.step(&mut hf, &params));

        assert_abs_diff_eq!(d.dir_x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(d.dir_y, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(d.pos_y, 9.0, epsilon = 1e-6);
        // Erosion is capped by the local slope (0.1) and lands on the NW corner.
        assert_abs_diff_eq!(d.sediment, 0.1, epsilon = 1e-5);
        assert_abs_diff_eq!(hf.get(8, 8), before - 0.1, epsilon = 1e-5);
        assert_abs_diff_eq!(d.water, 0.99, epsilon = 1e-7);
    }

    #[test]
    fn flat_ground_keeps_direction_degenerate() {
        let params = ErosionParams::default();
        let mut hf = HeightField::new(8, 8, 0.5);
        let mut d = Droplet::spawn(3.25, 3.75, &params);
        assert!(d.step(&mut hf, &params));
        assert_eq!((d.dir_x, d.dir_y), (0.0, 0.0));
        assert_eq!((d.pos_x, d.pos_y), (3.25, 3.75));
        // Erosion is capped by the local slope, which is zero here.
        assert_eq!(d.sediment, 0.0);
    }

    #[test]
    fn ordered_min_max_keep_first_nan() {
        assert!(pick_max(f32::NAN, 0.01).is_nan());
        assert!(pick_min(f32::NAN, 0.3).is_nan());
        assert_eq!(pick_max(0.5, f32::NAN), 0.5);
        assert_eq!(pick_min(0.5, f32::NAN), 0.5);
        assert_eq!(pick_max(-0.2, 0.01), 0.01);
        assert_eq!(pick_min(0.7, 0.3), 0.3);
    }

    #[test]
    fn nan_position_leaves_the_grid() {
        let params = ErosionParams::default();
        let mut hf = tilted(8, 8, 0.1);
        let before = hf.clone();
        let mut d = Droplet::spawn(f32::NAN, 3.0, &params);
        assert!(!d.step(&mut hf, &params));
        assert_eq!(hf, before);
    }

    #[test]
    fn nan_sediment_survives_deposit() {
        let params = ErosionParams::default();
        let mut hf = tilted(16, 16, 0.1);
        let mut d = Droplet::spawn(8.0, 8.0, &params);
        d.sediment = f32::NAN;
        // Uphill: the deposit is min(sediment, deposit_speed) with NaN first.
        assert!(d.step(&mut hf, &params));
        assert!(d.sediment.is_nan());
        assert!(hf.get(8, 8).is_nan());
    }

    #[test]
    fn nan_terrain_ends_the_droplet() {
        let params = ErosionParams::default();
        let mut hf = HeightField::new(16, 16, 0.5);
        hf.set(8, 9, f32::NAN);
        let mut d = Droplet::spawn(8.5, 8.5, &params);
        // NaN gradient: capacity and erosion go NaN instead of falling back to
        // the minimum slope, and so does the direction.
        assert!(d.step(&mut hf, &params));
        assert!(d.sediment.is_nan());
        assert!(d.pos_x.is_nan());
        assert!(!d.step(&mut hf, &params));
    }

    #[test]
    fn uphill_droplet_deposits_carried_sediment() {
        let params = ErosionParams::default();
        let mut hf = tilted(16, 16, 0.1);
        let mut d = Droplet::spawn(8.0, 8.0, &params);
        // Force motion toward +y (uphill) with full inertia.
        let params = ErosionParams { inertia: 1.0, ..params };
        d.dir_y = 1.0;
        d.sediment = 0.2;
        let before = hf.get(8, 8);
        assert!(d.step(&mut hf, &params));
        assert_abs_diff_eq!(d.sediment, 0.0, epsilon = 1e-7);
        assert_abs_diff_eq!(hf.get(8, 8), before + 0.2, epsilon = 1e-6);
    }
}
