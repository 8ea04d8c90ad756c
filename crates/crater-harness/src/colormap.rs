//! Height → RGB palette for terrain previews.

/// One palette anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorStop {
    pub height: u8,
    pub color: [u8; 3],
}

/// Deep water at the bottom, pale highlands at the top. Heights ascending.
pub const TERRAIN_STOPS: [ColorStop; 6] = [
    ColorStop { height: 30, color: [10, 20, 60] },
    ColorStop { height: 80, color: [30, 60, 120] },
    ColorStop { height: 130, color: [60, 100, 170] },
    ColorStop { height: 180, color: [100, 140, 200] },
    ColorStop { height: 220, color: [140, 180, 230] },
    ColorStop { height: 255, color: [180, 210, 250] },
];

fn lerp_color(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let mix = |i: usize| (a[i] as f32 + t * (b[i] as f32 - a[i] as f32)) as u8;
    [mix(0), mix(1), mix(2)]
}

/// Piecewise-linear lookup; clamps to the end colours outside the stop range.
pub fn color_for_height(height: u8, stops: &[ColorStop]) -> [u8; 3] {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return [height; 3];
    };
    if height <= first.height {
        return first.color;
    }
    if height >= last.height {
        return last.color;
    }
    stops
        .windows(2)
        .find(|w| height >= w[0].height && height < w[1].height)
        .map(|w| {
            let t = (height - w[0].height) as f32 / (w[1].height - w[0].height) as f32;
            lerp_color(w[0].color, w[1].color, t)
        })
        .unwrap_or(last.color)
}

/// Packed RGB for a whole height map.
pub fn colorize(heights: &[u8]) -> Vec<u8> {
    heights.iter().flat_map(|&h| color_for_height(h, &TERRAIN_STOPS)).collect()
}

/// Packed RGB with each byte replicated across the three channels.
pub fn grayscale(values: &[u8]) -> Vec<u8> {
    values.iter().flat_map(|&v| [v, v, v]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_outside_stops() {
        assert_eq!(color_for_height(0, &TERRAIN_STOPS), [10, 20, 60]);
        assert_eq!(color_for_height(30, &TERRAIN_STOPS), [10, 20, 60]);
        assert_eq!(color_for_height(255, &TERRAIN_STOPS), [180, 210, 250]);
    }

    #[test]
    fn interpolates_between_stops() {
        // Halfway from 30 to 80.
        assert_eq!(color_for_height(55, &TERRAIN_STOPS), [20, 40, 90]);
        // Exactly on an interior stop.
        assert_eq!(color_for_height(130, &TERRAIN_STOPS), [60, 100, 170]);
    }

    #[test]
    fn interpolation_truncates() {
        // t = 1/50: 10 + 0.4 → 10, 20 + 0.8 → 20, 60 + 1.2 → 61
        assert_eq!(color_for_height(31, &TERRAIN_STOPS), [10, 20, 61]);
    }

    #[test]
    fn channels_never_decrease_with_height() {
        let mut prev = color_for_height(0, &TERRAIN_STOPS);
        for h in 1..=255u8 {
            let c = color_for_height(h, &TERRAIN_STOPS);
            assert!(c.iter().zip(&prev).all(|(a, b)| a >= b), "palette dips at {h}");
            prev = c;
        }
    }

    #[test]
    fn packing() {
        assert_eq!(grayscale(&[0, 7]), vec![0, 0, 0, 7, 7, 7]);
        assert_eq!(colorize(&[255]).len(), 3);
    }
}
