use serde::{Deserialize, Serialize};

/// RGB colour with channels in `[0, 1]`, the convention used across the
/// generation buffers and the vertex colour attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Light blue used when no flat colour is supplied.
pub const DEFAULT_SINGLE_COLOR: Rgb = Rgb::new(0.376, 0.647, 0.996);

/// Gradient stop at the south pole.
pub const GRADIENT_LOW: Rgb = Rgb::new(0.121, 0.305, 0.784);
/// Gradient stop at the equator.
pub const GRADIENT_MID: Rgb = Rgb::new(0.102, 0.729, 0.451);
/// Gradient stop at the north pole.
pub const GRADIENT_HIGH: Rgb = Rgb::new(0.992, 0.871, 0.384);

fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb::new(
            lerp(self.r, other.r, t),
            lerp(self.g, other.g, t),
            lerp(self.b, other.b, t),
        )
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional). Malformed
    /// input recovers to [`DEFAULT_SINGLE_COLOR`] rather than erroring, so a
    /// bad colour picker string never breaks generation.
    pub fn from_hex(hex: &str) -> Rgb {
        let trimmed = hex.trim().trim_start_matches('#');
        let expanded: String = match trimmed.len() {
            3 => trimmed.chars().flat_map(|c| [c, c]).collect(),
            6 => trimmed.to_owned(),
            _ => return DEFAULT_SINGLE_COLOR,
        };

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&expanded[range], 16).map(|v| f32::from(v) / 255.0)
        };
        match (channel(0..2), channel(2..4), channel(4..6)) {
            (Ok(r), Ok(g), Ok(b)) => Rgb::new(r, g, b),
            _ => DEFAULT_SINGLE_COLOR,
        }
    }
}

/// Three-stop height gradient: blue at the south pole, green at the equator,
/// yellow at the north pole. A degenerate radius collapses every height to
/// the equator stop.
pub fn height_gradient(y: f32, radius: f32) -> Rgb {
    if !radius.is_finite() || radius <= 0.0 {
        return GRADIENT_MID;
    }
    let t = ((y / radius + 1.0) / 2.0).clamp(0.0, 1.0);
    if t < 0.5 {
        GRADIENT_LOW.lerp(GRADIENT_MID, t / 0.5)
    } else {
        GRADIENT_MID.lerp(GRADIENT_HIGH, (t - 0.5) / 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Rgb, b: Rgb) {
        assert!((a.r - b.r).abs() < 1e-6, "{a:?} vs {b:?}");
        assert!((a.g - b.g).abs() < 1e-6, "{a:?} vs {b:?}");
        assert!((a.b - b.b).abs() < 1e-6, "{a:?} vs {b:?}");
    }

    #[test]
    fn equator_hits_the_mid_stop_exactly() {
        assert_eq!(height_gradient(0.0, 1.5), GRADIENT_MID);
    }

    #[test]
    fn poles_hit_the_outer_stops() {
        assert_close(height_gradient(1.5, 1.5), GRADIENT_HIGH);
        assert_close(height_gradient(-1.5, 1.5), GRADIENT_LOW);
    }

    #[test]
    fn out_of_range_heights_clamp() {
        assert_close(height_gradient(9.0, 1.5), GRADIENT_HIGH);
        assert_close(height_gradient(-9.0, 1.5), GRADIENT_LOW);
    }

    #[test]
    fn degenerate_radius_returns_the_mid_stop() {
        assert_eq!(height_gradient(0.7, 0.0), GRADIENT_MID);
        assert_eq!(height_gradient(0.7, -2.0), GRADIENT_MID);
        assert_eq!(height_gradient(0.7, f32::NAN), GRADIENT_MID);
    }

    #[test]
    fn hex_parsing_accepts_both_forms() {
        assert_close(Rgb::from_hex("#ffffff"), Rgb::new(1.0, 1.0, 1.0));
        assert_close(Rgb::from_hex("000000"), Rgb::new(0.0, 0.0, 0.0));
        assert_close(Rgb::from_hex("#f00"), Rgb::new(1.0, 0.0, 0.0));
        assert_close(
            Rgb::from_hex("#2266ff"),
            Rgb::new(34.0 / 255.0, 102.0 / 255.0, 1.0),
        );
    }

    #[test]
    fn malformed_hex_falls_back_to_the_default() {
        assert_eq!(Rgb::from_hex(""), DEFAULT_SINGLE_COLOR);
        assert_eq!(Rgb::from_hex("#12345"), DEFAULT_SINGLE_COLOR);
        assert_eq!(Rgb::from_hex("not-a-colour"), DEFAULT_SINGLE_COLOR);
        assert_eq!(Rgb::from_hex("#gggggg"), DEFAULT_SINGLE_COLOR);
    }
}
