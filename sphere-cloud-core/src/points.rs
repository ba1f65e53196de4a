use serde::{Deserialize, Serialize};

use crate::color::{self, Rgb};
use crate::prng::{GaussianSampler, Mulberry32};

/// Point colouring policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Every point gets the flat colour (or the default light blue).
    #[default]
    Single,
    /// Blue-green-yellow gradient over the point's height.
    HeightGradient,
}

/// Parameters for one generation pass.
///
/// Defaults match the browser demo. Degenerate values are normalised by
/// [`GenerationParams::normalized`] before use, never rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Reproducibility key: the same seed always yields the same cloud.
    pub seed: u32,
    pub count: usize,
    pub radius: f32,
    /// Standard deviation scale of the radial jitter.
    pub noise: f32,
    pub color_mode: ColorMode,
    /// Flat colour for [`ColorMode::Single`]; ignored by the gradient.
    pub color: Option<Rgb>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            count: 5000,
            radius: 1.0,
            noise: 0.02,
            color_mode: ColorMode::Single,
            color: None,
        }
    }
}

impl GenerationParams {
    /// Best-effort clamping: count floored to 1, radius and noise to zero.
    pub fn normalized(&self) -> Self {
        Self {
            count: self.count.max(1),
            radius: self.radius.max(0.0),
            noise: self.noise.max(0.0),
            ..self.clone()
        }
    }
}

/// Flat position and colour attribute data for one generated cloud.
///
/// Both buffers are exactly `3 * count` long and point `i` occupies indices
/// `[3i, 3i + 3)` in each. Every generation pass produces fresh buffers;
/// nothing is mutated incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloudBuffers {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl PointCloudBuffers {
    /// Number of points held.
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Area-uniform direction on the unit sphere from two uniform draws.
fn direction_on_sphere(rng: &mut Mulberry32) -> [f64; 3] {
    let u = rng.next_f64();
    let v = rng.next_f64();
    let theta = std::f64::consts::TAU * u;
    let cos_phi = 2.0 * v - 1.0;
    let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
    [sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin()]
}

/// Sample `count` points on (or, with noise, near) a sphere surface.
///
/// Deterministic for a given parameter set. The draw order per point is
/// fixed: two uniforms for the direction, then one Gaussian draw for the
/// radial offset only when noise is enabled. Heights used for the gradient
/// are the post-noise y against the unperturbed base radius.
pub fn generate_sphere_points(params: &GenerationParams) -> PointCloudBuffers {
    let params = params.normalized();
    let mut rng = Mulberry32::new(params.seed);
    let mut gaussian = GaussianSampler::new();

    let mut positions = Vec::with_capacity(params.count * 3);
    let mut colors = Vec::with_capacity(params.count * 3);
    let single = params.color.unwrap_or(color::DEFAULT_SINGLE_COLOR);
    let radius = f64::from(params.radius);
    let noise = f64::from(params.noise);

    for _ in 0..params.count {
        let [dir_x, dir_y, dir_z] = direction_on_sphere(&mut rng);
        let offset = if noise > 0.0 {
            gaussian.sample(&mut rng) * noise
        } else {
            0.0
        };
        // Clamped, not reflected: noisy points never cross the origin.
        let radial = (radius + offset).max(0.0);

        let y = (dir_y * radial) as f32;
        positions.push((dir_x * radial) as f32);
        positions.push(y);
        positions.push((dir_z * radial) as f32);

        let point_color = match params.color_mode {
            ColorMode::Single => single,
            ColorMode::HeightGradient => color::height_gradient(y, params.radius),
        };
        colors.push(point_color.r);
        colors.push(point_color.g);
        colors.push(point_color.b);
    }

    PointCloudBuffers { positions, colors }
}
