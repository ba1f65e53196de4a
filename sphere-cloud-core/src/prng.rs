/// Deterministic pseudo-random number generator based on mulberry32.
///
/// All arithmetic is wrapping unsigned 32-bit, matching the canonical
/// `Math.imul` formulation bit for bit. Two generators built from the same
/// seed produce identical, fully independent streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

const INCREMENT: u32 = 0x6D2B79F5;

impl Mulberry32 {
    /// A zero seed would start the mixer from an all-zero state, so it is
    /// substituted with the mulberry32 increment constant.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { INCREMENT } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let t = self.state;
        let mut x = (t ^ (t >> 15)).wrapping_mul(t | 1);
        x ^= x.wrapping_add((x ^ (x >> 7)).wrapping_mul(x | 61));
        x ^ (x >> 14)
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// Standard-normal sampler over a uniform stream via the Box-Muller
/// transform.
///
/// Each transform yields two values; the second is cached and returned by
/// the following call without consuming any uniform draws.
#[derive(Debug, Default, Clone)]
pub struct GaussianSampler {
    spare: Option<f64>,
}

impl GaussianSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, rng: &mut Mulberry32) -> f64 {
        if let Some(value) = self.spare.take() {
            return value;
        }

        // Redraw exact zeros to keep ln(u) finite.
        let mut u = 0.0;
        while u == 0.0 {
            u = rng.next_f64();
        }
        let mut v = 0.0;
        while v == 0.0 {
            v = rng.next_f64();
        }

        let mag = (-2.0 * u.ln()).sqrt();
        let theta = std::f64::consts::TAU * v;
        self.spare = Some(mag * theta.sin());
        mag * theta.cos()
    }
}
