//! Deterministic spherical point cloud generation.
//!
//! A seeded mulberry32 PRNG feeds an area-uniform sphere direction sampler,
//! optional Gaussian radial noise, and a height-based colour gradient. The
//! output is a pair of flat attribute buffers ready for upload as vertex
//! data; nothing in this crate depends on a renderer.

pub mod color;
pub mod points;
pub mod prng;

pub use color::{DEFAULT_SINGLE_COLOR, Rgb, height_gradient};
pub use points::{ColorMode, GenerationParams, PointCloudBuffers, generate_sphere_points};
pub use prng::{GaussianSampler, Mulberry32};
