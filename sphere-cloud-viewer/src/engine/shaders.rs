use bevy::{
    prelude::*,
    reflect::TypePath,
    render::render_resource::{AsBindGroup, ShaderRef},
};

/// Unlit point-sprite material: per-vertex colours pass straight through.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone, Default)]
pub struct PointCloudMaterial {}

impl Material for PointCloudMaterial {
    fn vertex_shader() -> ShaderRef {
        "shaders/point_cloud.wgsl".into()
    }

    fn fragment_shader() -> ShaderRef {
        "shaders/point_cloud.wgsl".into()
    }
}
