use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use bevy::{render::mesh::PrimitiveTopology, render::render_asset::RenderAssetUsages};

use sphere_cloud_core::{GenerationParams, PointCloudBuffers, generate_sphere_points};

use super::camera::OrbitCamera;
use super::shaders::PointCloudMaterial;

/// Marker for the active cloud entity.
#[derive(Component)]
pub struct PointCloud;

/// Current generation parameters plus the viewer-side auto-rotate toggle.
#[derive(Resource, Debug, Clone)]
pub struct CloudSettings {
    pub params: GenerationParams,
    pub auto_rotate: bool,
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            params: GenerationParams::default(),
            auto_rotate: true,
        }
    }
}

/// Request a full rebuild of the point cloud buffers.
#[derive(Event, Default)]
pub struct RegenerateCloud;

/// Handle of the mesh asset backing the cloud entity. Rebuilds replace the
/// asset in place, which releases the previous GPU buffers.
#[derive(Resource)]
pub struct CloudMesh {
    pub handle: Handle<Mesh>,
}

/// Spawn the cloud entity with an empty mesh; the first `RegenerateCloud`
/// event fills it.
pub fn spawn_point_cloud(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<PointCloudMaterial>>,
) {
    let empty = PointCloudBuffers {
        positions: Vec::new(),
        colors: Vec::new(),
    };
    let handle = meshes.add(build_cloud_mesh(&empty));

    commands.spawn((
        Mesh3d(handle.clone()),
        MeshMaterial3d(materials.add(PointCloudMaterial::default())),
        Transform::from_translation(Vec3::ZERO),
        Visibility::Visible,
        PointCloud,
        NoFrustumCulling,
    ));
    commands.insert_resource(CloudMesh { handle });
}

/// Regenerate buffers from the current settings and swap them into the
/// existing mesh asset. Runs once per batch of queued events; generation is
/// pure, so collapsing a burst of parameter changes into one rebuild is safe.
pub fn rebuild_point_cloud(
    mut events: EventReader<RegenerateCloud>,
    settings: Res<CloudSettings>,
    cloud: Res<CloudMesh>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut orbit: ResMut<OrbitCamera>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let buffers = generate_sphere_points(&settings.params);
    info!(
        "Rebuilt cloud: {} points, seed {}, radius {}",
        buffers.len(),
        settings.params.seed,
        settings.params.radius
    );

    meshes.insert(&cloud.handle, build_cloud_mesh(&buffers));
    orbit.frame_radius(settings.params.radius);
}

/// Point-list mesh carrying position and colour vertex attributes.
pub fn build_cloud_mesh(buffers: &PointCloudBuffers) -> Mesh {
    let positions: Vec<[f32; 3]> = buffers
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    let colors: Vec<[f32; 4]> = buffers
        .colors
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2], 1.0])
        .collect();

    let mut mesh = Mesh::new(
        PrimitiveTopology::PointList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use sphere_cloud_core::ColorMode;

    #[test]
    fn cloud_mesh_carries_one_vertex_per_point() {
        let buffers = generate_sphere_points(&GenerationParams {
            count: 64,
            color_mode: ColorMode::HeightGradient,
            ..GenerationParams::default()
        });
        let mesh = build_cloud_mesh(&buffers);
        assert_eq!(mesh.count_vertices(), 64);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_COLOR).is_some());
    }

    #[test]
    fn empty_buffers_build_an_empty_mesh() {
        let empty = PointCloudBuffers {
            positions: Vec::new(),
            colors: Vec::new(),
        };
        assert_eq!(build_cloud_mesh(&empty).count_vertices(), 0);
    }
}
