use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use super::point_cloud::CloudSettings;

const MIN_PITCH: f32 = -1.55;
const MAX_PITCH: f32 = 1.55;
const MIN_DISTANCE: f32 = 0.2;
const MAX_DISTANCE: f32 = 200.0;

/// Damped orbit rig around the cloud origin.
///
/// Input writes the target fields; the controller eases the live yaw, pitch
/// and distance toward them every frame, so releasing a drag coasts to a
/// stop instead of snapping.
#[derive(Resource, Debug)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub target_yaw: f32,
    pub target_pitch: f32,
    pub target_distance: f32,
    pub is_dragging: bool,
    /// Radians per second added to the target yaw while auto-rotate is on.
    pub auto_rotate_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: -0.35,
            distance: 3.0,
            target_yaw: 0.6,
            target_pitch: -0.35,
            target_distance: 3.0,
            is_dragging: false,
            auto_rotate_speed: 0.25,
        }
    }
}

impl OrbitCamera {
    /// Pull the dolly target out far enough to frame a sphere of the given
    /// radius. Called on every rebuild so radius changes stay in view.
    pub fn frame_radius(&mut self, radius: f32) {
        self.target_distance = (radius.max(0.1) * 3.0).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut orbit: ResMut<OrbitCamera>,
    settings: Res<CloudSettings>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };
    let orbit = &mut *orbit;

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Left-drag orbits around the origin.
    orbit.is_dragging = mouse_button.pressed(MouseButton::Left);
    if orbit.is_dragging && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        orbit.target_yaw -= mouse_delta.x * yaw_sens;
        orbit.target_pitch =
            (orbit.target_pitch - mouse_delta.y * pitch_sens).clamp(MIN_PITCH, MAX_PITCH);
    }

    // Mouse wheel scroll accumulation (pixel and line scroll).
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON {
        let dolly_speed = (orbit.target_distance * 0.2).clamp(0.05, 50.0);
        orbit.target_distance =
            (orbit.target_distance - scroll_accum * dolly_speed).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    if settings.auto_rotate && !orbit.is_dragging {
        orbit.target_yaw += orbit.auto_rotate_speed * time.delta_secs();
    }

    // Frame-rate independent exponential damping toward the targets.
    let blend = 1.0 - (-10.0 * time.delta_secs()).exp();
    orbit.yaw += (orbit.target_yaw - orbit.yaw) * blend;
    orbit.pitch += (orbit.target_pitch - orbit.pitch) * blend;
    orbit.distance += (orbit.target_distance - orbit.distance) * blend;

    let rotation = Quat::from_euler(EulerRot::YXZ, orbit.yaw, orbit.pitch, 0.0);
    camera_transform.translation = rotation * Vec3::new(0.0, 0.0, orbit.distance);
    camera_transform.rotation = rotation;
}
