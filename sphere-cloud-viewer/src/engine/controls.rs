use bevy::prelude::*;

use sphere_cloud_core::ColorMode;

use super::point_cloud::{CloudSettings, RegenerateCloud};

const MAX_POINTS: usize = 200_000;
const NOISE_STEP: f32 = 0.01;

/// Keyboard shortcuts for driving generation without the browser UI.
///
/// R reseeds, brackets halve/double the count, arrows adjust noise,
/// C toggles the colour mode, Space toggles auto-rotation.
pub fn handle_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut settings: ResMut<CloudSettings>,
    mut regenerate: EventWriter<RegenerateCloud>,
) {
    let mut changed = false;

    if keyboard.just_pressed(KeyCode::KeyR) {
        settings.params.seed = settings.params.seed.wrapping_add(1);
        changed = true;
    }
    if keyboard.just_pressed(KeyCode::BracketRight) {
        settings.params.count = (settings.params.count.saturating_mul(2)).min(MAX_POINTS);
        changed = true;
    }
    if keyboard.just_pressed(KeyCode::BracketLeft) {
        settings.params.count = (settings.params.count / 2).max(1);
        changed = true;
    }
    if keyboard.just_pressed(KeyCode::ArrowUp) {
        settings.params.noise += NOISE_STEP;
        changed = true;
    }
    if keyboard.just_pressed(KeyCode::ArrowDown) {
        settings.params.noise = (settings.params.noise - NOISE_STEP).max(0.0);
        changed = true;
    }
    if keyboard.just_pressed(KeyCode::KeyC) {
        settings.params.color_mode = match settings.params.color_mode {
            ColorMode::Single => ColorMode::HeightGradient,
            ColorMode::HeightGradient => ColorMode::Single,
        };
        changed = true;
    }
    if keyboard.just_pressed(KeyCode::Space) {
        settings.auto_rotate = !settings.auto_rotate;
        info!("Auto-rotate: {}", settings.auto_rotate);
    }

    if changed {
        regenerate.write(RegenerateCloud);
    }
}
