//! Movement domain: tuning and input resources for the target body.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct PlayerTuning {
    pub max_speed: f32,
    pub accel: f32,
    pub decel: f32,
    pub jump_velocity: f32,
    /// Matches the physics gravity; only used for reach estimates
    pub gravity: f32,
    /// Length of the downward ground probe below the feet
    pub ground_probe: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_speed: 5.0,
            accel: 40.0,
            decel: 35.0,
            jump_velocity: 8.0,
            gravity: 9.81,
            ground_probe: 0.1,
        }
    }
}

impl PlayerTuning {
    /// Maximum height reachable from a single ground jump: h = v² / (2g)
    pub fn single_jump_height(&self) -> f32 {
        self.jump_velocity * self.jump_velocity / (2.0 * self.gravity)
    }
}

#[derive(Resource, Debug, Default)]
pub struct MovementInput {
    pub axis: Vec2,
    pub jump_just_pressed: bool,
}
