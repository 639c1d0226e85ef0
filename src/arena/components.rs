//! Arena domain: markers for the demo arena.

use bevy::prelude::*;

/// A platform the boss may navigate to. The transform is the slab centre.
#[derive(Component, Debug, Clone, Copy)]
pub struct ArenaPlatform {
    pub id: u32,
    pub half_width: f32,
    pub half_height: f32,
    pub one_way: bool,
}

impl ArenaPlatform {
    /// Centre of the top surface for a slab centred at `center`.
    pub fn top_surface(&self, center: Vec2) -> Vec2 {
        center + Vec2::Y * self.half_height
    }
}

/// Where the target body starts and returns to after a reset
#[derive(Component, Debug)]
pub struct PlayerSpawn(pub Vec2);
