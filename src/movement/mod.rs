//! Movement domain: physics layers, body markers, facing and the target body controller.

mod components;
mod resources;
mod systems;

pub use components::{
    Facing, GameLayer, Ground, MovementState, OneWayPlatform, OneWayRider, Player, Wall,
};
pub use resources::{MovementInput, PlayerTuning};

use bevy::prelude::*;

use crate::core::gameplay_active;
use crate::movement::systems::{
    apply_drop_through, apply_horizontal_movement, apply_jump, detect_ground, read_input,
    update_one_way_filters,
};

/// Collision filters of one-way riders are refreshed here; anything that toggles phasing runs before.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct OneWaySet;

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementInput>()
            .init_resource::<PlayerTuning>()
            .add_systems(
                Update,
                (
                    read_input,
                    detect_ground,
                    apply_horizontal_movement,
                    apply_jump,
                    apply_drop_through,
                )
                    .chain()
                    .before(OneWaySet)
                    .run_if(gameplay_active),
            )
            .add_systems(
                Update,
                update_one_way_filters
                    .in_set(OneWaySet)
                    .run_if(gameplay_active),
            );
    }
}
