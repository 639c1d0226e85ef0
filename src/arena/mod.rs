//! Arena domain: the demo arena the boss fights in.

mod components;
mod spawn;
mod systems;

use bevy::prelude::*;

use crate::arena::spawn::{spawn_arena, spawn_first_boss};
use crate::arena::systems::{collect_platforms, reset_player, respawn_boss};
use crate::core::{ProgressionSet, gameplay_active};

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_arena, spawn_first_boss).chain())
            .add_systems(PostStartup, collect_platforms)
            .add_systems(
                Update,
                (respawn_boss, reset_player)
                    .after(ProgressionSet)
                    .run_if(gameplay_active),
            );
    }
}
