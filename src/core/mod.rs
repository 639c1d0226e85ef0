//! Core domain: camera, pausing, progression and difficulty wiring.

mod events;
mod resources;
mod systems;

pub use events::{LevelClearedEvent, ResetProgressionEvent};
pub use resources::{
    DifficultyContext, GameplayPaused, LiveEnemies, Progression, ProgressionRates,
    gameplay_active,
};

use bevy::prelude::*;

use crate::core::systems::{
    advance_progression, reset_progression, setup_camera, sync_virtual_time, toggle_pause,
};

/// Progression changes for the frame are applied in this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgressionSet;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameplayPaused>()
            .init_resource::<Progression>()
            .init_resource::<LiveEnemies>()
            .add_message::<LevelClearedEvent>()
            .add_message::<ResetProgressionEvent>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (toggle_pause, sync_virtual_time.run_if(resource_changed::<GameplayPaused>)).chain(),
            )
            .add_systems(
                Update,
                (reset_progression, advance_progression)
                    .chain()
                    .in_set(ProgressionSet),
            );
    }
}
