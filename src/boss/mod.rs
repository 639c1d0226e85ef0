//! Boss domain: the combat AI decision layer and its bevy host.
//!
//! Everything from `world` down to `brain` is engine-free and driven through
//! the [`world::BossWorld`] trait. `avian`, `systems` and `spawn` wire it into bevy.

mod attacks;
mod avian;
mod brain;
mod components;
mod cooldowns;
mod locomotion;
mod platforms;
mod sensing;
mod spawn;
mod state;
mod systems;
mod teleport;
mod timers;
mod tuning;
mod unstuck;
mod world;

#[cfg(test)]
mod tests;

pub use attacks::{AttackDefinition, AttackKind, RangeMetric};
pub use avian::body_id;
pub use brain::BossBrain;
pub use components::BossAgent;
pub use platforms::{Platform, PlatformId, PlatformRegistry};
pub use spawn::spawn_boss;
pub use tuning::BossTuning;

use bevy::prelude::*;

use crate::boss::components::BossCueEvent;
use crate::boss::systems::{
    apply_boss_cues, face_sprites, process_boss_deaths, tick_bosses, track_targets,
};
use crate::combat::CombatSet;
use crate::core::gameplay_active;
use crate::movement::OneWaySet;

pub struct BossAiPlugin;

impl Plugin for BossAiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlatformRegistry>()
            .init_resource::<BossTuning>()
            .add_message::<BossCueEvent>()
            .add_systems(
                Update,
                (
                    (track_targets, tick_bosses)
                        .chain()
                        .before(CombatSet)
                        .before(OneWaySet),
                    (apply_boss_cues, face_sprites).after(tick_bosses),
                    process_boss_deaths.after(CombatSet),
                )
                    .run_if(gameplay_active),
            );
    }
}
