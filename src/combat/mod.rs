//! Combat domain: health, damage and impulse messages, projectiles and deaths.

mod components;
mod events;
mod spawn;
mod systems;

pub use components::{Health, Team};
pub use events::{DamageEvent, DeathEvent, ImpulseEvent};
pub use spawn::{spawn_area_indicator, spawn_projectile};

use bevy::prelude::*;

use crate::combat::systems::{
    apply_damage, apply_impulses, detect_projectile_hits, process_player_deaths, tick_lifetimes,
};
use crate::core::gameplay_active;

/// Damage resolution runs in this set; boss ticks write into it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CombatSet;

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<DamageEvent>()
            .add_message::<ImpulseEvent>()
            .add_message::<DeathEvent>()
            .add_systems(
                Update,
                (
                    detect_projectile_hits,
                    apply_damage,
                    apply_impulses,
                    process_player_deaths,
                    tick_lifetimes,
                )
                    .chain()
                    .in_set(CombatSet)
                    .run_if(gameplay_active),
            );
    }
}
