//! Arena domain: platform indexing and level flow.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::arena::components::{ArenaPlatform, PlayerSpawn};
use crate::arena::spawn::spawn_level_boss;
use crate::boss::{BossTuning, Platform, PlatformId, PlatformRegistry, body_id};
use crate::core::{LevelClearedEvent, LiveEnemies, Progression, ResetProgressionEvent};

/// Index the static platforms once they exist; the registry is read-only afterwards.
pub(crate) fn collect_platforms(
    mut commands: Commands,
    platforms: Query<(Entity, &ArenaPlatform, &Transform)>,
) {
    let registry = PlatformRegistry::new(platforms.iter().map(|(entity, platform, transform)| {
        Platform {
            id: PlatformId(platform.id),
            body: body_id(entity),
            position: platform.top_surface(transform.translation.truncate()),
            half_width: platform.half_width,
            one_way: platform.one_way,
        }
    }));
    info!("Indexed {} arena platforms", registry.len());
    commands.insert_resource(registry);
}

/// Each cleared level brings a new boss at the advanced difficulty.
pub(crate) fn respawn_boss(
    mut commands: Commands,
    mut cleared_events: MessageReader<LevelClearedEvent>,
    tuning: Res<BossTuning>,
    progression: Res<Progression>,
    mut live: ResMut<LiveEnemies>,
) {
    if cleared_events.read().count() == 0 {
        return;
    }
    info!("Level cleared, next boss at level {}", progression.level);
    spawn_level_boss(&mut commands, &tuning, &progression, &mut live);
}

pub(crate) fn reset_player(
    mut reset_events: MessageReader<ResetProgressionEvent>,
    mut players: Query<(&PlayerSpawn, &mut Transform, &mut LinearVelocity)>,
) {
    if reset_events.read().count() == 0 {
        return;
    }
    for (spawn, mut transform, mut velocity) in &mut players {
        transform.translation = spawn.0.extend(transform.translation.z);
        velocity.0 = Vec2::ZERO;
    }
}
