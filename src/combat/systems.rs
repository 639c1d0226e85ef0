//! Combat domain: damage, impulses, projectile hits and cleanup.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::combat::components::{Health, Lifetime, Projectile, Team};
use crate::combat::events::{DamageEvent, DeathEvent, ImpulseEvent};
use crate::core::ResetProgressionEvent;
use crate::movement::Player;

/// Maximum speed a body can have right after an impulse
const MAX_IMPULSE_SPEED: f32 = 25.0;

pub(crate) fn tick_lifetimes(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Lifetime)>,
) {
    let dt = time.delta_secs();
    for (entity, mut lifetime) in &mut query {
        lifetime.0 -= dt;
        if lifetime.0 <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

pub(crate) fn detect_projectile_hits(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionStart>,
    mut damage_events: MessageWriter<DamageEvent>,
    projectiles: Query<&Projectile>,
    targets: Query<&Team, With<Health>>,
) {
    let mut spent: Vec<Entity> = Vec::new();
    for event in collision_events.read() {
        let pairs = [
            (event.collider1, event.collider2),
            (event.collider2, event.collider1),
        ];

        for (projectile_entity, other) in pairs {
            let Ok(projectile) = projectiles.get(projectile_entity) else {
                continue;
            };
            if spent.contains(&projectile_entity) || other == projectile.owner {
                continue;
            }

            if let Ok(team) = targets.get(other) {
                if *team == Team::Enemy {
                    continue;
                }
                damage_events.write(DamageEvent {
                    source: projectile.owner,
                    target: other,
                    amount: projectile.damage,
                });
            }
            // Terrain or target, either way the shot is spent
            spent.push(projectile_entity);
            commands.entity(projectile_entity).despawn();
        }
    }
}

pub(crate) fn apply_damage(
    mut damage_events: MessageReader<DamageEvent>,
    mut death_events: MessageWriter<DeathEvent>,
    mut query: Query<&mut Health>,
) {
    for event in damage_events.read() {
        let Ok(mut health) = query.get_mut(event.target) else {
            continue;
        };
        if health.is_dead() {
            continue;
        }
        let taken = health.take_damage(event.amount);
        debug!(
            "{:?} hit {:?} for {:.1} ({:.1}/{:.1})",
            event.source, event.target, taken, health.current, health.max
        );
        if health.is_dead() {
            death_events.write(DeathEvent {
                entity: event.target,
            });
        }
    }
}

pub(crate) fn apply_impulses(
    mut impulse_events: MessageReader<ImpulseEvent>,
    mut query: Query<&mut LinearVelocity>,
) {
    for event in impulse_events.read() {
        if let Ok(mut velocity) = query.get_mut(event.target) {
            velocity.0 = (velocity.0 + event.impulse).clamp_length_max(MAX_IMPULSE_SPEED);
            debug!(
                "Impulse applied: impulse={:?}, final_velocity=({:.1}, {:.1})",
                event.impulse, velocity.x, velocity.y
            );
        }
    }
}

/// A downed player restarts the climb from the first level.
pub(crate) fn process_player_deaths(
    mut death_events: MessageReader<DeathEvent>,
    mut reset_events: MessageWriter<ResetProgressionEvent>,
    mut players: Query<&mut Health, With<Player>>,
) {
    for event in death_events.read() {
        if let Ok(mut health) = players.get_mut(event.entity) {
            info!("Player {:?} defeated, resetting progression", event.entity);
            health.restore();
            reset_events.write(ResetProgressionEvent);
        }
    }
}
