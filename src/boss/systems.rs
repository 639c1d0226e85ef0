//! Boss domain: bevy systems that drive brains over the avian world.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::boss::avian::{AvianWorld, BodyPose, WorldEffects, body_id};
use crate::boss::components::{BossAgent, BossCueEvent};
use crate::boss::platforms::PlatformRegistry;
use crate::boss::state::BossState;
use crate::boss::world::AnimationCue;
use crate::combat::{DamageEvent, DeathEvent, Health, ImpulseEvent};
use crate::core::{LevelClearedEvent, LiveEnemies};
use crate::movement::{Facing, OneWayRider, Player};

/// Alpha of a boss while faded out for a teleport
const FADED_ALPHA: f32 = 0.15;

pub(crate) fn track_targets(
    mut removed: RemovedComponents<Player>,
    players: Query<Entity, With<Player>>,
    mut bosses: Query<(Entity, &mut BossAgent)>,
) {
    for gone in removed.read() {
        let gone = body_id(gone);
        for (entity, mut agent) in &mut bosses {
            if agent.brain.target() == Some(gone) {
                info!("Boss {:?} lost its target", entity);
                agent.brain.target_lost();
            }
        }
    }

    let Some(player) = players.iter().next() else {
        return;
    };
    for (entity, mut agent) in &mut bosses {
        if agent.brain.target().is_none() {
            debug!("Boss {:?} now targets {:?}", entity, player);
            agent.brain.set_target(body_id(player));
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn tick_bosses(
    time: Res<Time>,
    spatial: SpatialQuery,
    mut commands: Commands,
    platforms: Res<PlatformRegistry>,
    others: Query<(Entity, &Transform, &LinearVelocity), (With<Health>, Without<BossAgent>)>,
    mut bosses: Query<(
        Entity,
        &mut BossAgent,
        &mut Transform,
        &mut LinearVelocity,
        &mut OneWayRider,
    )>,
    mut cue_events: MessageWriter<BossCueEvent>,
    mut damage_events: MessageWriter<DamageEvent>,
    mut impulse_events: MessageWriter<ImpulseEvent>,
) {
    let now = time.elapsed_secs();
    let dt = time.delta_secs();
    let bodies: HashMap<Entity, BodyPose> = others
        .iter()
        .map(|(entity, transform, velocity)| {
            (
                entity,
                BodyPose {
                    position: transform.translation.truncate(),
                    velocity: velocity.0,
                },
            )
        })
        .collect();
    let mut effects = WorldEffects::default();

    for (entity, mut agent, mut transform, mut velocity, mut rider) in &mut bosses {
        let mut world = AvianWorld {
            now,
            spatial: &spatial,
            commands: &mut commands,
            bodies: &bodies,
            boss: entity,
            pose: BodyPose {
                position: transform.translation.truncate(),
                velocity: velocity.0,
            },
            phasing: rider.phasing,
            effects: &mut effects,
        };

        if agent.tick_clip(dt) {
            agent.brain.finish_attack(&mut world);
        }
        let first_cue = world.effects.cues.len();
        agent.brain.advance(&mut world, &platforms, dt);

        let started = world.effects.cues[first_cue..]
            .iter()
            .find_map(|event| match event.cue {
                AnimationCue::Attack(kind) => Some(kind),
                _ => None,
            });
        if let Some(kind) = started {
            agent.attack_clip = Some(agent.brain.tuning().attacks.get(kind).clip_length);
        } else if agent.brain.state() != BossState::Attacking {
            agent.attack_clip = None;
        }

        let (pose, phasing) = (world.pose, world.phasing);
        if transform.translation.truncate() != pose.position {
            transform.translation = pose.position.extend(transform.translation.z);
        }
        if velocity.0 != pose.velocity {
            velocity.0 = pose.velocity;
        }
        if rider.phasing != phasing {
            rider.phasing = phasing;
        }
    }

    for event in effects.cues {
        cue_events.write(event);
    }
    for event in effects.damage {
        damage_events.write(event);
    }
    for event in effects.impulses {
        impulse_events.write(event);
    }
}

pub(crate) fn apply_boss_cues(
    mut cue_events: MessageReader<BossCueEvent>,
    mut sprites: Query<&mut Sprite, With<BossAgent>>,
) {
    for event in cue_events.read() {
        let Ok(mut sprite) = sprites.get_mut(event.boss) else {
            continue;
        };
        match event.cue {
            AnimationCue::FadeOut => sprite.color.set_alpha(FADED_ALPHA),
            AnimationCue::FadeIn => sprite.color.set_alpha(1.0),
            AnimationCue::Attack(kind) => {
                debug!("Boss {:?} plays {}", event.boss, kind.trigger());
            }
            _ => {}
        }
    }
}

pub(crate) fn face_sprites(mut bosses: Query<(&BossAgent, &mut Sprite)>) {
    for (agent, mut sprite) in &mut bosses {
        let flip = agent.brain.facing() == Facing::Left;
        if sprite.flip_x != flip {
            sprite.flip_x = flip;
        }
    }
}

pub(crate) fn process_boss_deaths(
    time: Res<Time>,
    spatial: SpatialQuery,
    mut commands: Commands,
    mut death_events: MessageReader<DeathEvent>,
    mut bosses: Query<(&mut BossAgent, &Transform, &LinearVelocity)>,
    mut live: ResMut<LiveEnemies>,
    mut cleared_events: MessageWriter<LevelClearedEvent>,
) {
    let bodies: HashMap<Entity, BodyPose> = HashMap::new();
    for event in death_events.read() {
        let Ok((mut agent, transform, velocity)) = bosses.get_mut(event.entity) else {
            continue;
        };
        let mut effects = WorldEffects::default();
        let mut world = AvianWorld {
            now: time.elapsed_secs(),
            spatial: &spatial,
            commands: &mut commands,
            bodies: &bodies,
            boss: event.entity,
            pose: BodyPose {
                position: transform.translation.truncate(),
                velocity: velocity.0,
            },
            phasing: false,
            effects: &mut effects,
        };
        agent.brain.teardown(&mut world);

        info!(
            "Boss {:?} defeated in state {:?}",
            event.entity,
            agent.brain.state()
        );
        commands.entity(event.entity).despawn();
        live.removed();
        if live.count == 0 {
            cleared_events.write(LevelClearedEvent);
        }
    }
}
