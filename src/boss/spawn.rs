//! Boss domain: spawning a boss body with its brain.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::boss::avian::body_id;
use crate::boss::brain::BossBrain;
use crate::boss::components::BossAgent;
use crate::boss::tuning::BossTuning;
use crate::combat::{Health, Team};
use crate::core::DifficultyContext;
use crate::movement::{GameLayer, OneWayRider};

pub const BOSS_COLOR: Color = Color::srgb(0.9, 0.1, 0.1);

/// Spawn a boss with health and attack damage scaled by `difficulty`
pub fn spawn_boss(
    commands: &mut Commands,
    tuning: &BossTuning,
    difficulty: DifficultyContext,
    position: Vec2,
    seed: u64,
) -> Entity {
    let size = Vec2::new(tuning.body.half_width, tuning.body.half_height) * 2.0;
    let health = difficulty.scale_health(tuning.base_health);

    let entity = commands
        .spawn((
            // Identity & Combat
            (Team::Enemy, Health::new(health)),
            // Rendering
            (
                Sprite {
                    color: BOSS_COLOR,
                    custom_size: Some(size),
                    ..default()
                },
                Transform::from_xyz(position.x, position.y, 0.0),
            ),
            // Physics
            (
                RigidBody::Dynamic,
                Collider::rectangle(size.x, size.y),
                CollisionLayers::new(
                    GameLayer::Enemy,
                    [GameLayer::Ground, GameLayer::Wall, GameLayer::OneWay],
                ),
                LinearVelocity::default(),
                Friction::ZERO,
                LockedAxes::ROTATION_LOCKED,
                GravityScale(1.0),
                OneWayRider::default(),
            ),
        ))
        .id();

    let brain = BossBrain::new(body_id(entity), tuning, difficulty, seed);
    commands.entity(entity).insert(BossAgent::new(brain));

    info!(
        "Spawned boss {:?} at level {} with {:.0} health",
        entity, difficulty.level, health
    );
    entity
}
