//! Combat domain: spawning helpers for boss-created effects.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::combat::components::{AreaIndicator, Lifetime, Projectile};
use crate::movement::GameLayer;

/// Shots that hit nothing are cleaned up after this long
const PROJECTILE_LIFETIME: f32 = 3.0;
const PROJECTILE_RADIUS: f32 = 0.15;

pub fn spawn_projectile(
    commands: &mut Commands,
    owner: Entity,
    position: Vec2,
    velocity: Vec2,
    damage: f32,
) -> Entity {
    commands
        .spawn((
            Projectile { damage, owner },
            Lifetime(PROJECTILE_LIFETIME),
            Sprite {
                color: Color::srgb(1.0, 0.6, 0.2),
                custom_size: Some(Vec2::splat(PROJECTILE_RADIUS * 2.0)),
                ..default()
            },
            Transform::from_xyz(position.x, position.y, 1.0),
            RigidBody::Kinematic,
            Collider::circle(PROJECTILE_RADIUS),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(
                GameLayer::EnemyHitbox,
                [GameLayer::Player, GameLayer::Ground, GameLayer::Wall],
            ),
            LinearVelocity(velocity),
        ))
        .id()
}

pub fn spawn_area_indicator(
    commands: &mut Commands,
    position: Vec2,
    radius: f32,
    duration: f32,
) -> Entity {
    commands
        .spawn((
            AreaIndicator { radius },
            Lifetime(duration),
            Sprite {
                color: Color::srgba(0.9, 0.1, 0.1, 0.3),
                custom_size: Some(Vec2::new(radius * 2.0, 0.2)),
                ..default()
            },
            Transform::from_xyz(position.x, position.y, -0.5),
        ))
        .id()
}
