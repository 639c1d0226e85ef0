//! Arena domain: static geometry, the target body and the boss spawner.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::arena::components::{ArenaPlatform, PlayerSpawn};
use crate::boss::{BossTuning, spawn_boss};
use crate::combat::{Health, Team};
use crate::core::{LiveEnemies, Progression};
use crate::movement::{
    GameLayer, Ground, MovementState, OneWayPlatform, OneWayRider, Player, Wall,
};

pub const ARENA_HALF_WIDTH: f32 = 15.0;
const ARENA_HEIGHT: f32 = 16.0;
const PLAYER_START: Vec2 = Vec2::new(-4.0, 1.0);
const PLAYER_SIZE: Vec2 = Vec2::new(0.6, 1.2);
const PLAYER_HEALTH: f32 = 20.0;
const BOSS_START: Vec2 = Vec2::new(8.0, 1.5);

/// (centre, size, one_way) for every floating platform
const PLATFORMS: [(Vec2, Vec2, bool); 5] = [
    (Vec2::new(-6.0, 3.25), Vec2::new(4.0, 0.5), false),
    (Vec2::new(6.0, 2.85), Vec2::new(4.0, 0.3), true),
    (Vec2::new(0.0, 5.85), Vec2::new(5.0, 0.3), true),
    (Vec2::new(-9.0, 8.25), Vec2::new(3.0, 0.5), false),
    (Vec2::new(9.0, 8.85), Vec2::new(3.0, 0.3), true),
];

pub(crate) fn spawn_arena(mut commands: Commands) {
    let wall_color = Color::srgb(0.25, 0.25, 0.35);
    let ground_color = Color::srgb(0.35, 0.4, 0.35);
    let one_way_color = Color::srgb(0.5, 0.45, 0.3);

    let ground_layers = CollisionLayers::new(
        GameLayer::Ground,
        [GameLayer::Player, GameLayer::Enemy, GameLayer::EnemyHitbox],
    );
    let wall_layers = CollisionLayers::new(
        GameLayer::Wall,
        [GameLayer::Player, GameLayer::Enemy, GameLayer::EnemyHitbox],
    );
    let one_way_layers =
        CollisionLayers::new(GameLayer::OneWay, [GameLayer::Player, GameLayer::Enemy]);

    // Floor; its top is y = 0
    let floor_size = Vec2::new(ARENA_HALF_WIDTH * 2.0, 1.0);
    commands.spawn((
        Ground,
        Sprite {
            color: ground_color,
            custom_size: Some(floor_size),
            ..default()
        },
        Transform::from_xyz(0.0, -0.5, 0.0),
        RigidBody::Static,
        Collider::rectangle(floor_size.x, floor_size.y),
        ground_layers,
    ));

    // Side walls
    for side in [-1.0, 1.0] {
        commands.spawn((
            Wall,
            Sprite {
                color: wall_color,
                custom_size: Some(Vec2::new(1.0, ARENA_HEIGHT)),
                ..default()
            },
            Transform::from_xyz(side * (ARENA_HALF_WIDTH + 0.5), ARENA_HEIGHT * 0.5, 0.0),
            RigidBody::Static,
            Collider::rectangle(1.0, ARENA_HEIGHT),
            wall_layers,
        ));
    }

    // Low block the boss has to jump
    commands.spawn((
        Wall,
        Sprite {
            color: wall_color,
            custom_size: Some(Vec2::new(0.6, 1.2)),
            ..default()
        },
        Transform::from_xyz(3.0, 0.6, 0.0),
        RigidBody::Static,
        Collider::rectangle(0.6, 1.2),
        wall_layers,
    ));

    for (index, (center, size, one_way)) in PLATFORMS.into_iter().enumerate() {
        let platform = ArenaPlatform {
            id: index as u32 + 1,
            half_width: size.x * 0.5,
            half_height: size.y * 0.5,
            one_way,
        };
        let mut entity = commands.spawn((
            platform,
            Sprite {
                color: if one_way { one_way_color } else { ground_color },
                custom_size: Some(size),
                ..default()
            },
            Transform::from_xyz(center.x, center.y, 0.0),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
        ));
        if one_way {
            entity.insert((OneWayPlatform, one_way_layers));
        } else {
            entity.insert((Ground, ground_layers));
        }
    }

    spawn_player(&mut commands, PLAYER_START);
}

fn spawn_player(commands: &mut Commands, position: Vec2) -> Entity {
    commands
        .spawn((
            (
                Player,
                PlayerSpawn(position),
                Team::Player,
                Health::new(PLAYER_HEALTH),
                MovementState::default(),
                OneWayRider::default(),
            ),
            (
                Sprite {
                    color: Color::srgb(0.3, 0.6, 0.9),
                    custom_size: Some(PLAYER_SIZE),
                    ..default()
                },
                Transform::from_xyz(position.x, position.y, 0.0),
            ),
            (
                RigidBody::Dynamic,
                Collider::rectangle(PLAYER_SIZE.x, PLAYER_SIZE.y),
                CollisionEventsEnabled,
                CollisionLayers::new(
                    GameLayer::Player,
                    [
                        GameLayer::Ground,
                        GameLayer::Wall,
                        GameLayer::OneWay,
                        GameLayer::EnemyHitbox,
                    ],
                ),
                LinearVelocity::default(),
                LinearDamping(1.0),
                Friction::ZERO,
                LockedAxes::ROTATION_LOCKED,
                GravityScale(1.0),
            ),
        ))
        .id()
}

pub(crate) fn spawn_level_boss(
    commands: &mut Commands,
    tuning: &BossTuning,
    progression: &Progression,
    live: &mut LiveEnemies,
) -> Entity {
    let entity = spawn_boss(
        commands,
        tuning,
        progression.context(),
        BOSS_START,
        rand::random(),
    );
    live.spawned();
    entity
}

pub(crate) fn spawn_first_boss(
    mut commands: Commands,
    tuning: Res<BossTuning>,
    progression: Res<Progression>,
    mut live: ResMut<LiveEnemies>,
) {
    spawn_level_boss(&mut commands, &tuning, &progression, &mut live);
}
