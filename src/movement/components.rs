//! Movement domain: components and physics layers for locomotion.

use avian2d::prelude::*;
use bevy::prelude::*;
use serde::Serialize;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Solid floors and floating slabs
    Ground,
    /// Wall surfaces
    Wall,
    /// Platforms that can be passed from below and phased through from above
    OneWay,
    /// Player character
    Player,
    /// Enemy characters
    Enemy,
    /// Enemy projectiles (damage player)
    EnemyHitbox,
}

#[derive(Component, Debug)]
pub struct Player;

/// Marker for ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for wall colliders
#[derive(Component, Debug)]
pub struct Wall;

/// Marker for one-way platform colliders
#[derive(Component, Debug)]
pub struct OneWayPlatform;

/// Grounded flag of the target body
#[derive(Component, Debug, Default)]
pub struct MovementState {
    pub on_ground: bool,
}

/// Bodies that land on one-way platforms from above
#[derive(Component, Debug, Default)]
pub struct OneWayRider {
    /// Dropping through one-way platforms on purpose
    pub phasing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// Facing toward a signed horizontal offset; zero keeps `self`.
    pub fn toward(self, dx: f32) -> Self {
        if dx > 0.0 {
            Facing::Right
        } else if dx < 0.0 {
            Facing::Left
        } else {
            self
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }

    pub fn as_vec(self) -> Vec2 {
        Vec2::new(self.sign(), 0.0)
    }
}
