//! Combat domain: components for damageable bodies and short-lived effects.

use bevy::prelude::*;

/// Health component for damageable entities
#[derive(Component, Debug, Clone)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.current);
        self.current -= actual;
        actual
    }

    pub fn restore(&mut self) {
        self.current = self.max;
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percent(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }
}

/// Team affiliation to prevent friendly fire
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Player,
    Enemy,
}

/// Enemy projectile; damages the first target body it touches
#[derive(Component, Debug)]
pub struct Projectile {
    pub damage: f32,
    pub owner: Entity,
}

/// Telegraph drawn under an area attack before it lands
#[derive(Component, Debug)]
pub struct AreaIndicator {
    pub radius: f32,
}

/// Seconds left before the entity is despawned
#[derive(Component, Debug)]
pub struct Lifetime(pub f32);
