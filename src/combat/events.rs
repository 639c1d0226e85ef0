//! Combat domain: combat-related events.

use bevy::ecs::message::Message;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy)]
pub struct DamageEvent {
    pub source: Entity,
    pub target: Entity,
    pub amount: f32,
}

impl Message for DamageEvent {}

/// Instant velocity change for a dynamic body
#[derive(Debug, Clone, Copy)]
pub struct ImpulseEvent {
    pub target: Entity,
    pub impulse: Vec2,
}

impl Message for ImpulseEvent {}

#[derive(Debug)]
pub struct DeathEvent {
    pub entity: Entity,
}

impl Message for DeathEvent {}
