//! Boss domain: ECS components and messages wrapping the decision core.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::boss::brain::BossBrain;
use crate::boss::world::AnimationCue;

/// A boss driven by its brain. Ticked once per frame by the host.
#[derive(Component)]
pub struct BossAgent {
    pub brain: BossBrain,
    /// Time left on the attack clip currently playing
    pub attack_clip: Option<f32>,
}

impl BossAgent {
    pub fn new(brain: BossBrain) -> Self {
        Self {
            brain,
            attack_clip: None,
        }
    }

    /// Advance the clip; true on the frame it completes.
    pub fn tick_clip(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.attack_clip.as_mut() else {
            return false;
        };
        *remaining -= dt;
        if *remaining <= 0.0 {
            self.attack_clip = None;
            true
        } else {
            false
        }
    }
}

/// Presentation cue emitted by a boss brain.
#[derive(Debug, Clone, Copy)]
pub struct BossCueEvent {
    pub boss: Entity,
    pub cue: AnimationCue,
}

impl Message for BossCueEvent {}
