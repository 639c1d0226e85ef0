//! Boss domain: the physics/presentation services the decision core consumes.
//!
//! The brain never talks to the engine directly. Every ray cast, overlap,
//! impulse and animation cue goes through [`BossWorld`], which the bevy host
//! implements over avian2d and the tests implement over a fake geometry.

use bevy::math::Vec2;
use serde::Serialize;

use crate::boss::attacks::AttackKind;
use crate::boss::state::BossState;

/// Opaque handle to a physics body owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BodyId(pub u64);

/// Which colliders a query may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFilter {
    /// Ground, walls and one-way platforms
    Terrain,
    /// Ground and walls only; one-way platforms are passable sideways and from below
    Solid,
    /// The boss's target body
    Target,
}

/// Nearest obstacle returned by a ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    pub point: Vec2,
    pub distance: f32,
    pub surface: BodyId,
}

/// Things the brain can ask the host to create.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prefab {
    Projectile { damage: f32, velocity: Vec2 },
    /// Telegraph shown until the area strike lands after `duration` seconds
    AreaIndicator { radius: f32, duration: f32 },
}

/// Fire-and-forget presentation cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCue {
    State(BossState),
    Attack(AttackKind),
    Jump,
    Phase,
    FadeOut,
    FadeIn,
}

pub trait BossWorld {
    /// Monotonic, frame-coherent time in seconds.
    fn now(&self) -> f32;

    fn body_position(&self, body: BodyId) -> Option<Vec2>;

    fn body_velocity(&self, body: BodyId) -> Vec2;

    fn sense_nearest(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<HitInfo>;

    fn overlap_area(&self, center: Vec2, radius: f32, filter: QueryFilter) -> Vec<BodyId>;

    /// Instant velocity change (bodies are treated as unit mass).
    fn apply_impulse(&mut self, body: BodyId, impulse: Vec2);

    fn set_velocity(&mut self, body: BodyId, velocity: Vec2);

    fn teleport(&mut self, body: BodyId, point: Vec2);

    /// Toggle collision between `body` and `surface` (used for phasing).
    fn set_collision_ignored(&mut self, body: BodyId, surface: BodyId, ignored: bool);

    fn notify_animation(&mut self, body: BodyId, cue: AnimationCue);

    fn damage(&mut self, target: BodyId, amount: f32);

    fn spawn(&mut self, prefab: Prefab, point: Vec2) -> BodyId;
}
