//! Boss domain: [`BossWorld`] over avian2d spatial queries and bevy commands.
//!
//! The adapter works on a per-frame copy of the boss body. Pose, velocity and
//! the phasing flag are written back by the tick system afterwards, and every
//! effect on another body is buffered as a message.

use avian2d::prelude::*;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::boss::components::BossCueEvent;
use crate::boss::world::{AnimationCue, BodyId, BossWorld, HitInfo, Prefab, QueryFilter};
use crate::combat::{DamageEvent, ImpulseEvent, spawn_area_indicator, spawn_projectile};
use crate::movement::GameLayer;

pub fn body_id(entity: Entity) -> BodyId {
    BodyId(entity.to_bits())
}

pub fn entity_of(body: BodyId) -> Entity {
    Entity::from_bits(body.0)
}

pub(crate) fn spatial_filter(filter: QueryFilter) -> SpatialQueryFilter {
    match filter {
        QueryFilter::Terrain => SpatialQueryFilter::from_mask([
            GameLayer::Ground,
            GameLayer::Wall,
            GameLayer::OneWay,
        ]),
        QueryFilter::Solid => SpatialQueryFilter::from_mask([GameLayer::Ground, GameLayer::Wall]),
        QueryFilter::Target => SpatialQueryFilter::from_mask(GameLayer::Player),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyPose {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Messages produced during a tick, written once all bosses have run.
#[derive(Debug, Default)]
pub struct WorldEffects {
    pub damage: Vec<DamageEvent>,
    pub impulses: Vec<ImpulseEvent>,
    pub cues: Vec<BossCueEvent>,
}

pub struct AvianWorld<'a, 'w, 's, 'cw, 'cs> {
    pub now: f32,
    pub spatial: &'a SpatialQuery<'w, 's>,
    pub commands: &'a mut Commands<'cw, 'cs>,
    /// Other bodies the brain may look at, snapshotted at the start of the frame
    pub bodies: &'a HashMap<Entity, BodyPose>,
    pub boss: Entity,
    pub pose: BodyPose,
    pub phasing: bool,
    pub effects: &'a mut WorldEffects,
}

impl AvianWorld<'_, '_, '_, '_, '_> {
    fn is_boss(&self, body: BodyId) -> bool {
        body == body_id(self.boss)
    }
}

impl BossWorld for AvianWorld<'_, '_, '_, '_, '_> {
    fn now(&self) -> f32 {
        self.now
    }

    fn body_position(&self, body: BodyId) -> Option<Vec2> {
        if self.is_boss(body) {
            return Some(self.pose.position);
        }
        self.bodies.get(&entity_of(body)).map(|pose| pose.position)
    }

    fn body_velocity(&self, body: BodyId) -> Vec2 {
        if self.is_boss(body) {
            return self.pose.velocity;
        }
        self.bodies
            .get(&entity_of(body))
            .map(|pose| pose.velocity)
            .unwrap_or(Vec2::ZERO)
    }

    fn sense_nearest(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<HitInfo> {
        let direction = Dir2::new(direction).ok()?;
        let filter = spatial_filter(filter).with_excluded_entities([self.boss]);
        self.spatial
            .cast_ray(origin, direction, max_distance, true, &filter)
            .map(|hit| HitInfo {
                point: origin + *direction * hit.distance,
                distance: hit.distance,
                surface: body_id(hit.entity),
            })
    }

    fn overlap_area(&self, center: Vec2, radius: f32, filter: QueryFilter) -> Vec<BodyId> {
        let filter = spatial_filter(filter).with_excluded_entities([self.boss]);
        self.spatial
            .shape_intersections(&Collider::circle(radius), center, 0.0, &filter)
            .into_iter()
            .map(body_id)
            .collect()
    }

    fn apply_impulse(&mut self, body: BodyId, impulse: Vec2) {
        if self.is_boss(body) {
            self.pose.velocity += impulse;
        } else {
            self.effects.impulses.push(ImpulseEvent {
                target: entity_of(body),
                impulse,
            });
        }
    }

    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) {
        if self.is_boss(body) {
            self.pose.velocity = velocity;
        } else {
            debug!("ignoring velocity write to foreign body {:?}", body);
        }
    }

    fn teleport(&mut self, body: BodyId, point: Vec2) {
        if self.is_boss(body) {
            self.pose.position = point;
        } else {
            debug!("ignoring teleport of foreign body {:?}", body);
        }
    }

    // One-way platforms are filtered per rider, so phasing drops through all of them.
    fn set_collision_ignored(&mut self, body: BodyId, _surface: BodyId, ignored: bool) {
        if self.is_boss(body) {
            self.phasing = ignored;
        }
    }

    fn notify_animation(&mut self, body: BodyId, cue: AnimationCue) {
        self.effects.cues.push(BossCueEvent {
            boss: entity_of(body),
            cue,
        });
    }

    fn damage(&mut self, target: BodyId, amount: f32) {
        self.effects.damage.push(DamageEvent {
            source: self.boss,
            target: entity_of(target),
            amount,
        });
    }

    fn spawn(&mut self, prefab: Prefab, point: Vec2) -> BodyId {
        let entity = match prefab {
            Prefab::Projectile { damage, velocity } => {
                spawn_projectile(self.commands, self.boss, point, velocity, damage)
            }
            Prefab::AreaIndicator { radius, duration } => {
                spawn_area_indicator(self.commands, point, radius, duration)
            }
        };
        body_id(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_ids_round_trip_entities() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        assert_eq!(entity_of(body_id(entity)), entity);
        assert_ne!(body_id(entity), body_id(world.spawn_empty().id()));
    }
}
