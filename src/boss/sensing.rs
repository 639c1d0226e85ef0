//! Boss domain: ray probes built on top of [`BossWorld`].

use bevy::math::Vec2;

use crate::boss::attacks::TargetDistances;
use crate::boss::tuning::{BodyShape, ObstacleTuning};
use crate::boss::world::{BossWorld, HitInfo, QueryFilter};

/// Probes start slightly inside the body so they do not begin flush with a surface.
const SKIN: f32 = 0.05;

pub fn distances(boss: Vec2, target: Vec2) -> TargetDistances {
    TargetDistances {
        horizontal: (target.x - boss.x).abs(),
        direct: boss.distance(target),
    }
}

fn feet(position: Vec2, body: &BodyShape) -> Vec2 {
    Vec2::new(position.x, position.y - body.half_height + SKIN)
}

/// Surface directly below the feet, if any.
pub fn ground_below(world: &dyn BossWorld, position: Vec2, body: &BodyShape) -> Option<HitInfo> {
    world.sense_nearest(
        feet(position, body),
        Vec2::NEG_Y,
        body.ground_probe + SKIN,
        QueryFilter::Terrain,
    )
}

pub fn is_grounded(world: &dyn BossWorld, position: Vec2, body: &BodyShape) -> bool {
    ground_below(world, position, body).is_some()
}

/// Solid terrain within `reach` of the body edge on the `sign` side.
pub fn wall_contact(
    world: &dyn BossWorld,
    position: Vec2,
    sign: f32,
    body: &BodyShape,
    reach: f32,
) -> Option<HitInfo> {
    world.sense_nearest(
        position,
        Vec2::new(sign, 0.0),
        body.half_width + reach,
        QueryFilter::Solid,
    )
}

/// True when there is no floor just past the leading edge.
pub fn ledge_ahead(
    world: &dyn BossWorld,
    position: Vec2,
    sign: f32,
    body: &BodyShape,
    obstacle: &ObstacleTuning,
) -> bool {
    let probe = feet(position, body) + Vec2::X * sign * (body.half_width + obstacle.ledge_probe_ahead);
    world
        .sense_nearest(
            probe,
            Vec2::NEG_Y,
            obstacle.ledge_probe_depth + SKIN,
            QueryFilter::Terrain,
        )
        .is_none()
}

/// Whether a wall in front can be jumped: free space above the boss, free
/// space over the wall, and ground to land on beyond it.
pub fn can_clear_wall(
    world: &dyn BossWorld,
    position: Vec2,
    sign: f32,
    body: &BodyShape,
    obstacle: &ObstacleTuning,
) -> bool {
    let direction = Vec2::new(sign, 0.0);
    if world
        .sense_nearest(position, Vec2::Y, obstacle.clear_height, QueryFilter::Solid)
        .is_some()
    {
        return false;
    }

    let apex = position + Vec2::Y * obstacle.clear_height;
    if world
        .sense_nearest(
            apex,
            direction,
            body.half_width + obstacle.landing_distance,
            QueryFilter::Solid,
        )
        .is_some()
    {
        return false;
    }

    let landing = apex + direction * (body.half_width + obstacle.landing_distance);
    world
        .sense_nearest(
            landing,
            Vec2::NEG_Y,
            obstacle.clear_height + body.half_height + obstacle.ledge_probe_depth,
            QueryFilter::Terrain,
        )
        .is_some()
}

/// Whether the far side of a gap has floor within jumping distance.
pub fn ground_past_gap(
    world: &dyn BossWorld,
    position: Vec2,
    sign: f32,
    body: &BodyShape,
    obstacle: &ObstacleTuning,
) -> bool {
    let probe = feet(position, body) + Vec2::X * sign * (body.half_width + obstacle.gap_probe);
    world
        .sense_nearest(
            probe,
            Vec2::NEG_Y,
            obstacle.ledge_probe_depth + SKIN,
            QueryFilter::Terrain,
        )
        .is_some()
}

/// Solid terrain on the straight line between two points.
pub fn path_obstructed(world: &dyn BossWorld, from: Vec2, to: Vec2) -> bool {
    let delta = to - from;
    let length = delta.length();
    if length <= f32::EPSILON {
        return false;
    }
    world
        .sense_nearest(from, delta / length, length, QueryFilter::Solid)
        .is_some()
}
