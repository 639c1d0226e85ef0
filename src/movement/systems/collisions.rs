//! Movement domain: ground detection and one-way platform filtering.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{GameLayer, MovementState, OneWayRider, Player, PlayerTuning};

/// Riders moving up faster than this pass through one-way platforms
const RISING_SPEED: f32 = 0.1;

pub(crate) fn detect_ground(
    spatial_query: SpatialQuery,
    tuning: Res<PlayerTuning>,
    mut query: Query<(Entity, &Transform, &Collider, &mut MovementState), With<Player>>,
) {
    let ground_filter =
        SpatialQueryFilter::from_mask([GameLayer::Ground, GameLayer::Wall, GameLayer::OneWay]);

    for (entity, transform, collider, mut state) in &mut query {
        let half_height = match collider.shape_scaled().as_cuboid() {
            Some(c) => c.half_extents.y,
            None => 0.5,
        };

        let ray_origin = transform.translation.truncate() - Vec2::new(0.0, half_height);
        let hit = spatial_query.cast_ray(
            ray_origin,
            Dir2::NEG_Y,
            tuning.ground_probe,
            true,
            &ground_filter.clone().with_excluded_entities([entity]),
        );

        state.on_ground = hit.is_some();
    }
}

/// One-way platforms only collide with riders that are falling onto them.
pub(crate) fn update_one_way_filters(
    mut query: Query<(&OneWayRider, &LinearVelocity, &mut CollisionLayers)>,
) {
    for (rider, velocity, mut layers) in &mut query {
        let solid = !rider.phasing && velocity.y <= RISING_SPEED;
        let has_one_way = layers.filters.has_all(GameLayer::OneWay);
        if solid && !has_one_way {
            layers.filters.add(GameLayer::OneWay);
        } else if !solid && has_one_way {
            layers.filters.remove(GameLayer::OneWay);
        }
    }
}
