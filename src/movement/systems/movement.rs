//! Movement domain: locomotion for the keyboard-driven target body.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{MovementInput, MovementState, OneWayRider, Player, PlayerTuning};

pub(crate) fn apply_horizontal_movement(
    time: Res<Time>,
    input: Res<MovementInput>,
    tuning: Res<PlayerTuning>,
    mut query: Query<&mut LinearVelocity, With<Player>>,
) {
    let dt = time.delta_secs();

    for mut velocity in &mut query {
        let target_vx = input.axis.x * tuning.max_speed;

        if input.axis.x.abs() > 0.1 {
            let accel = tuning.accel * dt;
            if velocity.x < target_vx {
                velocity.x = (velocity.x + accel).min(target_vx);
            } else {
                velocity.x = (velocity.x - accel).max(target_vx);
            }
        } else {
            let decel = tuning.decel * dt;
            if velocity.x > 0.0 {
                velocity.x = (velocity.x - decel).max(0.0);
            } else {
                velocity.x = (velocity.x + decel).min(0.0);
            }
        }
    }
}

pub(crate) fn apply_jump(
    input: Res<MovementInput>,
    tuning: Res<PlayerTuning>,
    mut query: Query<(&MovementState, &mut LinearVelocity), With<Player>>,
) {
    if !input.jump_just_pressed {
        return;
    }
    for (state, mut velocity) in &mut query {
        if state.on_ground {
            velocity.y = tuning.jump_velocity;
            debug!("Player jump");
        }
    }
}

/// Holding down drops the player through one-way platforms.
pub(crate) fn apply_drop_through(
    input: Res<MovementInput>,
    mut query: Query<&mut OneWayRider, With<Player>>,
) {
    let dropping = input.axis.y < -0.5;
    for mut rider in &mut query {
        if rider.phasing != dropping {
            rider.phasing = dropping;
        }
    }
}
