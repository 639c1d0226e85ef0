//! Core domain: camera setup, pausing and progression bookkeeping.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::core::events::{LevelClearedEvent, ResetProgressionEvent};
use crate::core::resources::{GameplayPaused, Progression};

/// Pause source owned by the keyboard toggle
const MANUAL_PAUSE: &str = "manual";

/// World units are metres; one unit covers this many pixels on screen.
const PIXELS_PER_UNIT: f32 = 32.0;

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::from(OrthographicProjection {
            scale: 1.0 / PIXELS_PER_UNIT,
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(0.0, 4.0, 0.0),
    ));
}

/// P toggles the manual pause.
pub(crate) fn toggle_pause(keyboard: Res<ButtonInput<KeyCode>>, mut paused: ResMut<GameplayPaused>) {
    if !keyboard.just_pressed(KeyCode::KeyP) {
        return;
    }
    if paused.sources.contains(MANUAL_PAUSE) {
        paused.unpause(MANUAL_PAUSE);
    } else {
        paused.pause(MANUAL_PAUSE);
    }
    info!("Gameplay paused: {}", paused.is_paused());
}

/// Stop the virtual clock while any pause source is active. Physics and every
/// brain timer read this clock, so nothing elapses during a pause.
pub(crate) fn sync_virtual_time(paused: Res<GameplayPaused>, mut time: ResMut<Time<Virtual>>) {
    apply_pause(&paused, &mut time);
}

fn apply_pause(paused: &GameplayPaused, time: &mut Time<Virtual>) {
    match (paused.is_paused(), time.is_paused()) {
        (true, false) => time.pause(),
        (false, true) => time.unpause(),
        _ => {}
    }
}

pub(crate) fn advance_progression(
    mut events: MessageReader<LevelClearedEvent>,
    mut progression: ResMut<Progression>,
) {
    for _ in events.read() {
        let ctx = progression.advance();
        info!(
            "Progression level {}: health x{:.2}, damage x{:.2}",
            ctx.level, ctx.health_multiplier, ctx.damage_multiplier
        );
    }
}

pub(crate) fn reset_progression(
    mut events: MessageReader<ResetProgressionEvent>,
    mut progression: ResMut<Progression>,
) {
    if events.read().count() > 0 {
        progression.reset();
        info!("Progression reset");
    }
}
