//! Debug domain: hotkeys, gizmo overlay and snapshot dumps for boss brains.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::boss::{
    AttackKind, BossAgent, BossBrain, BossTuning, PlatformRegistry, RangeMetric, spawn_boss,
};
use crate::combat::{DamageEvent, Health};
use crate::core::{LiveEnemies, Progression};
use crate::debug::state::DebugState;
use crate::movement::Player;

/// Damage dealt to every boss by the debug hotkey
const DEBUG_HIT: f32 = 10.0;

/// Marker for the boss info text overlay
#[derive(Component, Debug)]
pub struct DebugInfoOverlay;

/// Serialize a brain's current state as pretty JSON.
pub fn snapshot_json(brain: &BossBrain, now: f32) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&brain.snapshot(now))
}

/// F1 toggles the gizmo overlay, F3 the info text.
pub(crate) fn toggle_overlays(keyboard: Res<ButtonInput<KeyCode>>, mut debug_state: ResMut<DebugState>) {
    if keyboard.just_pressed(KeyCode::F1) {
        debug_state.show_gizmos = !debug_state.show_gizmos;
        let msg = format!("Gizmos {}", if debug_state.show_gizmos { "ON" } else { "OFF" });
        debug_state.set_message(msg, 2.0);
    }
    if keyboard.just_pressed(KeyCode::F3) {
        debug_state.show_info = !debug_state.show_info;
        let msg = format!("Info {}", if debug_state.show_info { "ON" } else { "OFF" });
        debug_state.set_message(msg, 2.0);
    }
}

/// F2 logs every boss snapshot as JSON.
pub(crate) fn dump_snapshots(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    bosses: Query<(Entity, &BossAgent)>,
) {
    if !keyboard.just_pressed(KeyCode::F2) {
        return;
    }
    let now = time.elapsed_secs();
    for (entity, agent) in &bosses {
        match snapshot_json(&agent.brain, now) {
            Ok(json) => info!("[DEBUG] Boss {:?} snapshot:\n{}", entity, json),
            Err(e) => error!("[DEBUG] Could not serialize boss {:?}: {}", entity, e),
        }
    }
}

/// Handle keyboard shortcuts for debug actions
#[allow(clippy::too_many_arguments)]
pub(crate) fn handle_debug_hotkeys(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    tuning: Res<BossTuning>,
    progression: Res<Progression>,
    mut live: ResMut<LiveEnemies>,
    mut damage_events: MessageWriter<DamageEvent>,
    player_query: Query<(Entity, &Transform), With<Player>>,
    bosses: Query<Entity, With<BossAgent>>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if !ctrl {
        return;
    }

    // Ctrl+I: Toggle invincibility
    if keyboard.just_pressed(KeyCode::KeyI) {
        debug_state.invincible = !debug_state.invincible;
        let msg = if debug_state.invincible {
            "Invincibility ON"
        } else {
            "Invincibility OFF"
        };
        debug_state.set_message(msg, 2.0);
    }

    let Some((player, player_transform)) = player_query.iter().next() else {
        return;
    };

    // Ctrl+B: Spawn another boss next to the player
    if keyboard.just_pressed(KeyCode::KeyB) {
        let pos = player_transform.translation.truncate() + Vec2::new(4.0, 1.0);
        spawn_boss(&mut commands, &tuning, progression.context(), pos, rand::random());
        live.spawned();
        debug_state.set_message(format!("Spawned boss at {:?}", pos), 2.0);
    }

    // Ctrl+K: Hit every boss
    if keyboard.just_pressed(KeyCode::KeyK) {
        for boss in &bosses {
            damage_events.write(DamageEvent {
                source: player,
                target: boss,
                amount: DEBUG_HIT,
            });
        }
        debug_state.set_message(format!("Hit {} boss(es)", bosses.iter().count()), 2.0);
    }
}

pub(crate) fn update_status_message(time: Res<Time>, mut debug_state: ResMut<DebugState>) {
    debug_state.tick_message(time.delta_secs());
}

pub(crate) fn apply_invincibility(
    debug_state: Res<DebugState>,
    mut player_query: Query<&mut Health, With<Player>>,
) {
    if !debug_state.invincible {
        return;
    }
    for mut health in &mut player_query {
        if health.current < health.max {
            health.restore();
        }
    }
}

pub(crate) fn draw_boss_gizmos(
    mut gizmos: Gizmos,
    platforms: Res<PlatformRegistry>,
    bosses: Query<(&BossAgent, &Transform)>,
) {
    let follow_color = Color::srgba(0.4, 0.4, 0.9, 0.4);
    let nav_color = Color::srgb(0.3, 0.9, 0.4);

    for (agent, transform) in &bosses {
        let brain = &agent.brain;
        let position = transform.translation.truncate();
        let tuning = brain.tuning();

        gizmos.circle_2d(position, tuning.movement.max_follow_distance, follow_color);
        gizmos.arrow_2d(position, position + brain.facing().as_vec(), Color::WHITE);

        for kind in AttackKind::ALL {
            let attack = tuning.attacks.get(kind);
            if !attack.enabled {
                continue;
            }
            let color = attack_color(kind);
            match attack.metric {
                RangeMetric::Direct => {
                    gizmos.circle_2d(position, attack.max_range, color);
                    if attack.min_range > 0.0 {
                        gizmos.circle_2d(position, attack.min_range, color.with_alpha(0.3));
                    }
                }
                RangeMetric::Horizontal => {
                    for side in [-1.0, 1.0] {
                        let x = position.x + side * attack.max_range;
                        gizmos.line_2d(
                            Vec2::new(x, position.y - 1.0),
                            Vec2::new(x, position.y + 1.0),
                            color,
                        );
                    }
                }
            }
        }

        if let Some(platform) = brain
            .navigation()
            .and_then(|goal| platforms.get(goal.platform))
        {
            gizmos.line_2d(position, platform.position, nav_color);
            gizmos.line_2d(
                platform.position - Vec2::X * platform.half_width,
                platform.position + Vec2::X * platform.half_width,
                nav_color,
            );
        }
    }
}

fn attack_color(kind: AttackKind) -> Color {
    match kind {
        AttackKind::Light => Color::srgb(0.9, 0.9, 0.3),
        AttackKind::Heavy => Color::srgb(0.9, 0.5, 0.2),
        AttackKind::Area => Color::srgb(0.9, 0.2, 0.2),
        AttackKind::Projectile => Color::srgb(0.7, 0.3, 0.8),
    }
}

/// Keep the info overlay in sync with the first boss
pub(crate) fn update_debug_info_overlay(
    mut commands: Commands,
    time: Res<Time>,
    debug_state: Res<DebugState>,
    progression: Res<Progression>,
    bosses: Query<(&BossAgent, &Health)>,
    mut overlay_query: Query<&mut Text, With<DebugInfoOverlay>>,
    existing_overlay: Query<Entity, With<DebugInfoOverlay>>,
) {
    if !debug_state.show_info {
        for entity in &existing_overlay {
            commands.entity(entity).despawn();
        }
        return;
    }

    if existing_overlay.is_empty() {
        spawn_debug_info_overlay(&mut commands);
        return;
    }

    let Ok(mut text) = overlay_query.single_mut() else {
        return;
    };
    let status = debug_state
        .status_message
        .as_ref()
        .map(|(message, _)| message.as_str())
        .unwrap_or("");
    let now = time.elapsed_secs();
    **text = match bosses.iter().next() {
        Some((agent, health)) => {
            let snapshot = agent.brain.snapshot(now);
            format!(
                "Level: {}\nBoss HP: {:.0}/{:.0}\nState: {:?} ({:.1}s)\nAttack: {:?}\nStuck attempts: {}\nTimers: {}\n{}",
                progression.level,
                health.current,
                health.max,
                snapshot.state,
                snapshot.time_in_state,
                snapshot.active_attack,
                snapshot.stuck_attempts,
                snapshot.pending_timers,
                status
            )
        }
        None => format!("Level: {}\nNo boss\n{}", progression.level, status),
    };
}

fn spawn_debug_info_overlay(commands: &mut Commands) {
    commands.spawn((
        DebugInfoOverlay,
        Text::new("Loading..."),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::srgb(0.8, 0.9, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(20.0),
            bottom: Val::Px(20.0),
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ZIndex(500),
    ));
}
