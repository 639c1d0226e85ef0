//! Debug tooling for the boss AI (feature `dev-tools`).
//!
//! - F1: gizmo overlay of follow distance, attack ranges and navigation targets
//! - F2: log every boss brain snapshot as JSON
//! - F3: text overlay with the first boss's state
//! - Ctrl+I: toggle player invincibility
//! - Ctrl+B: spawn another boss near the player
//! - Ctrl+K: damage every boss

mod state;
mod systems;

pub use state::DebugState;

use bevy::prelude::*;

use crate::debug::systems::{
    apply_invincibility, draw_boss_gizmos, dump_snapshots, handle_debug_hotkeys,
    toggle_overlays, update_debug_info_overlay, update_status_message,
};

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>()
            .add_systems(
                Update,
                (
                    toggle_overlays,
                    dump_snapshots,
                    handle_debug_hotkeys,
                    update_status_message,
                    apply_invincibility,
                    update_debug_info_overlay,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                draw_boss_gizmos.run_if(|state: Res<DebugState>| state.show_gizmos),
            );
    }
}
