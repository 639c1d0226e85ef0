//! Boss domain: tunable thresholds, loaded from RON by the content plugin.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::boss::attacks::AttackTable;

/// Collision box of the boss body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyShape {
    pub half_width: f32,
    pub half_height: f32,
    /// Length of the downward ground probe below the feet
    pub ground_probe: f32,
}

impl Default for BodyShape {
    fn default() -> Self {
        Self {
            half_width: 0.5,
            half_height: 0.75,
            ground_probe: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    pub move_speed: f32,
    /// Horizontal distance at which chasing stops and the boss holds position
    pub hold_distance: f32,
    /// Upward velocity change of a normal jump
    pub jump_force: f32,
    pub jump_cooldown: f32,
    /// Target must be this far above before the boss jumps
    pub jump_threshold: f32,
    /// Target must be this far below before the boss phases down
    pub phase_threshold: f32,
    pub phase_speed: f32,
    pub phase_duration: f32,
    /// Vertical gap above which direct pursuit gives way to platforming
    pub platforming_threshold: f32,
    /// Direct distance beyond which the boss teleports
    pub max_follow_distance: f32,
    /// Vertical gap beyond which the target counts as on another layer
    pub layer_threshold: f32,
    /// Minimum air time before landing ends a jump
    pub min_air_time: f32,
    pub jump_failsafe: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            hold_distance: 0.8,
            jump_force: 12.0,
            jump_cooldown: 1.0,
            jump_threshold: 1.5,
            phase_threshold: 1.5,
            phase_speed: 4.0,
            phase_duration: 0.5,
            platforming_threshold: 3.0,
            max_follow_distance: 15.0,
            layer_threshold: 8.0,
            min_air_time: 0.15,
            jump_failsafe: 2.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationTuning {
    pub boss_distance_weight: f32,
    pub target_distance_weight: f32,
    /// Multiplier for platforms between the boss and target heights
    pub upward_bonus: f32,
    pub visited_penalty: f32,
    /// Fraction of `jump_force` usable as reachable height
    pub reach_fraction: f32,
    pub visited_capacity: usize,
    pub x_tolerance: f32,
    pub arrival_radius: f32,
    /// Jump multiplier for platforms near the top of the reachable band
    pub high_jump_boost: f32,
    pub timeout: f32,
    /// Multiplier for reroute platforms on the side away from an obstacle
    pub opposite_side_bonus: f32,
}

impl Default for NavigationTuning {
    fn default() -> Self {
        Self {
            boss_distance_weight: 0.4,
            target_distance_weight: 0.6,
            upward_bonus: 0.7,
            visited_penalty: 3.0,
            reach_fraction: 0.35,
            visited_capacity: 5,
            x_tolerance: 0.5,
            arrival_radius: 0.75,
            high_jump_boost: 1.2,
            timeout: 4.0,
            opposite_side_bonus: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    /// Wall probe length beyond the body edge
    pub wall_probe: f32,
    /// Horizontal offset past the body edge of the ledge probe
    pub ledge_probe_ahead: f32,
    pub ledge_probe_depth: f32,
    /// Height above the centre that must be free to jump an obstacle
    pub clear_height: f32,
    /// How far past the obstacle landing ground is searched for
    pub landing_distance: f32,
    /// How far past a ledge the far side of a gap is searched for
    pub gap_probe: f32,
    pub forward_impulse: f32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            wall_probe: 0.5,
            ledge_probe_ahead: 0.3,
            ledge_probe_depth: 1.5,
            clear_height: 2.5,
            landing_distance: 1.5,
            gap_probe: 2.5,
            forward_impulse: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportTuning {
    /// Cooldown after closing a purely horizontal gap
    pub horizontal_cooldown: f32,
    /// Cooldown after moving between floors
    pub vertical_cooldown: f32,
    pub fade_delay: f32,
    pub fade_in: f32,
    /// Vertical gap above which a platform near the target is searched for
    pub large_vertical_gap: f32,
    pub search_radius: f32,
    pub height_tolerance: f32,
    /// Platforms closer than this horizontally to the target are less preferred
    pub min_horizontal_offset: f32,
    pub landing_height: f32,
    pub side_offset: f32,
    pub clearance_radius: f32,
    pub nudge_height: f32,
}

impl Default for TeleportTuning {
    fn default() -> Self {
        Self {
            horizontal_cooldown: 5.0,
            vertical_cooldown: 3.0,
            fade_delay: 0.3,
            fade_in: 0.2,
            large_vertical_gap: 4.0,
            search_radius: 12.0,
            height_tolerance: 2.0,
            min_horizontal_offset: 1.5,
            landing_height: 1.0,
            side_offset: 2.0,
            clearance_radius: 0.4,
            nudge_height: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnstuckTuning {
    pub check_interval: f32,
    pub min_movement: f32,
    pub grace_window: f32,
    pub recovery_duration: f32,
    /// Wall probe length beyond the body edge
    pub wall_probe: f32,
    pub wall_jump: f32,
    pub wall_push: f32,
    pub big_jump_multiplier: f32,
    pub random_horizontal: f32,
    pub downward_impulse: f32,
    pub air_nudge: f32,
    /// Recoveries in one episode before a forced teleport
    pub escalate_after: u32,
    pub teleport_grace: f32,
    pub history_len: usize,
}

impl Default for UnstuckTuning {
    fn default() -> Self {
        Self {
            check_interval: 0.5,
            min_movement: 0.1,
            grace_window: 1.0,
            recovery_duration: 0.6,
            wall_probe: 0.3,
            wall_jump: 10.0,
            wall_push: 5.0,
            big_jump_multiplier: 1.3,
            random_horizontal: 3.0,
            downward_impulse: 5.0,
            air_nudge: 1.5,
            escalate_after: 2,
            teleport_grace: 0.3,
            history_len: 8,
        }
    }
}

/// Every tunable the boss brain reads
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub base_health: f32,
    pub body: BodyShape,
    pub movement: MovementTuning,
    pub attacks: AttackTable,
    pub navigation: NavigationTuning,
    pub obstacle: ObstacleTuning,
    pub teleport: TeleportTuning,
    pub unstuck: UnstuckTuning,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            base_health: 60.0,
            body: BodyShape::default(),
            movement: MovementTuning::default(),
            attacks: AttackTable::default(),
            navigation: NavigationTuning::default(),
            obstacle: ObstacleTuning::default(),
            teleport: TeleportTuning::default(),
            unstuck: UnstuckTuning::default(),
        }
    }
}

impl BossTuning {
    /// Maximum height gain the boss can manage in one jump.
    pub fn reachable_height(&self) -> f32 {
        self.movement.jump_force * self.navigation.reach_fraction
    }
}
