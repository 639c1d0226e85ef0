//! Boss domain: choosing and executing teleports toward the target.

use bevy::log::info;
use bevy::math::Vec2;
use rand::Rng;

use crate::boss::brain::BossBrain;
use crate::boss::cooldowns::CooldownKey;
use crate::boss::platforms::{Platform, PlatformRegistry};
use crate::boss::state::BossState;
use crate::boss::timers::TimerAction;
use crate::boss::tuning::BossTuning;
use crate::boss::world::{AnimationCue, BossWorld, QueryFilter};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeleportPlan {
    pub destination: Vec2,
    /// The move changes floors, which uses the shorter cooldown
    pub vertical: bool,
}

impl TeleportPlan {
    pub fn cooldown(&self, tuning: &BossTuning) -> f32 {
        if self.vertical {
            tuning.teleport.vertical_cooldown
        } else {
            tuning.teleport.horizontal_cooldown
        }
    }
}

/// Platform near the target's height, preferring ones not right on top of it.
pub fn platform_near_target<'a>(
    platforms: &'a PlatformRegistry,
    target: Vec2,
    tuning: &BossTuning,
) -> Option<&'a Platform> {
    let teleport = &tuning.teleport;
    let candidates: Vec<&Platform> = platforms
        .iter()
        .filter(|platform| {
            platform.position.distance(target) <= teleport.search_radius
                && (platform.position.y - target.y).abs() <= teleport.height_tolerance
        })
        .collect();

    closest(
        candidates.iter().copied().filter(|platform| {
            (platform.position.x - target.x).abs() >= teleport.min_horizontal_offset
        }),
        target,
    )
    .or_else(|| closest(candidates.iter().copied(), target))
}

fn closest<'a>(platforms: impl Iterator<Item = &'a Platform>, target: Vec2) -> Option<&'a Platform> {
    platforms.min_by(|a, b| {
        a.position
            .distance(target)
            .total_cmp(&b.position.distance(target))
            .then(a.id.cmp(&b.id))
    })
}

/// Pick where to reappear and validate the spot against terrain.
pub fn plan_teleport(
    world: &dyn BossWorld,
    platforms: &PlatformRegistry,
    boss: Vec2,
    target: Vec2,
    tuning: &BossTuning,
    rng: &mut impl Rng,
) -> TeleportPlan {
    let teleport = &tuning.teleport;
    let dy = target.y - boss.y;

    let on_platform = (dy.abs() > teleport.large_vertical_gap)
        .then(|| platform_near_target(platforms, target, tuning))
        .flatten()
        .map(|platform| platform.position + Vec2::Y * teleport.landing_height);

    let (destination, vertical) = match on_platform {
        Some(point) => (point, true),
        None => {
            let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            let level = dy.abs() <= tuning.movement.jump_threshold;
            let y = if level {
                boss.y
            } else {
                target.y + teleport.landing_height
            };
            (Vec2::new(target.x + side * teleport.side_offset, y), !level)
        }
    };

    let blocked = !world
        .overlap_area(destination, teleport.clearance_radius, QueryFilter::Terrain)
        .is_empty();
    let destination = if blocked {
        destination + Vec2::Y * teleport.nudge_height
    } else {
        destination
    };

    TeleportPlan {
        destination,
        vertical,
    }
}

impl BossBrain {
    pub(super) fn begin_teleport(
        &mut self,
        world: &mut dyn BossWorld,
        platforms: &PlatformRegistry,
        now: f32,
        position: Vec2,
        target: Vec2,
    ) {
        let plan = plan_teleport(world, platforms, position, target, &self.tuning, &mut self.rng);
        info!(
            "boss {:?} teleporting from {:?} to {:?}",
            self.me, position, plan.destination
        );

        self.cooldowns
            .arm(CooldownKey::Teleport, now, plan.cooldown(&self.tuning));
        self.navigation = None;
        self.active_attack = None;
        self.transition(world, BossState::Teleporting, now);
        world.set_velocity(self.me, Vec2::ZERO);
        world.notify_animation(self.me, AnimationCue::FadeOut);
        self.schedule(
            now,
            self.tuning.teleport.fade_delay,
            TimerAction::Relocate {
                point: plan.destination,
            },
        );
    }

    /// Escalated recovery: teleport regardless of distance or cooldown.
    pub(super) fn force_teleport(
        &mut self,
        world: &mut dyn BossWorld,
        platforms: &PlatformRegistry,
        now: f32,
    ) {
        let Some(position) = world.body_position(self.me) else {
            return;
        };
        let Some(target) = self.target.and_then(|target| world.body_position(target)) else {
            self.transition(world, BossState::Idle, now);
            return;
        };
        self.begin_teleport(world, platforms, now, position, target);
    }

    pub(super) fn relocate(&mut self, world: &mut dyn BossWorld, now: f32, point: Vec2) {
        world.teleport(self.me, point);
        world.set_velocity(self.me, Vec2::ZERO);
        if let Some(target) = self.target.and_then(|target| world.body_position(target)) {
            self.face_toward(target.x - point.x);
        }
        self.monitor.reset(point);
        world.notify_animation(self.me, AnimationCue::FadeIn);
        self.schedule(now, self.tuning.teleport.fade_in, TimerAction::FinishTeleport);
    }
}
