//! Boss domain: chasing, jumping, phasing, obstacle handling and platform steering.

use bevy::log::debug;
use bevy::math::Vec2;

use crate::boss::brain::{BossBrain, NavigationGoal};
use crate::boss::cooldowns::CooldownKey;
use crate::boss::platforms::{PlatformId, PlatformRegistry, find_alternative_route};
use crate::boss::sensing;
use crate::boss::state::BossState;
use crate::boss::timers::TimerAction;
use crate::boss::world::{AnimationCue, BodyId, BossWorld};

/// Share of the reachable height above which navigation jumps are boosted.
const HIGH_JUMP_FRACTION: f32 = 0.6;

impl BossBrain {
    pub(super) fn chase(&mut self, world: &mut dyn BossWorld, now: f32, position: Vec2, target: Vec2) {
        self.transition(world, BossState::Chasing, now);
        let dx = target.x - position.x;
        self.face_toward(dx);

        let vx = if dx.abs() <= self.tuning.movement.hold_distance {
            0.0
        } else {
            dx.signum() * self.tuning.movement.move_speed
        };
        let velocity = world.body_velocity(self.me);
        world.set_velocity(self.me, Vec2::new(vx, velocity.y));
    }

    /// Deliberate jump into `Jumping`, with an optional push in the facing direction.
    pub(super) fn jump(&mut self, world: &mut dyn BossWorld, now: f32, forward: f32, boost: f32) {
        let movement = &self.tuning.movement;
        let impulse = Vec2::new(self.facing.sign() * forward, movement.jump_force * boost);
        let (cooldown, failsafe) = (movement.jump_cooldown, movement.jump_failsafe);

        self.cooldowns.arm(CooldownKey::Jump, now, cooldown);
        self.transition(world, BossState::Jumping, now);
        world.apply_impulse(self.me, impulse);
        world.notify_animation(self.me, AnimationCue::Jump);
        self.schedule(now, failsafe, TimerAction::JumpFailsafe);
    }

    /// Air control while `Jumping`; lands back into `Idle`.
    pub(super) fn update_jump(&mut self, world: &mut dyn BossWorld, now: f32, position: Vec2, target: Vec2) {
        let velocity = world.body_velocity(self.me);
        let airborne_long_enough =
            self.machine.time_in_state(now) >= self.tuning.movement.min_air_time;
        if airborne_long_enough
            && velocity.y <= 0.0
            && sensing::is_grounded(world, position, &self.tuning.body)
        {
            self.transition(world, BossState::Idle, now);
            return;
        }

        let dx = target.x - position.x;
        if dx.abs() > self.tuning.movement.hold_distance && dx.signum() == self.facing.sign() {
            let vx = velocity.x.abs().max(self.tuning.movement.move_speed) * dx.signum();
            world.set_velocity(self.me, Vec2::new(vx, velocity.y));
        }
    }

    pub(super) fn begin_phase(&mut self, world: &mut dyn BossWorld, now: f32, surface: BodyId) {
        let movement = &self.tuning.movement;
        let (speed, duration) = (movement.phase_speed, movement.phase_duration);

        self.transition(world, BossState::Phasing, now);
        world.set_collision_ignored(self.me, surface, true);
        world.set_velocity(self.me, Vec2::new(0.0, -speed));
        world.notify_animation(self.me, AnimationCue::Phase);
        self.schedule(now, duration, TimerAction::EndPhase { surface });
    }

    /// Walls and ledges met while chasing. Returns true if the tick was used.
    pub(super) fn handle_obstacle(
        &mut self,
        world: &mut dyn BossWorld,
        platforms: &PlatformRegistry,
        now: f32,
        position: Vec2,
        target: Vec2,
    ) -> bool {
        let body = &self.tuning.body;
        let obstacle = &self.tuning.obstacle;
        let sign = self.facing.sign();
        if !sensing::is_grounded(world, position, body) {
            return false;
        }

        let wall = sensing::wall_contact(world, position, sign, body, obstacle.wall_probe).is_some();
        let blocked = if wall {
            if sensing::can_clear_wall(world, position, sign, body, obstacle) {
                return self.obstacle_jump(world, now);
            }
            true
        } else if sensing::ledge_ahead(world, position, sign, body, obstacle) {
            if target.y < position.y - self.tuning.movement.phase_threshold {
                return false;
            }
            if sensing::ground_past_gap(world, position, sign, body, obstacle) {
                return self.obstacle_jump(world, now);
            }
            true
        } else {
            false
        };
        if !blocked {
            return false;
        }

        debug!("boss {:?}: path blocked, looking for another route", self.me);
        self.facing = self.facing.flipped();
        let query = self.route_query(world, platforms, position, target);
        match find_alternative_route(
            platforms,
            &query,
            sign,
            &mut self.visited,
            &self.tuning.navigation,
        ) {
            Some(platform) => self.begin_navigation(world, now, platform),
            None => {
                self.stop_horizontal(world);
                self.transition(world, BossState::Idle, now);
            }
        }
        true
    }

    fn obstacle_jump(&mut self, world: &mut dyn BossWorld, now: f32) -> bool {
        if self.cooldowns.is_ready(CooldownKey::Jump, now) {
            let forward = self.tuning.obstacle.forward_impulse;
            self.jump(world, now, forward, 1.0);
        } else {
            self.stop_horizontal(world);
        }
        true
    }

    pub(super) fn begin_navigation(&mut self, world: &mut dyn BossWorld, now: f32, platform: PlatformId) {
        debug!("boss {:?}: navigating to {:?}", self.me, platform);
        self.navigation = Some(NavigationGoal {
            platform,
            started_at: now,
        });
        self.transition(world, BossState::PlatformNavigating, now);
    }

    fn end_navigation(&mut self, world: &mut dyn BossWorld, now: f32) {
        self.navigation = None;
        self.stop_horizontal(world);
        self.transition(world, BossState::Idle, now);
    }

    /// One steering step toward the chosen platform.
    pub(super) fn navigate(
        &mut self,
        world: &mut dyn BossWorld,
        platforms: &PlatformRegistry,
        now: f32,
        position: Vec2,
    ) {
        let Some(goal) = self.navigation else {
            self.end_navigation(world, now);
            return;
        };
        let Some(platform) = platforms.get(goal.platform) else {
            self.end_navigation(world, now);
            return;
        };
        if now - goal.started_at > self.tuning.navigation.timeout {
            debug!("boss {:?}: navigation to {:?} timed out", self.me, goal.platform);
            self.end_navigation(world, now);
            return;
        }

        let body = &self.tuning.body;
        let ground = sensing::ground_below(world, position, body);
        let standing_on = ground.and_then(|hit| platforms.by_body(hit.surface));
        let stand_point = platform.position + Vec2::Y * body.half_height;
        if standing_on.is_some_and(|standing| standing.id == platform.id)
            || position.distance(stand_point) <= self.tuning.navigation.arrival_radius
        {
            self.end_navigation(world, now);
            return;
        }

        let dx = platform.position.x - position.x;
        let rise = platform.position.y - (position.y - body.half_height);
        self.face_toward(dx);
        let velocity = world.body_velocity(self.me);

        if dx.abs() > self.tuning.navigation.x_tolerance {
            world.set_velocity(
                self.me,
                Vec2::new(dx.signum() * self.tuning.movement.move_speed, velocity.y),
            );
            return;
        }

        world.set_velocity(self.me, Vec2::new(0.0, velocity.y));
        if rise > 0.0 && ground.is_some() && self.cooldowns.is_ready(CooldownKey::Jump, now) {
            let reach = self.tuning.reachable_height();
            let boost = if rise > reach * HIGH_JUMP_FRACTION {
                self.tuning.navigation.high_jump_boost
            } else {
                1.0
            };
            let movement = &self.tuning.movement;
            let impulse = Vec2::Y * movement.jump_force * boost;
            let cooldown = movement.jump_cooldown;
            self.cooldowns.arm(CooldownKey::Jump, now, cooldown);
            world.apply_impulse(self.me, impulse);
            world.notify_animation(self.me, AnimationCue::Jump);
        }
    }
}
