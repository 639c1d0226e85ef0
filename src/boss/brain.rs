//! Boss domain: the root state machine that owns one boss.
//!
//! One call to [`BossBrain::advance`] is one decision tick: due timers run
//! first, then the stuck monitor samples, then the priority ladder picks at
//! most one new behaviour. Locomotion, recovery and teleporting live in their
//! own modules as further `impl BossBrain` blocks.

use bevy::log::debug;
use bevy::math::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::boss::attacks::{AttackKind, AttackSelector};
use crate::boss::cooldowns::{CooldownKey, CooldownRegistry};
use crate::boss::platforms::{
    PlatformId, PlatformRegistry, RouteQuery, VisitedRing, find_nearest_platform_to_target,
};
use crate::boss::sensing;
use crate::boss::state::{BossState, StateMachine};
use crate::boss::timers::{TimerAction, TimerWheel};
use crate::boss::tuning::BossTuning;
use crate::boss::unstuck::{StuckVerdict, UnstuckMonitor};
use crate::boss::world::{AnimationCue, BodyId, BossWorld, Prefab, QueryFilter};
use crate::core::DifficultyContext;
use crate::movement::Facing;

/// Platform the boss is currently steering toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationGoal {
    pub platform: PlatformId,
    pub started_at: f32,
}

pub struct BossBrain {
    pub(super) tuning: BossTuning,
    pub(super) difficulty: DifficultyContext,
    pub(super) me: BodyId,
    pub(super) target: Option<BodyId>,
    pub(super) machine: StateMachine,
    pub(super) facing: Facing,
    pub(super) cooldowns: CooldownRegistry,
    pub(super) selector: AttackSelector,
    pub(super) active_attack: Option<AttackKind>,
    pub(super) navigation: Option<NavigationGoal>,
    pub(super) visited: VisitedRing,
    pub(super) monitor: UnstuckMonitor,
    pub(super) timers: TimerWheel,
    pub(super) rng: ChaCha8Rng,
}

impl BossBrain {
    /// Build a brain for `me` with attack damage already scaled by `difficulty`.
    pub fn new(me: BodyId, tuning: &BossTuning, difficulty: DifficultyContext, seed: u64) -> Self {
        let mut tuning = tuning.clone();
        tuning.attacks = tuning
            .attacks
            .scaled(|damage| difficulty.scale_damage(damage));

        Self {
            visited: VisitedRing::new(tuning.navigation.visited_capacity),
            monitor: UnstuckMonitor::new(tuning.unstuck.history_len),
            tuning,
            difficulty,
            me,
            target: None,
            machine: StateMachine::default(),
            facing: Facing::default(),
            cooldowns: CooldownRegistry::default(),
            selector: AttackSelector::default(),
            active_attack: None,
            navigation: None,
            timers: TimerWheel::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn body(&self) -> BodyId {
        self.me
    }

    pub fn target(&self) -> Option<BodyId> {
        self.target
    }

    pub fn state(&self) -> BossState {
        self.machine.state()
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn tuning(&self) -> &BossTuning {
        &self.tuning
    }

    pub fn difficulty(&self) -> DifficultyContext {
        self.difficulty
    }

    pub fn cooldowns(&self) -> &CooldownRegistry {
        &self.cooldowns
    }

    pub fn navigation(&self) -> Option<NavigationGoal> {
        self.navigation
    }

    pub fn stuck_attempts(&self) -> u32 {
        self.monitor.attempts()
    }

    pub fn set_target(&mut self, target: BodyId) {
        self.target = Some(target);
    }

    /// The target was destroyed or left play. The next tick idles.
    pub fn target_lost(&mut self) {
        self.target = None;
    }

    /// The attack animation reported completion.
    pub fn finish_attack(&mut self, world: &mut dyn BossWorld) {
        if self.machine.is(BossState::Attacking) {
            let now = world.now();
            self.end_attack(world, now);
        }
    }

    /// Drop all pending work. Collision with phased surfaces is restored first.
    pub fn teardown(&mut self, world: &mut dyn BossWorld) {
        let surfaces: Vec<BodyId> = self.timers.pending_phase_surfaces().collect();
        for surface in surfaces {
            world.set_collision_ignored(self.me, surface, false);
        }
        self.timers.clear();
        self.navigation = None;
        self.active_attack = None;
        self.target = None;
    }

    pub fn advance(&mut self, world: &mut dyn BossWorld, platforms: &PlatformRegistry, dt: f32) {
        let now = world.now();
        self.run_timers(world, platforms, now);

        let Some(position) = world.body_position(self.me) else {
            return;
        };
        let Some(target) = self.resolve_target(world) else {
            if !self.machine.is(BossState::Idle) {
                if self.machine.is(BossState::Teleporting) {
                    world.notify_animation(self.me, AnimationCue::FadeIn);
                }
                self.stop_horizontal(world);
                self.navigation = None;
                self.transition(world, BossState::Idle, now);
            }
            return;
        };

        if self.monitor.tick(dt, self.tuning.unstuck.check_interval) {
            self.sample_stuck(world, now, position, target);
        }

        self.decide(world, platforms, now, position, target);
    }

    fn resolve_target(&mut self, world: &dyn BossWorld) -> Option<Vec2> {
        let target = self.target?;
        let position = world.body_position(target);
        if position.is_none() {
            debug!("boss {:?} lost target {:?}", self.me, target);
            self.target = None;
        }
        position
    }

    fn sample_stuck(&mut self, world: &mut dyn BossWorld, now: f32, position: Vec2, target: Vec2) {
        let engaged = (target.x - position.x).abs() <= self.tuning.movement.hold_distance;
        if self.machine.state().pauses_stuck_check() || engaged {
            self.monitor.rebase(position);
            return;
        }
        if self.monitor.sample(position, now, &self.tuning.unstuck) == StuckVerdict::Recover {
            self.begin_recovery(world, now, position);
        }
    }

    /// Priority ladder; the first guard that matches wins the tick.
    fn decide(
        &mut self,
        world: &mut dyn BossWorld,
        platforms: &PlatformRegistry,
        now: f32,
        position: Vec2,
        target: Vec2,
    ) {
        let state = self.machine.state();
        if state.holds_decisions() {
            return;
        }
        if state == BossState::Jumping {
            self.update_jump(world, now, position, target);
            return;
        }

        let movement = &self.tuning.movement;
        let dy = target.y - position.y;
        let too_far = position.distance(target) > movement.max_follow_distance
            || dy.abs() > movement.layer_threshold;
        if too_far && self.cooldowns.is_ready(CooldownKey::Teleport, now) {
            self.begin_teleport(world, platforms, now, position, target);
            return;
        }

        if state == BossState::PlatformNavigating {
            self.navigate(world, platforms, now, position);
            return;
        }

        if dy.abs() > self.tuning.movement.platforming_threshold
            && sensing::path_obstructed(world, position, target)
        {
            let query = self.route_query(world, platforms, position, target);
            if let Some(platform) = find_nearest_platform_to_target(
                platforms,
                &query,
                &mut self.visited,
                &self.tuning.navigation,
            ) {
                self.begin_navigation(world, now, platform);
                return;
            }
        }

        if state == BossState::Chasing
            && self.handle_obstacle(world, platforms, now, position, target)
        {
            return;
        }

        let ground = sensing::ground_below(world, position, &self.tuning.body);
        if dy > self.tuning.movement.jump_threshold
            && ground.is_some()
            && self.cooldowns.is_ready(CooldownKey::Jump, now)
        {
            self.jump(world, now, 0.0, 1.0);
            return;
        }

        if dy < -self.tuning.movement.phase_threshold {
            let one_way = ground
                .and_then(|hit| platforms.by_body(hit.surface))
                .filter(|platform| platform.one_way);
            if let Some(platform) = one_way {
                self.begin_phase(world, now, platform.body);
                return;
            }
        }

        if self.try_attack(world, now, position, target) {
            return;
        }

        self.chase(world, now, position, target);
    }

    pub(super) fn route_query(
        &self,
        world: &dyn BossWorld,
        platforms: &PlatformRegistry,
        position: Vec2,
        target: Vec2,
    ) -> RouteQuery {
        let standing_on = sensing::ground_below(world, position, &self.tuning.body)
            .and_then(|hit| platforms.by_body(hit.surface))
            .map(|platform| platform.id);
        RouteQuery {
            boss: position,
            target,
            standing_on,
            reach: self.tuning.reachable_height(),
        }
    }

    /// Enter `state`, cueing observers. Re-entering the current state does nothing.
    pub(super) fn transition(&mut self, world: &mut dyn BossWorld, state: BossState, now: f32) {
        let previous = self.machine.state();
        if self.machine.enter(state, now) {
            debug!("boss {:?}: {:?} -> {:?}", self.me, previous, state);
            world.notify_animation(self.me, AnimationCue::State(state));
        }
    }

    pub(super) fn face_toward(&mut self, dx: f32) {
        self.facing = self.facing.toward(dx);
    }

    pub(super) fn stop_horizontal(&self, world: &mut dyn BossWorld) {
        let velocity = world.body_velocity(self.me);
        world.set_velocity(self.me, Vec2::new(0.0, velocity.y));
    }

    pub(super) fn schedule(&mut self, now: f32, delay: f32, action: TimerAction) {
        self.timers
            .schedule(now + delay, self.machine.generation(), action);
    }

    fn run_timers(&mut self, world: &mut dyn BossWorld, platforms: &PlatformRegistry, now: f32) {
        for timer in self.timers.drain_due(now) {
            let current = self.machine.is_current(timer.generation);
            match timer.action {
                TimerAction::EndPhase { surface } => {
                    world.set_collision_ignored(self.me, surface, false);
                    if current {
                        self.transition(world, BossState::Idle, now);
                    }
                }
                _ if !current => {}
                TimerAction::Strike(kind) => self.strike(world, kind),
                TimerAction::AttackFailsafe => {
                    debug!("boss {:?}: attack failsafe fired", self.me);
                    self.end_attack(world, now);
                }
                TimerAction::Relocate { point } => self.relocate(world, now, point),
                TimerAction::FinishTeleport | TimerAction::EndRecovery => {
                    self.transition(world, BossState::Idle, now);
                }
                TimerAction::ForceTeleport => self.force_teleport(world, platforms, now),
                TimerAction::JumpFailsafe => {
                    debug!("boss {:?}: jump failsafe fired", self.me);
                    self.transition(world, BossState::Idle, now);
                }
            }
        }
    }

    fn try_attack(&mut self, world: &mut dyn BossWorld, now: f32, position: Vec2, target: Vec2) -> bool {
        if !self.cooldowns.is_ready(CooldownKey::GeneralAttack, now) {
            return false;
        }
        let Some(kind) = self.selector.select(
            &self.tuning.attacks,
            sensing::distances(position, target),
            &mut self.cooldowns,
            now,
            &mut self.rng,
        ) else {
            return false;
        };
        self.cooldowns.arm(
            CooldownKey::GeneralAttack,
            now,
            self.tuning.attacks.general_cooldown,
        );
        debug!(
            "boss {:?}: {:?} (streak {})",
            self.me,
            kind,
            self.selector.streak()
        );

        self.stop_horizontal(world);
        self.face_toward(target.x - position.x);
        self.navigation = None;
        self.active_attack = Some(kind);
        self.transition(world, BossState::Attacking, now);
        world.notify_animation(self.me, AnimationCue::Attack(kind));

        let definition = self.tuning.attacks.get(kind);
        let (strike_delay, failsafe, radius) =
            (definition.strike_delay, definition.failsafe, definition.radius);
        if kind == AttackKind::Area {
            world.spawn(
                Prefab::AreaIndicator {
                    radius,
                    duration: strike_delay,
                },
                position,
            );
        }
        self.schedule(now, strike_delay, TimerAction::Strike(kind));
        self.schedule(now, failsafe, TimerAction::AttackFailsafe);
        true
    }

    fn strike(&mut self, world: &mut dyn BossWorld, kind: AttackKind) {
        let Some(position) = world.body_position(self.me) else {
            return;
        };
        let definition = self.tuning.attacks.get(kind).clone();

        if kind == AttackKind::Projectile {
            let Some(target) = self.target.and_then(|target| world.body_position(target)) else {
                return;
            };
            let volley = &self.tuning.attacks.volley;
            let muzzle = position + volley.muzzle_offset(self.facing.sign());
            for direction in volley.directions(target - muzzle) {
                world.spawn(
                    Prefab::Projectile {
                        damage: definition.damage,
                        velocity: direction * volley.speed,
                    },
                    muzzle,
                );
            }
            return;
        }

        let center = match kind {
            AttackKind::Area => position,
            _ => position + self.facing.as_vec() * definition.reach,
        };
        for hit in world.overlap_area(center, definition.radius, QueryFilter::Target) {
            world.damage(hit, definition.damage);
            if definition.knockback > 0.0 {
                let away = world
                    .body_position(hit)
                    .map(|point| (point - position).normalize_or_zero())
                    .filter(|direction| *direction != Vec2::ZERO)
                    .unwrap_or(self.facing.as_vec());
                world.apply_impulse(hit, away * definition.knockback);
            }
        }
    }

    fn end_attack(&mut self, world: &mut dyn BossWorld, now: f32) {
        self.active_attack = None;
        self.transition(world, BossState::Idle, now);
    }

    pub fn snapshot(&self, now: f32) -> BossSnapshot {
        BossSnapshot {
            body: self.me,
            target: self.target,
            state: self.machine.state(),
            generation: self.machine.generation(),
            time_in_state: self.machine.time_in_state(now),
            facing: self.facing,
            active_attack: self.active_attack,
            last_attack: self.selector.last(),
            attack_streak: self.selector.streak(),
            cooldowns: self.cooldowns.snapshot(now),
            navigation_target: self.navigation.map(|goal| goal.platform),
            visited: self.visited.iter().collect(),
            stuck_attempts: self.monitor.attempts(),
            pending_timers: self.timers.len(),
            difficulty: self.difficulty,
        }
    }
}

/// Serializable view of a brain for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct BossSnapshot {
    pub body: BodyId,
    pub target: Option<BodyId>,
    pub state: BossState,
    pub generation: u64,
    pub time_in_state: f32,
    pub facing: Facing,
    pub active_attack: Option<AttackKind>,
    pub last_attack: Option<AttackKind>,
    pub attack_streak: u32,
    pub cooldowns: Vec<(CooldownKey, f32)>,
    pub navigation_target: Option<PlatformId>,
    pub visited: Vec<PlatformId>,
    pub stuck_attempts: u32,
    pub pending_timers: usize,
    pub difficulty: DifficultyContext,
}
