use bevy::math::Vec2;
use std::collections::{HashMap, HashSet};

use crate::boss::attacks::AttackKind;
use crate::boss::brain::BossBrain;
use crate::boss::cooldowns::CooldownKey;
use crate::boss::platforms::{Platform, PlatformId, PlatformRegistry};
use crate::boss::state::BossState;
use crate::boss::tuning::BossTuning;
use crate::boss::world::{AnimationCue, BodyId, BossWorld, HitInfo, Prefab, QueryFilter};
use crate::core::{DifficultyContext, ProgressionRates};
use crate::movement::Facing;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Block {
    body: BodyId,
    center: Vec2,
    half: Vec2,
    one_way: bool,
}

impl Block {
    fn min(&self) -> Vec2 {
        self.center - self.half
    }

    fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Slab test; rays starting inside report a hit at distance zero.
    fn ray(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<f32> {
        let mut enter = f32::NEG_INFINITY;
        let mut exit = f32::INFINITY;
        for (o, d, lo, hi) in [
            (origin.x, direction.x, self.min().x, self.max().x),
            (origin.y, direction.y, self.min().y, self.max().y),
        ] {
            if d.abs() < 1e-9 {
                if o < lo || o > hi {
                    return None;
                }
            } else {
                let (a, b) = ((lo - o) / d, (hi - o) / d);
                enter = enter.max(a.min(b));
                exit = exit.min(a.max(b));
            }
        }
        let start = enter.max(0.0);
        (exit >= start && start <= max_distance).then_some(start)
    }

    fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = center.clamp(self.min(), self.max());
        closest.distance(center) <= radius
    }
}

#[derive(Debug, Clone, Copy)]
struct FakeBody {
    position: Vec2,
    velocity: Vec2,
    half: Vec2,
    target: bool,
}

/// Deterministic stand-in for the physics host: axis-aligned boxes and a
/// manually advanced clock. Bodies never move on their own.
#[derive(Debug, Default)]
pub(crate) struct FakeWorld {
    pub now: f32,
    next_id: u64,
    blocks: Vec<Block>,
    bodies: HashMap<BodyId, FakeBody>,
    pub impulses: Vec<(BodyId, Vec2)>,
    pub damage: Vec<(BodyId, f32)>,
    pub spawned: Vec<(Prefab, Vec2)>,
    pub cues: Vec<(f32, AnimationCue)>,
    pub ignored: HashSet<(BodyId, BodyId)>,
    pub teleports: Vec<Vec2>,
}

impl FakeWorld {
    fn allocate(&mut self) -> BodyId {
        self.next_id += 1;
        BodyId(self.next_id)
    }

    pub fn add_solid(&mut self, center: Vec2, half: Vec2) -> BodyId {
        self.add_block(center, half, false)
    }

    pub fn add_one_way(&mut self, center: Vec2, half: Vec2) -> BodyId {
        self.add_block(center, half, true)
    }

    fn add_block(&mut self, center: Vec2, half: Vec2, one_way: bool) -> BodyId {
        let body = self.allocate();
        self.blocks.push(Block {
            body,
            center,
            half,
            one_way,
        });
        body
    }

    pub fn add_body(&mut self, position: Vec2) -> BodyId {
        let body = self.allocate();
        self.bodies.insert(
            body,
            FakeBody {
                position,
                velocity: Vec2::ZERO,
                half: Vec2::new(0.5, 0.75),
                target: false,
            },
        );
        body
    }

    pub fn add_target(&mut self, position: Vec2) -> BodyId {
        let body = self.add_body(position);
        if let Some(fake) = self.bodies.get_mut(&body) {
            fake.half = Vec2::new(0.4, 0.75);
            fake.target = true;
        }
        body
    }

    pub fn remove_body(&mut self, body: BodyId) {
        self.bodies.remove(&body);
    }

    pub fn place(&mut self, body: BodyId, position: Vec2) {
        if let Some(fake) = self.bodies.get_mut(&body) {
            fake.position = position;
        }
    }

    pub fn velocity(&self, body: BodyId) -> Vec2 {
        self.body_velocity(body)
    }

    pub fn impulses_on(&self, body: BodyId) -> Vec<Vec2> {
        self.impulses
            .iter()
            .filter(|(hit, _)| *hit == body)
            .map(|(_, impulse)| *impulse)
            .collect()
    }

    /// Platform entry for a block, with its position on the top surface.
    pub fn platform(&self, id: u32, body: BodyId) -> Platform {
        let block = self
            .blocks
            .iter()
            .find(|block| block.body == body)
            .copied()
            .expect("platform body must be a block");
        Platform {
            id: PlatformId(id),
            body,
            position: Vec2::new(block.center.x, block.max().y),
            half_width: block.half.x,
            one_way: block.one_way,
        }
    }

    fn target_blocks(&self) -> Vec<Block> {
        self.bodies
            .iter()
            .filter(|(_, fake)| fake.target)
            .map(|(body, fake)| Block {
                body: *body,
                center: fake.position,
                half: fake.half,
                one_way: false,
            })
            .collect()
    }

    fn candidates(&self, filter: QueryFilter) -> Vec<Block> {
        match filter {
            QueryFilter::Terrain => self.blocks.clone(),
            QueryFilter::Solid => self.blocks.iter().filter(|b| !b.one_way).copied().collect(),
            QueryFilter::Target => self.target_blocks(),
        }
    }
}

impl BossWorld for FakeWorld {
    fn now(&self) -> f32 {
        self.now
    }

    fn body_position(&self, body: BodyId) -> Option<Vec2> {
        self.bodies.get(&body).map(|fake| fake.position)
    }

    fn body_velocity(&self, body: BodyId) -> Vec2 {
        self.bodies
            .get(&body)
            .map(|fake| fake.velocity)
            .unwrap_or(Vec2::ZERO)
    }

    fn sense_nearest(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<HitInfo> {
        let direction = direction.normalize_or_zero();
        self.candidates(filter)
            .iter()
            .filter_map(|block| {
                block
                    .ray(origin, direction, max_distance)
                    .map(|distance| HitInfo {
                        point: origin + direction * distance,
                        distance,
                        surface: block.body,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn overlap_area(&self, center: Vec2, radius: f32, filter: QueryFilter) -> Vec<BodyId> {
        self.candidates(filter)
            .iter()
            .filter(|block| block.overlaps_circle(center, radius))
            .map(|block| block.body)
            .collect()
    }

    fn apply_impulse(&mut self, body: BodyId, impulse: Vec2) {
        self.impulses.push((body, impulse));
        if let Some(fake) = self.bodies.get_mut(&body) {
            fake.velocity += impulse;
        }
    }

    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) {
        if let Some(fake) = self.bodies.get_mut(&body) {
            fake.velocity = velocity;
        }
    }

    fn teleport(&mut self, body: BodyId, point: Vec2) {
        self.teleports.push(point);
        self.place(body, point);
    }

    fn set_collision_ignored(&mut self, body: BodyId, surface: BodyId, ignored: bool) {
        if ignored {
            self.ignored.insert((body, surface));
        } else {
            self.ignored.remove(&(body, surface));
        }
    }

    fn notify_animation(&mut self, _body: BodyId, cue: AnimationCue) {
        self.cues.push((self.now, cue));
    }

    fn damage(&mut self, target: BodyId, amount: f32) {
        self.damage.push((target, amount));
    }

    fn spawn(&mut self, prefab: Prefab, point: Vec2) -> BodyId {
        self.spawned.push((prefab, point));
        self.allocate()
    }
}

/// Flat floor whose top surface is level with the boss's feet at y = 0.
struct Arena {
    world: FakeWorld,
    boss: BodyId,
    target: BodyId,
    brain: BossBrain,
}

impl Arena {
    fn new(target: Vec2) -> Self {
        Self::with_tuning(target, BossTuning::default())
    }

    fn with_tuning(target: Vec2, tuning: BossTuning) -> Self {
        let mut world = FakeWorld::default();
        world.add_solid(Vec2::new(0.0, -1.25), Vec2::new(60.0, 0.5));
        let boss = world.add_body(Vec2::ZERO);
        let target = world.add_target(target);
        let mut brain = BossBrain::new(boss, &tuning, DifficultyContext::default(), 7);
        brain.set_target(target);
        Self {
            world,
            boss,
            target,
            brain,
        }
    }

    /// Floor pieces spanning `[left, right]` with their tops at the boss's feet.
    fn on_floors(target: Vec2, floors: &[(f32, f32)]) -> Self {
        let mut world = FakeWorld::default();
        for (left, right) in floors {
            let center = Vec2::new((left + right) / 2.0, -1.25);
            world.add_solid(center, Vec2::new((right - left) / 2.0, 0.5));
        }
        let tuning = BossTuning::default();
        let boss = world.add_body(Vec2::ZERO);
        let target = world.add_target(target);
        let mut brain = BossBrain::new(boss, &tuning, DifficultyContext::default(), 7);
        brain.set_target(target);
        Self {
            world,
            boss,
            target,
            brain,
        }
    }

    fn tick_at(&mut self, now: f32, platforms: &PlatformRegistry) {
        let dt = now - self.world.now;
        self.world.now = now;
        self.brain.advance(&mut self.world, platforms, dt);
    }

    fn boss_position(&self) -> Vec2 {
        self.world.body_position(self.boss).unwrap_or(Vec2::NAN)
    }
}

fn no_platforms() -> PlatformRegistry {
    PlatformRegistry::default()
}

fn melee_only() -> BossTuning {
    let mut tuning = BossTuning::default();
    tuning.attacks.light.enabled = false;
    tuning.attacks.area.enabled = false;
    tuning
}

#[test]
fn test_obstructed_target_above_starts_platform_navigation() {
    let mut arena = Arena::new(Vec2::new(0.0, 5.0));
    arena
        .world
        .add_solid(Vec2::new(0.0, 2.5), Vec2::new(1.5, 0.25));
    let ledge = arena
        .world
        .add_one_way(Vec2::new(3.0, 2.25), Vec2::new(1.5, 0.25));
    let platforms = PlatformRegistry::new([arena.world.platform(1, ledge)]);

    arena.tick_at(0.1, &platforms);

    assert_eq!(arena.brain.state(), BossState::PlatformNavigating);
    assert_eq!(
        arena.brain.navigation().map(|goal| goal.platform),
        Some(PlatformId(1))
    );
}

#[test]
fn test_navigation_times_out() {
    let mut arena = Arena::new(Vec2::new(0.0, 5.0));
    arena
        .world
        .add_solid(Vec2::new(0.0, 2.5), Vec2::new(1.5, 0.25));
    let ledge = arena
        .world
        .add_one_way(Vec2::new(3.0, 2.25), Vec2::new(1.5, 0.25));
    let platforms = PlatformRegistry::new([arena.world.platform(1, ledge)]);

    arena.tick_at(0.1, &platforms);
    arena.tick_at(0.2, &platforms);
    assert_eq!(arena.brain.state(), BossState::PlatformNavigating);
    assert!(arena.world.velocity(arena.boss).x > 0.0);

    arena.tick_at(4.2, &platforms);
    assert_eq!(arena.brain.navigation(), None);
    assert_ne!(arena.brain.state(), BossState::PlatformNavigating);
}

#[test]
fn test_distant_target_teleports_beside_it() {
    let mut arena = Arena::new(Vec2::new(20.0, 0.0));
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    assert_eq!(arena.brain.state(), BossState::Teleporting);
    assert_eq!(arena.world.velocity(arena.boss), Vec2::ZERO);
    assert_eq!(
        arena.brain.cooldowns().ready_at(CooldownKey::Teleport),
        arena.brain.tuning().teleport.horizontal_cooldown
    );

    arena.tick_at(0.3, &platforms);
    let landed = arena.boss_position();
    assert!(
        landed == Vec2::new(18.0, 0.0) || landed == Vec2::new(22.0, 0.0),
        "landed at {:?}",
        landed
    );
    assert_eq!(arena.world.teleports, vec![landed]);
    let toward_target = Facing::default().toward(20.0 - landed.x);
    assert_eq!(arena.brain.facing(), toward_target);

    arena.tick_at(0.6, &platforms);
    assert_ne!(arena.brain.state(), BossState::Teleporting);
    let cues: Vec<AnimationCue> = arena.world.cues.iter().map(|(_, cue)| *cue).collect();
    assert!(cues.contains(&AnimationCue::FadeOut));
    assert!(cues.contains(&AnimationCue::FadeIn));
}

#[test]
fn test_grounded_stuck_boss_jumps_once() {
    let mut arena = Arena::new(Vec2::new(5.0, 0.0));
    let platforms = no_platforms();

    for step in 0..=4 {
        arena.tick_at(step as f32 * 0.5, &platforms);
    }

    assert_eq!(arena.brain.state(), BossState::Unstucking);
    assert_eq!(arena.brain.stuck_attempts(), 1);
    let impulses = arena.world.impulses_on(arena.boss);
    assert_eq!(impulses.len(), 1);
    let tuning = arena.brain.tuning();
    let expected = tuning.movement.jump_force * tuning.unstuck.big_jump_multiplier;
    assert!((impulses[0].y - expected).abs() < 1e-4);
    assert!(impulses[0].x.abs() <= tuning.unstuck.random_horizontal);
}

#[test]
fn test_stuck_against_wall_jumps_away() {
    let mut arena = Arena::new(Vec2::new(5.0, 0.0));
    arena
        .world
        .add_solid(Vec2::new(0.9, 3.0), Vec2::new(0.2, 4.0));
    let platforms = no_platforms();

    for step in 0..=4 {
        arena.tick_at(step as f32 * 0.5, &platforms);
    }

    assert_eq!(arena.brain.state(), BossState::Unstucking);
    let impulses = arena.world.impulses_on(arena.boss);
    let last = impulses.last().copied().unwrap_or(Vec2::ZERO);
    assert!(last.x < 0.0);
    assert_eq!(arena.brain.facing(), Facing::Left);
}

#[test]
fn test_repeated_recoveries_force_a_teleport() {
    let mut arena = Arena::new(Vec2::new(5.0, 0.0));
    let platforms = no_platforms();

    for step in 0..=7 {
        arena.tick_at(step as f32 * 0.5, &platforms);
    }
    assert_eq!(arena.brain.stuck_attempts(), 2);
    assert_eq!(arena.brain.state(), BossState::Unstucking);

    arena.tick_at(4.0, &platforms);
    assert_eq!(arena.brain.state(), BossState::Teleporting);

    arena.tick_at(4.5, &platforms);
    let landed = arena.boss_position();
    assert!(
        landed == Vec2::new(3.0, 0.0) || landed == Vec2::new(7.0, 0.0),
        "landed at {:?}",
        landed
    );
    assert_eq!(arena.brain.stuck_attempts(), 0);
}

#[test]
fn test_attack_ends_by_failsafe_without_completion() {
    let mut tuning = BossTuning::default();
    tuning.attacks.general_cooldown = 30.0;
    let mut arena = Arena::with_tuning(Vec2::new(0.5, 0.0), tuning);
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    assert_eq!(arena.brain.state(), BossState::Attacking);
    assert_eq!(arena.world.velocity(arena.boss).x, 0.0);
    let failsafe = arena.brain.tuning().attacks.area.failsafe;

    arena.tick_at(failsafe, &platforms);
    assert_ne!(arena.brain.state(), BossState::Attacking);
}

#[test]
fn test_finish_attack_returns_to_idle() {
    let mut tuning = BossTuning::default();
    tuning.attacks.general_cooldown = 30.0;
    let mut arena = Arena::with_tuning(Vec2::new(0.5, 0.0), tuning);
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    arena.world.now = 0.1;
    arena.brain.finish_attack(&mut arena.world);
    assert_eq!(arena.brain.state(), BossState::Idle);
}

#[test]
fn test_heavy_strike_damages_and_knocks_back() {
    let mut arena = Arena::with_tuning(Vec2::new(1.2, 0.0), melee_only());
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    assert_eq!(arena.brain.state(), BossState::Attacking);
    arena.tick_at(0.5, &platforms);

    assert_eq!(arena.world.damage, vec![(arena.target, 3.0)]);
    let knockback = arena.world.impulses_on(arena.target);
    assert_eq!(knockback.len(), 1);
    assert!((knockback[0] - Vec2::new(10.0, 0.0)).length() < 1e-4);
}

#[test]
fn test_difficulty_scales_strike_damage() {
    let mut world = FakeWorld::default();
    world.add_solid(Vec2::new(0.0, -1.25), Vec2::new(60.0, 0.5));
    let boss = world.add_body(Vec2::ZERO);
    let target = world.add_target(Vec2::new(1.2, 0.0));
    let difficulty = DifficultyContext::at_level(2, ProgressionRates::default());
    let mut brain = BossBrain::new(boss, &melee_only(), difficulty, 1);
    brain.set_target(target);
    let platforms = no_platforms();

    brain.advance(&mut world, &platforms, 0.0);
    world.now = 0.5;
    brain.advance(&mut world, &platforms, 0.5);

    // 3 * 2.1 rounds to 6
    assert_eq!(world.damage, vec![(target, 6.0)]);
}

#[test]
fn test_area_attack_spawns_indicator() {
    let mut tuning = BossTuning::default();
    tuning.attacks.light.enabled = false;
    tuning.attacks.heavy.enabled = false;
    let mut arena = Arena::with_tuning(Vec2::new(3.0, 0.5), tuning);
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    assert_eq!(arena.brain.state(), BossState::Attacking);
    assert_eq!(
        arena.world.spawned,
        vec![(
            Prefab::AreaIndicator {
                radius: 4.0,
                duration: 0.6
            },
            Vec2::ZERO
        )]
    );

    arena.tick_at(0.6, &platforms);
    assert_eq!(arena.world.damage.len(), 1);
}

#[test]
fn test_projectile_volley_fires_spread() {
    let mut tuning = BossTuning::default();
    tuning.attacks.projectile.enabled = true;
    let mut arena = Arena::with_tuning(Vec2::new(8.0, 0.0), tuning);
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    assert_eq!(arena.brain.state(), BossState::Attacking);
    arena.tick_at(0.4, &platforms);

    assert_eq!(arena.world.spawned.len(), 3);
    for (prefab, point) in &arena.world.spawned {
        assert_eq!(*point, Vec2::new(1.0, 0.5));
        match prefab {
            Prefab::Projectile { damage, velocity } => {
                assert_eq!(*damage, 1.0);
                assert!((velocity.length() - 15.0).abs() < 1e-3);
                assert!(velocity.x > 0.0);
            }
            other => panic!("unexpected prefab {:?}", other),
        }
    }
}

#[test]
fn test_jump_toward_higher_target_and_land() {
    let mut arena = Arena::new(Vec2::new(1.5, 2.0));
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    assert_eq!(arena.brain.state(), BossState::Jumping);
    assert_eq!(
        arena.world.impulses_on(arena.boss),
        vec![Vec2::new(0.0, 12.0)]
    );

    // Still rising: no landing yet
    arena.tick_at(0.2, &platforms);
    assert_eq!(arena.brain.state(), BossState::Jumping);

    let velocity = arena.world.velocity(arena.boss);
    arena.world.set_velocity(arena.boss, Vec2::new(velocity.x, 0.0));
    arena.tick_at(0.3, &platforms);
    assert_eq!(arena.brain.state(), BossState::Idle);
}

#[test]
fn test_jump_failsafe_releases_state() {
    let mut arena = Arena::new(Vec2::new(1.5, 2.0));
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    assert_eq!(arena.brain.state(), BossState::Jumping);
    arena.tick_at(2.5, &platforms);
    assert!(
        arena
            .world
            .cues
            .contains(&(2.5, AnimationCue::State(BossState::Idle)))
    );
}

#[test]
fn test_phasing_through_one_way_platform() {
    let mut world = FakeWorld::default();
    let ledge = world.add_one_way(Vec2::new(0.0, -1.0), Vec2::new(2.0, 0.25));
    world.add_solid(Vec2::new(0.0, -5.25), Vec2::new(60.0, 0.5));
    let boss = world.add_body(Vec2::ZERO);
    let target = world.add_target(Vec2::new(0.0, -4.0));
    let platforms = PlatformRegistry::new([world.platform(1, ledge)]);
    let mut brain = BossBrain::new(boss, &BossTuning::default(), DifficultyContext::default(), 3);
    brain.set_target(target);

    brain.advance(&mut world, &platforms, 0.0);
    assert_eq!(brain.state(), BossState::Phasing);
    assert!(world.ignored.contains(&(boss, ledge)));
    assert_eq!(world.velocity(boss), Vec2::new(0.0, -4.0));

    // Fell through onto the floor
    world.place(boss, Vec2::new(0.0, -3.9));
    world.now = 0.5;
    brain.advance(&mut world, &platforms, 0.5);
    assert!(world.ignored.is_empty());
    assert_ne!(brain.state(), BossState::Phasing);
}

#[test]
fn test_phase_collision_restored_even_when_stale() {
    let mut world = FakeWorld::default();
    let ledge = world.add_one_way(Vec2::new(0.0, -1.0), Vec2::new(2.0, 0.25));
    let boss = world.add_body(Vec2::ZERO);
    let target = world.add_target(Vec2::new(0.0, -4.0));
    let platforms = PlatformRegistry::new([world.platform(1, ledge)]);
    let mut brain = BossBrain::new(boss, &BossTuning::default(), DifficultyContext::default(), 3);
    brain.set_target(target);

    brain.advance(&mut world, &platforms, 0.0);
    assert_eq!(brain.state(), BossState::Phasing);

    // Losing the target moves the brain out of Phasing before the timer fires
    world.remove_body(target);
    world.now = 0.1;
    brain.advance(&mut world, &platforms, 0.1);
    assert_eq!(brain.state(), BossState::Idle);
    assert!(world.ignored.contains(&(boss, ledge)));

    world.now = 0.5;
    brain.advance(&mut world, &platforms, 0.4);
    assert!(world.ignored.is_empty());
}

#[test]
fn test_teardown_restores_collision_and_clears_timers() {
    let mut world = FakeWorld::default();
    let ledge = world.add_one_way(Vec2::new(0.0, -1.0), Vec2::new(2.0, 0.25));
    let boss = world.add_body(Vec2::ZERO);
    let target = world.add_target(Vec2::new(0.0, -4.0));
    let platforms = PlatformRegistry::new([world.platform(1, ledge)]);
    let mut brain = BossBrain::new(boss, &BossTuning::default(), DifficultyContext::default(), 3);
    brain.set_target(target);

    brain.advance(&mut world, &platforms, 0.0);
    brain.teardown(&mut world);

    assert!(world.ignored.is_empty());
    assert_eq!(brain.snapshot(0.0).pending_timers, 0);
    assert_eq!(brain.target(), None);
}

#[test]
fn test_lost_target_idles() {
    let mut arena = Arena::new(Vec2::new(5.0, 0.0));
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    assert_eq!(arena.brain.state(), BossState::Chasing);

    arena.brain.target_lost();
    arena.tick_at(0.1, &platforms);
    assert_eq!(arena.brain.state(), BossState::Idle);
    assert_eq!(arena.world.velocity(arena.boss).x, 0.0);
}

#[test]
fn test_chase_moves_toward_target() {
    let mut arena = Arena::new(Vec2::new(-5.0, 0.0));
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    assert_eq!(arena.brain.state(), BossState::Chasing);
    assert_eq!(arena.brain.facing(), Facing::Left);
    assert_eq!(arena.world.velocity(arena.boss).x, -3.0);
}

#[test]
fn test_blocked_wall_reroutes_to_platform_behind() {
    let mut arena = Arena::new(Vec2::new(5.0, 0.0));
    arena
        .world
        .add_solid(Vec2::new(0.9, 3.0), Vec2::new(0.2, 4.0));
    let ledge = arena
        .world
        .add_one_way(Vec2::new(-3.0, 1.25), Vec2::new(1.5, 0.25));
    let platforms = PlatformRegistry::new([arena.world.platform(1, ledge)]);

    arena.tick_at(0.0, &platforms);
    assert_eq!(arena.brain.state(), BossState::Chasing);
    arena.tick_at(0.1, &platforms);

    assert_eq!(arena.brain.state(), BossState::PlatformNavigating);
    assert_eq!(arena.brain.facing(), Facing::Left);
}

#[test]
fn test_low_wall_is_jumped() {
    let mut arena = Arena::new(Vec2::new(5.0, 0.0));
    arena
        .world
        .add_solid(Vec2::new(0.9, 0.0), Vec2::new(0.2, 1.0));
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    arena.tick_at(0.1, &platforms);

    assert_eq!(arena.brain.state(), BossState::Jumping);
    assert_eq!(
        arena.world.impulses_on(arena.boss),
        vec![Vec2::new(3.0, 12.0)]
    );
}

#[test]
fn test_cooldowns_respected_over_long_fight() {
    let mut arena = Arena::new(Vec2::new(0.6, 0.0));
    let platforms = no_platforms();

    for step in 0..400 {
        arena.tick_at(step as f32 * 0.05, &platforms);
        if arena.brain.state() == BossState::Attacking && step % 7 == 0 {
            arena.brain.finish_attack(&mut arena.world);
        }
    }

    let attacks: Vec<(f32, AttackKind)> = arena
        .world
        .cues
        .iter()
        .filter_map(|(at, cue)| match cue {
            AnimationCue::Attack(kind) => Some((*at, *kind)),
            _ => None,
        })
        .collect();
    assert!(attacks.len() > 3);

    let tuning = arena.brain.tuning().attacks.clone();
    for pair in attacks.windows(2) {
        assert!(pair[1].0 - pair[0].0 >= tuning.general_cooldown - 1e-4);
    }
    for kind in AttackKind::ALL {
        let times: Vec<f32> = attacks
            .iter()
            .filter(|(_, picked)| *picked == kind)
            .map(|(at, _)| *at)
            .collect();
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= tuning.get(kind).cooldown - 1e-4);
        }
    }
}

#[test]
fn test_one_state_and_generation_per_transition() {
    let mut arena = Arena::new(Vec2::new(20.0, 0.0));
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    let snapshot = arena.brain.snapshot(0.0);
    assert_eq!(snapshot.state, BossState::Teleporting);
    let generation = snapshot.generation;

    // Holding state: further ticks before the relocation change nothing
    arena.tick_at(0.1, &platforms);
    arena.tick_at(0.2, &platforms);
    let snapshot = arena.brain.snapshot(0.2);
    assert_eq!(snapshot.state, BossState::Teleporting);
    assert_eq!(snapshot.generation, generation);
}

#[test]
fn test_narrow_gap_is_jumped() {
    let mut arena = Arena::on_floors(Vec2::new(5.0, 0.0), &[(-30.0, 0.6), (2.6, 30.0)]);
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    assert_eq!(arena.brain.state(), BossState::Chasing);
    arena.tick_at(0.1, &platforms);

    assert_eq!(arena.brain.state(), BossState::Jumping);
    assert_eq!(
        arena.world.impulses_on(arena.boss),
        vec![Vec2::new(3.0, 12.0)]
    );
}

#[test]
fn test_ledge_is_walked_off_toward_lower_target() {
    let mut arena = Arena::on_floors(Vec2::new(5.0, -4.0), &[(-30.0, 0.6)]);
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    arena.tick_at(0.1, &platforms);

    assert_eq!(arena.brain.state(), BossState::Chasing);
    assert!(arena.world.impulses_on(arena.boss).is_empty());
    assert_eq!(arena.world.velocity(arena.boss).x, 3.0);
}

#[test]
fn test_wide_gap_without_route_turns_back() {
    let mut arena = Arena::on_floors(Vec2::new(8.0, 0.0), &[(-30.0, 0.6), (4.0, 30.0)]);
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    assert_eq!(arena.brain.state(), BossState::Chasing);
    arena.tick_at(0.1, &platforms);

    assert_eq!(arena.brain.state(), BossState::Idle);
    assert_eq!(arena.brain.facing(), Facing::Left);
    assert_eq!(arena.world.velocity(arena.boss).x, 0.0);
    assert!(arena.world.impulses_on(arena.boss).is_empty());
}

#[test]
fn test_airborne_stuck_boss_is_pushed_down() {
    let mut arena = Arena::new(Vec2::new(5.0, 5.0));
    arena.world.place(arena.boss, Vec2::new(0.0, 5.0));
    let platforms = no_platforms();

    for step in 0..=4 {
        arena.tick_at(step as f32 * 0.5, &platforms);
    }

    assert_eq!(arena.brain.state(), BossState::Unstucking);
    let impulses = arena.world.impulses_on(arena.boss);
    assert_eq!(impulses.len(), 1);
    let tuning = &arena.brain.tuning().unstuck;
    assert_eq!(impulses[0].y, -tuning.downward_impulse);
    assert!(impulses[0].x.abs() <= tuning.air_nudge);
}

#[test]
fn test_negative_spread_still_recovers() {
    let mut tuning = BossTuning::default();
    tuning.unstuck.random_horizontal = -1.0;
    let mut arena = Arena::with_tuning(Vec2::new(5.0, 0.0), tuning);
    let platforms = no_platforms();

    for step in 0..=4 {
        arena.tick_at(step as f32 * 0.5, &platforms);
    }

    assert_eq!(arena.brain.state(), BossState::Unstucking);
    let impulses = arena.world.impulses_on(arena.boss);
    assert_eq!(impulses.len(), 1);
    assert!(impulses[0].x.abs() <= 1.0);
}

#[test]
fn test_target_lost_mid_teleport_fades_back_in() {
    let mut arena = Arena::new(Vec2::new(20.0, 0.0));
    let platforms = no_platforms();

    arena.tick_at(0.0, &platforms);
    assert_eq!(arena.brain.state(), BossState::Teleporting);

    arena.world.remove_body(arena.target);
    arena.tick_at(0.1, &platforms);

    assert_eq!(arena.brain.state(), BossState::Idle);
    assert_eq!(arena.world.cues.last(), Some(&(0.1, AnimationCue::State(BossState::Idle))));
    assert!(arena.world.cues.contains(&(0.1, AnimationCue::FadeIn)));
}
