//! Boss domain: stuck detection and escalating recovery.

use bevy::log::info;
use bevy::math::Vec2;
use rand::Rng;
use std::collections::VecDeque;

use crate::boss::brain::BossBrain;
use crate::boss::sensing;
use crate::boss::state::BossState;
use crate::boss::timers::TimerAction;
use crate::boss::tuning::UnstuckTuning;
use crate::boss::world::BossWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StuckVerdict {
    Moving,
    /// Below the movement threshold, still inside the grace window
    Stalled,
    /// Stalled for the whole grace window; run a recovery
    Recover,
}

/// Samples the boss position on a fixed cadence and decides when it is stuck.
#[derive(Debug, Clone)]
pub struct UnstuckMonitor {
    accumulator: f32,
    history: VecDeque<Vec2>,
    history_len: usize,
    stalled_since: Option<f32>,
    attempts: u32,
}

impl UnstuckMonitor {
    pub fn new(history_len: usize) -> Self {
        let history_len = history_len.max(1);
        Self {
            accumulator: 0.0,
            history: VecDeque::with_capacity(history_len),
            history_len,
            stalled_since: None,
            attempts: 0,
        }
    }

    /// Accumulate frame time; true once per elapsed `interval`.
    pub fn tick(&mut self, dt: f32, interval: f32) -> bool {
        self.accumulator += dt;
        if self.accumulator >= interval {
            self.accumulator -= interval;
            true
        } else {
            false
        }
    }

    pub fn sample(&mut self, position: Vec2, now: f32, tuning: &UnstuckTuning) -> StuckVerdict {
        let previous = self.history.back().copied();
        self.record(position);
        let Some(previous) = previous else {
            return StuckVerdict::Moving;
        };

        if previous.distance(position) >= tuning.min_movement {
            self.stalled_since = None;
            self.attempts = 0;
            return StuckVerdict::Moving;
        }

        match self.stalled_since {
            None => {
                self.stalled_since = Some(now);
                StuckVerdict::Stalled
            }
            Some(since) if now - since >= tuning.grace_window => {
                self.stalled_since = None;
                StuckVerdict::Recover
            }
            Some(_) => StuckVerdict::Stalled,
        }
    }

    /// Forget the stall timer and restart displacement from `position`.
    pub fn rebase(&mut self, position: Vec2) {
        self.stalled_since = None;
        self.record(position);
    }

    /// End the episode entirely, as after a teleport.
    pub fn reset(&mut self, position: Vec2) {
        self.history.clear();
        self.accumulator = 0.0;
        self.attempts = 0;
        self.rebase(position);
    }

    pub fn record_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_stalled(&self) -> bool {
        self.stalled_since.is_some()
    }

    pub fn history(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.history.iter().copied()
    }

    fn record(&mut self, position: Vec2) {
        if self.history.len() == self.history_len {
            self.history.pop_front();
        }
        self.history.push_back(position);
    }
}

/// Uniform sideways push in `[-limit, limit]`; zero for a non-finite limit.
fn spread(rng: &mut impl Rng, limit: f32) -> f32 {
    let limit = limit.abs();
    if !limit.is_finite() {
        return 0.0;
    }
    rng.random_range(-limit..=limit)
}

impl BossBrain {
    pub(super) fn begin_recovery(&mut self, world: &mut dyn BossWorld, now: f32, position: Vec2) {
        self.navigation = None;
        self.transition(world, BossState::Unstucking, now);
        let attempt = self.monitor.record_attempt();

        let tuning = self.tuning.unstuck.clone();
        let jump_force = self.tuning.movement.jump_force;
        let body = &self.tuning.body;
        let right = sensing::wall_contact(world, position, 1.0, body, tuning.wall_probe);
        let left = sensing::wall_contact(world, position, -1.0, body, tuning.wall_probe);
        let grounded = sensing::is_grounded(world, position, body);

        let wall_side = match (left, right) {
            (Some(left), Some(right)) if left.distance < right.distance => Some(-1.0),
            (Some(_), Some(_)) | (None, Some(_)) => Some(1.0),
            (Some(_), None) => Some(-1.0),
            (None, None) => None,
        };

        let impulse = if let Some(side) = wall_side {
            self.facing = self.facing.toward(-side);
            info!("boss {:?} stuck against a wall, recovery #{}", self.me, attempt);
            Vec2::new(-side * tuning.wall_push, tuning.wall_jump)
        } else if grounded {
            info!("boss {:?} stuck on the ground, recovery #{}", self.me, attempt);
            let sideways = spread(&mut self.rng, tuning.random_horizontal);
            Vec2::new(sideways, jump_force * tuning.big_jump_multiplier)
        } else {
            info!("boss {:?} stuck in the air, recovery #{}", self.me, attempt);
            let sideways = spread(&mut self.rng, tuning.air_nudge);
            Vec2::new(sideways, -tuning.downward_impulse)
        };
        world.apply_impulse(self.me, impulse);

        self.schedule(now, tuning.recovery_duration, TimerAction::EndRecovery);
        if attempt >= tuning.escalate_after {
            info!(
                "boss {:?} failed {} recoveries, forcing a teleport",
                self.me, attempt
            );
            self.schedule(now, tuning.teleport_grace, TimerAction::ForceTeleport);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> UnstuckTuning {
        UnstuckTuning::default()
    }

    #[test]
    fn test_first_sample_is_baseline() {
        let mut monitor = UnstuckMonitor::new(8);
        assert_eq!(
            monitor.sample(Vec2::ZERO, 0.0, &tuning()),
            StuckVerdict::Moving
        );
        assert!(!monitor.is_stalled());
    }

    #[test]
    fn test_stall_recovers_after_grace_window() {
        let mut monitor = UnstuckMonitor::new(8);
        monitor.sample(Vec2::ZERO, 0.0, &tuning());

        assert_eq!(monitor.sample(Vec2::ZERO, 0.5, &tuning()), StuckVerdict::Stalled);
        assert_eq!(monitor.sample(Vec2::ZERO, 1.0, &tuning()), StuckVerdict::Stalled);
        assert_eq!(monitor.sample(Vec2::ZERO, 1.5, &tuning()), StuckVerdict::Recover);
        assert!(!monitor.is_stalled());
    }

    #[test]
    fn test_movement_ends_episode() {
        let mut monitor = UnstuckMonitor::new(8);
        monitor.sample(Vec2::ZERO, 0.0, &tuning());
        monitor.sample(Vec2::ZERO, 0.5, &tuning());
        monitor.record_attempt();

        assert_eq!(
            monitor.sample(Vec2::new(1.0, 0.0), 1.0, &tuning()),
            StuckVerdict::Moving
        );
        assert_eq!(monitor.attempts(), 0);
        assert!(!monitor.is_stalled());
    }

    #[test]
    fn test_tick_accumulates_frame_time() {
        let mut monitor = UnstuckMonitor::new(8);
        let fired = (0..10).filter(|_| monitor.tick(0.125, 0.5)).count();
        assert_eq!(fired, 2);
    }

    #[test]
    fn test_spread_tolerates_bad_limits() {
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..20 {
            assert!(spread(&mut rng, -1.0).abs() <= 1.0);
        }
        assert_eq!(spread(&mut rng, f32::NAN), 0.0);
        assert_eq!(spread(&mut rng, f32::INFINITY), 0.0);
        assert_eq!(spread(&mut rng, 0.0), 0.0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut monitor = UnstuckMonitor::new(3);
        for step in 0..10 {
            monitor.sample(Vec2::new(step as f32, 0.0), step as f32, &tuning());
        }
        let history: Vec<Vec2> = monitor.history().collect();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2], Vec2::new(9.0, 0.0));
    }
}
