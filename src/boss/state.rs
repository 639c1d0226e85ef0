//! Boss domain: the exclusive behaviour state and its generation counter.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum BossState {
    #[default]
    Idle,
    /// Moving horizontally toward the target
    Chasing,
    /// Airborne after a deliberate jump
    Jumping,
    /// Falling through a one-way platform
    Phasing,
    /// Executing an attack until it finishes or the failsafe fires
    Attacking,
    /// Steering toward a platform chosen by the navigator
    PlatformNavigating,
    /// Running a stuck-recovery manoeuvre
    Unstucking,
    /// Fading out, relocating and fading back in
    Teleporting,
}

impl BossState {
    /// States that own the agent until one of their timers releases it.
    pub fn holds_decisions(self) -> bool {
        matches!(
            self,
            BossState::Teleporting
                | BossState::Unstucking
                | BossState::Attacking
                | BossState::Phasing
        )
    }

    /// States during which the stuck monitor does not sample.
    pub fn pauses_stuck_check(self) -> bool {
        matches!(
            self,
            BossState::Attacking | BossState::Jumping | BossState::Teleporting
        )
    }
}

/// Current state plus a generation that changes on every real transition.
///
/// Timers capture the generation they were armed under so a timer that
/// outlives its state can recognise itself as stale.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StateMachine {
    state: BossState,
    generation: u64,
    entered_at: f32,
}

impl StateMachine {
    pub fn state(&self) -> BossState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn entered_at(&self) -> f32 {
        self.entered_at
    }

    pub fn is(&self, state: BossState) -> bool {
        self.state == state
    }

    /// Returns true when the state actually changed. Re-entering is a no-op.
    pub fn enter(&mut self, state: BossState, now: f32) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        self.generation += 1;
        self.entered_at = now;
        true
    }

    /// True if `generation` still identifies the active state.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn time_in_state(&self, now: f32) -> f32 {
        now - self.entered_at
    }
}
