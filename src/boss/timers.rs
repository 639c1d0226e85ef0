//! Boss domain: agent-owned cooperative timers.

use bevy::math::Vec2;

use crate::boss::attacks::AttackKind;
use crate::boss::world::BodyId;

/// What should happen when a timer comes due.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerAction {
    /// Apply damage for the attack that is in flight
    Strike(AttackKind),
    /// Force the attack to end if no completion signal arrived
    AttackFailsafe,
    /// Restore collision with the surface and leave `Phasing`
    EndPhase { surface: BodyId },
    /// Second half of a teleport: move the body
    Relocate { point: Vec2 },
    /// Fade-in finished
    FinishTeleport,
    /// End of a stuck-recovery manoeuvre
    EndRecovery,
    /// Escalated recovery after repeated failures
    ForceTeleport,
    /// Upper bound on time spent airborne in `Jumping`
    JumpFailsafe,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTimer {
    pub due: f32,
    /// State generation the timer was armed under
    pub generation: u64,
    pub action: TimerAction,
}

#[derive(Debug, Clone, Default)]
pub struct TimerWheel {
    pending: Vec<ScheduledTimer>,
}

impl TimerWheel {
    pub fn schedule(&mut self, due: f32, generation: u64, action: TimerAction) {
        self.pending.push(ScheduledTimer {
            due,
            generation,
            action,
        });
    }

    /// Removes and returns every timer with `due <= now`, earliest first.
    pub fn drain_due(&mut self, now: f32) -> Vec<ScheduledTimer> {
        let mut due: Vec<ScheduledTimer> = Vec::new();
        self.pending.retain(|timer| {
            if timer.due <= now {
                due.push(*timer);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Surfaces whose collision restore is still pending.
    pub fn pending_phase_surfaces(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.pending.iter().filter_map(|timer| match timer.action {
            TimerAction::EndPhase { surface } => Some(surface),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_due_returns_in_order_and_keeps_future() {
        let mut wheel = TimerWheel::default();
        wheel.schedule(2.0, 1, TimerAction::FinishTeleport);
        wheel.schedule(0.5, 1, TimerAction::AttackFailsafe);
        wheel.schedule(1.0, 2, TimerAction::EndRecovery);

        let due = wheel.drain_due(1.0);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].action, TimerAction::AttackFailsafe);
        assert_eq!(due[1].action, TimerAction::EndRecovery);
        assert_eq!(wheel.len(), 1);

        assert!(wheel.drain_due(1.5).is_empty());
        assert_eq!(wheel.drain_due(2.0).len(), 1);
        assert!(wheel.is_empty());
    }

    #[test]
    fn test_pending_phase_surfaces() {
        let mut wheel = TimerWheel::default();
        wheel.schedule(
            1.0,
            3,
            TimerAction::EndPhase {
                surface: BodyId(7),
            },
        );
        wheel.schedule(1.0, 3, TimerAction::JumpFailsafe);

        let surfaces: Vec<BodyId> = wheel.pending_phase_surfaces().collect();
        assert_eq!(surfaces, vec![BodyId(7)]);
    }
}
