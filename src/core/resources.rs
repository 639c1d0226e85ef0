//! Core domain: shared resources for pausing, progression and difficulty.

use bevy::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

/// Resource tracking if gameplay should be paused.
/// Gameplay is paused if any source is active.
#[derive(Resource, Debug, Default)]
pub struct GameplayPaused {
    pub sources: HashSet<String>,
}

impl GameplayPaused {
    pub fn is_paused(&self) -> bool {
        !self.sources.is_empty()
    }

    pub fn pause(&mut self, source: impl Into<String>) {
        self.sources.insert(source.into());
    }

    pub fn unpause(&mut self, source: impl Into<String>) {
        self.sources.remove(&source.into());
    }
}

/// Run condition: returns true only when gameplay is not paused
pub fn gameplay_active(paused: Res<GameplayPaused>) -> bool {
    !paused.is_paused()
}

/// How enemy stats grow with each cleared level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressionRates {
    /// Health increase per level (0.45 = +45% per level)
    pub health_per_level: f32,
    /// Damage increase per level
    pub damage_per_level: f32,
}

impl Default for ProgressionRates {
    fn default() -> Self {
        Self {
            health_per_level: 0.45,
            damage_per_level: 0.55,
        }
    }
}

/// Scaling multipliers handed to an enemy when it spawns.
///
/// Agents keep their own copy; changing the progression level later does not
/// affect enemies that are already alive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyContext {
    pub level: u32,
    pub health_multiplier: f32,
    pub damage_multiplier: f32,
}

impl Default for DifficultyContext {
    fn default() -> Self {
        Self {
            level: 0,
            health_multiplier: 1.0,
            damage_multiplier: 1.0,
        }
    }
}

impl DifficultyContext {
    pub fn at_level(level: u32, rates: ProgressionRates) -> Self {
        Self {
            level,
            health_multiplier: 1.0 + level as f32 * rates.health_per_level,
            damage_multiplier: 1.0 + level as f32 * rates.damage_per_level,
        }
    }

    /// Scale a base damage value; scaled hits never drop below one point.
    pub fn scale_damage(&self, base: f32) -> f32 {
        (base * self.damage_multiplier).round().max(1.0)
    }

    pub fn scale_health(&self, base: f32) -> f32 {
        (base * self.health_multiplier).round().max(1.0)
    }
}

/// Progression level across cleared levels
#[derive(Resource, Debug, Default)]
pub struct Progression {
    pub level: u32,
    pub rates: ProgressionRates,
}

impl Progression {
    pub fn advance(&mut self) -> DifficultyContext {
        self.level += 1;
        self.context()
    }

    pub fn reset(&mut self) {
        self.level = 0;
    }

    pub fn context(&self) -> DifficultyContext {
        DifficultyContext::at_level(self.level, self.rates)
    }
}

/// Count of enemies currently alive, maintained by spawners and death handling
#[derive(Resource, Debug, Default)]
pub struct LiveEnemies {
    pub count: u32,
}

impl LiveEnemies {
    pub fn spawned(&mut self) {
        self.count += 1;
    }

    pub fn removed(&mut self) {
        self.count = self.count.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_context_level_zero_is_identity() {
        let ctx = DifficultyContext::at_level(0, ProgressionRates::default());
        assert_eq!(ctx.health_multiplier, 1.0);
        assert_eq!(ctx.damage_multiplier, 1.0);
        assert_eq!(ctx.scale_damage(3.0), 3.0);
    }

    #[test]
    fn test_difficulty_context_scales_per_level() {
        let ctx = DifficultyContext::at_level(2, ProgressionRates::default());
        assert!((ctx.health_multiplier - 1.9).abs() < 1e-5);
        assert!((ctx.damage_multiplier - 2.1).abs() < 1e-5);
        // 1 * 2.1 rounds to 2
        assert_eq!(ctx.scale_damage(1.0), 2.0);
        // 3 * 2.1 = 6.3 rounds to 6
        assert_eq!(ctx.scale_damage(3.0), 6.0);
        assert_eq!(ctx.scale_health(10.0), 19.0);
    }

    #[test]
    fn test_progression_advance_and_reset() {
        let mut progression = Progression::default();
        let ctx = progression.advance();
        assert_eq!(ctx.level, 1);
        assert_eq!(progression.level, 1);

        progression.reset();
        assert_eq!(progression.context(), DifficultyContext::default());
    }

    #[test]
    fn test_live_enemies_never_underflows() {
        let mut live = LiveEnemies::default();
        live.spawned();
        live.removed();
        live.removed();
        assert_eq!(live.count, 0);
    }
}
