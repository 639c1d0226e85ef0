//! Boss domain: per-action ready times.

use serde::Serialize;
use std::collections::HashMap;

use crate::boss::attacks::AttackKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CooldownKey {
    Attack(AttackKind),
    Jump,
    Teleport,
    /// Shared gate between any two attacks
    GeneralAttack,
}

/// Tracks the earliest time each action may run again.
///
/// Keys that were never armed are always ready.
#[derive(Debug, Clone, Default)]
pub struct CooldownRegistry {
    ready_at: HashMap<CooldownKey, f32>,
}

impl CooldownRegistry {
    pub fn is_ready(&self, key: CooldownKey, now: f32) -> bool {
        now >= self.ready_at(key)
    }

    pub fn ready_at(&self, key: CooldownKey) -> f32 {
        self.ready_at.get(&key).copied().unwrap_or(f32::NEG_INFINITY)
    }

    pub fn arm(&mut self, key: CooldownKey, now: f32, duration: f32) {
        self.ready_at.insert(key, now + duration);
    }

    /// Seconds until the key is ready, zero if it already is.
    pub fn remaining(&self, key: CooldownKey, now: f32) -> f32 {
        (self.ready_at(key) - now).max(0.0)
    }

    pub fn snapshot(&self, now: f32) -> Vec<(CooldownKey, f32)> {
        let mut entries: Vec<(CooldownKey, f32)> = self
            .ready_at
            .keys()
            .map(|key| (*key, self.remaining(*key, now)))
            .collect();
        entries.sort_by_key(|(key, _)| *key);
        entries
    }
}
