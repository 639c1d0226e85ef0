//! Boss domain: attack definitions and the variety-forcing selector.

use bevy::math::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::boss::cooldowns::{CooldownKey, CooldownRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttackKind {
    Light,
    Heavy,
    Area,
    Projectile,
}

impl AttackKind {
    pub const ALL: [AttackKind; 4] = [
        AttackKind::Light,
        AttackKind::Heavy,
        AttackKind::Area,
        AttackKind::Projectile,
    ];

    pub fn trigger(self) -> &'static str {
        match self {
            AttackKind::Light => "lightAttack",
            AttackKind::Heavy => "heavyAttack",
            AttackKind::Area => "areaAttack",
            AttackKind::Projectile => "projectileAttack",
        }
    }
}

/// Which distance an attack's range window is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeMetric {
    /// |target.x - boss.x|
    Horizontal,
    /// Straight-line distance
    Direct,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackDefinition {
    pub enabled: bool,
    pub metric: RangeMetric,
    pub min_range: f32,
    pub max_range: f32,
    /// Radius of the damage circle
    pub radius: f32,
    /// Forward offset of the damage circle from the boss centre
    pub reach: f32,
    pub damage: f32,
    pub knockback: f32,
    pub cooldown: f32,
    /// Seconds after selection at which damage is applied
    pub strike_delay: f32,
    /// Seconds after selection at which the attack is forced to end
    pub failsafe: f32,
    /// Length of the attack animation; its completion ends the attack early
    pub clip_length: f32,
}

impl Default for AttackDefinition {
    fn default() -> Self {
        Self {
            enabled: true,
            metric: RangeMetric::Horizontal,
            min_range: 0.0,
            max_range: 2.0,
            radius: 0.5,
            reach: 1.0,
            damage: 1.0,
            knockback: 0.0,
            cooldown: 1.0,
            strike_delay: 0.25,
            failsafe: 1.0,
            clip_length: 0.5,
        }
    }
}

impl AttackDefinition {
    pub fn in_range(&self, distances: TargetDistances) -> bool {
        let distance = match self.metric {
            RangeMetric::Horizontal => distances.horizontal,
            RangeMetric::Direct => distances.direct,
        };
        distance >= self.min_range && distance <= self.max_range
    }
}

/// Extra parameters for the projectile volley
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileVolley {
    pub speed: f32,
    pub count: u32,
    /// Half-angle of the fan in degrees
    pub spread_degrees: f32,
    /// Spawn offset (x, y) from the boss centre; x is mirrored by facing
    pub muzzle: (f32, f32),
}

impl Default for ProjectileVolley {
    fn default() -> Self {
        Self {
            speed: 15.0,
            count: 3,
            spread_degrees: 15.0,
            muzzle: (1.0, 0.5),
        }
    }
}

impl ProjectileVolley {
    pub fn muzzle_offset(&self, facing_sign: f32) -> Vec2 {
        Vec2::new(self.muzzle.0 * facing_sign, self.muzzle.1)
    }

    /// Unit directions for each projectile, fanned evenly around `aim`.
    pub fn directions(&self, aim: Vec2) -> Vec<Vec2> {
        let aim = aim.normalize_or_zero();
        if self.count == 0 || aim == Vec2::ZERO {
            return Vec::new();
        }
        if self.count == 1 {
            return vec![aim];
        }
        (0..self.count)
            .map(|i| {
                let t = i as f32 / (self.count - 1) as f32;
                let degrees = -self.spread_degrees + 2.0 * self.spread_degrees * t;
                Vec2::from_angle(degrees.to_radians()).rotate(aim)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackTable {
    /// Minimum time between any two attacks
    pub general_cooldown: f32,
    pub force_variety: bool,
    /// Picks of one kind in a row before it is excluded
    pub max_consecutive: u32,
    pub light: AttackDefinition,
    pub heavy: AttackDefinition,
    pub area: AttackDefinition,
    pub projectile: AttackDefinition,
    pub volley: ProjectileVolley,
}

impl Default for AttackTable {
    fn default() -> Self {
        Self {
            general_cooldown: 1.5,
            force_variety: true,
            max_consecutive: 2,
            light: AttackDefinition::default(),
            heavy: AttackDefinition {
                max_range: 2.5,
                radius: 0.7,
                reach: 1.2,
                damage: 3.0,
                knockback: 10.0,
                cooldown: 3.0,
                strike_delay: 0.45,
                failsafe: 1.5,
                clip_length: 0.9,
                ..AttackDefinition::default()
            },
            area: AttackDefinition {
                metric: RangeMetric::Direct,
                max_range: 4.0,
                radius: 4.0,
                reach: 0.0,
                damage: 2.0,
                knockback: 8.0,
                cooldown: 5.0,
                strike_delay: 0.6,
                failsafe: 2.0,
                clip_length: 1.2,
                ..AttackDefinition::default()
            },
            projectile: AttackDefinition {
                enabled: false,
                metric: RangeMetric::Direct,
                min_range: 5.0,
                max_range: 12.0,
                radius: 0.0,
                reach: 0.0,
                damage: 1.0,
                cooldown: 2.0,
                strike_delay: 0.35,
                failsafe: 1.5,
                clip_length: 0.7,
                ..AttackDefinition::default()
            },
            volley: ProjectileVolley::default(),
        }
    }
}

impl AttackTable {
    pub fn get(&self, kind: AttackKind) -> &AttackDefinition {
        match kind {
            AttackKind::Light => &self.light,
            AttackKind::Heavy => &self.heavy,
            AttackKind::Area => &self.area,
            AttackKind::Projectile => &self.projectile,
        }
    }

    pub fn get_mut(&mut self, kind: AttackKind) -> &mut AttackDefinition {
        match kind {
            AttackKind::Light => &mut self.light,
            AttackKind::Heavy => &mut self.heavy,
            AttackKind::Area => &mut self.area,
            AttackKind::Projectile => &mut self.projectile,
        }
    }

    /// Apply a damage multiplier to every attack.
    pub fn scaled(mut self, scale: impl Fn(f32) -> f32) -> Self {
        for kind in AttackKind::ALL {
            let definition = self.get_mut(kind);
            definition.damage = scale(definition.damage);
        }
        self
    }
}

/// Distances from the boss to its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetDistances {
    pub horizontal: f32,
    pub direct: f32,
}

/// Remembers recent picks so one kind cannot dominate.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AttackSelector {
    last: Option<AttackKind>,
    streak: u32,
}

impl AttackSelector {
    pub fn last(&self) -> Option<AttackKind> {
        self.last
    }

    /// How many times in a row `last` has been picked.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Enabled kinds in range whose cooldown has elapsed, in declaration order.
    pub fn eligible(
        &self,
        table: &AttackTable,
        distances: TargetDistances,
        cooldowns: &CooldownRegistry,
        now: f32,
    ) -> Vec<AttackKind> {
        AttackKind::ALL
            .into_iter()
            .filter(|kind| {
                let definition = table.get(*kind);
                definition.enabled
                    && definition.in_range(distances)
                    && cooldowns.is_ready(CooldownKey::Attack(*kind), now)
            })
            .collect()
    }

    /// Pick an attack and arm its cooldown. Returns `None` if nothing is eligible.
    pub fn select(
        &mut self,
        table: &AttackTable,
        distances: TargetDistances,
        cooldowns: &mut CooldownRegistry,
        now: f32,
        rng: &mut impl Rng,
    ) -> Option<AttackKind> {
        let mut candidates = self.eligible(table, distances, cooldowns, now);
        if candidates.is_empty() {
            return None;
        }

        if table.force_variety && candidates.len() > 1 && self.streak >= table.max_consecutive {
            if let Some(last) = self.last {
                candidates.retain(|kind| *kind != last);
            }
        }

        let choice = candidates[rng.random_range(0..candidates.len())];
        self.record(choice);
        cooldowns.arm(CooldownKey::Attack(choice), now, table.get(choice).cooldown);
        Some(choice)
    }

    fn record(&mut self, choice: AttackKind) {
        if self.last == Some(choice) {
            self.streak += 1;
        } else {
            self.last = Some(choice);
            self.streak = 1;
        }
    }
}
