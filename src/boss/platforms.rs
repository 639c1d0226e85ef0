//! Boss domain: the platform index and navigation scoring.

use bevy::math::Vec2;
use bevy::prelude::Resource;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

use crate::boss::tuning::NavigationTuning;
use crate::boss::world::BodyId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PlatformId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub id: PlatformId,
    pub body: BodyId,
    /// Centre of the top surface
    pub position: Vec2,
    pub half_width: f32,
    pub one_way: bool,
}

/// Every platform in the arena, collected once and then read-only.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlatformRegistry {
    platforms: Vec<Platform>,
    by_body: HashMap<BodyId, usize>,
}

impl PlatformRegistry {
    pub fn new(platforms: impl IntoIterator<Item = Platform>) -> Self {
        let mut platforms: Vec<Platform> = platforms.into_iter().collect();
        platforms.sort_by_key(|platform| platform.id);
        let by_body = platforms
            .iter()
            .enumerate()
            .map(|(index, platform)| (platform.body, index))
            .collect();
        Self { platforms, by_body }
    }

    pub fn get(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms
            .binary_search_by_key(&id, |platform| platform.id)
            .ok()
            .map(|index| &self.platforms[index])
    }

    /// Platform owning a collider hit by a probe.
    pub fn by_body(&self, body: BodyId) -> Option<&Platform> {
        self.by_body.get(&body).map(|index| &self.platforms[*index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter()
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

/// Recently chosen platforms, oldest evicted first.
#[derive(Debug, Clone, Serialize)]
pub struct VisitedRing {
    capacity: usize,
    entries: VecDeque<PlatformId>,
}

impl VisitedRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, id: PlatformId) {
        self.entries.retain(|entry| *entry != id);
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(id);
    }

    pub fn contains(&self, id: PlatformId) -> bool {
        self.entries.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PlatformId> + '_ {
        self.entries.iter().copied()
    }
}

/// Where the boss and its target are, for platform scoring.
#[derive(Debug, Clone, Copy)]
pub struct RouteQuery {
    pub boss: Vec2,
    pub target: Vec2,
    pub standing_on: Option<PlatformId>,
    /// Highest platform above the boss still considered reachable
    pub reach: f32,
}

/// Lower is better. `None` means the platform is not a candidate.
pub fn score_platform(
    platform: &Platform,
    query: &RouteQuery,
    visited: &VisitedRing,
    tuning: &NavigationTuning,
) -> Option<f32> {
    if query.standing_on == Some(platform.id) {
        return None;
    }
    let rise = platform.position.y - query.boss.y;
    if rise > query.reach {
        return None;
    }

    let mut score = tuning.boss_distance_weight * query.boss.distance(platform.position)
        + tuning.target_distance_weight * platform.position.distance(query.target);
    if rise > 0.0 && platform.position.y <= query.target.y {
        score *= tuning.upward_bonus;
    }
    if visited.contains(platform.id) {
        score += tuning.visited_penalty;
    }
    Some(score)
}

fn best_platform(
    registry: &PlatformRegistry,
    query: &RouteQuery,
    visited: &VisitedRing,
    tuning: &NavigationTuning,
    bias: impl Fn(&Platform) -> f32,
) -> Option<PlatformId> {
    let mut best: Option<(f32, PlatformId)> = None;
    // Registry iterates in id order, so strict comparison keeps the lower id on ties
    for platform in registry.iter() {
        let Some(score) = score_platform(platform, query, visited, tuning) else {
            continue;
        };
        let score = score * bias(platform);
        if best.is_none_or(|(current, _)| score < current) {
            best = Some((score, platform.id));
        }
    }
    best.map(|(_, id)| id)
}

/// Pick the platform that best bridges the boss and its target and mark it visited.
pub fn find_nearest_platform_to_target(
    registry: &PlatformRegistry,
    query: &RouteQuery,
    visited: &mut VisitedRing,
    tuning: &NavigationTuning,
) -> Option<PlatformId> {
    let choice = best_platform(registry, query, visited, tuning, |_| 1.0)?;
    visited.push(choice);
    Some(choice)
}

/// Same scoring, favouring platforms on the side away from `blocked_sign`.
pub fn find_alternative_route(
    registry: &PlatformRegistry,
    query: &RouteQuery,
    blocked_sign: f32,
    visited: &mut VisitedRing,
    tuning: &NavigationTuning,
) -> Option<PlatformId> {
    let choice = best_platform(registry, query, visited, tuning, |platform| {
        if (platform.position.x - query.boss.x) * blocked_sign < 0.0 {
            tuning.opposite_side_bonus
        } else {
            1.0
        }
    })?;
    visited.push(choice);
    Some(choice)
}
