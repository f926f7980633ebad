//! Live entity set with spawn cadence and population cap

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Outcome, resolve};
use super::paddle::Paddle;
use super::state::{Bounds, Entity};
use crate::settings::GameConfig;

/// Something that happened to the pool during `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolEvent {
    Spawned { id: u32 },
    Removed { id: u32, outcome: Outcome },
}

/// Owns every live entity. Nothing outside holds an entity across frames.
#[derive(Debug, Clone)]
pub struct EntityPool {
    entities: Vec<Entity>,
    /// Frames since the last spawn attempt
    spawn_timer: u32,
    spawn_interval: u32,
    max_population: usize,
    bounds: Bounds,
    radius: f32,
    fall_speed: (f32, f32),
    max_drift: f32,
    rng: Pcg32,
    next_id: u32,
}

impl EntityPool {
    pub fn new(config: &GameConfig, bounds: Bounds, seed: u64) -> Self {
        Self {
            entities: Vec::with_capacity(config.max_entities),
            spawn_timer: 0,
            spawn_interval: config.spawn_interval_ticks.max(1),
            max_population: config.max_entities,
            bounds,
            radius: config.entity_radius,
            fall_speed: (config.min_fall_speed, config.max_fall_speed),
            max_drift: config.max_drift,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Drop every entity, restart the spawn cadence and adopt new bounds.
    /// The RNG keeps running so later attempts don't replay the first.
    pub fn reset(&mut self, bounds: Bounds) {
        self.entities.clear();
        self.spawn_timer = 0;
        self.bounds = bounds;
    }

    /// Adopt new bounds for future spawns without touching live entities
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Advance `delta_ticks` frames: spawn on cadence, move, resolve and prune.
    pub fn advance(&mut self, delta_ticks: u32, paddle: &Paddle) -> Vec<PoolEvent> {
        let mut events = Vec::new();
        for _ in 0..delta_ticks {
            self.step(paddle, &mut events);
        }
        events
    }

    fn step(&mut self, paddle: &Paddle, events: &mut Vec<PoolEvent>) {
        self.spawn_timer += 1;
        if self.spawn_timer >= self.spawn_interval {
            self.spawn_timer = 0;
            // Skipped, not queued, when full
            if self.entities.len() < self.max_population {
                let id = self.spawn();
                events.push(PoolEvent::Spawned { id });
            }
        }

        // Reverse order so removal doesn't disturb unvisited indices
        for i in (0..self.entities.len()).rev() {
            let entity = &mut self.entities[i];
            entity.step();
            let outcome = resolve(entity, paddle, &self.bounds);
            if outcome.is_terminal() {
                entity.alive = false;
                let id = entity.id;
                self.entities.remove(i);
                log::debug!("Entity {} removed: {:?}", id, outcome);
                events.push(PoolEvent::Removed { id, outcome });
            }
        }

        debug_assert!(self.entities.len() <= self.max_population);
    }

    fn spawn(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        let r = self.radius;
        let x = if self.bounds.width > r * 2.0 {
            self.rng.random_range(r..=self.bounds.width - r)
        } else {
            self.bounds.width / 2.0
        };
        let (min_speed, max_speed) = self.fall_speed;
        let vy = if max_speed > min_speed {
            self.rng.random_range(min_speed..=max_speed)
        } else {
            min_speed
        };
        let vx = if self.max_drift > 0.0 {
            self.rng.random_range(-self.max_drift..=self.max_drift)
        } else {
            0.0
        };

        self.entities
            .push(Entity::new(id, Vec2::new(x, r), Vec2::new(vx, vy), r));
        log::debug!("Entity {} spawned at x={:.1}", id, x);
        id
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn spawn_timer(&self) -> u32 {
        self.spawn_timer
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}
