//! Sweeper agent: brain, kinematic state, and the per-tick control step.

use crate::arena::{Arena, Vec2};
use crate::config::{Config, SweeperConfig};
use crate::neural::{Network, NetworkError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An agent steering itself across the arena.
///
/// The brain maps six sensory inputs (own heading plus unit vectors away
/// from the nearest mine and hazard) to two track outputs that drive
/// differential steering.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sweeper {
    /// The onboard network; weights are replaced every generation
    pub brain: Network,
    pub position: Vec2,
    pub facing: Vec2,
    /// Heading angle the facing vector is derived from
    pub rotation: f64,
    pub speed: f64,
    pub left_track: f64,
    pub right_track: f64,
    pub fitness: f64,
    /// Body diameter, used in collection tests
    pub scale: f64,
}

impl Sweeper {
    /// Create a sweeper with a random brain at a random pose
    pub fn new(config: &Config, rng: &mut impl Rng) -> Self {
        let rotation = rng.gen::<f64>() * std::f64::consts::TAU;
        Self {
            brain: Network::new(&config.network, rng),
            position: Vec2::new(
                rng.gen::<f64>() * config.arena.width,
                rng.gen::<f64>() * config.arena.height,
            ),
            facing: Vec2::new(-rotation.sin(), rotation.cos()),
            rotation,
            speed: 0.0,
            left_track: 0.16,
            right_track: 0.16,
            fitness: 0.0,
            scale: config.sweepers.scale,
        }
    }

    /// One control step: sense, think, steer, move.
    ///
    /// An evaluation error is returned to the caller, which skips this
    /// sweeper's tick; no state is modified on failure.
    pub fn update(&mut self, arena: &Arena, config: &SweeperConfig) -> Result<(), NetworkError> {
        let nearest_mine = arena.mines[Arena::nearest(&arena.mines, &self.position)];
        let away_from_mine = (self.position - nearest_mine).normalized();

        let nearest_hazard = arena.hazards[Arena::nearest(&arena.hazards, &self.position)];
        let away_from_hazard = (self.position - nearest_hazard).normalized();

        let inputs = [
            self.facing.x,
            self.facing.y,
            away_from_mine.x,
            away_from_mine.y,
            away_from_hazard.x,
            away_from_hazard.y,
        ];
        let outputs = self.brain.evaluate(&inputs)?;

        self.left_track = outputs[0];
        self.right_track = outputs[1];

        let rotation_force = (self.left_track - self.right_track)
            .clamp(-config.max_turn_rate, config.max_turn_rate);
        self.rotation += rotation_force;

        self.speed = (self.left_track + self.right_track).min(config.max_speed);
        self.facing = Vec2::new(-self.rotation.sin(), self.rotation.cos());

        self.position = arena.wrap(Vec2::new(
            self.position.x + self.facing.x * self.speed,
            self.position.y + self.facing.y * self.speed,
        ));
        Ok(())
    }

    /// Index of the nearest target if this sweeper is close enough to
    /// collect it this tick
    pub fn try_collect(&self, targets: &[Vec2], target_radius: f64) -> Option<usize> {
        let nearest = Arena::nearest(targets, &self.position);
        if self.position.distance(&targets[nearest]) < target_radius + self.scale / 2.0 {
            Some(nearest)
        } else {
            None
        }
    }

    /// Collected a mine
    pub fn reward(&mut self) {
        self.fitness += 1.0;
    }

    /// Hit a hazard
    pub fn penalize(&mut self) {
        self.fitness -= 2.0;
    }

    /// Re-randomize pose and zero fitness for the next generation
    pub fn reset(&mut self, config: &Config, rng: &mut impl Rng) {
        self.rotation = rng.gen::<f64>() * std::f64::consts::TAU;
        self.position = Vec2::new(
            rng.gen::<f64>() * config.arena.width,
            rng.gen::<f64>() * config.arena.height,
        );
        self.facing = Vec2::new(-self.rotation.sin(), self.rotation.cos());
        self.fitness = 0.0;
    }
}
