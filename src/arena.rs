//! Toroidal arena: target scatter, nearest-target search, respawn.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// 2D point/vector in arena coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance_sq(&self, other: &Vec2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Vec2) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Unit vector in this direction; zero-length input stays zero rather
    /// than producing NaN
    pub fn normalized(&self) -> Vec2 {
        let len = self.length();
        if len > 0.0 {
            Vec2::new(self.x / len, self.y / len)
        } else {
            Vec2::new(0.0, 0.0)
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

/// The toroidal arena holding collectible mines and hazards.
///
/// Positions are continuous; anything moving past an edge wraps to the
/// opposite side.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
    pub mines: Vec<Vec2>,
    pub hazards: Vec<Vec2>,
}

impl Arena {
    /// Create an arena with `num_mines` mines and `num_hazards` hazards
    /// scattered uniformly
    pub fn new(
        width: f64,
        height: f64,
        num_mines: usize,
        num_hazards: usize,
        rng: &mut impl Rng,
    ) -> Self {
        let mut arena = Self {
            width,
            height,
            mines: Vec::with_capacity(num_mines),
            hazards: Vec::with_capacity(num_hazards),
        };
        for _ in 0..num_mines {
            let p = arena.random_position(rng);
            arena.mines.push(p);
        }
        for _ in 0..num_hazards {
            let p = arena.random_position(rng);
            arena.hazards.push(p);
        }
        arena
    }

    /// Uniform random position inside the arena
    pub fn random_position(&self, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            rng.gen::<f64>() * self.width,
            rng.gen::<f64>() * self.height,
        )
    }

    /// Wrap a position onto the torus
    pub fn wrap(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            (self.width + position.x) % self.width,
            (self.height + position.y) % self.height,
        )
    }

    /// Index of the target nearest to `from`
    pub fn nearest(targets: &[Vec2], from: &Vec2) -> usize {
        let mut closest = 0;
        let mut closest_dist = targets[0].distance_sq(from);
        for (i, target) in targets.iter().enumerate().skip(1) {
            let dist = target.distance_sq(from);
            if dist < closest_dist {
                closest_dist = dist;
                closest = i;
            }
        }
        closest
    }

    /// Move a collected mine to a fresh random position
    pub fn respawn_mine(&mut self, index: usize, rng: &mut impl Rng) {
        let p = self.random_position(rng);
        self.mines[index] = p;
    }

    /// Move a triggered hazard to a fresh random position
    pub fn respawn_hazard(&mut self, index: usize, rng: &mut impl Rng) {
        let p = self.random_position(rng);
        self.hazards[index] = p;
    }
}
