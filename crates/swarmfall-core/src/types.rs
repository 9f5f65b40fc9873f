//! Fundamental geometric and simulation types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// 2D position in arena space (world units).
/// x = right, y = up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// 2D velocity in arena space (units/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

/// Simulation time tracking.
///
/// `elapsed_secs` accumulates the scaled delta and freezes while the time
/// scale is zero; `unscaled_secs` always advances.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds (scaled).
    pub elapsed_secs: f64,
    /// Elapsed wall-independent time in seconds, unaffected by time scale.
    pub unscaled_secs: f64,
}

/// Time deltas for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickDelta {
    /// Seconds since the last tick after time scale is applied.
    pub scaled: f32,
    /// Seconds since the last tick, ignoring pause and slow motion.
    pub unscaled: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared distance to another position. Targeting compares these
    /// directly and never takes a square root.
    pub fn distance_sq_to(&self, other: &Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f32 {
        self.distance_sq_to(other).sqrt()
    }

    /// Unit direction toward another position, or zero if coincident.
    pub fn direction_to(&self, other: &Position) -> Vec2 {
        (other.to_vec2() - self.to_vec2()).normalize_or_zero()
    }

    /// Position offset by `dir * distance`.
    pub fn offset(&self, dir: Vec2, distance: f32) -> Position {
        Position::from(self.to_vec2() + dir * distance)
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Vec2> for Position {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Velocity of magnitude `speed` along `dir` (normalized internally).
    pub fn along(dir: Vec2, speed: f32) -> Self {
        let v = dir.normalize_or_zero() * speed;
        Self { x: v.x, y: v.y }
    }

    /// Speed magnitude (units/s).
    pub fn speed(&self) -> f32 {
        self.to_vec2().length()
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl SimTime {
    /// Advance by one tick.
    pub fn advance(&mut self, delta: TickDelta) {
        self.tick += 1;
        self.elapsed_secs += delta.scaled as f64;
        self.unscaled_secs += delta.unscaled as f64;
    }
}

impl TickDelta {
    /// Build a delta from a raw frame time and a time scale.
    pub fn scaled_by(unscaled: f32, time_scale: f32) -> Self {
        let unscaled = unscaled.max(0.0);
        Self {
            scaled: unscaled * time_scale.max(0.0),
            unscaled,
        }
    }

    /// The nominal fixed-rate delta at 1x speed.
    pub fn fixed() -> Self {
        Self {
            scaled: crate::constants::DT,
            unscaled: crate::constants::DT,
        }
    }
}
