//! Rectangular arena the robot moves in.

use super::Position;

/// Axis-aligned rectangle `[0, width] × [0, height]`.
///
/// The y-axis points down, as on a screen: a heading in `[0, π]` moves the robot towards the
/// `height` wall.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Arena {
    width: f64,
    height: f64,
}

impl Arena {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether a circle of `radius` around `position` lies completely inside the arena.
    pub fn contains(&self, position: Position, radius: f64) -> bool {
        position.x() - radius >= 0.0
            && position.x() + radius <= self.width
            && position.y() - radius >= 0.0
            && position.y() + radius <= self.height
    }

    /// Whether any position exists that keeps a circle of `radius` clear of all walls.
    pub fn has_interior(&self, radius: f64) -> bool {
        radius < self.width.min(self.height) / 2.0
    }

    /// Corners in drawing order, starting at the origin.
    pub fn corners(&self) -> [Position; 4] {
        [
            Position::new(0.0, 0.0),
            Position::new(self.width, 0.0),
            Position::new(self.width, self.height),
            Position::new(0.0, self.height),
        ]
    }
}
