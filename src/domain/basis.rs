//! Basic building blocks.

use std::{
    f64::consts::{PI, TAU},
    ops::{Add, Sub},
};

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Position> for (f64, f64) {
    fn from(value: Position) -> Self {
        (value.x, value.y)
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Angle in radians, measured from the positive x-axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    pub fn new(radians: f64) -> Self {
        Self(radians)
    }

    pub fn to_deg(self) -> f64 {
        (self.0 * (180.0 / PI) + 360.0) % 360.0
    }

    pub fn radians(self) -> f64 {
        self.0
    }

    /// Brings the angle into (-π, π] with a single pass of ±2π.
    ///
    /// Angles further than one turn outside the interval are not fully normalized; a single tick
    /// never rotates by that much.
    pub fn wrapped(self) -> Self {
        if self.0 > PI {
            Self(self.0 - TAU)
        } else if self.0 <= -PI {
            Self(self.0 + TAU)
        } else {
            self
        }
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl From<Angle> for f64 {
    fn from(value: Angle) -> Self {
        value.0
    }
}

/// Signed speed along the heading.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Velocity(f64);

impl Velocity {
    pub const ZERO: Velocity = Velocity(0.0);

    pub const fn new(velocity: f64) -> Self {
        Self(velocity)
    }
}

impl From<Velocity> for f64 {
    fn from(value: Velocity) -> Self {
        value.0
    }
}

/// Signed turn rate in radians per second. Positive rates turn from the x-axis towards the y-axis.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct AngularVelocity(f64);

impl AngularVelocity {
    pub const ZERO: AngularVelocity = AngularVelocity(0.0);

    pub const fn new(radians_per_second: f64) -> Self {
        Self(radians_per_second)
    }
}

impl From<AngularVelocity> for f64 {
    fn from(value: AngularVelocity) -> Self {
        value.0
    }
}
