//! Kinematic state of a point-mass robot with a constant collision radius.

use nalgebra::{Point2, Rotation2, Vector2};
use once_cell::sync::Lazy;

use super::{Angle, AngularVelocity, Position, Velocity};

const ARROW_UNIT: f64 = 4.0;

/// Arrow vertices relative to the robot's center for heading zero.
static ARROW: Lazy<Vec<Vector2<f64>>> = Lazy::new(|| {
    let l = ARROW_UNIT;
    [
        (0.0, l),
        (0.0, 2.0 * l),
        (3.0 * l, 2.0 * l),
        (3.0 * l, 3.0 * l),
        (4.0 * l, 1.5 * l),
        (3.0 * l, 0.0),
        (3.0 * l, l),
    ]
    .into_iter()
    .map(|(x, y)| Vector2::new(x, y - 1.5 * l))
    .collect()
});

#[derive(Clone, Debug, PartialEq)]
pub struct KinematicState {
    position: Position,
    heading: Angle,
    motion: Motion,
    radius: f64,
    outline: Outline,
}

impl KinematicState {
    /// Robot at rest at `position`, facing along the positive x-axis.
    pub fn new(position: Position, radius: f64) -> Self {
        Self {
            position,
            heading: Angle::default(),
            motion: Motion::HALTED,
            radius,
            outline: Outline::arrow(position),
        }
    }

    #[cfg(test)]
    pub fn with_heading(mut self, heading: Angle) -> Self {
        let heading = heading.wrapped();
        self.outline.rotate_about(
            self.position,
            Angle::new(heading.radians() - self.heading.radians()),
        );
        self.heading = heading;
        self
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn heading(&self) -> Angle {
        self.heading
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn linear_velocity(&self) -> Velocity {
        self.motion.linear
    }

    pub fn angular_velocity(&self) -> AngularVelocity {
        self.motion.angular
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// Replaces both velocities at once.
    pub fn set_motion(&mut self, motion: Motion) {
        self.motion = motion;
    }

    pub(super) fn rotate(&mut self, angle: Angle) {
        self.heading = (self.heading + angle).wrapped();
        self.outline.rotate_about(self.position, angle);
    }

    pub(super) fn translate(&mut self, displacement: Position) {
        self.position = self.position + displacement;
        self.outline.translate(displacement);
    }
}

/// Linear and angular velocity, always replaced as a pair.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Motion {
    linear: Velocity,
    angular: AngularVelocity,
}

impl Motion {
    pub const HALTED: Motion = Motion {
        linear: Velocity::ZERO,
        angular: AngularVelocity::ZERO,
    };

    pub fn cruising(speed: Velocity) -> Self {
        Self {
            linear: speed,
            angular: AngularVelocity::ZERO,
        }
    }

    pub fn rotating(turn_rate: AngularVelocity) -> Self {
        Self {
            linear: Velocity::ZERO,
            angular: turn_rate,
        }
    }

    pub fn linear(&self) -> Velocity {
        self.linear
    }

    pub fn angular(&self) -> AngularVelocity {
        self.angular
    }
}

/// Render-only polygon that follows the robot's pose.
#[derive(Clone, Debug, PartialEq)]
pub struct Outline {
    vertices: Vec<Point2<f64>>,
}

impl Outline {
    /// Arrow pointing along the positive x-axis, centered vertically on `center`.
    pub fn arrow(center: Position) -> Self {
        let center = Point2::new(center.x(), center.y());
        Self {
            vertices: ARROW.iter().map(|offset| center + *offset).collect(),
        }
    }

    pub fn vertices(&self) -> impl Iterator<Item = Position> + '_ {
        self.vertices.iter().map(|p| Position::new(p.x, p.y))
    }

    fn rotate_about(&mut self, center: Position, angle: Angle) {
        let rotation = Rotation2::new(angle.radians());
        let center = Point2::new(center.x(), center.y());
        for vertex in &mut self.vertices {
            *vertex = center + rotation * (*vertex - center);
        }
    }

    fn translate(&mut self, displacement: Position) {
        let displacement = Vector2::new(displacement.x(), displacement.y());
        for vertex in &mut self.vertices {
            *vertex += displacement;
        }
    }
}
