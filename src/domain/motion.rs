//! Motion resolver.
//!
//! Each tick the robot first turns by its angular velocity and then moves along its heading. A
//! displacement that would carry the robot's collision circle across a wall is clipped so the
//! circle ends up touching that wall, and the clip is reported as a collision.

use std::{
    f64::consts::{FRAC_PI_2, PI},
    time::Duration,
};

use super::{Angle, Arena, KinematicState, Position};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Axis {
    X,
    Y,
}

/// A displacement that was cut short at a wall.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionEvent {
    /// Axis whose wall was reached.
    pub axis: Axis,
    /// Displacement actually applied.
    pub displacement: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub state: KinematicState,
    pub collision: Option<CollisionEvent>,
}

/// Advances `state` by `dt`, rotating first and translating second.
pub fn advance(state: &KinematicState, arena: &Arena, dt: Duration) -> Step {
    let dt = dt.as_secs_f64();
    let mut state = state.clone();

    state.rotate(Angle::new(f64::from(state.angular_velocity()) * dt));

    let distance = f64::from(state.linear_velocity()) * dt;
    if distance == 0.0 {
        return Step {
            state,
            collision: None,
        };
    }

    let (displacement, collision) = clip(&state, arena, distance);
    state.translate(displacement);

    Step { state, collision }
}

/// Displacement for travelling `distance` along the heading, clipped at the first wall on the way.
///
/// At most one axis is clipped; the other component shrinks in proportion so the direction of
/// travel is kept. The axis whose wall is nearer along the heading is checked first. If it is not
/// crossed, the other one still is, which matters when the robot slides along a wall it touches.
fn clip(state: &KinematicState, arena: &Arena, distance: f64) -> (Position, Option<CollisionEvent>) {
    // Reversing turns the direction of travel around; the walls ahead are the ones behind.
    let direction = if distance < 0.0 {
        (state.heading() + Angle::new(PI)).wrapped()
    } else {
        state.heading()
    }
    .radians();
    let distance = distance.abs();

    let (x, y): (f64, f64) = state.position().into();
    let r = state.radius();
    let dx = distance * direction.cos();
    let dy = distance * direction.sin();

    let limit_x = if (-FRAC_PI_2..=FRAC_PI_2).contains(&direction) {
        arena.width() - x - r
    } else {
        -x + r
    };
    let limit_y = if (0.0..=PI).contains(&direction) {
        arena.height() - y - r
    } else {
        -y + r
    };

    let slope = direction.tan();
    let ratio = if limit_x == 0.0 {
        f64::INFINITY
    } else {
        (limit_y / limit_x).abs()
    };

    // A vertical wall is reached first, or both at once.
    let axes = if ratio >= slope.abs() {
        [Axis::X, Axis::Y]
    } else {
        [Axis::Y, Axis::X]
    };

    for axis in axes {
        let displacement = match axis {
            Axis::X => clip_delta(x, dx, r, arena.width() - r)
                .map(|clipped_dx| Position::new(clipped_dx, dy * (clipped_dx / dx))),
            Axis::Y => clip_delta(y, dy, r, arena.height() - r)
                .map(|clipped_dy| Position::new(dx * (clipped_dy / dy), clipped_dy)),
        };
        if let Some(displacement) = displacement {
            return (
                displacement,
                Some(CollisionEvent {
                    axis,
                    displacement,
                }),
            );
        }
    }

    (Position::new(dx, dy), None)
}

/// Shortened `delta` if moving by it leaves `[low, high]`. Only outward moves are clipped, so a
/// clipped `delta` is never zero.
fn clip_delta(start: f64, delta: f64, low: f64, high: f64) -> Option<f64> {
    if delta > 0.0 && start + delta > high {
        Some(high - start)
    } else if delta < 0.0 && start + delta < low {
        Some(low - start)
    } else {
        None
    }
}
