//! The domain module encapsulates the core of the simulation: the robot's kinematic state, the
//! motion resolver that moves it through the arena and the reorientation controller that turns it
//! around after hitting a wall.
//!
//! Nothing in here depends on Bevy, so the simulation can be driven by any presentation loop that
//! calls [`Simulation::tick`].

mod arena;
mod basis;
mod kinematics;
mod motion;
mod reorientation;
mod simulation;

pub use arena::Arena;
pub use basis::{Angle, AngularVelocity, Position, Velocity};
pub use kinematics::{KinematicState, Motion};
pub use simulation::{Phase, RobotPose, Simulation, SimulationConfig, SimulationError};
