//! Fixed-rate simulation of the robot.
//!
//! The robot's state is advanced once per fixed timestep, independent of the frame rate of the
//! visualization.

use bevy::prelude::*;

use crate::{
    domain::{Simulation, SimulationConfig, SimulationError},
    resource::SimulationRes,
};

/// Simulation ticks per second.
pub const TICK_RATE: f64 = 60.0;

const PIXELS_PER_METER: f64 = 40.0;
const ARENA_WIDTH: f64 = 640.0;
const ARENA_HEIGHT: f64 = 480.0;
/// m/s
const CRUISE_SPEED: f64 = 1.0;
/// rad/s
const TURN_RATE: f64 = 0.5;

pub struct Simulator;

impl Plugin for Simulator {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(TICK_RATE))
            .add_systems(FixedUpdate, simulate);
    }
}

pub fn create_simulation() -> Result<Simulation, SimulationError> {
    Simulation::new(SimulationConfig::new(
        ARENA_WIDTH,
        ARENA_HEIGHT,
        CRUISE_SPEED * PIXELS_PER_METER,
        TURN_RATE,
    ))
}

fn simulate(time: Res<Time>, mut simulation: ResMut<SimulationRes>) {
    if let Err(error) = simulation.tick(time.delta_seconds_f64()) {
        warn!("skipping tick: {error}");
    }
}
