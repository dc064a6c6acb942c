//! Simulation of a single robot bouncing around a rectangular arena.
//!
//! The simulation owns the robot's [`KinematicState`]. Each tick it applies pending commands of the
//! reorientation controller, advances the state with the motion resolver and hands wall collisions
//! back to the controller.

use std::time::Duration;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use super::{
    motion::{self, CollisionEvent},
    reorientation::{Command, ReorientationConfig, ReorientationController},
    AngularVelocity, Arena, KinematicState, Motion, Position, Velocity,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Moving straight ahead.
    Cruising,
    /// Stopped after a collision, waiting to start turning.
    Settling,
    /// Turning in place.
    Reorienting,
}

/// Pose handed to the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RobotPose {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub cruise_speed: Velocity,
    pub turn_rate: AngularVelocity,
    pub settle_delay: Duration,
    /// Start position, the arena's center if `None`.
    pub start: Option<Position>,
    /// Seed for the rotation durations, drawn from entropy if `None`.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn new(width: f64, height: f64, cruise_speed: f64, turn_rate: f64) -> Self {
        Self {
            width,
            height,
            cruise_speed: Velocity::new(cruise_speed),
            turn_rate: AngularVelocity::new(turn_rate),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        let (width, height, radius) = (self.width, self.height, self.radius);

        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(SimulationError::InvalidDimension { width, height });
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "radius",
                value: radius,
            });
        }
        let arena = Arena::new(width, height);
        if !arena.has_interior(radius) {
            return Err(SimulationError::DegenerateArena {
                width,
                height,
                radius,
            });
        }
        for (name, value) in [
            ("cruise speed", f64::from(self.cruise_speed)),
            ("turn rate", f64::from(self.turn_rate)),
        ] {
            if !value.is_finite() {
                return Err(SimulationError::InvalidParameter { name, value });
            }
        }
        if let Some(start) = self.start {
            if !start.is_finite() || !arena.contains(start, radius) {
                return Err(SimulationError::OutsideArena {
                    x: start.x(),
                    y: start.y(),
                });
            }
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            radius: 20.0,
            cruise_speed: Velocity::new(40.0),
            turn_rate: AngularVelocity::new(0.5),
            settle_delay: Duration::from_millis(100),
            start: None,
            seed: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("arena must have a finite positive size, got {width}x{height}")]
    InvalidDimension { width: f64, height: f64 },
    #[error("radius {radius} leaves no room inside a {width}x{height} arena")]
    DegenerateArena { width: f64, height: f64, radius: f64 },
    #[error("invalid {name} {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("start position ({x}, {y}) is outside the arena")]
    OutsideArena { x: f64, y: f64 },
    #[error("tick duration must be positive and finite, got {0} s")]
    InvalidTick(f64),
    #[error("failed to spawn reorientation controller")]
    Spawn(#[from] std::io::Error),
}

pub struct Simulation {
    arena: Arena,
    state: KinematicState,
    phase: Phase,
    cruising: Motion,
    rotating: Motion,
    controller: ReorientationController,
    collisions: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let arena = Arena::new(config.width, config.height);
        let start = config.start.unwrap_or_else(|| arena.center());
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        let controller = ReorientationController::spawn(
            ReorientationConfig {
                turn_rate: config.turn_rate,
                settle_delay: config.settle_delay,
            },
            rng,
        )?;
        let cruising = Motion::cruising(config.cruise_speed);

        info!(
            "robot starts at ({:.1}, {:.1}) in a {}x{} arena",
            start.x(),
            start.y(),
            config.width,
            config.height
        );

        Ok(Self {
            arena,
            state: KinematicState::new(start, config.radius).with_motion(cruising),
            phase: Phase::Cruising,
            cruising,
            rotating: Motion::rotating(config.turn_rate),
            controller,
            collisions: 0,
        })
    }

    /// Advances the simulation by `elapsed_seconds` and returns the new pose.
    pub fn tick(&mut self, elapsed_seconds: f64) -> Result<RobotPose, SimulationError> {
        if elapsed_seconds.is_nan() || elapsed_seconds <= 0.0 {
            return Err(SimulationError::InvalidTick(elapsed_seconds));
        }
        let dt = Duration::try_from_secs_f64(elapsed_seconds)
            .map_err(|_| SimulationError::InvalidTick(elapsed_seconds))?;

        self.apply_commands();

        let step = motion::advance(&self.state, &self.arena, dt);
        self.state = step.state;
        if let Some(collision) = step.collision {
            self.handle_collision(collision);
        }

        Ok(self.pose())
    }

    pub fn pose(&self) -> RobotPose {
        RobotPose {
            x: self.state.position().x(),
            y: self.state.position().y(),
            heading: self.state.heading().radians(),
        }
    }

    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    fn apply_commands(&mut self) {
        while let Some(command) = self.controller.try_command() {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: Command) {
        let (phase, motion) = match (self.phase, command) {
            (Phase::Settling, Command::StartRotation) => (Phase::Reorienting, self.rotating),
            (Phase::Settling | Phase::Reorienting, Command::ResumeCruise) => {
                (Phase::Cruising, self.cruising)
            }
            (phase, command) => {
                warn!("ignoring {command:?} while {phase:?}");
                return;
            }
        };
        debug!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.state.set_motion(motion);
    }

    fn handle_collision(&mut self, collision: CollisionEvent) {
        // Only one episode at a time; the robot cannot reach a wall while halted anyway.
        if self.phase != Phase::Cruising {
            return;
        }
        self.collisions += 1;
        debug!(
            "collision #{} on {:?} axis at ({:.1}, {:.1}) after moving ({:.2}, {:.2})",
            self.collisions,
            collision.axis,
            self.state.position().x(),
            self.state.position().y(),
            collision.displacement.x(),
            collision.displacement.y()
        );

        self.phase = Phase::Settling;
        self.state.set_motion(Motion::HALTED);
        if !self.controller.notify_collision() {
            warn!("reorientation controller is gone, robot stays halted");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        f64::consts::TAU,
        thread,
        time::{Duration, Instant},
    };

    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn config() -> SimulationConfig {
        SimulationConfig {
            seed: Some(5),
            ..Default::default()
        }
    }

    /// Robot half a unit in front of the right wall, fast enough to reach it in one tick.
    fn at_right_wall(turn_rate: f64) -> Simulation {
        Simulation::new(SimulationConfig {
            cruise_speed: Velocity::new(100.0),
            turn_rate: AngularVelocity::new(turn_rate),
            settle_delay: Duration::from_millis(1),
            start: Some(Position::new(640.0 - 20.0 - 0.5, 240.0)),
            ..config()
        })
        .unwrap()
    }

    /// Applies controller commands until the robot cruises again.
    fn wait_for_cruising(simulation: &mut Simulation) {
        let start = Instant::now();
        while simulation.phase() != Phase::Cruising {
            assert!(start.elapsed() < TIMEOUT, "reorientation did not finish");
            thread::sleep(Duration::from_millis(1));
            simulation.apply_commands();
            assert_exclusive(simulation);
        }
    }

    fn assert_exclusive(simulation: &Simulation) {
        let motion = simulation.state().motion();
        let expected = match simulation.phase() {
            Phase::Cruising => simulation.cruising,
            Phase::Settling => Motion::HALTED,
            Phase::Reorienting => simulation.rotating,
        };
        assert_eq!(motion, expected);
        assert!(f64::from(motion.linear()) == 0.0 || f64::from(motion.angular()) == 0.0);
    }

    #[test]
    fn test_simulation_new() {
        let simulation = Simulation::new(config()).unwrap();
        assert_eq!(simulation.phase(), Phase::Cruising);
        assert_eq!(simulation.collisions(), 0);
        assert_eq!(
            simulation.pose(),
            RobotPose {
                x: 320.0,
                y: 240.0,
                heading: 0.0
            }
        );
        assert_eq!(
            simulation.state().motion(),
            Motion::cruising(Velocity::new(40.0))
        );
    }

    #[test]
    fn test_config_new_keeps_defaults() {
        let config = SimulationConfig::new(800.0, 600.0, 10.0, 1.5);
        assert_eq!(
            config,
            SimulationConfig {
                width: 800.0,
                height: 600.0,
                cruise_speed: Velocity::new(10.0),
                turn_rate: AngularVelocity::new(1.5),
                ..Default::default()
            }
        );
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case::zero_width(SimulationConfig { width: 0.0, ..config() })]
    #[case::infinite_height(SimulationConfig { height: f64::INFINITY, ..config() })]
    #[case::negative_radius(SimulationConfig { radius: -1.0, ..config() })]
    #[case::radius_too_large(SimulationConfig { radius: 240.0, ..config() })]
    #[case::nan_speed(SimulationConfig { cruise_speed: Velocity::new(f64::NAN), ..config() })]
    #[case::infinite_turn_rate(SimulationConfig { turn_rate: AngularVelocity::new(f64::INFINITY), ..config() })]
    #[case::start_in_wall(SimulationConfig { start: Some(Position::new(10.0, 240.0)), ..config() })]
    #[case::start_outside(SimulationConfig { start: Some(Position::new(320.0, 500.0)), ..config() })]
    fn test_simulation_new_rejects_invalid_config(#[case] config: SimulationConfig) {
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_simulation_error_messages() {
        let error = SimulationConfig {
            radius: 240.0,
            ..config()
        }
        .validate()
        .unwrap_err();
        insta::assert_snapshot!(error.to_string(), @"radius 240 leaves no room inside a 640x480 arena");

        let error = SimulationConfig {
            start: Some(Position::new(10.0, 240.0)),
            ..config()
        }
        .validate()
        .unwrap_err();
        insta::assert_snapshot!(error.to_string(), @"start position (10, 240) is outside the arena");

        let error = Simulation::new(config()).unwrap().tick(0.0).unwrap_err();
        insta::assert_snapshot!(error.to_string(), @"tick duration must be positive and finite, got 0 s");
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.016)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_tick_rejects_invalid_duration(#[case] elapsed_seconds: f64) {
        let mut simulation = Simulation::new(config()).unwrap();
        assert!(matches!(
            simulation.tick(elapsed_seconds),
            Err(SimulationError::InvalidTick(_))
        ));
        assert_eq!(simulation.pose().x, 320.0);
    }

    #[test]
    fn test_tick_moves_along_heading() {
        let mut simulation = Simulation::new(config()).unwrap();
        let pose = simulation.tick(0.5).unwrap();
        assert_abs_diff_eq!(pose.x, 340.0);
        assert_abs_diff_eq!(pose.y, 240.0);
        assert_abs_diff_eq!(pose.heading, 0.0);
        assert_eq!(simulation.phase(), Phase::Cruising);
    }

    #[test]
    fn test_collision_halts_robot() {
        let mut simulation = at_right_wall(0.5);
        let pose = simulation.tick(0.1).unwrap();

        assert_abs_diff_eq!(pose.x, 620.0, epsilon = 1e-9);
        assert_eq!(simulation.phase(), Phase::Settling);
        assert_eq!(simulation.state().motion(), Motion::HALTED);
        assert_eq!(simulation.collisions(), 1);

        let pose = simulation.tick(0.1).unwrap();
        assert_abs_diff_eq!(pose.x, 620.0, epsilon = 1e-9);
        assert_eq!(simulation.collisions(), 1);
    }

    #[test]
    fn test_reorientation_returns_to_cruising() {
        let mut simulation = at_right_wall(TAU * 100.0);
        simulation.tick(0.1).unwrap();
        assert_eq!(simulation.phase(), Phase::Settling);

        wait_for_cruising(&mut simulation);

        let motion = simulation.state().motion();
        assert_eq!(motion, Motion::cruising(Velocity::new(100.0)));
        assert_eq!(f64::from(motion.angular()), 0.0);
    }

    #[test]
    fn test_reorientation_without_turn_rate() {
        let mut simulation = at_right_wall(0.0);
        simulation.tick(0.1).unwrap();
        assert_eq!(simulation.phase(), Phase::Settling);

        wait_for_cruising(&mut simulation);

        assert_eq!(simulation.state().heading().radians(), 0.0);
        assert_eq!(
            simulation.state().motion(),
            Motion::cruising(Velocity::new(100.0))
        );
    }

    #[test]
    fn test_ticks_observe_consistent_motion() {
        let mut simulation = Simulation::new(SimulationConfig {
            width: 200.0,
            height: 150.0,
            cruise_speed: Velocity::new(300.0),
            turn_rate: AngularVelocity::new(TAU * 20.0),
            settle_delay: Duration::from_millis(2),
            ..config()
        })
        .unwrap();

        for _ in 0..1_500 {
            simulation.tick(1.0 / 60.0).unwrap();
            assert_exclusive(&simulation);
            assert!(simulation
                .arena()
                .contains(simulation.state().position(), 20.0 - 1e-9));
            thread::sleep(Duration::from_micros(500));
        }

        assert!(simulation.collisions() > 0);
    }
}
