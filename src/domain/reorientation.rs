//! Reorientation controller.
//!
//! After a wall collision the robot stops, waits for a short settle delay, turns in place for a
//! random duration and finally resumes cruising. The waiting happens on a worker thread that only
//! emits [`Command`]s; the simulation applies them at tick boundaries and stays the sole owner of
//! the robot's state.

use std::{f64::consts::TAU, io, thread, time::Duration};

use crossbeam::channel::{self, Receiver, SendError, Sender};
use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::AngularVelocity;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    /// Settle delay elapsed, start turning in place.
    StartRotation,
    /// Rotation finished, or no rotation is possible.
    ResumeCruise,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReorientationConfig {
    pub turn_rate: AngularVelocity,
    pub settle_delay: Duration,
}

/// Handle to the worker thread running reorientation episodes.
///
/// The worker handles one episode at a time. Collisions reported while an episode is running are
/// dropped once it completes. Dropping the handle stops the worker after its current wait.
pub struct ReorientationController {
    triggers: Sender<()>,
    commands: Receiver<Command>,
}

impl ReorientationController {
    pub fn spawn(config: ReorientationConfig, rng: ChaCha8Rng) -> io::Result<Self> {
        let (trigger_send, trigger_recv) = channel::unbounded();
        let (command_send, command_recv) = channel::unbounded();

        thread::Builder::new()
            .name("reorientation".into())
            .spawn(move || run(config, rng, trigger_recv, command_send))?;

        Ok(Self {
            triggers: trigger_send,
            commands: command_recv,
        })
    }

    /// Starts an episode, or queues the trigger if one is running. Returns `false` if the worker
    /// is gone.
    pub fn notify_collision(&self) -> bool {
        self.triggers.send(()).is_ok()
    }

    pub fn try_command(&self) -> Option<Command> {
        self.commands.try_recv().ok()
    }
}

/// Time to turn for, uniform over one rotation period of `turn_rate`.
///
/// Returns `None` if the robot cannot turn at all.
pub fn sample_rotation_duration<R: Rng>(
    rng: &mut R,
    turn_rate: AngularVelocity,
) -> Option<Duration> {
    let period = TAU / f64::from(turn_rate).abs();
    // Zero, subnormal and non-finite rates leave no usable period.
    if !period.is_finite() || period == 0.0 {
        return None;
    }
    Some(Duration::try_from_secs_f64(rng.random_range(0.0..period)).unwrap_or(Duration::MAX))
}

fn run(
    config: ReorientationConfig,
    mut rng: ChaCha8Rng,
    triggers: Receiver<()>,
    commands: Sender<Command>,
) {
    while triggers.recv().is_ok() {
        if run_episode(&config, &mut rng, &triggers, &commands).is_err() {
            break;
        }
    }
    debug!("reorientation controller stopped");
}

fn run_episode(
    config: &ReorientationConfig,
    rng: &mut ChaCha8Rng,
    triggers: &Receiver<()>,
    commands: &Sender<Command>,
) -> Result<(), SendError<Command>> {
    if let Some(duration) = sample_rotation_duration(rng, config.turn_rate) {
        thread::sleep(config.settle_delay);
        commands.send(Command::StartRotation)?;

        debug!("rotating for {duration:?}");
        thread::sleep(duration);
    }

    // Drain before resuming: the next collision can only happen once the robot cruises again.
    let dropped = triggers.try_iter().count();
    if dropped > 0 {
        debug!("dropped {dropped} collision(s) reported during reorientation");
    }
    commands.send(Command::ResumeCruise)
}
