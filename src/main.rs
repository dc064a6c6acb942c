use bevy::{log::LogPlugin, prelude::*};

mod domain;
mod resource;
mod simulator;
mod visualizer;

use domain::SimulationError;
use resource::SimulationRes;

fn main() -> Result<(), SimulationError> {
    let simulation = simulator::create_simulation()?;
    let arena = *simulation.arena();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Brownian Motion".into(),
                        resolution: (arena.width() as f32, arena.height() as f32).into(),
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: "wgpu=error,naga=warn,brownian_robot=debug".into(),
                    ..default()
                }),
        )
        .add_plugins(simulator::Simulator)
        .add_plugins(visualizer::Visualizer)
        .insert_resource(SimulationRes::from(simulation))
        .run();

    Ok(())
}
