//! 2D visualization.
//!
//! Arena coordinates have their origin in the top-left corner with the y-axis pointing down. Bevy's
//! world coordinates are centered on the window with the y-axis pointing up.

use bevy::{prelude::*, window::close_on_esc};

use crate::{
    domain::{Angle, Arena, Position},
    resource::SimulationRes,
};

const ARENA_COLOR: Color = Color::GRAY;
const ROBOT_COLOR: Color = Color::BLUE;
const ARROW_COLOR: Color = Color::rgb(1.0, 0.0, 50.0 / 255.0);
const TEXT_COLOR: Color = Color::BLACK;

pub struct Visualizer;

impl Plugin for Visualizer {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::WHITE))
            .init_resource::<Scene>()
            .add_systems(Startup, set_up)
            .add_systems(
                Update,
                (
                    close_on_esc,
                    handle_keyboard_input,
                    (draw_arena, draw_robot, update_text),
                ),
            );
    }
}

#[derive(Resource, Default)]
struct Scene {
    show_text: bool,
}

fn set_up(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
    commands.spawn(
        TextBundle::from_section(
            "",
            TextStyle {
                font_size: 16.0,
                color: TEXT_COLOR,
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        }),
    );
}

fn draw_arena(mut gizmos: Gizmos, simulation: Res<SimulationRes>) {
    let arena = simulation.arena();
    let corners = arena.corners();
    gizmos.linestrip_2d(
        corners
            .iter()
            .chain(corners.first())
            .map(|corner| to_bevy_position(arena, *corner)),
        ARENA_COLOR,
    );
}

fn draw_robot(mut gizmos: Gizmos, simulation: Res<SimulationRes>) {
    let arena = simulation.arena();
    let state = simulation.state();

    gizmos.circle_2d(
        to_bevy_position(arena, state.position()),
        state.radius() as f32,
        ROBOT_COLOR,
    );

    let outline = state.outline().vertices().collect::<Vec<_>>();
    gizmos.linestrip_2d(
        outline
            .iter()
            .chain(outline.first())
            .map(|vertex| to_bevy_position(arena, *vertex)),
        ARROW_COLOR,
    );
}

fn update_text(mut text: Query<&mut Text>, scene: Res<Scene>, simulation: Res<SimulationRes>) {
    let mut text = text.single_mut();
    if scene.show_text {
        let pose = simulation.pose();
        let motion = simulation.state().motion();
        text.sections[0].value = format!(
            "POS: {:5.1} {:5.1}   HDG: {:3.0} deg   VEL: {:5.1} px/s {:4.2} rad/s   {:?}   COL: {}",
            pose.x,
            pose.y,
            Angle::new(pose.heading).to_deg(),
            f64::from(motion.linear()),
            f64::from(motion.angular()),
            simulation.phase(),
            simulation.collisions(),
        );
    } else {
        text.sections[0].value = String::new();
    }
}

fn handle_keyboard_input(keys: Res<ButtonInput<KeyCode>>, mut scene: ResMut<Scene>) {
    if keys.just_pressed(KeyCode::KeyT) {
        scene.show_text = !scene.show_text;
    }
}

fn to_bevy_position(arena: &Arena, position: Position) -> Vec2 {
    Vec2::new(
        (position.x() - arena.width() / 2.0) as f32,
        (arena.height() / 2.0 - position.y()) as f32,
    )
}
