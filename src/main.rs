use bevy::prelude::*;
use bevy::window::WindowResolution;
use orbits::{config, menu, rendering, simulation};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Orbits".into(),
                resolution: WindowResolution::new(1200, 680),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.04, 0.04, 0.10)))
        // Compiled defaults; load_game_config overwrites them from
        // assets/orbits.toml (if present) before the session is built.
        .insert_resource(config::GameConfig::default())
        .add_systems(Startup, config::load_game_config)
        // MenuPlugin first so GameState is registered before anything
        // schedules against it.
        .add_plugins((
            menu::MenuPlugin,
            simulation::SimulationPlugin,
            rendering::RenderingPlugin,
        ))
        .run();
}
