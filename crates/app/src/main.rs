use bevy::prelude::*;
use bevy::window::PresentMode;

use rendering::{RenderingPlugin, ViewMode};
use terrain::settings::PREVIEW_ENV_VAR;
use terrain::{TerrainPlugin, TerrainSettings};

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Endless Terrain".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }));

    // Settings must exist before TerrainPlugin builds the generation pipeline.
    app.insert_resource(TerrainSettings::from_env());

    let mode = if std::env::var(PREVIEW_ENV_VAR).is_ok() {
        ViewMode::Preview
    } else {
        ViewMode::Streaming
    };
    app.add_plugins((TerrainPlugin, RenderingPlugin { mode }));

    app.run();
}
