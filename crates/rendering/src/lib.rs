use bevy::prelude::*;

use terrain::config::MAX_LEVEL_OF_DETAIL;
use terrain::{sync_level_of_detail, DrawMode, LastStreamingReport, TerrainSettings};

pub mod camera;
pub mod terrain_render;

use terrain_render::ChunkActivity;

/// What the window shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Endless terrain streamed around the camera focus.
    #[default]
    Streaming,
    /// One map at the origin, drawn per the configured `DrawMode`.
    Preview,
}

#[derive(Default)]
pub struct RenderingPlugin {
    pub mode: ViewMode,
}

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ChunkActivity>()
            .init_resource::<LastStreamingReport>()
            .add_systems(Startup, (camera::setup_camera, setup_lighting))
            .add_systems(
                Update,
                (
                    camera::camera_travel_keys,
                    camera::camera_turn_drag,
                    camera::camera_zoom,
                    camera::apply_orbit_camera,
                )
                    .chain(),
            )
            .add_systems(Update, level_of_detail_keys);

        match self.mode {
            ViewMode::Streaming => {
                app.add_systems(Startup, terrain_render::setup_scene_streaming)
                    .add_systems(
                        Update,
                        (
                            camera::update_observer_from_camera,
                            sync_level_of_detail::<Entity>,
                            terrain_render::stream_scene_chunks,
                        )
                            .chain()
                            .after(camera::apply_orbit_camera)
                            .after(level_of_detail_keys),
                    );
            }
            ViewMode::Preview => {
                app.add_systems(
                    Update,
                    (draw_mode_keys, terrain_render::redraw_map_preview)
                        .chain()
                        .after(level_of_detail_keys),
                );
            }
        }
    }
}

fn setup_lighting(mut commands: Commands) {
    // Ambient light for baseline illumination
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.9, 0.9, 1.0),
        brightness: 300.0,
    });

    // Directional light (sun) angled from above
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_4, // 45 degrees down
            std::f32::consts::FRAC_PI_6,  // slight rotation
            0.0,
        )),
    ));
}

/// `[` / `]`: coarser / finer terrain meshes.
fn level_of_detail_keys(keys: Res<ButtonInput<KeyCode>>, mut settings: ResMut<TerrainSettings>) {
    let current = settings.clamped_level_of_detail();
    let next = if keys.just_pressed(KeyCode::BracketRight) {
        current.saturating_sub(1)
    } else if keys.just_pressed(KeyCode::BracketLeft) {
        (current + 1).min(MAX_LEVEL_OF_DETAIL)
    } else {
        return;
    };
    if next != settings.level_of_detail {
        info!("Level of detail {next}");
        settings.level_of_detail = next;
    }
}

/// Tab: cycle the preview draw mode.
fn draw_mode_keys(keys: Res<ButtonInput<KeyCode>>, mut settings: ResMut<TerrainSettings>) {
    if !keys.just_pressed(KeyCode::Tab) {
        return;
    }
    settings.draw_mode = match settings.draw_mode {
        DrawMode::NoiseMap => DrawMode::ColorMap,
        DrawMode::ColorMap => DrawMode::Mesh,
        DrawMode::Mesh => DrawMode::NoiseMap,
    };
}
