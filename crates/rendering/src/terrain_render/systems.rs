use std::sync::Arc;

use bevy::prelude::*;

use terrain::{LastStreamingReport, ObserverPosition, TerrainPipeline, TerrainSettings};

use super::types::SceneStreamingManager;
use super::visuals::SceneVisuals;

pub fn setup_scene_streaming(
    mut commands: Commands,
    settings: Res<TerrainSettings>,
    pipeline: Res<TerrainPipeline>,
) {
    let manager = SceneStreamingManager::from_settings(Arc::clone(&pipeline.0), &settings);
    info!(
        "Streaming terrain: chunk size {}, view radius {} chunks",
        manager.chunk_size(),
        manager.view_radius()
    );
    commands.insert_resource(manager);
}

pub fn stream_scene_chunks(
    observer: Res<ObserverPosition>,
    manager: Option<ResMut<SceneStreamingManager>>,
    mut visuals: SceneVisuals,
    mut last_report: ResMut<LastStreamingReport>,
) {
    let Some(mut manager) = manager else {
        return;
    };
    last_report.0 = manager.update(observer.0, &mut visuals);
}
