//! # TestTerrain — headless streaming harness
//!
//! Wraps `bevy::app::App` + `TerrainPlugin` + `HeadlessStreamingPlugin` so
//! streaming can be driven tick by tick without a window or renderer.

use bevy::app::App;
use bevy::prelude::*;

use crate::chunk::ChunkCoord;
use crate::headless::{HeadlessStreamingManager, HeadlessStreamingPlugin, HeadlessVisuals};
use crate::settings::TerrainSettings;
use crate::streaming::{LastStreamingReport, StreamingReport};
use crate::{ObserverPosition, TerrainPlugin};

pub struct TestTerrain {
    app: App,
}

impl Default for TestTerrain {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTerrain {
    /// Production settings: 241-cell maps, 430 view distance.
    pub fn new() -> Self {
        Self::with_settings(TerrainSettings::default())
    }

    /// Small 17-cell maps (16-unit chunks) with a 30-unit view distance.
    /// Same view radius as production, a fraction of the generation cost.
    pub fn small() -> Self {
        Self::with_settings(TerrainSettings {
            map_chunk_size: 17,
            max_view_distance: 30.0,
            ..TerrainSettings::default()
        })
    }

    pub fn with_settings(settings: TerrainSettings) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        // Settings go in BEFORE TerrainPlugin so the pipeline is built from them.
        app.insert_resource(settings);
        app.add_plugins((TerrainPlugin, HeadlessStreamingPlugin));

        // First update runs Startup (manager creation) and one streaming tick.
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    pub fn with_observer(mut self, position: Vec2) -> Self {
        self.set_observer(position);
        self
    }

    pub fn set_observer(&mut self, position: Vec2) {
        self.app.world_mut().resource_mut::<ObserverPosition>().0 = position;
    }

    /// Run one frame.
    pub fn tick(&mut self) -> StreamingReport {
        self.app.update();
        self.report()
    }

    pub fn tick_n(&mut self, n: usize) {
        for _ in 0..n {
            self.app.update();
        }
    }

    /// Move the observer and run one frame.
    pub fn move_to(&mut self, position: Vec2) -> StreamingReport {
        self.set_observer(position);
        self.tick()
    }

    pub fn set_level_of_detail(&mut self, level_of_detail: u32) {
        self.app
            .world_mut()
            .resource_mut::<TerrainSettings>()
            .level_of_detail = level_of_detail;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn report(&self) -> StreamingReport {
        self.app.world().resource::<LastStreamingReport>().0
    }

    pub fn manager(&self) -> &HeadlessStreamingManager {
        self.app.world().resource::<HeadlessStreamingManager>()
    }

    pub fn visuals(&self) -> &HeadlessVisuals {
        self.app.world().resource::<HeadlessVisuals>()
    }

    pub fn chunk_count(&self) -> usize {
        self.manager().chunk_count()
    }

    pub fn visible_count(&self) -> usize {
        self.manager().visible_chunks().len()
    }

    pub fn is_visible(&self, coord: ChunkCoord) -> bool {
        self.manager()
            .chunk(coord)
            .is_some_and(|chunk| chunk.is_visible(self.visuals()))
    }

    pub fn is_generated(&self, coord: ChunkCoord) -> bool {
        self.manager()
            .chunk(coord)
            .is_some_and(|chunk| chunk.mesh().is_some())
    }

    pub fn app(&mut self) -> &mut App {
        &mut self.app
    }
}
