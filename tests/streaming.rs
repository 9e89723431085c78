use voxel_stream::{
    BlockType, ChunkCoordinate, ChunkError, ChunkState, ChunkStore, HostMeshAllocator, MeshBuilder,
    NoiseField, StreamerConfig, TerrainSettings, WorldStreamer, CHUNK_HEIGHT, CHUNK_SIZE,
    MAX_CHUNK, MAX_VIEW_DISTANCE, MIN_CHUNK,
};

fn streamer(view_distance: u32, build_budget: usize) -> WorldStreamer<HostMeshAllocator> {
    let config = StreamerConfig {
        view_distance,
        build_budget,
        ..StreamerConfig::default()
    };
    WorldStreamer::with_noise(
        config,
        HostMeshAllocator::new(),
        NoiseField::with_offsets(0.0, 0.0),
    )
}

fn assert_meshes_visible(streamer: &WorldStreamer<HostMeshAllocator>) {
    for (coordinate, _) in streamer.scheduler().mesh_handles() {
        assert!(
            streamer.visibility().contains(coordinate),
            "mesh outside the visibility set at {coordinate}"
        );
    }
}

#[test]
fn visible_square_fills_in_over_budgeted_updates() {
    let mut streamer = streamer(2, 5);

    let mut built = 0;
    for _ in 0..5 {
        let report = streamer.update_viewer(0.5, 0.5).unwrap();
        assert!(report.built <= 5);
        built += report.built;
        assert_meshes_visible(&streamer);
    }

    assert_eq!(built, 25);
    let stats = streamer.stats();
    assert_eq!(stats.visible_chunks, 25);
    assert_eq!(stats.pending_chunks, 0);
    assert_eq!(stats.resident_meshes, 25);
    assert_eq!(streamer.draw_list().count(), 25);
    assert_eq!(
        stats.resident_vertices,
        streamer.scheduler().allocator().resident_vertices()
    );
}

#[test]
fn walking_viewer_never_draws_stale_chunks() {
    let mut streamer = streamer(2, 3);

    for frame in 0..80 {
        let x = frame as f32 * 5.0;
        let z = -(frame as f32) * 2.0;
        streamer.update_viewer(x, z).unwrap();

        assert_meshes_visible(&streamer);
        for (coordinate, handle) in streamer.draw_list() {
            assert_eq!(streamer.chunk_state(coordinate), ChunkState::Ready);
            assert!(handle.vertex_count() > 0);
            assert_eq!(handle.vertex_count() % 6, 0);
        }

        // Grids never pile up behind the viewer.
        assert!(streamer.stats().resident_grids <= 7 * 7);
    }
}

#[test]
fn drawn_meshes_match_a_fresh_build() {
    let mut streamer = streamer(1, 9);
    streamer.update_viewer(-20.0, 37.0).unwrap();

    let mut reference = ChunkStore::new(
        NoiseField::with_offsets(0.0, 0.0),
        TerrainSettings::default(),
    );
    for (coordinate, handle) in streamer.draw_list() {
        let expected = MeshBuilder::build(coordinate, &mut reference);
        let buffer = handle.buffer().unwrap();
        assert_eq!(buffer.coordinate(), coordinate);
        assert_eq!(buffer.vertices(), expected.as_slice());
    }
}

#[test]
fn reseed_and_settings_force_a_full_rebuild() {
    let mut streamer = streamer(1, 9);
    streamer.update_viewer(0.0, 0.0).unwrap();
    assert_eq!(streamer.stats().resident_meshes, 9);

    streamer.reseed_with_offsets(512.25, -77.5);
    assert_eq!(streamer.stats().resident_meshes, 0);
    assert_eq!(streamer.stats().resident_grids, 0);
    assert_eq!(streamer.scheduler().allocator().live_buffers(), 0);
    assert_eq!(streamer.update().unwrap().built, 9);

    streamer.set_settings(TerrainSettings {
        height_curve: 0.6,
        ..TerrainSettings::default()
    });
    assert_eq!(
        streamer.chunk_state(ChunkCoordinate::new(0, 0)),
        ChunkState::PendingBuild
    );
    assert_eq!(streamer.update().unwrap().built, 9);
}

#[test]
fn allocation_failure_is_reported_and_retried() {
    let config = StreamerConfig {
        view_distance: 1,
        build_budget: 9,
        ..StreamerConfig::default()
    };
    let mut streamer = WorldStreamer::with_noise(
        config,
        HostMeshAllocator::with_vertex_budget(0),
        NoiseField::with_offsets(0.0, 0.0),
    );

    let error = streamer.update_viewer(0.0, 0.0).unwrap_err();
    assert!(error.is_recoverable());
    assert!(matches!(error, ChunkError::ResourceExhausted { .. }));
    assert_eq!(streamer.stats().pending_chunks, 9);
    assert_eq!(streamer.draw_list().count(), 0);

    streamer.allocator_mut().set_vertex_budget(None);
    assert_eq!(streamer.update().unwrap().built, 9);
    assert_eq!(streamer.stats().pending_chunks, 0);
}

#[test]
fn view_distance_change_shrinks_the_draw_list() {
    let mut streamer = streamer(2, 25);
    streamer.update_viewer(0.0, 0.0).unwrap();
    assert_eq!(streamer.draw_list().count(), 25);

    streamer.set_view_distance(1);
    // The draw list follows the new visibility immediately; eviction on the next update.
    assert_eq!(streamer.draw_list().count(), 9);
    let report = streamer.update().unwrap();
    assert_eq!(report.evicted, 16);
    assert_eq!(streamer.stats().resident_meshes, 9);
}

#[test]
fn store_queries_cross_chunk_boundaries() {
    let mut store = ChunkStore::new(
        NoiseField::with_offsets(0.0, 0.0),
        TerrainSettings::default(),
    );

    assert_eq!(store.block_at(-1, CHUNK_HEIGHT, -1, true), BlockType::AIR);
    assert_eq!(store.block_at(-1, 0, -1, true), BlockType::STONE);
    assert!(store.contains(ChunkCoordinate::new(-1, -1)));

    let grid = store.get(ChunkCoordinate::new(-1, -1));
    assert_eq!(
        store.block_at(-CHUNK_SIZE, 5, -1, false),
        grid.get(0, 5, CHUNK_SIZE - 1).unwrap()
    );
}

#[test]
fn far_away_viewer_streams_the_world_edge() {
    let mut streamer = streamer(1, 9);

    let report = streamer.update_viewer(1.0e11, 0.0).unwrap();
    assert_eq!(streamer.visibility().center(), ChunkCoordinate::new(MAX_CHUNK, 0));
    assert_eq!(report.built, 6);
    assert_meshes_visible(&streamer);
    for (coordinate, _) in streamer.draw_list() {
        assert!(coordinate.x <= MAX_CHUNK);
    }

    let report = streamer.update_viewer(-1.0e11, f32::MAX).unwrap();
    assert_eq!(
        streamer.visibility().center(),
        ChunkCoordinate::new(MIN_CHUNK, MAX_CHUNK)
    );
    assert_eq!(report.built, 4);
    assert_eq!(report.evicted, 6);
    assert_meshes_visible(&streamer);
}

#[test]
fn oversized_view_distance_is_clamped() {
    let config = StreamerConfig {
        view_distance: u32::MAX,
        ..StreamerConfig::default()
    };
    let mut streamer =
        WorldStreamer::with_noise(config, HostMeshAllocator::new(), NoiseField::with_offsets(0.0, 0.0));
    assert_eq!(streamer.view_distance(), MAX_VIEW_DISTANCE);

    streamer.set_view_distance(u32::MAX);
    assert_eq!(streamer.view_distance(), MAX_VIEW_DISTANCE);
    streamer.set_build_budget(1);

    let report = streamer.update_viewer(0.0, 0.0).unwrap();
    let side = 2 * MAX_VIEW_DISTANCE as usize + 1;
    assert_eq!(streamer.stats().visible_chunks, side * side);
    assert_eq!(report.built, 1);
}
