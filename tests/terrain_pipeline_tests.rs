use std::collections::HashSet;
use std::thread;
use std::time::{Duration, Instant};

use cgmath::Point3;
use voxel_terrain::engine_state::{
    task_management::TaskManager,
    voxels::{biome::BiomeSampler, zones::ZoneState},
};
use voxel_terrain::{
    BlockType, ChunkKey, CountingRenderer, Terrain, TerrainConfig, TerrainManager, ZoneKey,
};

/// Surface height of column (8, 8) for seed 42: a snow-capped mountain.
const ORIGIN_SURFACE_HEIGHT_SEED_42: i32 = 212;

fn config(seed: u32, generation_radius: i32) -> TerrainConfig {
    TerrainConfig {
        seed,
        generation_radius,
        worker_count: 3,
        ..TerrainConfig::default()
    }
}

fn settle(manager: &mut TerrainManager, observer: Point3<f32>) {
    let deadline = Instant::now() + Duration::from_secs(120);
    manager.tick(observer);
    while !manager.is_idle() {
        assert!(Instant::now() < deadline, "terrain did not settle");
        thread::sleep(Duration::from_millis(2));
        manager.tick(observer);
    }
}

#[test]
fn observer_at_origin_gets_a_filled_meshed_zone() {
    let seed = 42;
    let mut manager = TerrainManager::new(config(seed, 1));
    let observer = Point3::new(8.0, 200.0, 8.0);
    settle(&mut manager, observer);

    let origin = ZoneKey { x: 0, z: 0 };
    assert_eq!(manager.terrain().zone_state(origin), Some(ZoneState::Filled));
    for key in origin.chunk_keys() {
        let chunk = manager.terrain().chunk(key).expect("zone chunk exists");
        assert!(chunk.is_filled(), "{:?} not filled", key);
        assert!(chunk.is_meshed(), "{:?} not meshed", key);
    }

    let height = ORIGIN_SURFACE_HEIGHT_SEED_42;
    assert_eq!(BiomeSampler::new(seed).surface_height(8, 8), height);
    assert_eq!(manager.terrain().block_at(8, height - 1, 8), BlockType::SNOW);
    let above = manager.terrain().block_at(8, height + 5, 8);
    assert!(
        above == BlockType::EMPTY || above == BlockType::WATER,
        "found {:?} above the surface at height {}",
        above,
        height
    );
    assert_eq!(manager.terrain().block_at(8, 0, 8), BlockType::BEDROCK);

    let mut renderer = CountingRenderer::default();
    manager.draw(&mut renderer);
    assert!(renderer.opaque_draws >= 16, "the observer's zone is drawn");
    assert!(!renderer.out_of_order, "opaque pass precedes transparent pass");
}

#[test]
fn generation_is_deterministic_per_seed() {
    let observer = Point3::new(8.0, 200.0, 8.0);
    let mut first = TerrainManager::new(config(9, 0));
    let mut second = TerrainManager::new(config(9, 0));
    settle(&mut first, observer);
    settle(&mut second, observer);

    let mut rng = fastrand::Rng::with_seed(9);
    for _ in 0..500 {
        let (x, y, z) = (rng.i32(0..64), rng.i32(0..256), rng.i32(0..64));
        assert_eq!(
            first.terrain().block_at(x, y, z),
            second.terrain().block_at(x, y, z),
            "blocks differ at ({}, {}, {})",
            x,
            y,
            z
        );
    }
}

#[test]
fn concurrent_fills_of_disjoint_zones_all_land() {
    let mut terrain = Terrain::new(5);
    let mut tasks = TaskManager::new(4);
    let zones: Vec<ZoneKey> = (0..6).map(|i| ZoneKey { x: i * 64 * 3, z: -128 }).collect();

    for zone in &zones {
        let task = terrain.request_zone(*zone).expect("fresh zone");
        tasks.publish_task(Box::new(task));
    }

    let deadline = Instant::now() + Duration::from_secs(120);
    while !tasks.is_idle() {
        assert!(Instant::now() < deadline, "fills did not complete");
        tasks.process_completed_tasks(&mut terrain);
        tasks.process_queued_tasks();
        thread::sleep(Duration::from_millis(1));
    }

    let ready = terrain.take_ready_for_meshing();
    assert_eq!(ready.len(), 16 * zones.len());
    let expected: HashSet<ChunkKey> = zones.iter().flat_map(|z| z.chunk_keys()).collect();
    assert_eq!(ready, expected);
    assert!(zones
        .iter()
        .all(|z| terrain.zone_state(*z) == Some(ZoneState::Filled)));
}

#[test]
fn walking_away_retires_zones_without_dropping_blocks() {
    let mut manager = TerrainManager::new(config(3, 1));
    settle(&mut manager, Point3::new(8.0, 200.0, 8.0));
    let bedrock_before = manager.terrain().block_at(-60, 0, 5);
    assert_eq!(bedrock_before, BlockType::BEDROCK);

    settle(&mut manager, Point3::new(8.0 + 64.0 * 5.0, 200.0, 8.0));
    let stats = manager.stats();
    assert_eq!(stats.filled_zones, 9);
    assert_eq!(stats.retired_zones, 9);
    assert_eq!(manager.terrain().block_at(-60, 0, 5), BlockType::BEDROCK);
    assert!(!manager
        .terrain()
        .chunk(ChunkKey::containing(-60, 5))
        .expect("retired chunk is kept")
        .is_meshed());

    let mut renderer = CountingRenderer::default();
    manager.draw(&mut renderer);
    assert!(renderer.opaque_draws > 0);
}

#[test]
fn test_scene_meshes_without_workers() {
    let mut terrain = Terrain::new(0);
    terrain.create_test_scene().expect("scene fits in the origin zone");
    let ready = terrain.take_ready_for_meshing();
    assert_eq!(terrain.mesh_chunks_now(ready), 16);

    let mut renderer = CountingRenderer::default();
    terrain.draw(&mut renderer, Point3::new(32.0, 140.0, 32.0), 96);
    assert_eq!(renderer.opaque_draws, 16);
    assert_eq!(renderer.transparent_draws, 0);
    assert!(renderer.indices > 0);
}
