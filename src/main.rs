use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use glam::{IVec3, Vec3};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

use voxelite::atlas::TextureAtlas;
use voxelite::config::EngineConfig;
use voxelite::render::mesh::BufferStore;
use voxelite::world::{BlockId, BlockRegistry, World};

const FRAMES: u32 = 600;
const FRAME_DT: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Info).init()?;

    let config = EngineConfig::load_or_default(Path::new("voxelite.toml"))
        .context("loading configuration")?;

    let atlas = TextureAtlas::with_default_tiles();
    let registry =
        BlockRegistry::build(&atlas).context("building block registry")?;
    info!("block registry ready, atlas holds {} tiles", atlas.tile_count());

    let mut world = World::new(&config, registry);
    let mut sink = BufferStore::new();

    // Drift the viewpoint across the terrain to exercise streaming,
    // remeshing and eviction.
    let start = Instant::now();
    let mut viewpoint = Vec3::new(8.0, 70.0, 8.0);
    for frame in 0..FRAMES {
        viewpoint.x += 0.9;
        viewpoint.z += 0.35;
        world.update(&mut sink, viewpoint, FRAME_DT);

        if frame % 120 == 0 {
            info!(
                "frame {:3}: {} chunks resident, {} remeshes pending, {} indices uploaded, time of day {:.2}",
                frame,
                world.chunk_count(),
                world.pending_remeshes(),
                sink.total_indices(),
                world.sky().time_of_day()
            );
        }
    }

    // Pick the ground below the viewpoint and knock a block out of it.
    if let Some(hit) = world.raycast(viewpoint, Vec3::NEG_Y, 96.0) {
        info!(
            "looking at {:?} block at ({}, {}, {})",
            hit.id, hit.block.x, hit.block.y, hit.block.z
        );
        world.remove_block(hit.block);
        world.place_block(hit.block + IVec3::new(0, 1, 0), BlockId::Glass);
        world.update(&mut sink, viewpoint, FRAME_DT);
    }

    info!(
        "ran {} frames in {:.2?}: {} chunks, {} total indices",
        FRAMES,
        start.elapsed(),
        world.chunk_count(),
        sink.total_indices()
    );
    Ok(())
}
