use glam::{DVec3, IVec3};
use wayworn_core::constants::CHUNK_SIZE;
use wayworn_world::memory_grid::MemoryGrid;
use wayworn_world::rng::grid_hash;

/// Height of the soil floor every scene is built on.
pub const FLOOR_Y: i32 = 60;

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    /// Walking entities (one collision each per tick).
    pub entities: u32,
    /// Side length of the square soil floor, in chunk columns.
    pub columns: i32,
    /// Distance from the floor centre to the only player, in blocks.
    pub player_offset: f64,
    /// Share of floor positions covered by a snow layer, in percent.
    pub snow_percent: u32,
}

/// Return the standard suite of benchmark scenes.
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "stroll",
            entities: 16,
            columns: 2,
            player_offset: 0.0,
            snow_percent: 0,
        },
        SceneConfig {
            name: "herd-near",
            entities: 500,
            columns: 4,
            player_offset: 0.0,
            snow_percent: 0,
        },
        SceneConfig {
            name: "herd-far",
            entities: 500,
            columns: 4,
            player_offset: 120.0,
            snow_percent: 0,
        },
        SceneConfig {
            name: "snowfield",
            entities: 500,
            columns: 4,
            player_offset: 0.0,
            snow_percent: 60,
        },
        SceneConfig {
            name: "burst",
            entities: 5_000,
            columns: 8,
            player_offset: 40.0,
            snow_percent: 20,
        },
    ]
}

/// Side length of the scene floor in blocks.
pub fn floor_size(config: &SceneConfig) -> i32 {
    config.columns * CHUNK_SIZE
}

/// Build the scene's world: a soil floor with deterministic snow patches and one player.
pub fn build_grid(config: &SceneConfig, seed: i32) -> MemoryGrid {
    let mut grid = MemoryGrid::with_wear_blocks(seed);
    let size = floor_size(config);
    for x in 0..size {
        for z in 0..size {
            grid.place(IVec3::new(x, FLOOR_Y, z), "game:soil-medium-normal");
            if grid_hash(x, FLOOR_Y, z, seed as u32) % 100 < config.snow_percent {
                grid.place(IVec3::new(x, FLOOR_Y + 1, z), "game:snowlayer-3");
            }
        }
    }
    let centre = size as f64 / 2.0;
    grid.add_player(DVec3::new(
        centre + config.player_offset,
        FLOOR_Y as f64 + 1.0,
        centre,
    ));
    grid
}

/// Block under entity `entity` at tick `tick`: a deterministic random walk on the floor.
pub fn entity_block(config: &SceneConfig, entity: u32, tick: u32) -> IVec3 {
    let size = floor_size(config) as u32;
    let start_x = grid_hash(entity as i32, 0, 0, 1) % size;
    let start_z = grid_hash(entity as i32, 0, 0, 2) % size;
    let heading = grid_hash(entity as i32, 0, 0, 3) % 4;
    let (dx, dz) = match heading {
        0 => (1, 0),
        1 => (0, 1),
        2 => (size - 1, 0),
        _ => (0, size - 1),
    };
    // One block every four ticks.
    let step = tick / 4;
    let x = (start_x + dx * step) % size;
    let z = (start_z + dz * step) % size;
    IVec3::new(x as i32, FLOOR_Y, z as i32)
}
