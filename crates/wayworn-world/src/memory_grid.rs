//! In-memory `GridAccess` implementation.
//!
//! A sparse block map with an explicit block-type registry, a settable world
//! clock and a deterministic random source. Used as the test fixture for the
//! trail system and as the world of the benchmark runner.

use std::collections::{HashMap, HashSet};

use glam::DVec3;
use wayworn_core::{
    column_of, BlockCode, BlockId, BlockMaterial, BlockPos, BreakCause, ClayKind, ColumnCoord,
    Fertility, GrassCover, GrassyMedium, GridAccess, TrailWear, WearState,
};

use crate::rng::{grid_hash, hash_to_unit};

const DEFAULT_MAP_HEIGHT: i32 = 256;

#[derive(Debug, Clone)]
struct BlockType {
    code: BlockCode,
    material: BlockMaterial,
    protectable: bool,
    /// Variant key -> index of the path part holding it.
    variant_parts: HashMap<String, usize>,
}

pub struct MemoryGrid {
    types: Vec<BlockType>,
    by_code: HashMap<BlockCode, BlockId>,
    blocks: HashMap<BlockPos, BlockId>,
    loaded: HashSet<ColumnCoord>,
    changed: HashSet<ColumnCoord>,
    players: Vec<DVec3>,
    dead_entities: HashSet<u64>,
    elapsed_days: f64,
    elapsed_millis: u64,
    seed: i32,
    random_seq: u32,
    random_override: Option<f64>,
    broken: Vec<(BlockPos, Option<BreakCause>)>,
}

impl Default for MemoryGrid {
    fn default() -> Self {
        Self::new(0)
    }
}

impl MemoryGrid {
    /// Empty grid with only air registered (id 0).
    pub fn new(seed: i32) -> Self {
        let mut grid = Self {
            types: Vec::new(),
            by_code: HashMap::new(),
            blocks: HashMap::new(),
            loaded: HashSet::new(),
            changed: HashSet::new(),
            players: Vec::new(),
            dead_entities: HashSet::new(),
            elapsed_days: 0.0,
            elapsed_millis: 0,
            seed,
            random_seq: 0,
            random_override: None,
            broken: Vec::new(),
        };
        grid.register("game:air", BlockMaterial::Other, false);
        grid
    }

    /// Grid with every wear-chain block, snow layers, tall grass and lake ice registered.
    pub fn with_wear_blocks(seed: i32) -> Self {
        let mut grid = Self::new(seed);
        grid.register_wear_blocks();
        grid
    }

    /// Register a block type. Registering a known code returns its existing id.
    pub fn register(&mut self, code: &str, material: BlockMaterial, protectable: bool) -> BlockId {
        let code = BlockCode::parse(code);
        if let Some(&id) = self.by_code.get(&code) {
            return id;
        }
        let id = BlockId(self.types.len() as u32);
        self.types.push(BlockType {
            code: code.clone(),
            material,
            protectable,
            variant_parts: HashMap::new(),
        });
        self.by_code.insert(code, id);
        id
    }

    /// Declare that path part `part` of the block type carries variant `key`.
    pub fn set_variant_part(&mut self, id: BlockId, key: &str, part: usize) {
        if let Some(block_type) = self.types.get_mut(id.0 as usize) {
            block_type.variant_parts.insert(key.to_string(), part);
        }
    }

    pub fn register_wear_blocks(&mut self) {
        let mut states = Vec::new();
        for fertility in Fertility::ALL {
            for cover in GrassCover::ALL {
                states.push(WearState::Soil { fertility, cover });
            }
            for wear in TrailWear::ALL {
                states.push(WearState::Trail { fertility, wear });
            }
        }
        for level in 0..8 {
            states.push(WearState::ForestFloor { level });
        }
        for medium in [
            GrassyMedium::Cob,
            GrassyMedium::Peat,
            GrassyMedium::Clay(ClayKind::Blue),
            GrassyMedium::Clay(ClayKind::Fire),
            GrassyMedium::Clay(ClayKind::Red),
        ] {
            for cover in GrassCover::ALL {
                states.push(WearState::Grassy { medium, cover });
            }
        }
        for state in states {
            self.register(&state.code().to_string(), BlockMaterial::Soil, true);
        }

        for height in 1..=7 {
            let id = self.register(&format!("game:snowlayer-{height}"), BlockMaterial::Snow, false);
            self.set_variant_part(id, "height", 1);
        }
        for cover in ["free", "snow"] {
            let id = self.register(&format!("game:tallgrass-tall-{cover}"), BlockMaterial::Plant, false);
            self.set_variant_part(id, "cover", 2);
        }
        self.register("game:lakeice", BlockMaterial::Ice, false);
        self.register("game:rock-granite", BlockMaterial::Other, false);
    }

    /// Id of a registered code. Unknown codes map to air.
    pub fn id_of(&self, code: &str) -> BlockId {
        self.by_code
            .get(&BlockCode::parse(code))
            .copied()
            .unwrap_or(BlockId::AIR)
    }

    /// Code of the block at `pos`, as a string (`game:air` when empty).
    pub fn code_at(&self, pos: BlockPos) -> String {
        self.block_code(self.block_at(pos))
            .map(|code| code.to_string())
            .unwrap_or_default()
    }

    /// Place a block, loading its column. Does not mark the column as changed.
    pub fn place(&mut self, pos: BlockPos, code: &str) -> BlockId {
        let id = self.id_of(code);
        self.loaded.insert(column_of(pos));
        self.blocks.insert(pos, id);
        id
    }

    pub fn load_column(&mut self, column: ColumnCoord) {
        self.loaded.insert(column);
    }

    pub fn unload_column(&mut self, column: ColumnCoord) {
        self.loaded.remove(&column);
    }

    pub fn set_elapsed_days(&mut self, days: f64) {
        self.elapsed_days = days;
    }

    pub fn advance_days(&mut self, days: f64) {
        self.elapsed_days += days;
    }

    pub fn advance_millis(&mut self, millis: u64) {
        self.elapsed_millis += millis;
    }

    pub fn add_player(&mut self, at: DVec3) {
        self.players.push(at);
    }

    pub fn clear_players(&mut self) {
        self.players.clear();
    }

    pub fn kill_entity(&mut self, entity_id: u64) {
        self.dead_entities.insert(entity_id);
    }

    /// Force `next_random` to a fixed value (`None` restores the hash source).
    pub fn set_random_override(&mut self, value: Option<f64>) {
        self.random_override = value;
    }

    /// Every `break_block` call so far, oldest first.
    pub fn broken(&self) -> &[(BlockPos, Option<BreakCause>)] {
        &self.broken
    }

    fn block_type(&self, id: BlockId) -> Option<&BlockType> {
        self.types.get(id.0 as usize)
    }
}

impl GridAccess for MemoryGrid {
    fn block_at(&self, pos: BlockPos) -> BlockId {
        if !self.loaded.contains(&column_of(pos)) {
            return BlockId::AIR;
        }
        self.blocks.get(&pos).copied().unwrap_or(BlockId::AIR)
    }

    fn set_block(&mut self, id: BlockId, pos: BlockPos) {
        let column = column_of(pos);
        self.loaded.insert(column);
        self.changed.insert(column);
        if id == BlockId::AIR {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, id);
        }
    }

    fn break_block(&mut self, pos: BlockPos, cause: Option<BreakCause>) {
        self.broken.push((pos, cause));
        self.set_block(BlockId::AIR, pos);
    }

    fn block_code(&self, id: BlockId) -> Option<&BlockCode> {
        self.block_type(id).map(|t| &t.code)
    }

    fn block_id(&self, code: &BlockCode) -> Option<BlockId> {
        self.by_code.get(code).copied()
    }

    fn block_variant(&self, id: BlockId, key: &str) -> Option<String> {
        let block_type = self.block_type(id)?;
        let part = *block_type.variant_parts.get(key)?;
        block_type.code.parts().nth(part).map(str::to_string)
    }

    fn block_with_variant(&self, id: BlockId, key: &str, value: &str) -> Option<BlockId> {
        let block_type = self.block_type(id)?;
        let part = *block_type.variant_parts.get(key)?;
        self.block_id(&block_type.code.with_part(part, value))
    }

    fn block_material(&self, id: BlockId) -> BlockMaterial {
        self.block_type(id)
            .map(|t| t.material)
            .unwrap_or(BlockMaterial::Other)
    }

    fn is_protectable(&self, id: BlockId) -> bool {
        self.block_type(id).is_some_and(|t| t.protectable)
    }

    fn loaded_columns(&self) -> Vec<ColumnCoord> {
        let mut columns: Vec<ColumnCoord> = self.loaded.iter().copied().collect();
        columns.sort_by_key(|c| (c.x, c.y));
        columns
    }

    fn changed_columns(&self) -> Vec<ColumnCoord> {
        let mut columns: Vec<ColumnCoord> = self.changed.iter().copied().collect();
        columns.sort_by_key(|c| (c.x, c.y));
        columns
    }

    fn ensure_column_loaded(&mut self, column: ColumnCoord) {
        self.loaded.insert(column);
    }

    fn map_height(&self) -> i32 {
        DEFAULT_MAP_HEIGHT
    }

    fn elapsed_days(&self) -> f64 {
        self.elapsed_days
    }

    fn elapsed_millis(&self) -> u64 {
        self.elapsed_millis
    }

    fn next_random(&mut self) -> f64 {
        if let Some(value) = self.random_override {
            return value;
        }
        self.random_seq = self.random_seq.wrapping_add(1);
        hash_to_unit(grid_hash(self.seed, 0, 0, self.random_seq))
    }

    fn nearest_player_distance_sq(&self, at: DVec3) -> Option<f64> {
        self.players
            .iter()
            .map(|p| p.distance_squared(at))
            .min_by(|a, b| a.total_cmp(b))
    }

    fn player_positions(&self) -> Vec<DVec3> {
        self.players.clone()
    }

    fn is_entity_alive(&self, entity_id: u64) -> bool {
        !self.dead_entities.contains(&entity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    #[test]
    fn test_unloaded_columns_read_as_air() {
        let mut grid = MemoryGrid::with_wear_blocks(1);
        let pos = IVec3::new(5, 60, 5);
        grid.place(pos, "game:soil-high-normal");
        assert_eq!(grid.code_at(pos), "game:soil-high-normal");

        grid.unload_column(column_of(pos));
        assert_eq!(grid.block_at(pos), BlockId::AIR);
    }

    #[test]
    fn test_variant_lookup_and_swap() {
        let grid = MemoryGrid::with_wear_blocks(1);
        let snow = grid.id_of("game:snowlayer-3");
        assert_eq!(grid.block_variant(snow, "height").as_deref(), Some("3"));
        let lower = grid.block_with_variant(snow, "height", "2").expect("registered");
        assert_eq!(lower, grid.id_of("game:snowlayer-2"));
        assert_eq!(grid.block_variant(snow, "cover"), None);
    }

    #[test]
    fn test_set_block_marks_changed() {
        let mut grid = MemoryGrid::with_wear_blocks(1);
        let pos = IVec3::new(-1, 60, 40);
        grid.place(pos, "game:soil-low-none");
        assert!(grid.changed_columns().is_empty());
        let id = grid.id_of("game:rock-granite");
        grid.set_block(id, pos);
        assert_eq!(grid.changed_columns(), vec![column_of(pos)]);
    }

    #[test]
    fn test_nearest_player() {
        let mut grid = MemoryGrid::new(0);
        assert_eq!(grid.nearest_player_distance_sq(DVec3::ZERO), None);
        grid.add_player(DVec3::new(3.0, 0.0, 4.0));
        grid.add_player(DVec3::new(100.0, 0.0, 0.0));
        assert_eq!(grid.nearest_player_distance_sq(DVec3::ZERO), Some(25.0));
    }

    #[test]
    fn test_random_is_deterministic_per_seed() {
        let mut a = MemoryGrid::new(9);
        let mut b = MemoryGrid::new(9);
        for _ in 0..10 {
            assert_eq!(a.next_random(), b.next_random());
        }
        a.set_random_override(Some(0.0));
        assert_eq!(a.next_random(), 0.0);
    }
}
