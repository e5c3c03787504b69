//! The world facade the trail system runs against.
//!
//! The host engine implements `GridAccess` once; every operation has a single
//! canonical signature. Adapters report the revision they implement through
//! `api_version` so the trail system can refuse a mismatched host.

use glam::DVec3;

use crate::block::BlockCode;
use crate::types::{BlockId, BlockPos, ColumnCoord};

/// Revision of the `GridAccess` contract this crate is written against.
pub const GRID_API_VERSION: u32 = 1;

/// Physical material class of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockMaterial {
    Soil,
    Snow,
    Ice,
    Plant,
    Other,
}

/// Why a block was broken, forwarded to the host's drop/sound handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakCause {
    /// Cracked by an entity walking over it.
    Trampled,
    /// Destroyed by an explosion or similar area effect.
    AreaEffect,
}

pub trait GridAccess {
    fn api_version(&self) -> u32 {
        GRID_API_VERSION
    }

    /// Block currently at `pos` (air if the position is not loaded).
    fn block_at(&self, pos: BlockPos) -> BlockId;

    fn set_block(&mut self, id: BlockId, pos: BlockPos);

    /// Break the block at `pos`, leaving air.
    fn break_block(&mut self, pos: BlockPos, cause: Option<BreakCause>);

    fn block_code(&self, id: BlockId) -> Option<&BlockCode>;

    /// Resolve a code to its id. `None` when the content pack lacks the block.
    fn block_id(&self, code: &BlockCode) -> Option<BlockId>;

    /// Value of a named variant of a block type, e.g. `height` on snow layers.
    fn block_variant(&self, id: BlockId, key: &str) -> Option<String>;

    /// The same block type with one named variant replaced.
    fn block_with_variant(&self, id: BlockId, key: &str, value: &str) -> Option<BlockId>;

    fn block_material(&self, id: BlockId) -> BlockMaterial;

    /// Whether the block type carries the trample-protection capability.
    fn is_protectable(&self, id: BlockId) -> bool;

    fn loaded_columns(&self) -> Vec<ColumnCoord>;

    /// Columns the engine knows were modified since the world was created.
    fn changed_columns(&self) -> Vec<ColumnCoord> {
        Vec::new()
    }

    /// Make sure a column's blocks are readable (used by bulk scans).
    fn ensure_column_loaded(&mut self, _column: ColumnCoord) {}

    /// World height in blocks.
    fn map_height(&self) -> i32;

    /// World calendar time in (fractional) days.
    fn elapsed_days(&self) -> f64;

    /// Monotonic world time in milliseconds.
    fn elapsed_millis(&self) -> u64;

    /// Uniform random value in `[0, 1)`.
    fn next_random(&mut self) -> f64;

    /// Squared distance from `at` to the closest online player, if any.
    fn nearest_player_distance_sq(&self, at: DVec3) -> Option<f64>;

    /// World positions of online players.
    fn player_positions(&self) -> Vec<DVec3>;

    fn is_entity_alive(&self, entity_id: u64) -> bool;
}
