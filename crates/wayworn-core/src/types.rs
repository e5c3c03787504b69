use glam::{IVec2, IVec3};

use crate::constants::CHUNK_SIZE;

/// Numeric block identity as assigned by the host engine. 0 = air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    pub const AIR: BlockId = BlockId(0);
}

/// World coordinate in block space.
pub type BlockPos = IVec3;

/// Chunk column coordinate: `x` is the chunk x index, `y` holds the chunk z index.
pub type ColumnCoord = IVec2;

/// Chunk column containing a block position.
pub fn column_of(pos: BlockPos) -> ColumnCoord {
    IVec2::new(pos.x.div_euclid(CHUNK_SIZE), pos.z.div_euclid(CHUNK_SIZE))
}

/// World-space origin (minimum x/z corner) of a chunk column.
pub fn column_origin(column: ColumnCoord) -> (i32, i32) {
    (column.x * CHUNK_SIZE, column.y * CHUNK_SIZE)
}
