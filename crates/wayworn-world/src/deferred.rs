//! Bounded, time-throttled work queues.
//!
//! Collision handling only enqueues; the queues are drained on an interval in
//! small batches. Every item carries the block id seen at enqueue time and is
//! dropped at drain if the block has changed since.

use std::collections::VecDeque;

use glam::IVec3;
use wayworn_core::constants::{LAKE_ICE_BLOCK, VANILLA_DOMAIN};
use wayworn_core::{BlockId, BlockMaterial, BlockPos, BreakCause, GridAccess, TrailConfig};

/// A trail touch postponed because no player was close by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeferredTouch {
    pub pos: BlockPos,
    pub block_id: BlockId,
    pub entity_id: u64,
    pub enqueued_ms: u64,
}

/// A snow or ice block an entity walked over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowIceItem {
    pub pos: BlockPos,
    pub block_id: BlockId,
    pub material: BlockMaterial,
}

/// What one snow/ice drain did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SnowIceStats {
    pub processed: usize,
    pub stale: usize,
    pub snow_changed: usize,
    pub ice_broken: usize,
}

const HORIZONTALS: [IVec3; 4] = [
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 0, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(0, 0, -1),
];

pub struct DeferredQueues {
    touches: VecDeque<DeferredTouch>,
    snow_ice: VecDeque<SnowIceItem>,
    last_drain_ms: Option<u64>,
    interval_ms: u64,
    touch_batch: usize,
    snow_ice_batch: usize,
    capacity: usize,
    ice_break_chance: f64,
}

impl DeferredQueues {
    pub fn new(config: &TrailConfig) -> Self {
        Self {
            touches: VecDeque::new(),
            snow_ice: VecDeque::new(),
            last_drain_ms: None,
            interval_ms: config.deferred_interval_ms,
            touch_batch: config.deferred_batch_size,
            snow_ice_batch: config.snow_ice_batch_size,
            capacity: config.deferred_queue_capacity,
            ice_break_chance: config.ice_break_chance,
        }
    }

    /// Queue a trail touch. Returns false (and drops it) when the queue is full.
    pub fn push_touch(&mut self, item: DeferredTouch) -> bool {
        if self.touches.len() >= self.capacity {
            log::debug!("Deferred touch queue full, dropping touch at {}", item.pos);
            return false;
        }
        self.touches.push_back(item);
        true
    }

    /// Queue a snow/ice transform. Returns false (and drops it) when the queue is full.
    pub fn push_snow_ice(&mut self, item: SnowIceItem) -> bool {
        if self.snow_ice.len() >= self.capacity {
            log::debug!("Snow/ice queue full, dropping item at {}", item.pos);
            return false;
        }
        self.snow_ice.push_back(item);
        true
    }

    /// Whether a drain may run at `now_ms`. Marks the drain as started when it may.
    pub fn begin_drain(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_drain_ms {
            if now_ms.saturating_sub(last) < self.interval_ms {
                return false;
            }
        }
        self.last_drain_ms = Some(now_ms);
        true
    }

    /// Pop up to one batch of deferred touches, oldest first.
    pub fn take_touch_batch(&mut self) -> Vec<DeferredTouch> {
        let n = self.touch_batch.min(self.touches.len());
        self.touches.drain(..n).collect()
    }

    /// Apply up to one batch of snow/ice transforms. Stale items count toward the batch.
    pub fn drain_snow_ice(&mut self, grid: &mut dyn GridAccess) -> SnowIceStats {
        let mut stats = SnowIceStats::default();
        while stats.processed < self.snow_ice_batch {
            let Some(item) = self.snow_ice.pop_front() else {
                break;
            };
            stats.processed += 1;

            if grid.block_at(item.pos) != item.block_id {
                stats.stale += 1;
                continue;
            }
            match item.material {
                BlockMaterial::Snow => {
                    if compact_snow(grid, item) {
                        stats.snow_changed += 1;
                    }
                }
                BlockMaterial::Ice if is_lake_ice(grid, item.block_id) => {
                    if grid.next_random() < self.ice_break_chance {
                        stats.ice_broken += crack_ice(grid, item.pos);
                    }
                }
                _ => {}
            }
        }
        stats
    }

    pub fn pending_touches(&self) -> usize {
        self.touches.len()
    }

    pub fn pending_snow_ice(&self) -> usize {
        self.snow_ice.len()
    }
}

/// Lower a snow layer by one, or turn snowless grass into its snowy variant.
fn compact_snow(grid: &mut dyn GridAccess, item: SnowIceItem) -> bool {
    let replacement = if let Some(height) = grid.block_variant(item.block_id, "height") {
        match height.parse::<u32>() {
            Ok(h) if h > 1 => {
                grid.block_with_variant(item.block_id, "height", &(h - 1).to_string())
            }
            _ => None,
        }
    } else {
        match grid.block_variant(item.block_id, "cover") {
            Some(cover) if cover != "snow" => {
                grid.block_with_variant(item.block_id, "cover", "snow")
            }
            _ => None,
        }
    };

    match replacement {
        Some(id) if id != item.block_id => {
            grid.set_block(id, item.pos);
            true
        }
        _ => false,
    }
}

fn is_lake_ice(grid: &dyn GridAccess, id: BlockId) -> bool {
    grid.block_code(id)
        .is_some_and(|code| code.domain == VANILLA_DOMAIN && code.first_part() == LAKE_ICE_BLOCK)
}

/// Break the lake ice at `pos` and any horizontally adjacent lake ice. Returns blocks broken.
fn crack_ice(grid: &mut dyn GridAccess, pos: BlockPos) -> usize {
    let mut broken = 0;
    for offset in HORIZONTALS {
        let neighbour = pos + offset;
        if is_lake_ice(grid, grid.block_at(neighbour)) {
            grid.break_block(neighbour, Some(BreakCause::Trampled));
            broken += 1;
        }
    }
    grid.break_block(pos, Some(BreakCause::Trampled));
    broken + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_grid::MemoryGrid;

    fn queues() -> DeferredQueues {
        DeferredQueues::new(&TrailConfig::default())
    }

    fn snow_item(grid: &mut MemoryGrid, pos: BlockPos, code: &str) -> SnowIceItem {
        let block_id = grid.place(pos, code);
        SnowIceItem {
            pos,
            block_id,
            material: grid.block_material(block_id),
        }
    }

    #[test]
    fn test_drain_interval() {
        let mut q = queues();
        assert!(q.begin_drain(1_000));
        assert!(!q.begin_drain(1_499));
        assert!(q.begin_drain(1_500));
    }

    #[test]
    fn test_touch_batch_is_bounded() {
        let mut q = queues();
        for i in 0..45 {
            q.push_touch(DeferredTouch {
                pos: IVec3::new(i, 0, 0),
                block_id: BlockId(1),
                entity_id: 7,
                enqueued_ms: 0,
            });
        }
        let batch = q.take_touch_batch();
        assert_eq!(batch.len(), 20);
        assert_eq!(batch[0].pos.x, 0);
        assert_eq!(q.pending_touches(), 25);
        assert_eq!(q.take_touch_batch().len(), 20);
        assert_eq!(q.take_touch_batch().len(), 5);
        assert!(q.take_touch_batch().is_empty());
    }

    #[test]
    fn test_queue_capacity_drops_new_items() {
        let mut q = DeferredQueues::new(&TrailConfig {
            deferred_queue_capacity: 2,
            ..Default::default()
        });
        let item = SnowIceItem {
            pos: IVec3::ZERO,
            block_id: BlockId(1),
            material: BlockMaterial::Snow,
        };
        assert!(q.push_snow_ice(item));
        assert!(q.push_snow_ice(item));
        assert!(!q.push_snow_ice(item));
        assert_eq!(q.pending_snow_ice(), 2);
    }

    #[test]
    fn test_snow_batch_bounded_and_stale_discarded() {
        let mut grid = MemoryGrid::with_wear_blocks(1);
        let mut q = queues();
        for i in 0..60 {
            let item = snow_item(&mut grid, IVec3::new(i, 60, 0), "game:snowlayer-3");
            q.push_snow_ice(item);
        }
        // Position 0 changed after enqueue.
        grid.place(IVec3::new(0, 60, 0), "game:rock-granite");

        let stats = q.drain_snow_ice(&mut grid);
        assert_eq!(stats.processed, 50);
        assert_eq!(stats.stale, 1);
        assert_eq!(stats.snow_changed, 49);
        assert_eq!(q.pending_snow_ice(), 10);
        assert_eq!(grid.code_at(IVec3::new(0, 60, 0)), "game:rock-granite");
        assert_eq!(grid.code_at(IVec3::new(1, 60, 0)), "game:snowlayer-2");
        assert_eq!(grid.code_at(IVec3::new(55, 60, 0)), "game:snowlayer-3");
    }

    #[test]
    fn test_thin_snow_is_left_alone() {
        let mut grid = MemoryGrid::with_wear_blocks(1);
        let mut q = queues();
        let item = snow_item(&mut grid, IVec3::ZERO, "game:snowlayer-1");
        q.push_snow_ice(item);
        let stats = q.drain_snow_ice(&mut grid);
        assert_eq!(stats.snow_changed, 0);
        assert_eq!(grid.code_at(IVec3::ZERO), "game:snowlayer-1");
    }

    #[test]
    fn test_grass_gets_snow_cover() {
        let mut grid = MemoryGrid::with_wear_blocks(1);
        let mut q = queues();
        let pos = IVec3::new(2, 61, 2);
        let grass = grid.place(pos, "game:tallgrass-tall-free");
        q.push_snow_ice(SnowIceItem {
            pos,
            block_id: grass,
            material: BlockMaterial::Snow,
        });
        q.drain_snow_ice(&mut grid);
        assert_eq!(grid.code_at(pos), "game:tallgrass-tall-snow");
    }

    #[test]
    fn test_ice_cracks_with_neighbours() {
        let mut grid = MemoryGrid::with_wear_blocks(1);
        let centre = IVec3::new(10, 50, 10);
        let item = snow_item(&mut grid, centre, "game:lakeice");
        grid.place(centre + IVec3::X, "game:lakeice");
        grid.place(centre - IVec3::Z, "game:lakeice");
        grid.place(centre + IVec3::Y, "game:lakeice");
        grid.place(centre - IVec3::X, "game:rock-granite");

        let mut q = queues();
        q.push_snow_ice(item);
        grid.set_random_override(Some(0.0));
        let stats = q.drain_snow_ice(&mut grid);

        assert_eq!(stats.ice_broken, 3);
        assert_eq!(grid.block_at(centre), BlockId::AIR);
        assert_eq!(grid.block_at(centre + IVec3::X), BlockId::AIR);
        assert_eq!(grid.code_at(centre + IVec3::Y), "game:lakeice");
        assert_eq!(grid.code_at(centre - IVec3::X), "game:rock-granite");
        assert_eq!(grid.broken().last(), Some(&(centre, Some(BreakCause::Trampled))));
    }

    #[test]
    fn test_only_lake_ice_cracks() {
        let mut grid = MemoryGrid::with_wear_blocks(1);
        grid.register("game:glacierice", BlockMaterial::Ice, false);
        let centre = IVec3::new(4, 50, 4);
        let item = snow_item(&mut grid, centre, "game:lakeice");
        grid.place(centre + IVec3::Z, "game:glacierice");
        grid.place(centre - IVec3::Z, "game:lakeice");
        let glacier = snow_item(&mut grid, IVec3::new(40, 50, 40), "game:glacierice");

        let mut q = queues();
        q.push_snow_ice(item);
        q.push_snow_ice(glacier);
        grid.set_random_override(Some(0.0));
        let stats = q.drain_snow_ice(&mut grid);

        assert_eq!(stats.ice_broken, 2);
        assert_eq!(grid.block_at(centre - IVec3::Z), BlockId::AIR);
        assert_eq!(grid.code_at(centre + IVec3::Z), "game:glacierice");
        assert_eq!(grid.code_at(IVec3::new(40, 50, 40)), "game:glacierice");
    }

    #[test]
    fn test_ice_usually_holds() {
        let mut grid = MemoryGrid::with_wear_blocks(1);
        let item = snow_item(&mut grid, IVec3::ZERO, "game:lakeice");
        let mut q = queues();
        q.push_snow_ice(item);
        grid.set_random_override(Some(0.5));
        assert_eq!(q.drain_snow_ice(&mut grid).ice_broken, 0);
        assert_eq!(grid.code_at(IVec3::ZERO), "game:lakeice");
    }
}
