//! Bulk rewrite of trail blocks back to vanilla soil.
//!
//! Covers every column the engine reports as changed or loaded, plus a halo
//! around each online player. Blocks of the current or the legacy trail domain
//! whose path starts with `trail-` or `soil-` become `game:soil-{fertility}-none`.

use std::collections::{HashMap, HashSet};

use glam::{DVec3, IVec2, IVec3};
use wayworn_core::constants::{CHUNK_SIZE, LEGACY_TRAIL_DOMAIN, TRAIL_DOMAIN, VANILLA_DOMAIN};
use wayworn_core::{column_of, column_origin, BlockCode, BlockId, ColumnCoord, GridAccess};

use crate::touch_store::TouchStore;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RestoreReport {
    pub columns_scanned: usize,
    pub blocks_replaced: usize,
}

impl std::fmt::Display for RestoreReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Restore complete. Columns scanned: {}. Blocks replaced: {}.",
            self.columns_scanned, self.blocks_replaced
        )
    }
}

/// Union of changed and loaded columns plus a `(2 * radius + 1)^2` halo
/// around each player, sorted and without duplicates.
pub fn target_columns(
    changed: &[ColumnCoord],
    loaded: &[ColumnCoord],
    players: &[DVec3],
    radius: i32,
) -> Vec<ColumnCoord> {
    let mut targets: HashSet<ColumnCoord> = changed.iter().chain(loaded).copied().collect();
    for player in players {
        let centre = column_of(player.floor().as_ivec3());
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                targets.insert(centre + IVec2::new(dx, dz));
            }
        }
    }
    let mut targets: Vec<ColumnCoord> = targets.into_iter().collect();
    targets.sort_by_key(|c| (c.x, c.y));
    targets
}

/// Fertility of a restorable trail block, or `None` if the block is not one.
fn trail_fertility(code: &BlockCode) -> Option<&str> {
    if !code.is_domain(TRAIL_DOMAIN) && !code.is_domain(LEGACY_TRAIL_DOMAIN) {
        return None;
    }
    if !(code.path.starts_with("trail-") || code.path.starts_with("soil-")) {
        return None;
    }
    if code.part_count() < 3 {
        return None;
    }
    code.second_part().filter(|fertility| !fertility.is_empty())
}

/// Rewrite every trail block in `columns` to plain soil and drop the touch
/// data of each rewritten position.
pub fn restore_base_terrain(
    grid: &mut dyn GridAccess,
    store: &mut TouchStore,
    columns: &[ColumnCoord],
) -> RestoreReport {
    let mut soil_cache: HashMap<String, Option<BlockId>> = HashMap::new();
    let mut report = RestoreReport::default();
    let height = grid.map_height();

    for &column in columns {
        report.columns_scanned += 1;
        grid.ensure_column_loaded(column);
        let (base_x, base_z) = column_origin(column);

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                for y in 0..height {
                    let pos = IVec3::new(base_x + x, y, base_z + z);
                    let id = grid.block_at(pos);
                    let Some(code) = grid.block_code(id) else {
                        continue;
                    };
                    let Some(fertility) = trail_fertility(code) else {
                        continue;
                    };

                    let soil = match soil_cache.get(fertility) {
                        Some(&cached) => cached,
                        None => {
                            let target =
                                BlockCode::new(VANILLA_DOMAIN, format!("soil-{fertility}-none"));
                            let resolved = grid.block_id(&target);
                            if resolved.is_none() {
                                log::warn!(
                                    "No plain soil block {target}, leaving {fertility} trails"
                                );
                            }
                            soil_cache.insert(fertility.to_string(), resolved);
                            resolved
                        }
                    };
                    let Some(soil) = soil else {
                        continue;
                    };
                    if soil != id {
                        grid.set_block(soil, pos);
                        store.forget(pos);
                        report.blocks_replaced += 1;
                    }
                }
            }
        }
    }

    log::info!("{report}");
    report
}
