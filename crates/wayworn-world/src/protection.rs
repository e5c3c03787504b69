use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::IVec3;
use wayworn_core::{BlockPos, GridAccess, ProtectionError};
use wayworn_persist::ProtectionEntry;

/// Who protected a position, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectionRecord {
    pub pos: BlockPos,
    pub player_name: String,
    /// Wall-clock milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

/// Positions exempt from wear. Global, independent of chunk loading.
#[derive(Debug, Default)]
pub struct ProtectionIndex {
    records: HashMap<BlockPos, ProtectionRecord>,
    max_area_volume: u64,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Number of positions in the inclusive box spanned by `a` and `b`, or `None`
/// when the count does not fit in a `u64`.
pub fn box_volume(a: BlockPos, b: BlockPos) -> Option<u64> {
    let extent = |a: i32, b: i32| (a as i64 - b as i64).unsigned_abs() + 1;
    extent(a.x, b.x)
        .checked_mul(extent(a.y, b.y))?
        .checked_mul(extent(a.z, b.z))
}

impl ProtectionIndex {
    pub fn new(max_area_volume: u64) -> Self {
        Self {
            records: HashMap::new(),
            max_area_volume,
        }
    }

    pub fn is_protected(&self, pos: BlockPos) -> bool {
        self.records.contains_key(&pos)
    }

    pub fn get(&self, pos: BlockPos) -> Option<&ProtectionRecord> {
        self.records.get(&pos)
    }

    /// Protect `pos` on behalf of `player`, stating why when it cannot be done.
    pub fn protect(
        &mut self,
        grid: &dyn GridAccess,
        pos: BlockPos,
        player: &str,
    ) -> Result<(), ProtectionError> {
        if self.is_protected(pos) {
            return Err(ProtectionError::AlreadyProtected);
        }
        if !grid.is_protectable(grid.block_at(pos)) {
            return Err(ProtectionError::NotProtectable);
        }
        self.records.insert(
            pos,
            ProtectionRecord {
                pos,
                player_name: player.to_string(),
                timestamp_ms: now_ms(),
            },
        );
        Ok(())
    }

    /// Protect `pos`. False if it is already protected or the block lacks the capability.
    pub fn try_add(&mut self, grid: &dyn GridAccess, pos: BlockPos, player: &str) -> bool {
        self.protect(grid, pos, player).is_ok()
    }

    /// Remove the protection of `pos`.
    pub fn try_remove(&mut self, pos: BlockPos, player: &str) -> Result<(), ProtectionError> {
        match self.records.remove(&pos) {
            Some(record) => {
                log::debug!(
                    "{player} removed trample protection at {pos} (set by {})",
                    record.player_name
                );
                Ok(())
            }
            None => Err(ProtectionError::NotProtected),
        }
    }

    /// Remove the protection of `pos` if any. Returns whether one was removed.
    pub fn clear(&mut self, pos: BlockPos) -> bool {
        self.records.remove(&pos).is_some()
    }

    fn check_volume(&self, a: BlockPos, b: BlockPos) -> Result<(), ProtectionError> {
        let volume = box_volume(a, b).unwrap_or(u64::MAX);
        if volume > self.max_area_volume {
            return Err(ProtectionError::SelectionTooLarge {
                volume,
                limit: self.max_area_volume,
            });
        }
        Ok(())
    }

    /// Protect every protectable position in the inclusive box. Returns how many
    /// were newly protected. An oversize box is rejected before any change.
    pub fn protect_area(
        &mut self,
        grid: &dyn GridAccess,
        a: BlockPos,
        b: BlockPos,
        player: &str,
    ) -> Result<u32, ProtectionError> {
        self.check_volume(a, b)?;
        let mut added = 0;
        for pos in box_positions(a, b) {
            if self.try_add(grid, pos, player) {
                added += 1;
            }
        }
        log::info!("{player} trample protected {added} blocks");
        Ok(added)
    }

    /// Unprotect every protected position in the inclusive box. Returns how many
    /// were removed. An oversize box is rejected before any change.
    pub fn unprotect_area(
        &mut self,
        a: BlockPos,
        b: BlockPos,
        player: &str,
    ) -> Result<u32, ProtectionError> {
        self.check_volume(a, b)?;
        let mut removed = 0;
        for pos in box_positions(a, b) {
            if self.records.remove(&pos).is_some() {
                removed += 1;
            }
        }
        log::info!("{player} removed trample protection from {removed} blocks");
        Ok(removed)
    }

    /// Block info line for a protected position.
    pub fn describe(&self, pos: BlockPos) -> Option<String> {
        self.get(pos)
            .map(|record| format!("Has been trample protected by {}.", record.player_name))
    }

    /// Protected positions within `radius` of `center` (spherical), no more than
    /// `y_half` blocks above or below it.
    pub fn protected_near(&self, center: BlockPos, radius: i32, y_half: i32) -> Vec<BlockPos> {
        let r2 = radius * radius;
        let mut found = Vec::new();
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let horizontal = dx * dx + dz * dz;
                if horizontal > r2 {
                    continue;
                }
                for dy in -y_half..=y_half {
                    if horizontal + dy * dy > r2 {
                        continue;
                    }
                    let pos = center + IVec3::new(dx, dy, dz);
                    if self.is_protected(pos) {
                        found.push(pos);
                    }
                }
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn snapshot(&self) -> Vec<ProtectionEntry> {
        self.records
            .values()
            .map(|record| ProtectionEntry {
                pos: record.pos,
                player_name: record.player_name.clone(),
                timestamp_ms: record.timestamp_ms,
            })
            .collect()
    }

    /// Replace the index with persisted entries. Entries are not checked against
    /// the grid: protection belongs to the position, not the block.
    pub fn restore(&mut self, entries: impl IntoIterator<Item = ProtectionEntry>) {
        self.records.clear();
        for entry in entries {
            self.records.insert(
                entry.pos,
                ProtectionRecord {
                    pos: entry.pos,
                    player_name: entry.player_name,
                    timestamp_ms: entry.timestamp_ms,
                },
            );
        }
    }
}

fn box_positions(a: BlockPos, b: BlockPos) -> impl Iterator<Item = BlockPos> {
    let min = a.min(b);
    let max = a.max(b);
    (min.x..=max.x).flat_map(move |x| {
        (min.y..=max.y).flat_map(move |y| (min.z..=max.z).map(move |z| IVec3::new(x, y, z)))
    })
}
