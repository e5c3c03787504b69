use std::collections::{HashMap, HashSet};

use wayworn_core::{column_of, BlockPos, ColumnCoord};
use wayworn_persist::TouchEntry;

/// Accumulated touches on one position since its last transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchRecord {
    pub touch_count: u32,
    pub last_touch_day: f64,
}

/// Touch data of one loaded chunk column.
///
/// `clocks` holds the decay clock (day of the last touch or transition) and
/// outlives the touch record, which transitions and devolution clear.
#[derive(Debug, Default)]
struct ColumnShard {
    records: HashMap<BlockPos, TouchRecord>,
    clocks: HashMap<BlockPos, f64>,
}

impl ColumnShard {
    fn is_empty(&self) -> bool {
        self.records.is_empty() && self.clocks.is_empty()
    }

    fn entries(&self) -> impl Iterator<Item = TouchEntry> + '_ {
        let clock_only = self
            .clocks
            .iter()
            .filter(|(pos, _)| !self.records.contains_key(*pos))
            .map(|(&pos, &day)| TouchEntry {
                pos,
                touch_count: 0,
                last_touch_day: day,
                has_record: false,
            });
        self.records
            .iter()
            .map(|(&pos, record)| TouchEntry {
                pos,
                touch_count: record.touch_count,
                last_touch_day: self.clocks.get(&pos).copied().unwrap_or(record.last_touch_day),
                has_record: true,
            })
            .chain(clock_only)
    }

    fn insert_entry(&mut self, entry: &TouchEntry) {
        if entry.has_record {
            self.records.entry(entry.pos).or_insert(TouchRecord {
                touch_count: entry.touch_count,
                last_touch_day: entry.last_touch_day,
            });
        }
        self.clocks.entry(entry.pos).or_insert(entry.last_touch_day);
    }
}

/// Column-sharded sparse map of touch data.
///
/// Only loaded columns are readable. Unloading a column parks its entries
/// until the column loads again (or the world is saved).
#[derive(Debug, Default)]
pub struct TouchStore {
    loaded: HashMap<ColumnCoord, ColumnShard>,
    parked: HashMap<ColumnCoord, Vec<TouchEntry>>,
}

impl TouchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: BlockPos) -> Option<TouchRecord> {
        self.loaded
            .get(&column_of(pos))
            .and_then(|shard| shard.records.get(&pos))
            .copied()
    }

    /// Count one touch at `pos` and stamp it with `day`. Creates the record on
    /// first touch.
    pub fn upsert(&mut self, pos: BlockPos, day: f64) -> TouchRecord {
        let shard = self.loaded.entry(column_of(pos)).or_default();
        shard.clocks.insert(pos, day);
        let record = shard.records.entry(pos).or_insert(TouchRecord {
            touch_count: 0,
            last_touch_day: day,
        });
        record.touch_count = record.touch_count.saturating_add(1);
        record.last_touch_day = day;
        *record
    }

    /// Zero the touch count after a forward transition. The record stays.
    pub fn reset_count(&mut self, pos: BlockPos) {
        if let Some(record) = self
            .loaded
            .get_mut(&column_of(pos))
            .and_then(|shard| shard.records.get_mut(&pos))
        {
            record.touch_count = 0;
        }
    }

    /// Drop the touch record. The decay clock is kept.
    pub fn clear(&mut self, pos: BlockPos) {
        if let Some(shard) = self.loaded.get_mut(&column_of(pos)) {
            shard.records.remove(&pos);
        }
    }

    /// Drop every piece of data held for `pos`, loaded or parked.
    pub fn forget(&mut self, pos: BlockPos) {
        let column = column_of(pos);
        if let Some(shard) = self.loaded.get_mut(&column) {
            shard.records.remove(&pos);
            shard.clocks.remove(&pos);
        }
        if let Some(entries) = self.parked.get_mut(&column) {
            entries.retain(|entry| entry.pos != pos);
        }
    }

    /// Restart the decay clock of `pos` at `day`.
    pub fn start_clock(&mut self, pos: BlockPos, day: f64) {
        self.loaded
            .entry(column_of(pos))
            .or_default()
            .clocks
            .insert(pos, day);
    }

    /// Day the decay clock of `pos` was last started.
    pub fn last_touch_day(&self, pos: BlockPos) -> Option<f64> {
        self.loaded
            .get(&column_of(pos))
            .and_then(|shard| shard.clocks.get(&pos))
            .copied()
    }

    /// Bring a column online, restoring its parked entries that pass `keep`.
    ///
    /// Returns the restored positions, or `None` if the column was already
    /// loaded (the call is then a no-op).
    pub fn on_chunk_load(
        &mut self,
        column: ColumnCoord,
        mut keep: impl FnMut(&TouchEntry) -> bool,
    ) -> Option<Vec<BlockPos>> {
        if self.loaded.contains_key(&column) {
            return None;
        }

        let mut shard = ColumnShard::default();
        let mut restored = Vec::new();
        for entry in self.parked.remove(&column).unwrap_or_default() {
            if !keep(&entry) {
                continue;
            }
            shard.insert_entry(&entry);
            restored.push(entry.pos);
        }
        self.loaded.insert(column, shard);
        Some(restored)
    }

    /// Take a column offline, parking its data. Returns false if it was not loaded.
    pub fn on_chunk_unload(&mut self, column: ColumnCoord) -> bool {
        let Some(shard) = self.loaded.remove(&column) else {
            return false;
        };
        if !shard.is_empty() {
            self.parked
                .entry(column)
                .or_default()
                .extend(shard.entries());
        }
        true
    }

    /// Park every loaded shard whose column is not in `live`. Returns how many were parked.
    pub fn sweep(&mut self, live: &HashSet<ColumnCoord>) -> usize {
        let stale: Vec<ColumnCoord> = self
            .loaded
            .keys()
            .filter(|column| !live.contains(*column))
            .copied()
            .collect();
        for column in &stale {
            self.on_chunk_unload(*column);
        }
        stale.len()
    }

    /// Point-in-time copy of all touch data, loaded and parked.
    pub fn snapshot(&self) -> Vec<TouchEntry> {
        let mut entries: Vec<TouchEntry> = self
            .loaded
            .values()
            .flat_map(|shard| shard.entries())
            .collect();
        entries.extend(self.parked.values().flatten().copied());
        entries
    }

    /// Replace the parked data with persisted entries. Columns already loaded
    /// keep their live data; callers re-run `on_chunk_load` after unloading them.
    pub fn park_entries(&mut self, entries: impl IntoIterator<Item = TouchEntry>) {
        self.parked.clear();
        for entry in entries {
            self.parked
                .entry(column_of(entry.pos))
                .or_default()
                .push(entry);
        }
    }

    /// Drop all data.
    pub fn reset(&mut self) {
        self.loaded.clear();
        self.parked.clear();
    }

    pub fn is_loaded(&self, column: ColumnCoord) -> bool {
        self.loaded.contains_key(&column)
    }

    /// Number of live touch records across loaded columns.
    pub fn record_count(&self) -> usize {
        self.loaded.values().map(|shard| shard.records.len()).sum()
    }

    /// Number of columns holding parked data.
    pub fn parked_column_count(&self) -> usize {
        self.parked.len()
    }
}
