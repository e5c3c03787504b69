//! Bridges the in-memory stores and the binary payloads.

use wayworn_core::{GridAccess, WearCatalog};
use wayworn_persist::{
    load_protections, load_touches, save_protections, save_touches, PersistError, TouchEntry,
};

use crate::protection::ProtectionIndex;
use crate::touch_store::TouchStore;

/// Both payloads of one save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedState {
    pub touches: Vec<u8>,
    pub protections: Vec<u8>,
}

/// Serialize a point-in-time snapshot of the touch store and protection index.
pub fn save_state(store: &TouchStore, index: &ProtectionIndex, saved_day: f64) -> SavedState {
    let touches = store.snapshot();
    let protections = index.snapshot();
    log::info!(
        "Saving {} touch entries and {} protections",
        touches.len(),
        protections.len()
    );
    SavedState {
        touches: save_touches(&touches, saved_day),
        protections: save_protections(&protections, saved_day),
    }
}

/// Decode a touch payload and park its entries until their columns load.
/// Returns the number of entries parked.
pub fn restore_touches(store: &mut TouchStore, bytes: &[u8]) -> Result<usize, PersistError> {
    let payload = load_touches(bytes)?;
    for warning in &payload.warnings {
        log::warn!("Touch data: {warning}");
    }
    let count = payload.entries.len();
    store.park_entries(payload.entries);
    Ok(count)
}

/// Decode a protection payload and replace the index with it.
/// Returns the number of protections restored.
pub fn restore_protections(
    index: &mut ProtectionIndex,
    bytes: &[u8],
) -> Result<usize, PersistError> {
    let payload = load_protections(bytes)?;
    for warning in &payload.warnings {
        log::warn!("Protection data: {warning}");
    }
    let count = payload.entries.len();
    index.restore(payload.entries);
    Ok(count)
}

/// Whether a persisted touch entry still describes the live block: the block
/// at its position must belong to the wear chain.
pub fn entry_matches_grid(grid: &dyn GridAccess, catalog: &WearCatalog, entry: &TouchEntry) -> bool {
    grid.block_code(grid.block_at(entry.pos))
        .and_then(|code| catalog.classify(code))
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_grid::MemoryGrid;
    use glam::IVec3;
    use wayworn_core::column_of;

    #[test]
    fn test_state_survives_save_and_restore() {
        let mut grid = MemoryGrid::with_wear_blocks(0);
        let pos = IVec3::new(3, 60, 3);
        grid.place(pos, "wayworn:trail-low-new");

        let mut store = TouchStore::new();
        store.upsert(pos, 4.0);
        store.upsert(pos, 5.0);
        let mut index = ProtectionIndex::new(32_768);
        index.try_add(&grid, pos, "alice");

        let saved = save_state(&store, &index, 5.0);

        let mut new_store = TouchStore::new();
        let mut new_index = ProtectionIndex::new(32_768);
        assert!(matches!(restore_touches(&mut new_store, &saved.touches), Ok(1)));
        assert!(matches!(
            restore_protections(&mut new_index, &saved.protections),
            Ok(1)
        ));
        assert!(new_index.is_protected(pos));

        let catalog = WearCatalog::default();
        new_store.on_chunk_load(column_of(pos), |entry| {
            entry_matches_grid(&grid, &catalog, entry)
        });
        assert_eq!(new_store.get(pos).map(|r| r.touch_count), Some(2));
        assert_eq!(new_store.last_touch_day(pos), Some(5.0));
    }

    #[test]
    fn test_payloads_are_not_interchangeable() {
        let saved = save_state(&TouchStore::new(), &ProtectionIndex::new(1), 0.0);
        let mut store = TouchStore::new();
        assert!(matches!(
            restore_touches(&mut store, &saved.protections),
            Err(PersistError::InvalidMagic { .. })
        ));
        let mut index = ProtectionIndex::new(1);
        assert!(restore_protections(&mut index, &saved.touches).is_err());
    }

    #[test]
    fn test_entry_against_unrelated_block() {
        let mut grid = MemoryGrid::with_wear_blocks(0);
        let pos = IVec3::new(0, 1, 0);
        grid.place(pos, "game:rock-granite");
        let entry = TouchEntry {
            pos,
            touch_count: 4,
            last_touch_day: 0.0,
            has_record: true,
        };
        assert!(!entry_matches_grid(&grid, &WearCatalog::default(), &entry));
    }
}
