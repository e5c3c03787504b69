use std::collections::HashSet;

use wayworn_core::{ColumnCoord, GridAccess};

use crate::touch_store::TouchStore;

/// Periodic sweep that parks touch data of columns the host no longer has loaded.
///
/// Covers hosts that miss unload events; with complete events the sweep finds nothing.
pub struct CleanupPolicy {
    interval_ms: u64,
    last_ms: Option<u64>,
}

impl CleanupPolicy {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Run the sweep if the interval has elapsed. Returns the number of parked
    /// columns, or `None` if the sweep was not due.
    pub fn update(&mut self, store: &mut TouchStore, grid: &dyn GridAccess) -> Option<usize> {
        let now = grid.elapsed_millis();
        match self.last_ms {
            // The first call only arms the timer.
            None => {
                self.last_ms = Some(now);
                return None;
            }
            Some(last) if now.saturating_sub(last) < self.interval_ms => return None,
            Some(_) => {}
        }
        self.last_ms = Some(now);

        let live: HashSet<ColumnCoord> = grid.loaded_columns().into_iter().collect();
        let parked = store.sweep(&live);
        if parked > 0 {
            log::info!("Trail cleanup parked {parked} unloaded columns");
        }
        Some(parked)
    }
}
