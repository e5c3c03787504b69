//! Time-based decay of trail blocks.
//!
//! A trail block that has not been touched for one decay period loses a level.
//! Several elapsed periods are applied in one step, using the period of the
//! block's current state for the whole span.

use wayworn_core::{BlockPos, GridAccess, WearCatalog, WearError, WearState};

use crate::touch_store::TouchStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DevolveOutcome {
    /// Not a decaying block; nothing to do.
    NotDecaying,
    /// No clock existed for the position yet; it starts now.
    ClockStarted,
    /// Less than one period has elapsed.
    Idle,
    Devolved {
        from: WearState,
        to: WearState,
        levels: u32,
    },
}

/// Whole decay periods elapsed between `last_day` and `now_day`.
///
/// Non-positive or non-finite periods never elapse; a clock in the future
/// counts as zero elapsed time.
pub fn elapsed_levels(last_day: f64, now_day: f64, period_days: f64) -> u32 {
    if !(period_days.is_finite() && period_days > 0.0) {
        return 0;
    }
    let elapsed = now_day - last_day;
    if !(elapsed.is_finite() && elapsed > 0.0) {
        return 0;
    }
    (elapsed / period_days).floor().min(u32::MAX as f64) as u32
}

/// Devolve the block at `pos` by however many periods elapsed since its last
/// touch. On any devolution the decay clock restarts now and the touch record
/// is cleared; blocks that end up outside the decaying states drop their clock.
///
/// A missing target block is returned as an error and the block is left as-is.
pub fn devolve_block(
    grid: &mut dyn GridAccess,
    catalog: &WearCatalog,
    store: &mut TouchStore,
    pos: BlockPos,
) -> Result<DevolveOutcome, WearError> {
    let id = grid.block_at(pos);
    let code = grid
        .block_code(id)
        .ok_or(WearError::UnknownBlockCode(pos))?;
    let Some(state) = catalog.classify(code) else {
        return Ok(DevolveOutcome::NotDecaying);
    };
    let Some(period) = catalog.decay_period_days(state) else {
        return Ok(DevolveOutcome::NotDecaying);
    };

    let now = grid.elapsed_days();
    let Some(last) = store.last_touch_day(pos) else {
        store.start_clock(pos, now);
        return Ok(DevolveOutcome::ClockStarted);
    };

    let levels = elapsed_levels(last, now, period);
    if levels == 0 {
        return Ok(DevolveOutcome::Idle);
    }
    let Some(target) = catalog.devolve(state, levels) else {
        return Ok(DevolveOutcome::NotDecaying);
    };

    let target_code = target.code();
    let target_id = grid
        .block_id(&target_code)
        .ok_or(WearError::MissingBlock {
            code: target_code,
            pos,
        })?;
    grid.set_block(target_id, pos);

    if catalog.decay_period_days(target).is_some() {
        store.clear(pos);
        store.start_clock(pos, now);
    } else {
        store.forget(pos);
    }

    Ok(DevolveOutcome::Devolved {
        from: state,
        to: target,
        levels,
    })
}
