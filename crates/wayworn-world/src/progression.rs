use wayworn_core::{BlockPos, GridAccess, WearCatalog, WearError, WearState};

use crate::touch_store::TouchStore;

/// Result of one qualifying touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchOutcome {
    /// The block is not part of the wear chain; any data held for it was dropped.
    Untracked,
    /// The touch was counted without crossing a threshold.
    Counted { touch_count: u32 },
    /// The threshold was reached and the block was rewritten.
    Advanced { from: WearState, to: WearState },
}

/// Count a touch at `pos` and advance the block one step if the forward edge's
/// threshold is reached. The count resets to zero on advance.
///
/// A missing target block is returned as an error; the count is kept and the
/// block is left as-is.
pub fn apply_touch(
    grid: &mut dyn GridAccess,
    catalog: &WearCatalog,
    store: &mut TouchStore,
    pos: BlockPos,
) -> Result<TouchOutcome, WearError> {
    let id = grid.block_at(pos);
    let code = grid
        .block_code(id)
        .ok_or(WearError::UnknownBlockCode(pos))?;

    let Some(state) = catalog.classify(code) else {
        store.forget(pos);
        return Ok(TouchOutcome::Untracked);
    };

    let record = store.upsert(pos, grid.elapsed_days());
    let Some(edge) = catalog.forward(state) else {
        return Ok(TouchOutcome::Counted {
            touch_count: record.touch_count,
        });
    };
    if record.touch_count < edge.threshold {
        return Ok(TouchOutcome::Counted {
            touch_count: record.touch_count,
        });
    }

    let target_code = edge.target.code();
    let target = grid
        .block_id(&target_code)
        .ok_or(WearError::MissingBlock {
            code: target_code,
            pos,
        })?;
    grid.set_block(target, pos);
    store.reset_count(pos);

    Ok(TouchOutcome::Advanced {
        from: state,
        to: edge.target,
    })
}
