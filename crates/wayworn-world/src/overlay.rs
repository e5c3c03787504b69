//! Throttled highlight of protected blocks around a tool holder.
//!
//! The query runs at most every `OVERLAY_TICK_THROTTLE` held ticks, and only
//! recomputes when the view actually changed: the holder moved at least
//! `OVERLAY_MOVE_THRESHOLD` blocks on some axis, or the selection corners,
//! the hovered block or the tool mode differ from the last refresh.

use wayworn_core::constants::{
    OVERLAY_MOVE_THRESHOLD, OVERLAY_SCAN_RADIUS, OVERLAY_TICK_THROTTLE, OVERLAY_Y_HALF,
};
use wayworn_core::{BlockPos, TrailConfig};

use crate::protection::ProtectionIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    #[default]
    Single,
    ProtectArea,
    UnprotectArea,
}

/// What the holder currently sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayView {
    pub center: BlockPos,
    pub selection_start: Option<BlockPos>,
    pub selection_end: Option<BlockPos>,
    pub hover: Option<BlockPos>,
    pub mode: ToolMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayRefresh {
    /// Keep the highlight as it is.
    Unchanged,
    /// Remove the highlight.
    Clear,
    /// Replace the highlight with these positions.
    Show(Vec<BlockPos>),
}

pub struct OverlayThrottle {
    enabled: bool,
    ticks: u32,
    last: Option<OverlayView>,
}

impl OverlayThrottle {
    pub fn new(config: &TrailConfig) -> Self {
        Self {
            enabled: config.show_protection_overlay,
            ticks: 0,
            last: None,
        }
    }

    /// Called every tick the tool is held.
    pub fn on_held_tick(&mut self, view: &OverlayView, index: &ProtectionIndex) -> OverlayRefresh {
        self.ticks += 1;
        if self.ticks < OVERLAY_TICK_THROTTLE {
            return OverlayRefresh::Unchanged;
        }
        self.ticks = 0;
        self.refresh(view, index)
    }

    /// Re-evaluate now, e.g. right after a selection corner was set.
    pub fn refresh(&mut self, view: &OverlayView, index: &ProtectionIndex) -> OverlayRefresh {
        if !self.enabled {
            return OverlayRefresh::Clear;
        }
        if !self.changed(view) {
            return OverlayRefresh::Unchanged;
        }
        self.last = Some(*view);
        OverlayRefresh::Show(index.protected_near(view.center, OVERLAY_SCAN_RADIUS, OVERLAY_Y_HALF))
    }

    /// The tool was put away. The next refresh recomputes unconditionally.
    pub fn reset(&mut self) -> OverlayRefresh {
        self.ticks = 0;
        self.last = None;
        OverlayRefresh::Clear
    }

    fn changed(&self, view: &OverlayView) -> bool {
        let Some(last) = self.last else {
            return true;
        };
        let moved = (view.center - last.center).abs().max_element() >= OVERLAY_MOVE_THRESHOLD;
        moved
            || view.selection_start != last.selection_start
            || view.selection_end != last.selection_end
            || view.hover != last.hover
            || view.mode != last.mode
    }
}
