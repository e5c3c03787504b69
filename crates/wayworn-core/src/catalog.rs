//! Wear catalog: forward edges with their touch thresholds, backward edges,
//! and decay periods. Pure lookups over the configured values.

use crate::block::BlockCode;
use crate::config::TrailConfig;
use crate::wear::{Fertility, GrassCover, GrassyMedium, TrailWear, WearState};

/// Fertility assigned to bare soil uncovered from forest floor.
const FOREST_FLOOR_FERTILITY: Fertility = Fertility::Medium;

/// A forward transition and the touches needed to take it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardEdge {
    pub target: WearState,
    pub threshold: u32,
}

#[derive(Debug, Clone)]
pub struct WearCatalog {
    normal_to_sparse: u32,
    sparse_to_very_sparse: u32,
    very_sparse_to_soil: u32,
    soil_to_pretrail: u32,
    pretrail_to_new: u32,
    new_to_established: u32,
    established_to_very_established: u32,
    very_established_to_old: u32,
    old_to_dirt_road: u32,
    dirt_road_to_highway: u32,
    forest_floor_to_soil: u32,
    cob_lose_grass: u32,
    peat_lose_grass: u32,
    clay_lose_grass: u32,
    roads_enabled: bool,
    dirt_roads_only: bool,
    pretrail_decay_days: f64,
    trail_decay_days: f64,
}

impl Default for WearCatalog {
    fn default() -> Self {
        Self::from_config(&TrailConfig::default())
    }
}

impl WearCatalog {
    pub fn from_config(config: &TrailConfig) -> Self {
        Self {
            normal_to_sparse: config.normal_to_sparse_grass_touch_count,
            sparse_to_very_sparse: config.sparse_to_very_sparse_grass_touch_count,
            very_sparse_to_soil: config.very_sparse_to_soil_touch_count,
            soil_to_pretrail: config.soil_to_trampled_soil_touch_count,
            pretrail_to_new: config.trampled_soil_to_new_trail_touch_count,
            new_to_established: config.new_to_established_trail_touch_count,
            established_to_very_established: config.established_to_very_established_touch_count,
            very_established_to_old: config.very_established_to_old_touch_count,
            old_to_dirt_road: config.old_to_dirt_road_touch_count,
            dirt_road_to_highway: config.dirt_road_to_highway_touch_count,
            forest_floor_to_soil: config.forest_floor_to_soil_touch_count,
            cob_lose_grass: config.cob_lose_grass_touch_count,
            peat_lose_grass: config.peat_lose_grass_touch_count,
            clay_lose_grass: config.clay_lose_grass_touch_count,
            roads_enabled: config.roads_enabled,
            dirt_roads_only: config.dirt_roads_only,
            pretrail_decay_days: config.trampled_soil_devolve_days,
            trail_decay_days: config.trail_devolve_days,
        }
    }

    /// Wear state of a block, or `None` if the block is not tracked.
    pub fn classify(&self, code: &BlockCode) -> Option<WearState> {
        WearState::from_code(code)
    }

    /// Next state on enough touches, if the chain continues.
    pub fn forward(&self, state: WearState) -> Option<ForwardEdge> {
        let edge = |target, threshold| Some(ForwardEdge { target, threshold });
        match state {
            WearState::Soil { fertility, cover } => match cover {
                GrassCover::Normal => edge(
                    WearState::Soil {
                        fertility,
                        cover: GrassCover::Sparse,
                    },
                    self.normal_to_sparse,
                ),
                GrassCover::Sparse => edge(
                    WearState::Soil {
                        fertility,
                        cover: GrassCover::VerySparse,
                    },
                    self.sparse_to_very_sparse,
                ),
                GrassCover::VerySparse => {
                    edge(WearState::plain_soil(fertility), self.very_sparse_to_soil)
                }
                GrassCover::None => edge(
                    WearState::Trail {
                        fertility,
                        wear: TrailWear::Pretrail,
                    },
                    self.soil_to_pretrail,
                ),
            },
            WearState::Trail { fertility, wear } => {
                let (next, threshold) = match wear {
                    TrailWear::Pretrail => (TrailWear::New, self.pretrail_to_new),
                    TrailWear::New => (TrailWear::Established, self.new_to_established),
                    TrailWear::Established => (
                        TrailWear::VeryEstablished,
                        self.established_to_very_established,
                    ),
                    TrailWear::VeryEstablished => (TrailWear::Old, self.very_established_to_old),
                    TrailWear::Old if self.roads_enabled => {
                        (TrailWear::DirtRoad, self.old_to_dirt_road)
                    }
                    TrailWear::DirtRoad if self.roads_enabled && !self.dirt_roads_only => {
                        (TrailWear::Highway, self.dirt_road_to_highway)
                    }
                    _ => return None,
                };
                edge(
                    WearState::Trail {
                        fertility,
                        wear: next,
                    },
                    threshold,
                )
            }
            WearState::ForestFloor { .. } => edge(
                WearState::plain_soil(FOREST_FLOOR_FERTILITY),
                self.forest_floor_to_soil,
            ),
            WearState::Grassy { medium, cover } => {
                if cover == GrassCover::None {
                    return None;
                }
                let threshold = match medium {
                    GrassyMedium::Cob => self.cob_lose_grass,
                    GrassyMedium::Peat => self.peat_lose_grass,
                    GrassyMedium::Clay(_) => self.clay_lose_grass,
                };
                edge(
                    WearState::Grassy {
                        medium,
                        cover: GrassCover::None,
                    },
                    threshold,
                )
            }
        }
    }

    /// Previous state after one decay period. Only trail blocks decay.
    pub fn backward(&self, state: WearState) -> Option<WearState> {
        self.devolve(state, 1)
    }

    /// Idle days per devolution level for the state, if it decays at all.
    pub fn decay_period_days(&self, state: WearState) -> Option<f64> {
        match state {
            WearState::Trail {
                wear: TrailWear::Pretrail,
                ..
            } => Some(self.pretrail_decay_days),
            WearState::Trail { .. } => Some(self.trail_decay_days),
            _ => None,
        }
    }

    /// State reached by devolving `levels` levels in a single step.
    ///
    /// Landing exactly on level 0 gives trampled soil; overshooting it gives
    /// plain untrampled soil, which does not decay any further.
    pub fn devolve(&self, state: WearState, levels: u32) -> Option<WearState> {
        let WearState::Trail { fertility, wear } = state else {
            return None;
        };
        let target = wear.level() as i64 - levels as i64;
        if target < 0 {
            return Some(WearState::plain_soil(fertility));
        }
        let wear = TrailWear::from_level(target as u8)?;
        Some(WearState::Trail { fertility, wear })
    }
}
