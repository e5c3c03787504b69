use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Every tunable of the trail system. Missing fields take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Creative-mode players wear terrain like survival players.
    pub creative_trampling: bool,
    /// Only players create trails; creatures are ignored.
    pub only_players_create_trails: bool,
    /// Old trails keep wearing into dirt roads (and highways).
    pub roads_enabled: bool,
    /// With roads enabled, stop at dirt roads instead of continuing to highways.
    pub dirt_roads_only: bool,

    /// Idle days before trampled soil devolves one level.
    pub trampled_soil_devolve_days: f64,
    /// Idle days before any trail tier devolves one level.
    pub trail_devolve_days: f64,

    pub normal_to_sparse_grass_touch_count: u32,
    pub sparse_to_very_sparse_grass_touch_count: u32,
    pub very_sparse_to_soil_touch_count: u32,
    pub soil_to_trampled_soil_touch_count: u32,
    pub trampled_soil_to_new_trail_touch_count: u32,
    pub new_to_established_trail_touch_count: u32,
    pub established_to_very_established_touch_count: u32,
    pub very_established_to_old_touch_count: u32,
    pub old_to_dirt_road_touch_count: u32,
    pub dirt_road_to_highway_touch_count: u32,
    pub forest_floor_to_soil_touch_count: u32,
    pub cob_lose_grass_touch_count: u32,
    pub peat_lose_grass_touch_count: u32,
    pub clay_lose_grass_touch_count: u32,

    /// Entities with a narrower collision box do not wear terrain.
    pub min_entity_hull_size_x: f32,
    /// Entities with a shorter collision box do not wear terrain.
    pub min_entity_hull_size_y: f32,

    /// Render the protected-block highlight for tool holders.
    pub show_protection_overlay: bool,
    /// Largest box (in blocks) an area protect/unprotect may cover.
    pub max_area_volume: u64,

    pub deferred_interval_ms: u64,
    pub deferred_batch_size: usize,
    pub snow_ice_batch_size: usize,
    pub deferred_queue_capacity: usize,
    pub ice_break_chance: f64,
    pub immediate_touch_radius: f64,
    pub tracking_radius: f64,
    pub cleanup_interval_ms: u64,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            creative_trampling: false,
            only_players_create_trails: false,
            roads_enabled: false,
            dirt_roads_only: false,
            trampled_soil_devolve_days: 7.0,
            trail_devolve_days: 60.0,
            normal_to_sparse_grass_touch_count: 1,
            sparse_to_very_sparse_grass_touch_count: 1,
            very_sparse_to_soil_touch_count: 1,
            soil_to_trampled_soil_touch_count: 1,
            trampled_soil_to_new_trail_touch_count: 3,
            new_to_established_trail_touch_count: 25,
            established_to_very_established_touch_count: 50,
            very_established_to_old_touch_count: 75,
            old_to_dirt_road_touch_count: 50,
            dirt_road_to_highway_touch_count: 75,
            forest_floor_to_soil_touch_count: 2,
            cob_lose_grass_touch_count: 1,
            peat_lose_grass_touch_count: 1,
            clay_lose_grass_touch_count: 1,
            min_entity_hull_size_x: 0.0,
            min_entity_hull_size_y: 0.0,
            show_protection_overlay: true,
            max_area_volume: MAX_AREA_VOLUME,
            deferred_interval_ms: DEFERRED_PROCESS_INTERVAL_MS,
            deferred_batch_size: DEFERRED_BATCH_SIZE,
            snow_ice_batch_size: SNOW_ICE_BATCH_SIZE,
            deferred_queue_capacity: DEFERRED_QUEUE_CAPACITY,
            ice_break_chance: ICE_BREAK_CHANCE,
            immediate_touch_radius: IMMEDIATE_TOUCH_RADIUS,
            tracking_radius: TRACKING_RADIUS,
            cleanup_interval_ms: TRAIL_CLEANUP_INTERVAL_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_fills_defaults() {
        let cfg: TrailConfig =
            ron::from_str("(trail_devolve_days: 30.0, roads_enabled: true)").expect("parse");
        assert_eq!(cfg.trail_devolve_days, 30.0);
        assert!(cfg.roads_enabled);
        assert_eq!(cfg.trampled_soil_to_new_trail_touch_count, 3);
        assert_eq!(cfg.max_area_volume, 32 * 32 * 32);
    }
}
