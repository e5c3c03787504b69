use thiserror::Error;
use wayworn_core::TrailConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be at least 1 touch (got 0)")]
    ZeroTouchCount { field: &'static str },
    #[error("{field} must be a positive number of days (got {value})")]
    NonPositiveDays { field: &'static str, value: f64 },
    #[error("{field} must be at least 1 (got 0)")]
    ZeroSize { field: &'static str },
    #[error("{field} must be a finite value >= 0 (got {value})")]
    NegativeValue { field: &'static str, value: f64 },
    #[error("ice_break_chance must be within [0, 1] (got {0})")]
    ChanceOutOfRange(f64),
    #[error("immediate_touch_radius {immediate} exceeds tracking_radius {tracking}")]
    RadiusOrder { immediate: f64, tracking: f64 },
}

/// Check every setting, resetting each invalid one to its default.
/// Returns one error per reset field.
pub fn validate_config(config: &mut TrailConfig) -> Vec<ValidationError> {
    let defaults = TrailConfig::default();
    let mut errors = Vec::new();

    macro_rules! touch_counts {
        ($($field:ident),* $(,)?) => {
            $(
                if config.$field == 0 {
                    errors.push(ValidationError::ZeroTouchCount { field: stringify!($field) });
                    config.$field = defaults.$field;
                }
            )*
        };
    }

    touch_counts!(
        normal_to_sparse_grass_touch_count,
        sparse_to_very_sparse_grass_touch_count,
        very_sparse_to_soil_touch_count,
        soil_to_trampled_soil_touch_count,
        trampled_soil_to_new_trail_touch_count,
        new_to_established_trail_touch_count,
        established_to_very_established_touch_count,
        very_established_to_old_touch_count,
        old_to_dirt_road_touch_count,
        dirt_road_to_highway_touch_count,
        forest_floor_to_soil_touch_count,
        cob_lose_grass_touch_count,
        peat_lose_grass_touch_count,
        clay_lose_grass_touch_count,
    );

    // Zero or negative periods would make every tick devolve without bound.
    for (field, value, default) in [
        (
            "trampled_soil_devolve_days",
            &mut config.trampled_soil_devolve_days,
            defaults.trampled_soil_devolve_days,
        ),
        (
            "trail_devolve_days",
            &mut config.trail_devolve_days,
            defaults.trail_devolve_days,
        ),
    ] {
        if !(value.is_finite() && *value > 0.0) {
            errors.push(ValidationError::NonPositiveDays {
                field,
                value: *value,
            });
            *value = default;
        }
    }

    for (field, value, default) in [
        (
            "min_entity_hull_size_x",
            &mut config.min_entity_hull_size_x,
            defaults.min_entity_hull_size_x,
        ),
        (
            "min_entity_hull_size_y",
            &mut config.min_entity_hull_size_y,
            defaults.min_entity_hull_size_y,
        ),
    ] {
        if !(value.is_finite() && *value >= 0.0) {
            errors.push(ValidationError::NegativeValue {
                field,
                value: *value as f64,
            });
            *value = default;
        }
    }

    for (field, value, default) in [
        (
            "immediate_touch_radius",
            &mut config.immediate_touch_radius,
            defaults.immediate_touch_radius,
        ),
        (
            "tracking_radius",
            &mut config.tracking_radius,
            defaults.tracking_radius,
        ),
    ] {
        if !(value.is_finite() && *value >= 0.0) {
            errors.push(ValidationError::NegativeValue {
                field,
                value: *value,
            });
            *value = default;
        }
    }

    if config.immediate_touch_radius > config.tracking_radius {
        errors.push(ValidationError::RadiusOrder {
            immediate: config.immediate_touch_radius,
            tracking: config.tracking_radius,
        });
        config.immediate_touch_radius = config.tracking_radius;
    }

    if !(0.0..=1.0).contains(&config.ice_break_chance) {
        errors.push(ValidationError::ChanceOutOfRange(config.ice_break_chance));
        config.ice_break_chance = defaults.ice_break_chance;
    }

    for (field, value, default) in [
        (
            "deferred_batch_size",
            &mut config.deferred_batch_size,
            defaults.deferred_batch_size,
        ),
        (
            "snow_ice_batch_size",
            &mut config.snow_ice_batch_size,
            defaults.snow_ice_batch_size,
        ),
        (
            "deferred_queue_capacity",
            &mut config.deferred_queue_capacity,
            defaults.deferred_queue_capacity,
        ),
    ] {
        if *value == 0 {
            errors.push(ValidationError::ZeroSize { field });
            *value = default;
        }
    }

    if config.max_area_volume == 0 {
        errors.push(ValidationError::ZeroSize {
            field: "max_area_volume",
        });
        config.max_area_volume = defaults.max_area_volume;
    }

    errors
}
