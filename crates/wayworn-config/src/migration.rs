use std::collections::HashMap;

use wayworn_core::constants::{LEGACY_TRAIL_DOMAIN, TRAIL_DOMAIN};
use wayworn_core::{BlockCode, Fertility, TrailWear, WearState};

/// Maps block codes of a previous content-pack revision to their current codes.
/// Codes not in the table pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct CodeRemap {
    legacy_to_current: HashMap<BlockCode, BlockCode>,
}

impl CodeRemap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for the `trailmod` -> `wayworn` migration: every pretrail soil
    /// (plain and `block-` prefixed legacy forms) and every fertility x wear
    /// trail code the previous revision shipped.
    pub fn legacy_trail_pack() -> Self {
        let mut remap = Self::new();
        for fertility in Fertility::ALL {
            let pretrail = WearState::Trail {
                fertility,
                wear: TrailWear::Pretrail,
            }
            .code();
            remap.insert(
                BlockCode::new(LEGACY_TRAIL_DOMAIN, pretrail.path.clone()),
                pretrail.clone(),
            );
            remap.insert(
                BlockCode::new(LEGACY_TRAIL_DOMAIN, format!("block-{}", pretrail.path)),
                pretrail,
            );

            for wear in [
                TrailWear::New,
                TrailWear::Established,
                TrailWear::VeryEstablished,
                TrailWear::Old,
            ] {
                let current = WearState::Trail { fertility, wear }.code();
                remap.insert(
                    BlockCode::new(LEGACY_TRAIL_DOMAIN, current.path.clone()),
                    current,
                );
            }
        }
        debug_assert!(remap
            .legacy_to_current
            .values()
            .all(|code| code.is_domain(TRAIL_DOMAIN)));
        remap
    }

    /// Register a mapping. A later insert for the same legacy code wins.
    pub fn insert(&mut self, legacy: BlockCode, current: BlockCode) {
        self.legacy_to_current.insert(legacy, current);
    }

    /// Current code for a legacy code, if mapped.
    pub fn get(&self, legacy: &BlockCode) -> Option<&BlockCode> {
        self.legacy_to_current.get(legacy)
    }

    /// Remap a single `domain:path` string. Unmapped codes are returned as-is.
    pub fn remap_str(&self, code: &str) -> String {
        match self.get(&BlockCode::parse(code)) {
            Some(current) => current.to_string(),
            None => code.to_string(),
        }
    }

    /// Rewrite every mapped code in place; returns how many were changed.
    pub fn apply(&self, codes: &mut [String]) -> usize {
        let mut changed = 0;
        for code in codes.iter_mut() {
            if let Some(current) = self.get(&BlockCode::parse(code)) {
                *code = current.to_string();
                changed += 1;
            }
        }
        if changed > 0 {
            log::info!("Remapped {changed} legacy block codes");
        }
        changed
    }

    /// Number of mapped legacy codes.
    pub fn len(&self) -> usize {
        self.legacy_to_current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legacy_to_current.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_table_size() {
        // 5 fertilities x (2 pretrail forms + 4 wears)
        let remap = CodeRemap::legacy_trail_pack();
        assert_eq!(remap.len(), 30);
        assert!(!remap.is_empty());
    }

    #[test]
    fn test_prefixed_pretrail_form_remapped() {
        let remap = CodeRemap::legacy_trail_pack();
        assert_eq!(
            remap.remap_str("trailmod:block-soil-verylow-pretrail"),
            "wayworn:soil-verylow-pretrail"
        );
        assert_eq!(
            remap.remap_str("trailmod:soil-compost-pretrail"),
            "wayworn:soil-compost-pretrail"
        );
    }

    #[test]
    fn test_trail_codes_remapped() {
        let remap = CodeRemap::legacy_trail_pack();
        assert_eq!(
            remap.remap_str("trailmod:trail-high-veryestablished"),
            "wayworn:trail-high-veryestablished"
        );
    }

    #[test]
    fn test_unmapped_codes_pass_through() {
        let remap = CodeRemap::legacy_trail_pack();
        assert_eq!(remap.remap_str("game:soil-high-none"), "game:soil-high-none");
        assert_eq!(
            remap.remap_str("wayworn:trail-high-new"),
            "wayworn:trail-high-new"
        );
    }

    #[test]
    fn test_apply_counts_changes() {
        let remap = CodeRemap::legacy_trail_pack();
        let mut codes = vec![
            "trailmod:trail-low-old".to_string(),
            "game:rock-granite".to_string(),
            "trailmod:soil-medium-pretrail".to_string(),
        ];
        assert_eq!(remap.apply(&mut codes), 2);
        assert_eq!(codes[0], "wayworn:trail-low-old");
        assert_eq!(codes[1], "game:rock-granite");
        assert_eq!(codes[2], "wayworn:soil-medium-pretrail");
    }

    #[test]
    fn test_custom_entry_overrides() {
        let mut remap = CodeRemap::new();
        assert!(remap.is_empty());
        remap.insert(
            BlockCode::parse("old:thing"),
            BlockCode::parse("new:thing"),
        );
        assert_eq!(
            remap.get(&BlockCode::parse("old:thing")),
            Some(&BlockCode::parse("new:thing"))
        );
    }
}
