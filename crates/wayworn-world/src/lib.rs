pub mod deferred;
pub mod devolution;
pub mod error;
pub mod event;
pub mod memory_grid;
pub mod overlay;
pub mod persistence;
pub mod progression;
pub mod protection;
pub mod restore;
pub mod rng;
pub mod streaming;
pub mod touch_store;

use deferred::{DeferredQueues, DeferredTouch, SnowIceItem, SnowIceStats};
use devolution::DevolveOutcome;
use error::WorldError;
use event::{CollisionEvent, CollisionObserver, EntityKind, Facing, GameMode};
use glam::IVec3;
use overlay::OverlayThrottle;
use persistence::SavedState;
use progression::TouchOutcome;
use protection::ProtectionIndex;
use restore::RestoreReport;
use streaming::CleanupPolicy;
use touch_store::TouchStore;
use wayworn_core::constants::RESTORE_PLAYER_HALO;
use wayworn_core::{
    column_of, BlockMaterial, BlockPos, ColumnCoord, GridAccess, TrailConfig, WearCatalog,
    GRID_API_VERSION,
};

/// Why a collision was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Protected,
    EntityDead,
    NotAnAgent,
    NoPlayerNearby,
    GameMode,
    NotAPlayer,
    HullTooSmall,
}

/// What one collision did.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CollisionOutcome {
    pub skipped: Option<SkipReason>,
    /// Result of a touch applied inline.
    pub touch: Option<TouchOutcome>,
    pub touch_deferred: bool,
    pub snow_ice_queued: bool,
    pub drained: Option<DrainStats>,
}

impl CollisionOutcome {
    fn skipped(reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Default::default()
        }
    }
}

/// What one drain of the deferred queues did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainStats {
    pub snow_ice: SnowIceStats,
    pub touches_applied: usize,
    pub touches_stale: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub swept_columns: Option<usize>,
    pub drained: Option<DrainStats>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub touch_entries: usize,
    pub protections: usize,
}

/// Refuse a grid facade built against another revision of `GridAccess`.
pub fn check_api_version(actual: u32) -> Result<(), WorldError> {
    if actual != GRID_API_VERSION {
        return Err(WorldError::ApiVersion {
            expected: GRID_API_VERSION,
            actual,
        });
    }
    Ok(())
}

/// Owner of all trail state for one world.
///
/// Created when the world loads and dropped when it unloads. Every entry point
/// takes the grid facade explicitly; the system never holds on to it.
pub struct TrailSystem {
    config: TrailConfig,
    catalog: WearCatalog,
    store: TouchStore,
    protection: ProtectionIndex,
    queues: DeferredQueues,
    cleanup: CleanupPolicy,
}

impl TrailSystem {
    pub fn new(grid: &dyn GridAccess, config: TrailConfig) -> Result<Self, WorldError> {
        check_api_version(grid.api_version())?;
        log::info!(
            "Trail system started (roads {}, creative trampling {})",
            if config.roads_enabled { "on" } else { "off" },
            if config.creative_trampling { "on" } else { "off" },
        );
        Ok(Self {
            catalog: WearCatalog::from_config(&config),
            store: TouchStore::new(),
            protection: ProtectionIndex::new(config.max_area_volume),
            queues: DeferredQueues::new(&config),
            cleanup: CleanupPolicy::new(config.cleanup_interval_ms),
            config,
        })
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn catalog(&self) -> &WearCatalog {
        &self.catalog
    }

    pub fn touch_store(&self) -> &TouchStore {
        &self.store
    }

    pub fn protection(&self) -> &ProtectionIndex {
        &self.protection
    }

    /// Tool-facing protection operations.
    pub fn protection_mut(&mut self) -> &mut ProtectionIndex {
        &mut self.protection
    }

    /// A highlight throttle for one tool holder.
    pub fn overlay_throttle(&self) -> OverlayThrottle {
        OverlayThrottle::new(&self.config)
    }

    /// Queued (trail touches, snow/ice items).
    pub fn pending_deferred(&self) -> (usize, usize) {
        (self.queues.pending_touches(), self.queues.pending_snow_ice())
    }

    pub fn handle_collision(
        &mut self,
        grid: &mut dyn GridAccess,
        event: &CollisionEvent,
    ) -> CollisionOutcome {
        let pos = event.block_pos;
        if self.protection.is_protected(pos) {
            return CollisionOutcome::skipped(SkipReason::Protected);
        }
        if !event.alive || !grid.is_entity_alive(event.entity_id) {
            return CollisionOutcome::skipped(SkipReason::EntityDead);
        }
        if event.entity_kind == EntityKind::Passive {
            return CollisionOutcome::skipped(SkipReason::NotAnAgent);
        }

        let tracking_sq = self.config.tracking_radius * self.config.tracking_radius;
        let Some(distance_sq) = grid
            .nearest_player_distance_sq(event.entity_pos)
            .filter(|d| *d <= tracking_sq)
        else {
            return CollisionOutcome::skipped(SkipReason::NoPlayerNearby);
        };
        let immediate_sq = self.config.immediate_touch_radius * self.config.immediate_touch_radius;
        let immediate = distance_sq <= immediate_sq;

        match event.entity_kind {
            EntityKind::Player(GameMode::Survival) => {}
            EntityKind::Player(GameMode::Creative) if self.config.creative_trampling => {}
            EntityKind::Player(_) => return CollisionOutcome::skipped(SkipReason::GameMode),
            _ if self.config.only_players_create_trails => {
                return CollisionOutcome::skipped(SkipReason::NotAPlayer)
            }
            _ => {}
        }
        if event.hull_size.x < self.config.min_entity_hull_size_x
            || event.hull_size.y < self.config.min_entity_hull_size_y
        {
            return CollisionOutcome::skipped(SkipReason::HullTooSmall);
        }

        let mut outcome = CollisionOutcome::default();
        let block_id = grid.block_at(pos);
        let tracked = grid
            .block_code(block_id)
            .and_then(|code| self.catalog.classify(code))
            .is_some();

        // Only the top face of blocks below the entity's feet wears.
        if tracked && event.facing == Facing::Up && (pos.y as f64) < event.entity_pos.y {
            if immediate {
                outcome.touch = self.touch(grid, pos);
            } else {
                outcome.touch_deferred = self.queues.push_touch(DeferredTouch {
                    pos,
                    block_id,
                    entity_id: event.entity_id,
                    enqueued_ms: grid.elapsed_millis(),
                });
            }
        }

        let material = grid.block_material(block_id);
        if matches!(material, BlockMaterial::Snow | BlockMaterial::Ice)
            && event.bounds.covers_block_centre(pos)
        {
            outcome.snow_ice_queued = self.queues.push_snow_ice(SnowIceItem {
                pos,
                block_id,
                material,
            });
        }

        outcome.drained = self.drain_deferred(grid);
        outcome
    }

    /// Drain both queues if the drain interval has elapsed.
    pub fn drain_deferred(&mut self, grid: &mut dyn GridAccess) -> Option<DrainStats> {
        if !self.queues.begin_drain(grid.elapsed_millis()) {
            return None;
        }
        let mut stats = DrainStats {
            snow_ice: self.queues.drain_snow_ice(grid),
            ..Default::default()
        };
        for item in self.queues.take_touch_batch() {
            if grid.block_at(item.pos) != item.block_id
                || !grid.is_entity_alive(item.entity_id)
                || self.protection.is_protected(item.pos)
            {
                stats.touches_stale += 1;
                continue;
            }
            if self.touch(grid, item.pos).is_some() {
                stats.touches_applied += 1;
            }
        }
        if stats != DrainStats::default() {
            log::debug!(
                "Deferred drain: {} touches applied, {} stale, {} snow/ice processed",
                stats.touches_applied,
                stats.touches_stale + stats.snow_ice.stale,
                stats.snow_ice.processed
            );
        }
        Some(stats)
    }

    fn touch(&mut self, grid: &mut dyn GridAccess, pos: BlockPos) -> Option<TouchOutcome> {
        self.ensure_column(grid, column_of(pos));
        match progression::apply_touch(grid, &self.catalog, &mut self.store, pos) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                log::error!("Trail progression aborted: {err}");
                None
            }
        }
    }

    fn devolve(&mut self, grid: &mut dyn GridAccess, pos: BlockPos) -> Option<DevolveOutcome> {
        match devolution::devolve_block(grid, &self.catalog, &mut self.store, pos) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                log::error!("Trail devolution skipped: {err}");
                None
            }
        }
    }

    /// Columns the host never announced are brought online on first use.
    fn ensure_column(&mut self, grid: &mut dyn GridAccess, column: ColumnCoord) {
        if !self.store.is_loaded(column) {
            self.on_chunk_load(grid, column);
        }
    }

    /// Per-block tick: devolve the block if it has been idle long enough.
    /// Protected positions never devolve.
    pub fn on_block_tick(
        &mut self,
        grid: &mut dyn GridAccess,
        pos: BlockPos,
    ) -> Option<DevolveOutcome> {
        if self.protection.is_protected(pos) {
            return None;
        }
        self.ensure_column(grid, column_of(pos));
        self.devolve(grid, pos)
    }

    /// Bring a column's touch data online. Entries whose live block left the
    /// wear chain are discarded; the rest catch up on devolution at once.
    /// Returns the number of restored entries (0 when already loaded).
    pub fn on_chunk_load(&mut self, grid: &mut dyn GridAccess, column: ColumnCoord) -> usize {
        let catalog = &self.catalog;
        let view: &dyn GridAccess = grid;
        let Some(restored) = self.store.on_chunk_load(column, |entry| {
            persistence::entry_matches_grid(view, catalog, entry)
        }) else {
            return 0;
        };
        for &pos in &restored {
            if !self.protection.is_protected(pos) {
                self.devolve(grid, pos);
            }
        }
        restored.len()
    }

    pub fn on_chunk_unload(&mut self, column: ColumnCoord) -> bool {
        self.store.on_chunk_unload(column)
    }

    pub fn on_block_broken(&mut self, pos: BlockPos, player: &str) {
        if self.protection.clear(pos) {
            log::debug!("{player} broke trample protected block at {pos}");
        }
        self.store.forget(pos);
    }

    pub fn on_block_exploded(&mut self, pos: BlockPos) {
        self.protection.clear(pos);
    }

    /// A new block never inherits the protection of the one it replaced.
    pub fn on_block_placed(&mut self, pos: BlockPos) {
        self.protection.clear(pos);
    }

    /// Periodic housekeeping: the cleanup sweep and a deferred drain.
    pub fn tick(&mut self, grid: &mut dyn GridAccess) -> TickReport {
        TickReport {
            swept_columns: self.cleanup.update(&mut self.store, grid),
            drained: self.drain_deferred(grid),
        }
    }

    pub fn save(&self, grid: &dyn GridAccess) -> SavedState {
        persistence::save_state(&self.store, &self.protection, grid.elapsed_days())
    }

    /// Replace all trail state with a saved state and bring the grid's loaded
    /// columns online. Both payloads are attempted; the first error is returned.
    pub fn load(
        &mut self,
        grid: &mut dyn GridAccess,
        saved: &SavedState,
    ) -> Result<LoadReport, WorldError> {
        self.store.reset();
        let touches = persistence::restore_touches(&mut self.store, &saved.touches);
        let protections = persistence::restore_protections(&mut self.protection, &saved.protections);
        if protections.is_err() {
            // Protections and touch data always come from the same save.
            self.protection.restore(Vec::new());
        }

        for column in grid.loaded_columns() {
            self.on_chunk_load(grid, column);
        }

        let report = LoadReport {
            touch_entries: touches?,
            protections: protections?,
        };
        log::info!(
            "Loaded {} touch entries and {} protections",
            report.touch_entries,
            report.protections
        );
        Ok(report)
    }

    /// Rewrite every trail block in the changed and loaded columns, and around
    /// each player, back to plain soil.
    pub fn restore_base_terrain(&mut self, grid: &mut dyn GridAccess) -> RestoreReport {
        let columns = restore::target_columns(
            &grid.changed_columns(),
            &grid.loaded_columns(),
            &grid.player_positions(),
            RESTORE_PLAYER_HALO,
        );
        restore::restore_base_terrain(grid, &mut self.store, &columns)
    }

    /// Info line for the block panel at `pos`.
    pub fn block_info(&self, pos: IVec3) -> Option<String> {
        self.protection.describe(pos)
    }
}

impl CollisionObserver for TrailSystem {
    fn on_entity_collide(&mut self, grid: &mut dyn GridAccess, event: &CollisionEvent) {
        self.handle_collision(grid, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use event::EntityBox;
    use glam::{DVec3, Vec2};
    use memory_grid::MemoryGrid;
    use wayworn_core::BlockId;

    const FLOOR_Y: i32 = 60;

    fn world() -> (MemoryGrid, TrailSystem) {
        world_with(TrailConfig::default())
    }

    fn world_with(config: TrailConfig) -> (MemoryGrid, TrailSystem) {
        let mut grid = MemoryGrid::with_wear_blocks(11);
        for x in -4..4 {
            for z in -4..4 {
                grid.place(IVec3::new(x, FLOOR_Y, z), "game:soil-medium-none");
            }
        }
        grid.add_player(DVec3::new(0.5, 61.0, 0.5));
        let system = TrailSystem::new(&grid, config).expect("api version");
        (grid, system)
    }

    fn step_on(pos: IVec3, kind: EntityKind) -> CollisionEvent {
        let feet = DVec3::new(pos.x as f64 + 0.5, pos.y as f64 + 1.0, pos.z as f64 + 0.5);
        CollisionEvent {
            entity_id: 42,
            entity_kind: kind,
            alive: true,
            entity_pos: feet,
            bounds: EntityBox {
                min: feet - DVec3::new(0.3, 0.0, 0.3),
                max: feet + DVec3::new(0.3, 1.8, 0.3),
            },
            hull_size: Vec2::new(0.6, 1.8),
            block_pos: pos,
            facing: Facing::Up,
        }
    }

    fn survivor(pos: IVec3) -> CollisionEvent {
        step_on(pos, EntityKind::Player(GameMode::Survival))
    }

    fn walk(grid: &mut MemoryGrid, system: &mut TrailSystem, pos: IVec3, steps: u32) {
        for _ in 0..steps {
            system.handle_collision(&mut *grid, &survivor(pos));
        }
    }

    #[test]
    fn test_api_version_check() {
        assert!(check_api_version(GRID_API_VERSION).is_ok());
        assert!(matches!(
            check_api_version(GRID_API_VERSION + 1),
            Err(WorldError::ApiVersion { .. })
        ));
    }

    #[test]
    fn test_example_chain_then_idle_decay() {
        let (mut grid, mut system) = world();
        let pos = IVec3::new(0, FLOOR_Y, 0);

        walk(&mut grid, &mut system, pos, 1);
        assert_eq!(grid.code_at(pos), "wayworn:soil-medium-pretrail");
        walk(&mut grid, &mut system, pos, 3);
        assert_eq!(grid.code_at(pos), "wayworn:trail-medium-new");
        walk(&mut grid, &mut system, pos, 24);
        assert_eq!(grid.code_at(pos), "wayworn:trail-medium-new");
        walk(&mut grid, &mut system, pos, 1);
        assert_eq!(grid.code_at(pos), "wayworn:trail-medium-established");
        assert_eq!(system.touch_store().get(pos).map(|r| r.touch_count), Some(0));

        grid.advance_days(3.0 * system.config().trail_devolve_days);
        let outcome = system.on_block_tick(&mut grid, pos);
        assert!(matches!(outcome, Some(DevolveOutcome::Devolved { levels: 3, .. })));
        assert_eq!(grid.code_at(pos), "game:soil-medium-none");

        grid.advance_days(1_000.0);
        assert_eq!(
            system.on_block_tick(&mut grid, pos),
            Some(DevolveOutcome::NotDecaying)
        );
        assert_eq!(grid.code_at(pos), "game:soil-medium-none");
    }

    #[test]
    fn test_protected_blocks_do_not_wear_or_decay() {
        let (mut grid, mut system) = world();
        let pos = IVec3::new(1, FLOOR_Y, 1);
        assert!(system.protection_mut().try_add(&grid, pos, "alice"));

        let outcome = system.handle_collision(&mut grid, &survivor(pos));
        assert_eq!(outcome.skipped, Some(SkipReason::Protected));
        assert_eq!(grid.code_at(pos), "game:soil-medium-none");
        assert_eq!(system.on_block_tick(&mut grid, pos), None);
        assert_eq!(
            system.block_info(pos).as_deref(),
            Some("Has been trample protected by alice.")
        );
    }

    #[test]
    fn test_collision_filters() {
        let pos = IVec3::new(0, FLOOR_Y, 0);

        let (mut grid, mut system) = world();
        let creative = step_on(pos, EntityKind::Player(GameMode::Creative));
        assert_eq!(
            system.handle_collision(&mut grid, &creative).skipped,
            Some(SkipReason::GameMode)
        );
        let item = step_on(pos, EntityKind::Passive);
        assert_eq!(
            system.handle_collision(&mut grid, &item).skipped,
            Some(SkipReason::NotAnAgent)
        );
        let mut ghost = survivor(pos);
        ghost.alive = false;
        assert_eq!(
            system.handle_collision(&mut grid, &ghost).skipped,
            Some(SkipReason::EntityDead)
        );
        let mut side = survivor(pos);
        side.facing = Facing::North;
        let outcome = system.handle_collision(&mut grid, &side);
        assert_eq!(outcome.skipped, None);
        assert_eq!(outcome.touch, None);

        let (mut grid, mut system) = world_with(TrailConfig {
            creative_trampling: true,
            only_players_create_trails: true,
            min_entity_hull_size_x: 1.0,
            ..Default::default()
        });
        assert_eq!(
            system.handle_collision(&mut grid, &creative).skipped,
            Some(SkipReason::HullTooSmall)
        );
        let wolf = step_on(pos, EntityKind::Creature);
        assert_eq!(
            system.handle_collision(&mut grid, &wolf).skipped,
            Some(SkipReason::NotAPlayer)
        );
    }

    #[test]
    fn test_far_touches_are_deferred_and_drained_in_batches() {
        let (mut grid, mut system) = world();
        grid.clear_players();
        grid.add_player(DVec3::new(60.0, 61.0, 0.0));

        let mut deferred = 0;
        for x in -4..4 {
            for z in -4..4 {
                let pos = IVec3::new(x, FLOOR_Y, z);
                let outcome =
                    system.handle_collision(&mut grid, &step_on(pos, EntityKind::Creature));
                if outcome.touch_deferred {
                    deferred += 1;
                }
                assert_eq!(outcome.touch, None);
            }
        }
        assert_eq!(deferred, 64);

        // The first collision drained its own touch; the next drain needs 500 ms.
        assert_eq!(system.pending_deferred().0, 63);
        assert_eq!(system.drain_deferred(&mut grid), None);

        grid.advance_millis(500);
        let stats = system.drain_deferred(&mut grid).expect("due");
        assert_eq!(stats.touches_applied, 20);
        assert_eq!(system.pending_deferred().0, 43);

        grid.kill_entity(42);
        grid.advance_millis(500);
        let stats = system.drain_deferred(&mut grid).expect("due");
        assert_eq!(stats.touches_applied, 0);
        assert_eq!(stats.touches_stale, 20);
        assert_eq!(system.pending_deferred().0, 23);
    }

    #[test]
    fn test_no_player_in_range_ignores_touch() {
        let (mut grid, mut system) = world();
        grid.clear_players();
        grid.add_player(DVec3::new(500.0, 61.0, 0.0));
        let outcome = system.handle_collision(&mut grid, &survivor(IVec3::new(0, FLOOR_Y, 0)));
        assert_eq!(outcome.skipped, Some(SkipReason::NoPlayerNearby));
    }

    #[test]
    fn test_snow_underfoot_is_queued() {
        let (mut grid, mut system) = world();
        let pos = IVec3::new(2, FLOOR_Y + 1, 2);
        grid.place(pos, "game:snowlayer-4");

        let outcome = system.handle_collision(&mut grid, &survivor(pos));
        assert!(outcome.snow_ice_queued);
        // The first drain ran within the same call.
        assert_eq!(grid.code_at(pos), "game:snowlayer-3");
        assert_eq!(system.pending_deferred().1, 0);
    }

    #[test]
    fn test_save_reload_with_unrelated_block() {
        let (mut grid, mut system) = world();
        let kept = IVec3::new(0, FLOOR_Y, 0);
        let replaced = IVec3::new(1, FLOOR_Y, 0);
        walk(&mut grid, &mut system, kept, 2);
        walk(&mut grid, &mut system, replaced, 2);
        system
            .protection_mut()
            .try_add(&grid, IVec3::new(3, FLOOR_Y, 3), "bob");
        let saved = system.save(&grid);

        let granite = grid.id_of("game:rock-granite");
        grid.set_block(granite, replaced);

        let mut reloaded = TrailSystem::new(&grid, TrailConfig::default()).expect("api version");
        let report = reloaded.load(&mut grid, &saved).expect("load");
        assert_eq!(report.protections, 1);
        assert_eq!(report.touch_entries, 2);

        assert_eq!(reloaded.touch_store().get(replaced), None);
        assert_eq!(reloaded.touch_store().last_touch_day(replaced), None);
        assert_eq!(reloaded.touch_store().get(kept).map(|r| r.touch_count), Some(1));
        assert!(reloaded.protection().is_protected(IVec3::new(3, FLOOR_Y, 3)));
    }

    #[test]
    fn test_corrupt_touch_payload_still_loads_protections() {
        let (mut grid, mut system) = world();
        system
            .protection_mut()
            .try_add(&grid, IVec3::new(0, FLOOR_Y, 0), "bob");
        let mut saved = system.save(&grid);
        saved.touches[0] = b'X';

        let mut reloaded = TrailSystem::new(&grid, TrailConfig::default()).expect("api version");
        let result = reloaded.load(&mut grid, &saved);
        assert!(matches!(result, Err(WorldError::Persist(_))));
        assert_eq!(reloaded.protection().len(), 1);
    }

    #[test]
    fn test_corrupt_protection_payload_drops_previous_protections() {
        let (mut grid, mut system) = world();
        let walked = IVec3::new(0, FLOOR_Y, 0);
        walk(&mut grid, &mut system, walked, 2);
        let mut saved = system.save(&grid);
        saved.protections[0] = b'X';

        let stale = IVec3::new(2, FLOOR_Y, 2);
        system.protection_mut().try_add(&grid, stale, "carol");
        let result = system.load(&mut grid, &saved);
        assert!(matches!(result, Err(WorldError::Persist(_))));
        assert!(system.protection().is_empty());
        assert_eq!(system.touch_store().get(walked).map(|r| r.touch_count), Some(1));
    }

    #[test]
    fn test_unload_reload_catches_up_devolution() {
        let (mut grid, mut system) = world();
        let pos = IVec3::new(-2, FLOOR_Y, -2);
        let column = column_of(pos);
        grid.place(pos, "wayworn:trail-medium-old");
        walk(&mut grid, &mut system, pos, 1);

        assert!(system.on_chunk_unload(column));
        grid.advance_days(125.0);
        assert_eq!(system.on_chunk_load(&mut grid, column), 1);
        assert_eq!(grid.code_at(pos), "wayworn:trail-medium-established");
        assert_eq!(system.on_chunk_load(&mut grid, column), 0);
    }

    #[test]
    fn test_block_lifecycle_hooks() {
        let (mut grid, mut system) = world();
        let a = IVec3::new(0, FLOOR_Y, 0);
        let b = IVec3::new(1, FLOOR_Y, 0);
        let c = IVec3::new(2, FLOOR_Y, 0);
        for pos in [a, b, c] {
            system.protection_mut().try_add(&grid, pos, "alice");
        }
        system.handle_collision(&mut grid, &survivor(IVec3::new(3, FLOOR_Y, 0)));

        system.on_block_broken(a, "bob");
        system.on_block_exploded(b);
        system.on_block_placed(c);
        system.on_block_broken(IVec3::new(3, FLOOR_Y, 0), "bob");
        assert!(system.protection().is_empty());
        assert_eq!(
            system.touch_store().last_touch_day(IVec3::new(3, FLOOR_Y, 0)),
            None
        );
    }

    #[test]
    fn test_tick_sweeps_unloaded_columns() {
        let (mut grid, mut system) = world();
        let far = IVec3::new(300, FLOOR_Y, 0);
        grid.place(far, "game:soil-low-none");
        grid.add_player(DVec3::new(300.5, 61.0, 0.5));
        walk(&mut grid, &mut system, far, 1);
        assert!(system.touch_store().is_loaded(column_of(far)));

        system.tick(&mut grid);
        grid.unload_column(column_of(far));
        grid.advance_millis(60_000);
        let report = system.tick(&mut grid);
        assert_eq!(report.swept_columns, Some(1));
        assert!(!system.touch_store().is_loaded(column_of(far)));
    }

    #[test]
    fn test_restore_command_clears_trails() {
        let (mut grid, mut system) = world();
        let pos = IVec3::new(0, FLOOR_Y, 0);
        walk(&mut grid, &mut system, pos, 4);
        assert_eq!(grid.code_at(pos), "wayworn:trail-medium-new");

        let report = system.restore_base_terrain(&mut grid);
        assert_eq!(report.blocks_replaced, 1);
        assert_eq!(grid.code_at(pos), "game:soil-medium-none");
        assert_eq!(system.touch_store().get(pos), None);
        assert_ne!(grid.block_at(pos), BlockId::AIR);
    }

    #[test]
    fn test_observer_trait_dispatches() {
        let (mut grid, mut system) = world();
        let pos = IVec3::new(0, FLOOR_Y, 0);
        {
            let observer: &mut dyn CollisionObserver = &mut system;
            observer.on_entity_collide(&mut grid, &survivor(pos));
        }
        assert_eq!(grid.code_at(pos), "wayworn:soil-medium-pretrail");
    }
}
