//! Single source of truth for shared constants.
//! Tunable values live in `TrailConfig`; the ones here are either fixed by the
//! content pack or used as the config defaults.

/// Side length of a chunk column in blocks (x and z).
pub const CHUNK_SIZE: i32 = 32;

/// Namespace of the vanilla terrain blocks (grass soils, snow, ice).
pub const VANILLA_DOMAIN: &str = "game";

/// Namespace of the trampled soil and trail blocks.
pub const TRAIL_DOMAIN: &str = "wayworn";

/// Namespace used by the previous revision of the trail content pack.
pub const LEGACY_TRAIL_DOMAIN: &str = "trailmod";

/// Maximum number of blocks a single area protect/unprotect may cover (32^3).
pub const MAX_AREA_VOLUME: u64 = 32 * 32 * 32;

/// Minimum world time between two drains of the deferred queues.
pub const DEFERRED_PROCESS_INTERVAL_MS: u64 = 500;

/// Trail-touch items processed per drain.
pub const DEFERRED_BATCH_SIZE: usize = 20;

/// Snow/ice items processed per drain.
pub const SNOW_ICE_BATCH_SIZE: usize = 50;

/// Upper bound on queued items per deferred queue.
pub const DEFERRED_QUEUE_CAPACITY: usize = 4096;

/// Chance per drained ice item that the ice cracks.
pub const ICE_BREAK_CHANCE: f64 = 0.001;

/// Block type of the only ice that cracks under foot.
pub const LAKE_ICE_BLOCK: &str = "lakeice";

/// Players closer than this (blocks) get their nearby touches applied inline.
pub const IMMEDIATE_TOUCH_RADIUS: f64 = 10.0;

/// Touches farther than this (blocks) from every player are ignored.
pub const TRACKING_RADIUS: f64 = 150.0;

/// Interval between touch store cleanup sweeps.
pub const TRAIL_CLEANUP_INTERVAL_MS: u64 = 60_000;

/// Horizontal radius of the protected-block highlight scan.
pub const OVERLAY_SCAN_RADIUS: i32 = 10;

/// Vertical half-extent of the protected-block highlight scan.
pub const OVERLAY_Y_HALF: i32 = 6;

/// Held-item ticks between highlight refreshes.
pub const OVERLAY_TICK_THROTTLE: u32 = 3;

/// Distance (blocks, per axis) the player must move before a forced refresh.
pub const OVERLAY_MOVE_THRESHOLD: i32 = 3;

/// Chunk-column radius scanned around each player by the restore command (1 = 3x3).
pub const RESTORE_PLAYER_HALO: i32 = 1;
