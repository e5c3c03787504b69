use std::time::Instant;

use glam::{DVec3, IVec3, Vec2};
use wayworn_core::{BlockId, GridAccess, TrailConfig};
use wayworn_world::event::{CollisionEvent, EntityBox, EntityKind, Facing, GameMode};
use wayworn_world::TrailSystem;

use crate::scenes::{self, SceneConfig};

/// World time advanced per simulated tick.
const TICK_MS: u64 = 50;

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub entities: u32,
    pub collisions: u64,
    pub tick_count: u32,
    /// Slowest single collision call, in microseconds.
    pub worst_call_us: f64,
    /// Per-tick cost of all collision calls plus housekeeping.
    pub timings: TimingSeries,
}

/// Drives collision bursts against an in-memory world.
pub struct BenchmarkRunner {
    config: TrailConfig,
    tick_count: u32,
    seed: i32,
}

impl BenchmarkRunner {
    pub fn new(config: TrailConfig, tick_count: u32) -> Self {
        Self {
            config,
            tick_count,
            seed: 7,
        }
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, scene: &SceneConfig) -> Option<BenchmarkResult> {
        log::info!(
            "Running scene '{}' ({} entities)...",
            scene.name,
            scene.entities
        );

        let mut grid = scenes::build_grid(scene, self.seed);
        let mut system = match TrailSystem::new(&grid, self.config.clone()) {
            Ok(system) => system,
            Err(err) => {
                log::error!("Cannot start trail system: {err}");
                return None;
            }
        };

        let mut tick_times = Vec::with_capacity(self.tick_count as usize);
        let mut worst_call = 0.0f64;
        let mut collisions = 0u64;

        for tick in 0..self.tick_count {
            grid.advance_millis(TICK_MS);
            grid.advance_days(TICK_MS as f64 / 86_400_000.0);
            let tick_start = Instant::now();

            for entity in 0..scene.entities {
                let floor = scenes::entity_block(scene, entity, tick);
                let cover = floor + IVec3::Y;
                let standing_on = if grid.block_at(cover) != BlockId::AIR {
                    cover
                } else {
                    floor
                };
                let event = collision(entity, standing_on);

                let call_start = Instant::now();
                system.handle_collision(&mut grid, &event);
                worst_call = worst_call.max(call_start.elapsed().as_secs_f64() * 1e6);
                collisions += 1;
            }

            // Spread block ticks over the floor like a random tick scheduler would.
            for entity in 0..scene.entities.min(64) {
                let pos = scenes::entity_block(scene, entity.wrapping_mul(31), tick + 1);
                system.on_block_tick(&mut grid, pos);
            }
            system.tick(&mut grid);

            tick_times.push(tick_start.elapsed().as_secs_f64() * 1000.0);
        }

        let saved = system.save(&grid);
        let timings = compute_timings(&tick_times);
        log::info!(
            "  Done: mean={:.3}ms, p99={:.3}ms, worst call={:.1}us, {} records, save {} bytes",
            timings.mean_ms,
            timings.p99_ms,
            worst_call,
            system.touch_store().record_count(),
            saved.touches.len() + saved.protections.len()
        );

        Some(BenchmarkResult {
            scene_name: scene.name.to_string(),
            entities: scene.entities,
            collisions,
            tick_count: self.tick_count,
            worst_call_us: worst_call,
            timings,
        })
    }
}

fn collision(entity: u32, block: IVec3) -> CollisionEvent {
    let feet = DVec3::new(
        block.x as f64 + 0.5,
        block.y as f64 + 1.0,
        block.z as f64 + 0.5,
    );
    let half = DVec3::new(0.45, 0.0, 0.45);
    CollisionEvent {
        entity_id: entity as u64 + 1,
        entity_kind: if entity == 0 {
            EntityKind::Player(GameMode::Survival)
        } else {
            EntityKind::Creature
        },
        alive: true,
        entity_pos: feet,
        bounds: EntityBox {
            min: feet - half,
            max: feet + half + DVec3::new(0.0, 1.4, 0.0),
        },
        hull_size: Vec2::new(0.9, 1.4),
        block_pos: block,
        facing: Facing::Up,
    }
}

/// Compute timing statistics from a list of tick times in milliseconds.
fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
