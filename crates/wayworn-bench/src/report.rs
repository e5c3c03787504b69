use std::path::Path;

use crate::runner::BenchmarkResult;

/// A complete baseline containing results from all scenes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub timestamp: String,
    pub results: Vec<BenchmarkResult>,
}

/// Load a baseline from a JSON file. Returns None if the file doesn't exist or is malformed.
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(baseline) => Some(baseline),
        Err(err) => {
            log::warn!("Ignoring malformed baseline {}: {err}", path.display());
            None
        }
    }
}

/// Save a baseline to a JSON file.
pub fn save_baseline(path: &Path, baseline: &Baseline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Compare current results against a baseline. Returns the scenes whose mean
/// tick time grew by more than `threshold_pct`, with the percent change.
pub fn compare(
    current: &[BenchmarkResult],
    baseline: &Baseline,
    threshold_pct: f64,
) -> Vec<(String, f64)> {
    let mut regressions = Vec::new();

    for result in current {
        let Some(base) = baseline
            .results
            .iter()
            .find(|b| b.scene_name == result.scene_name)
        else {
            continue;
        };
        if base.timings.mean_ms <= 0.0 {
            continue;
        }
        let pct_change =
            (result.timings.mean_ms - base.timings.mean_ms) / base.timings.mean_ms * 100.0;
        if pct_change > threshold_pct {
            regressions.push((result.scene_name.clone(), pct_change));
        }
    }

    regressions
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Entities | Collisions | Mean (ms) | Median (ms) | P95 (ms) | P99 (ms) | Max (ms) | Worst call (us) |\n");
    out.push_str("|-------|----------|------------|-----------|-------------|----------|----------|----------|-----------------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} | {:.1} |\n",
            r.scene_name,
            r.entities,
            r.collisions,
            r.timings.mean_ms,
            r.timings.median_ms,
            r.timings.p95_ms,
            r.timings.p99_ms,
            r.timings.max_ms,
            r.worst_call_us,
        ));
    }

    out
}

/// Summarize a comparison: one line per slowed scene, or a single all-clear line.
pub fn format_comparison(regressions: &[(String, f64)], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!("No scene slowed down by more than {threshold_pct:.0}%.\n");
    }
    let lines: Vec<String> = regressions
        .iter()
        .map(|(scene, pct)| format!("  - {scene}: mean tick +{pct:.1}%"))
        .collect();
    format!(
        "{} scene(s) slower than baseline by more than {threshold_pct:.0}%:\n{}\n",
        regressions.len(),
        lines.join("\n")
    )
}
