use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use wayworn_bench::report;
use wayworn_bench::runner::BenchmarkRunner;
use wayworn_bench::scenes;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut tick_count = 120u32;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--baseline" => baseline_path = Some(PathBuf::from(value(&args, &mut i, flag))),
            "--output" => output_path = Some(PathBuf::from(value(&args, &mut i, flag))),
            "--config" => config_path = Some(PathBuf::from(value(&args, &mut i, flag))),
            "--regression-threshold" => regression_threshold = parsed(&args, &mut i, flag),
            "--ticks" => tick_count = parsed(&args, &mut i, flag),
            "--help" | "-h" => {
                eprintln!("Usage: bench-runner [OPTIONS]");
                eprintln!("  --baseline <path>              Load baseline JSON for comparison");
                eprintln!("  --output <path>                Save current results as JSON baseline");
                eprintln!("  --config <path>                Trail configuration RON file");
                eprintln!(
                    "  --regression-threshold <pct>   Regression threshold percentage (default: 10)"
                );
                eprintln!("  --ticks <n>                    Ticks per scene (default: 120)");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let source = config_path.as_ref().and_then(|path| match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(err) => {
            log::warn!("Cannot read {}: {err}", path.display());
            None
        }
    });
    let loaded = wayworn_config::load_config(source.as_deref());
    if !loaded.warnings.is_empty() {
        log::warn!("{} configuration problems, see above", loaded.warnings.len());
    }

    let runner = BenchmarkRunner::new(loaded.config, tick_count);
    let mut results = Vec::new();
    for config in &scenes::standard_scenes() {
        match runner.run_scene(config) {
            Some(result) => results.push(result),
            None => process::exit(1),
        }
    }

    println!("\n## Trail Benchmark Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: timestamp(),
            results: results.clone(),
        };
        if let Err(err) = report::save_baseline(path, &baseline) {
            eprintln!("ERROR: failed to save baseline {}: {err}", path.display());
            process::exit(1);
        }
        log::info!("Saved baseline to {}", path.display());
    }

    let Some(path) = baseline_path else {
        log::info!("Benchmark complete.");
        return;
    };
    let Some(baseline) = report::load_baseline(&path) else {
        log::warn!("No usable baseline at {}, skipping comparison", path.display());
        return;
    };
    let regressions = report::compare(&results, &baseline, regression_threshold);
    print!("{}", report::format_comparison(&regressions, regression_threshold));
    if !regressions.is_empty() {
        process::exit(1);
    }
    log::info!("Benchmark complete.");
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> &'a str {
    *i += 1;
    match args.get(*i) {
        Some(v) => v,
        None => {
            eprintln!("Missing value for {flag}");
            process::exit(1);
        }
    }
}

fn parsed<T: FromStr>(args: &[String], i: &mut usize, flag: &str) -> T {
    let raw = value(args, i, flag);
    match raw.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Invalid {flag} value: {raw}");
            process::exit(1);
        }
    }
}

fn timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("bench-{secs}")
}
