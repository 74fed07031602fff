//! Sweep one calculator request across a range of annual rates
//!
//! Usage: rate_sweep <request.json> [--json]
//!
//! Accepts the rate grid via environment variables:
//!   SWEEP_RATES                     comma-separated rates in percent (takes precedence)
//!   SWEEP_FROM, SWEEP_TO, SWEEP_STEP  evenly spaced grid (defaults 1, 10, 1)
//! FINCALC_JSON=1 behaves like --json.

use anyhow::{bail, Context, Result};
use fincalc::loader::load_request;
use fincalc::{ScenarioRunner, Settings};
use std::env;
use std::time::Instant;

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn main() -> Result<()> {
    env_logger::init();

    let settings = Settings::from_env();
    let json_output = env::args().any(|arg| arg == "--json") || settings.json;
    let Some(path) = env::args().skip(1).find(|arg| !arg.starts_with("--")) else {
        bail!("usage: rate_sweep <request.json> [--json]");
    };

    let request = load_request(&path).with_context(|| format!("loading request {path}"))?;

    // Read config from environment or use defaults
    let rates: Vec<f64> = match env::var("SWEEP_RATES") {
        Ok(list) => list
            .split(',')
            .map(|s| s.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .context("SWEEP_RATES must be a comma-separated list of numbers")?,
        Err(_) => ScenarioRunner::rate_grid(
            env_f64("SWEEP_FROM", 1.0),
            env_f64("SWEEP_TO", 10.0),
            env_f64("SWEEP_STEP", 1.0),
        ),
    };

    let start = Instant::now();
    let calculator = request.name();
    let runner = ScenarioRunner::new(request);
    let Some(points) = runner.sweep(&rates) else {
        bail!("{calculator} requests have no annual rate to sweep");
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    println!("Rate sweep: {calculator} ({} rates)", points.len());
    println!("{:>10} {:>24} {:>16}", "Rate %", "Metric", "Value");
    println!("{}", "-".repeat(52));
    for point in &points {
        match (point.metric, point.value) {
            (Some(metric), Some(value)) => {
                println!("{:>10.3} {:>24} {:>16.2}", point.annual_rate, metric, value)
            }
            _ => println!("{:>10.3} {:>24} {}", point.annual_rate, "invalid", point.errors.join("; ")),
        }
    }
    println!("\nCompleted in {:?}", start.elapsed());

    Ok(())
}
