pub mod add;
pub mod clear;
pub mod export;
pub mod list;
pub mod monitor;
pub mod simulate;
pub mod status;

use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use thermowatch_core::{DashboardConfig, SeedPolicy, SimulationController};

/// Timestamp layout for terminal output.
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Open the file-backed controller, exiting on a storage failure.
pub fn open_controller(config: &DashboardConfig) -> SimulationController {
    match SimulationController::open(config) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("Error opening history in {}: {e}", config.data_dir.display());
            std::process::exit(1);
        }
    }
}

/// Apply the simulation flags shared by `simulate` and `monitor`.
pub fn apply_simulation_args(
    config: &mut DashboardConfig,
    interval: &str,
    seed_policy: &str,
    seed: Option<u64>,
) {
    config.simulation.period = parse_duration(interval).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    config.simulation.seed_policy = seed_policy.parse::<SeedPolicy>().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    config.simulation.rng_seed = seed;
}

/// Parse a duration string like "5m", "30s", "1h", "100ms". A bare number is
/// seconds. Zero is rejected.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();

    let (numeric, multiplier) = if let Some(rest) = s.strip_suffix("ms") {
        (rest, 1u64)
    } else if let Some(rest) = s.strip_suffix('s') {
        (rest, 1000)
    } else if let Some(rest) = s.strip_suffix('m') {
        (rest, 60_000)
    } else if let Some(rest) = s.strip_suffix('h') {
        (rest, 3_600_000)
    } else {
        (s, 1000)
    };

    let value: u64 = numeric
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration '{s}'"))?;
    let millis = value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("duration '{s}' is too long"))?;
    if millis == 0 {
        return Err(format!("duration '{s}' must be greater than zero"));
    }
    Ok(Duration::from_millis(millis))
}

/// Record timestamp in the local time zone.
pub fn format_local(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local)
        .format(DISPLAY_DATE_FORMAT)
        .to_string()
}
