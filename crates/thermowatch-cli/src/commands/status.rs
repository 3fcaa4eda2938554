//! `thermowatch status` — latest reading and gauge position.

use thermowatch_core::{DashboardConfig, gauge_state};

use super::{format_local, open_controller};

pub fn run(config: &DashboardConfig) {
    let controller = open_controller(config);
    let (records, auto_mode) = match (controller.records(), controller.store().auto_mode()) {
        (Ok(r), Ok(a)) => (r, a),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error reading history: {e}");
            std::process::exit(1);
        }
    };

    let gauge = gauge_state(&records, &config.gauge_band);

    println!("thermowatch v{}", thermowatch_core::VERSION);
    println!("  Data dir:   {}", config.data_dir.display());
    println!("  Records:    {}", records.len());
    match records.last() {
        Some(latest) => println!(
            "  Latest:     {}°C at {}",
            latest.value,
            format_local(&latest.date)
        ),
        None => println!("  Latest:     —"),
    }
    println!(
        "  Gauge:      {:.1}°C  ({:.0}% of {}..{}°C)",
        gauge.value,
        gauge.fill * 100.0,
        config.gauge_band.min(),
        config.gauge_band.max()
    );
    println!(
        "  Auto mode:  {}",
        if auto_mode {
            "on (resumes in monitor)"
        } else {
            "off"
        }
    );
}
