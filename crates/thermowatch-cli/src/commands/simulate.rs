//! `thermowatch simulate` — run the random walk in the foreground.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use thermowatch_core::{DashboardConfig, TemperatureRecord};

use super::{apply_simulation_args, format_local, open_controller, parse_duration};

pub fn run(
    mut config: DashboardConfig,
    duration: Option<&str>,
    interval: &str,
    seed_policy: &str,
    seed: Option<u64>,
) {
    apply_simulation_args(&mut config, interval, seed_policy, seed);
    let max_duration = duration.map(|d| {
        parse_duration(d).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        })
    });

    let mut controller = open_controller(&config);
    // A dashboard session that left auto mode on should still resume after
    // this run ends.
    let keep_auto_mode = controller.store().auto_mode().unwrap_or(false);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        eprintln!("Error setting Ctrl+C handler: {e}");
        std::process::exit(1);
    }

    println!("Simulating temperatures");
    println!("  Interval:     {}ms", config.simulation.period.as_millis());
    println!("  Seed policy:  {}", config.simulation.seed_policy);
    match max_duration {
        Some(d) => println!("  Duration:     {}s", d.as_secs()),
        None => println!("  Duration:     until Ctrl+C"),
    }
    println!("  Data dir:     {}", config.data_dir.display());
    println!();

    let start = Instant::now();
    let mut produced = 0usize;
    match controller.start(start) {
        Ok(Some(record)) => {
            produced += 1;
            print_record(&record);
        }
        Ok(None) => {}
        Err(e) => eprintln!("Error saving sample: {e}"),
    }

    while running.load(Ordering::SeqCst) {
        if let Some(max) = max_duration
            && start.elapsed() >= max
        {
            break;
        }

        match controller.poll(Instant::now()) {
            Ok(Some(record)) => {
                produced += 1;
                print_record(&record);
            }
            Ok(None) => {}
            Err(e) => eprintln!("Error saving sample: {e}"),
        }

        std::thread::sleep(Duration::from_millis(10));
    }

    if keep_auto_mode {
        controller.shutdown();
    } else {
        controller.stop();
    }

    println!();
    println!(
        "Stopped after {:.1}s, {produced} samples recorded.",
        start.elapsed().as_secs_f64()
    );
}

fn print_record(record: &TemperatureRecord) {
    println!("  {}  {:>6.1}°C", format_local(&record.date), record.value);
}
