//! `thermowatch add` — record one manual reading.

use thermowatch_core::{Celsius, DashboardConfig};

use super::{format_local, open_controller};

pub fn run(config: &DashboardConfig, value: &str) {
    let celsius: Celsius = match value.parse() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut controller = open_controller(config);
    match controller.add_manual(celsius) {
        Ok(record) => {
            println!("Recorded {celsius} at {}", format_local(&record.date));
            println!("  id: {}", record.id);
        }
        Err(e) => {
            eprintln!("Error saving reading: {e}");
            std::process::exit(1);
        }
    }
}
