//! `thermowatch list` — print the history.

use thermowatch_core::DashboardConfig;

use super::{format_local, open_controller};

pub fn run(config: &DashboardConfig, limit: Option<usize>, json: bool) {
    let controller = open_controller(config);
    let records = match controller.records() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error reading history: {e}");
            std::process::exit(1);
        }
    };

    let skip = limit.map_or(0, |n| records.len().saturating_sub(n));
    let shown = &records[skip..];

    if json {
        match serde_json::to_string_pretty(shown) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error encoding JSON: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if records.is_empty() {
        println!("No temperatures recorded yet.");
        return;
    }

    println!("{:<38} {:>9}  {}", "ID", "°C", "Date");
    println!("{}", "─".repeat(70));
    for record in shown {
        println!(
            "{:<38} {:>9.1}  {}",
            record.id,
            record.value,
            format_local(&record.date)
        );
    }
    println!();
    if shown.len() < records.len() {
        println!("{} of {} records", shown.len(), records.len());
    } else {
        println!("{} records", records.len());
    }
}
