//! `thermowatch export` — write the history to a file.

use std::path::{Path, PathBuf};

use thermowatch_core::{DashboardConfig, ExportError, ExportFormat, export};

use super::open_controller;

pub fn run(config: &DashboardConfig, format: &str, output: Option<&Path>) {
    let format: ExportFormat = match format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let controller = open_controller(config);
    let records = match controller.records() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error reading history: {e}");
            std::process::exit(1);
        }
    };

    let contents = match export(&records, format) {
        Ok(c) => c,
        Err(ExportError::NoData) => {
            println!("No data to export.");
            return;
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let path = output.map_or_else(|| PathBuf::from(format.file_name()), Path::to_path_buf);
    if let Err(e) = std::fs::write(&path, contents) {
        eprintln!("Error writing {}: {e}", path.display());
        std::process::exit(1);
    }
    println!("Exported {} records to {}", records.len(), path.display());
}
