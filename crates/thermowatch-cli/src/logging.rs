//! Logger setup. `RUST_LOG` overrides the default filter.

use std::fs::{self, File};
use std::path::Path;

const DEFAULT_FILTER: &str = "warn";

/// File the dashboard logs to, inside the data directory.
pub const LOG_FILE: &str = "thermowatch.log";

/// Log to stderr, for the one-shot commands.
pub fn init_stderr() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
        .init();
}

/// Log to `<data_dir>/thermowatch.log` so output never lands on the TUI.
/// Falls back to no logging if the file cannot be created.
pub fn init_file(data_dir: &Path) {
    if fs::create_dir_all(data_dir).is_err() {
        return;
    }
    if let Ok(file) = File::create(data_dir.join(LOG_FILE)) {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
}
