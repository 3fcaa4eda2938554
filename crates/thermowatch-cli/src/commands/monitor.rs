use thermowatch_core::DashboardConfig;

use super::{apply_simulation_args, open_controller};

pub fn run(mut config: DashboardConfig, interval: &str, seed_policy: &str, seed: Option<u64>) {
    apply_simulation_args(&mut config, interval, seed_policy, seed);
    let controller = open_controller(&config);
    let mut app = crate::tui::app::App::new(controller, config.gauge_band);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
