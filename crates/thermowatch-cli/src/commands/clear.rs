//! `thermowatch clear` — delete the history after confirmation.

use std::io::{self, BufRead, Write};

use thermowatch_core::{DashboardConfig, FileBackend, RecordStore};

/// Works on the store directly: clearing must succeed even when the history
/// no longer parses.
pub fn run(config: &DashboardConfig, yes: bool) {
    let mut store = RecordStore::new(FileBackend::new(&config.data_dir));

    if !yes {
        let question = match store.len() {
            Ok(count) => format!("Delete all {count} recorded temperatures?"),
            Err(e) => {
                eprintln!("Warning: {e}");
                "Delete the unreadable history?".to_string()
            }
        };
        if !confirm(&question) {
            println!("Nothing deleted.");
            return;
        }
    }

    if let Err(e) = store.clear() {
        eprintln!("Error clearing history: {e}");
        std::process::exit(1);
    }
    println!("History cleared.");
}

fn confirm(question: &str) -> bool {
    print!("{question} [y/N] ");
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    is_yes(&answer)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
