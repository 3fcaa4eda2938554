//! TUI application state and event loop.
//!
//! The loop owns the [`SimulationController`] and hands it the current instant
//! on every pass; a due tick appends one sample and the record snapshot is
//! refreshed. Manual entries and clears go through the same controller, so
//! the snapshot is always re-read after a mutation.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{info, warn};
use ratatui::prelude::*;

use thermowatch_core::{
    Celsius, ChartSeries, ExportError, ExportFormat, GaugeState, OperatingBand,
    SimulationController, StoreError, TemperatureRecord, chart_series, export, gauge_state,
};

// ---------------------------------------------------------------------------
// Input mode
// ---------------------------------------------------------------------------

/// What keystrokes currently mean.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a manual reading; holds the text so far.
    Editing(String),
    /// Waiting for y/n before clearing the history.
    ConfirmClear,
}

/// Message shown under the chart until the next one replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    controller: SimulationController,
    gauge_band: OperatingBand,
    records: Vec<TemperatureRecord>,
    running: bool,
    mode: InputMode,
    status: Option<StatusMessage>,
    export_dir: PathBuf,
}

impl App {
    pub fn new(controller: SimulationController, gauge_band: OperatingBand) -> Self {
        Self {
            controller,
            gauge_band,
            records: Vec::new(),
            running: true,
            mode: InputMode::Normal,
            status: None,
            export_dir: PathBuf::from("."),
        }
    }

    /// Directory that `e`/`j`/`t` exports are written to.
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        self.open_session(Instant::now());
        let result = self.run_loop(&mut terminal);
        self.controller.shutdown();

        // Always restore terminal, even if the loop returned an error.
        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        while self.running {
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(50))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key);
            }

            self.tick(Instant::now());
        }

        Ok(())
    }

    /// Seed an empty history and resume auto mode if it was left on.
    pub fn open_session(&mut self, now: Instant) {
        if let Err(e) = self.controller.seed_if_empty() {
            self.report_store_error("Could not seed history", &e);
        }
        if let Err(e) = self.controller.resume_if_requested(now) {
            self.report_store_error("Could not resume auto mode", &e);
        }
        self.refresh();
    }

    /// Give the controller a chance to fire its pending tick.
    pub fn tick(&mut self, now: Instant) {
        match self.controller.poll(now) {
            Ok(Some(_)) => self.refresh(),
            Ok(None) => {}
            Err(e) => self.report_store_error("Simulated sample not saved", &e),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        match std::mem::take(&mut self.mode) {
            InputMode::Normal => self.handle_normal_key(key.code),
            InputMode::Editing(buffer) => self.handle_editing_key(key.code, buffer),
            InputMode::ConfirmClear => self.handle_confirm_key(key.code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('a') | KeyCode::Char(' ') => self.toggle_auto(Instant::now()),
            KeyCode::Char('i') | KeyCode::Enter => self.mode = InputMode::Editing(String::new()),
            KeyCode::Char('c') => self.mode = InputMode::ConfirmClear,
            KeyCode::Char('e') => self.export(ExportFormat::Csv),
            KeyCode::Char('j') => self.export(ExportFormat::Json),
            KeyCode::Char('t') => self.export(ExportFormat::Txt),
            KeyCode::Char('r') => self.refresh(),
            _ => {}
        }
    }

    fn handle_editing_key(&mut self, code: KeyCode, mut buffer: String) {
        match code {
            KeyCode::Esc => {}
            KeyCode::Enter => match buffer.parse::<Celsius>() {
                Ok(value) => self.add_manual(value),
                Err(e) => {
                    self.set_status(format!("Invalid temperature: {e}"), true);
                    self.mode = InputMode::Editing(buffer);
                }
            },
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = InputMode::Editing(buffer);
            }
            KeyCode::Char(c) => {
                buffer.push(c);
                self.mode = InputMode::Editing(buffer);
            }
            _ => self.mode = InputMode::Editing(buffer),
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => match self.controller.clear_history() {
                Ok(()) => {
                    info!("history cleared from dashboard");
                    self.set_status("History cleared.".to_string(), false);
                    self.refresh();
                }
                Err(e) => self.report_store_error("Could not clear history", &e),
            },
            _ => self.set_status("Clear cancelled.".to_string(), false),
        }
    }

    fn toggle_auto(&mut self, now: Instant) {
        if self.controller.is_running() {
            self.controller.stop();
            self.set_status("Auto mode off.".to_string(), false);
            return;
        }
        match self.controller.start(now) {
            Ok(_) => self.set_status("Auto mode on.".to_string(), false),
            Err(e) => self.report_store_error("Auto mode on, first sample not saved", &e),
        }
        self.refresh();
    }

    fn add_manual(&mut self, value: Celsius) {
        match self.controller.add_manual(value) {
            Ok(_) => {
                self.set_status(format!("Recorded {value}."), false);
                self.refresh();
            }
            Err(e) => self.report_store_error("Reading not saved", &e),
        }
    }

    fn export(&mut self, format: ExportFormat) {
        match export(&self.records, format) {
            Ok(contents) => {
                let path = self.export_dir.join(format.file_name());
                match std::fs::write(&path, contents) {
                    Ok(()) => self.set_status(format!("Exported to {}", path.display()), false),
                    Err(e) => {
                        warn!("export to {} failed: {e}", path.display());
                        self.set_status(format!("Export failed: {e}"), true);
                    }
                }
            }
            Err(ExportError::NoData) => self.set_status("No data to export.".to_string(), true),
            Err(e) => self.set_status(format!("Export failed: {e}"), true),
        }
    }

    /// Re-read the snapshot from the store.
    fn refresh(&mut self) {
        match self.controller.records() {
            Ok(records) => self.records = records,
            Err(e) => self.report_store_error("Could not read history", &e),
        }
    }

    fn report_store_error(&mut self, context: &str, e: &StoreError) {
        warn!("{context}: {e}");
        self.set_status(format!("{context}: {e}"), true);
    }

    fn set_status(&mut self, text: String, is_error: bool) {
        self.status = Some(StatusMessage { text, is_error });
    }

    // --- Public accessors ---

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_auto(&self) -> bool {
        self.controller.is_running()
    }

    pub fn period(&self) -> Duration {
        self.controller.period()
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn records(&self) -> &[TemperatureRecord] {
        &self.records
    }

    pub fn gauge_band(&self) -> &OperatingBand {
        &self.gauge_band
    }

    pub fn gauge(&self) -> GaugeState {
        gauge_state(&self.records, &self.gauge_band)
    }

    pub fn series(&self) -> ChartSeries {
        chart_series(&self.records)
    }

    /// Seconds until the next simulated sample, if auto mode is on.
    pub fn next_sample_in(&self, now: Instant) -> Option<Duration> {
        self.controller
            .next_due()
            .map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermowatch_core::{
        GAUGE_BAND, MemoryBackend, RecordStore, SampleGenerator, SimulationConfig, WALK_BAND,
    };

    fn app() -> App {
        let controller = SimulationController::new(
            RecordStore::new(MemoryBackend::new()),
            SampleGenerator::with_seed(WALK_BAND, 4),
            SimulationConfig::default(),
        )
        .unwrap();
        App::new(controller, GAUGE_BAND)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    // -----------------------------------------------------------------------
    // Session start
    // -----------------------------------------------------------------------

    #[test]
    fn open_session_seeds_empty_history_once() {
        let mut app = app();
        app.open_session(Instant::now());
        assert_eq!(app.records().len(), 1);
        assert!(!app.is_auto());

        app.open_session(Instant::now());
        assert_eq!(app.records().len(), 1);
    }

    // -----------------------------------------------------------------------
    // Manual input
    // -----------------------------------------------------------------------

    #[test]
    fn manual_entry_appends_record() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "21.5");
        assert_eq!(app.mode(), &InputMode::Editing("21.5".to_string()));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode(), &InputMode::Normal);
        assert_eq!(app.records().len(), 1);
        assert_eq!(app.records()[0].value, 21.5);
        assert_eq!(app.gauge().value, 21.5);
    }

    #[test]
    fn invalid_entry_is_rejected_and_kept_for_editing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "warm");
        press(&mut app, KeyCode::Enter);

        assert!(app.records().is_empty());
        assert_eq!(app.mode(), &InputMode::Editing("warm".to_string()));
        assert!(app.status().unwrap().is_error);
    }

    #[test]
    fn backspace_and_escape_while_editing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "12");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.mode(), &InputMode::Editing("1".to_string()));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode(), &InputMode::Normal);
        assert!(app.records().is_empty());
        assert!(app.is_running());
    }

    #[test]
    fn quit_keys_do_not_fire_while_editing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "q");
        assert!(app.is_running());
    }

    // -----------------------------------------------------------------------
    // Auto mode
    // -----------------------------------------------------------------------

    #[test]
    fn toggle_auto_starts_and_stops() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert!(app.is_auto());
        assert_eq!(app.records().len(), 1);

        press(&mut app, KeyCode::Char('a'));
        assert!(!app.is_auto());
        assert_eq!(app.next_sample_in(Instant::now()), None);
    }

    #[test]
    fn tick_appends_when_due() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        let due = Instant::now() + app.period();
        app.tick(due);
        assert_eq!(app.records().len(), 2);
        let values: Vec<f64> = app.records().iter().map(|r| r.value).collect();
        assert!((values[1] - values[0]).abs() <= 1.0);
    }

    // -----------------------------------------------------------------------
    // Clear
    // -----------------------------------------------------------------------

    #[test]
    fn clear_requires_confirmation() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "10");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.mode(), &InputMode::ConfirmClear);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.records().len(), 1);

        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.records().is_empty());
        assert!(app.series().is_empty());
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    #[test]
    fn export_without_data_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app().with_export_dir(tmp.path());
        press(&mut app, KeyCode::Char('e'));
        assert!(app.status().unwrap().is_error);
        assert!(!tmp.path().join("temperatures.csv").exists());
    }

    #[test]
    fn export_writes_file_in_export_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app().with_export_dir(tmp.path());
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "18");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('j'));
        let written = std::fs::read_to_string(tmp.path().join("temperatures.json")).unwrap();
        assert!(written.contains("\"value\": 18.0"));
        assert!(!app.status().unwrap().is_error);
    }

    // -----------------------------------------------------------------------
    // Quit
    // -----------------------------------------------------------------------

    #[test]
    fn quit_with_q_or_ctrl_c() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.is_running());

        let mut app = self::app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.is_running());
    }
}
