//! Application state and navigation logic.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::watch;
use tracing::info;

use crate::data::{HistoryBuffer, SensorKey, SensorTable, Snapshot};
use crate::driver::TickDriver;
use crate::error::FETCH_FAILED_MESSAGE;
use crate::export::{build_export, write_export};
use crate::ui::{ChartBoard, Theme};

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// All sensors with status and the maintenance prediction.
    Overview,
    /// History charts.
    Charts,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Charts,
            View::Charts => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        // Two views, so both directions land on the other one.
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Charts => "Charts",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Telemetry
    driver: TickDriver,
    updates: watch::Receiver<Option<Arc<Snapshot>>>,
    pub data: Option<Arc<Snapshot>>,
    pub history: HistoryBuffer,
    pub sensors: SensorTable,
    pub load_error: Option<String>,
    pub last_updated: Option<Instant>,

    // Navigation state
    pub selected_sensor: SensorKey,
    pub selected_chart: usize,
    pub charts: ChartBoard,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App around a tick driver, detecting the terminal theme.
    pub fn new(driver: TickDriver) -> Self {
        Self::with_theme(driver, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme.
    pub fn with_theme(driver: TickDriver, theme: Theme) -> Self {
        let updates = driver.subscribe();
        let sensors = driver.sensors();
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            driver,
            updates,
            data: None,
            history: HistoryBuffer::new(),
            sensors,
            load_error: None,
            last_updated: None,
            selected_sensor: SensorKey::HydraulicPressure,
            selected_chart: 0,
            charts: ChartBoard::default(),
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current telemetry source.
    pub fn source_description(&self) -> &str {
        self.driver.description()
    }

    /// Start the periodic pipeline. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        self.driver.start();
        self.reload_data();
    }

    /// Stop the periodic pipeline.
    pub fn shutdown(&mut self) {
        self.driver.stop();
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Pull the latest snapshot and failure state from the driver.
    ///
    /// Returns true if a new snapshot was received.
    pub fn reload_data(&mut self) -> bool {
        self.load_error = self
            .driver
            .failure()
            .map(|_| FETCH_FAILED_MESSAGE.to_string());

        let latest = self.updates.borrow_and_update().clone();
        let fresh = match (&latest, &self.data) {
            (Some(new), Some(old)) => new.sequence != old.sequence,
            (Some(_), None) => true,
            (None, _) => false,
        };

        if fresh {
            self.data = latest;
            self.history = self.driver.history_buffer();
            self.last_updated = Some(Instant::now());
        }
        fresh
    }

    /// Re-run the pipeline once after a failure.
    pub fn retry(&mut self) {
        let was_faulted = self.load_error.is_some();
        match self.driver.retry() {
            Ok(snapshot) => {
                info!(sequence = snapshot.sequence, "manual pass succeeded");
                let msg = if was_faulted {
                    "Sensor data restored"
                } else {
                    "Sensor data refreshed"
                };
                self.set_status_message(msg.to_string());
            }
            Err(e) => {
                self.set_status_message(format!("Retry failed: {}", e));
            }
        }
        self.reload_data();
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down: next sensor on the Overview, next chart on Charts.
    pub fn select_next(&mut self) {
        match self.current_view {
            View::Overview => {
                let last = SensorKey::ALL.len() - 1;
                if self.selected_sensor.index() < last {
                    self.selected_sensor = self.selected_sensor.next();
                }
            }
            View::Charts => {
                let max = self.charts.len().saturating_sub(1);
                self.selected_chart = (self.selected_chart + 1).min(max);
            }
        }
    }

    /// Move selection up.
    pub fn select_prev(&mut self) {
        match self.current_view {
            View::Overview => {
                if self.selected_sensor.index() > 0 {
                    self.selected_sensor = self.selected_sensor.prev();
                }
            }
            View::Charts => {
                self.selected_chart = self.selected_chart.saturating_sub(1);
            }
        }
    }

    /// Cycle the sensor that chart actions apply to.
    pub fn cycle_sensor(&mut self) {
        self.selected_sensor = self.selected_sensor.next();
    }

    /// Open a chart for the selected sensor.
    pub fn add_chart(&mut self) {
        let label = self.sensors.get(self.selected_sensor).label;
        if self.charts.add(self.selected_sensor) {
            self.selected_chart = self.charts.len() - 1;
            self.set_status_message(format!("Added chart: {}", label));
        } else {
            self.set_status_message(format!("{} is already charted", label));
        }
    }

    /// Close the selected chart.
    pub fn remove_chart(&mut self) {
        if self.charts.remove(self.selected_chart) {
            self.selected_chart = self.selected_chart.min(self.charts.len().saturating_sub(1));
        }
    }

    /// Overlay the selected sensor on the selected chart, or remove it.
    pub fn toggle_compare(&mut self) {
        if !self.charts.toggle_compare(self.selected_chart, self.selected_sensor) {
            self.set_status_message("Pick a different sensor to compare".to_string());
        }
    }

    pub fn cycle_chart_style(&mut self) {
        self.charts.cycle_style();
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };
        let export = build_export(data, &self.history, &self.sensors)?;
        write_export(path, &export)
    }
}
