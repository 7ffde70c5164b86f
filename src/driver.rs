//! The tick driver: runs the telemetry pipeline on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::data::{Bands, HistoryBuffer, HistoryPoint, SensorKey, SensorTable, Snapshot};
use crate::error::TelemetryError;
use crate::settings::Settings;
use crate::source::{TelemetrySource, WaveSource};

/// Lifecycle state of a [`TickDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No timer is scheduled.
    Idle,
    /// The periodic task is running.
    Running,
}

/// Mutable pipeline state. Only touched on the tick path.
#[derive(Debug)]
struct Pipeline {
    source: Box<dyn TelemetrySource>,
    sensors: SensorTable,
    bands: Bands,
    history: HistoryBuffer,
    started_at: Instant,
    sequence: u64,
    /// Set when the last pass failed; cleared by a successful manual pass.
    failure: Option<String>,
}

impl Pipeline {
    /// Generate, classify, aggregate and record one tick.
    fn run_at(&mut self, elapsed_secs: f64) -> Result<Arc<Snapshot>, TelemetryError> {
        let reading = self.source.sample(elapsed_secs)?;
        reading.ensure_finite()?;

        self.sequence += 1;
        let snapshot = Snapshot::evaluate(
            self.sequence,
            elapsed_secs,
            Local::now(),
            reading,
            &self.sensors,
            &self.bands,
        );

        let label = snapshot.time_label();
        for key in SensorKey::ALL {
            self.history.append(key, HistoryPoint::new(label.clone(), snapshot.value(key)));
        }

        Ok(Arc::new(snapshot))
    }
}

#[derive(Debug)]
struct Shared {
    pipeline: Mutex<Pipeline>,
    latest: watch::Sender<Option<Arc<Snapshot>>>,
}

impl Shared {
    /// Timer-driven pass.
    ///
    /// Skipped while a failure is pending so that recovery only happens
    /// through an explicit retry or a restart.
    fn scheduled_pass(&self) {
        let mut pipeline = self.pipeline.lock();
        if let Some(reason) = &pipeline.failure {
            debug!(%reason, "skipping scheduled tick while faulted");
            return;
        }
        let elapsed = pipeline.started_at.elapsed().as_secs_f64();
        let _ = self.publish(&mut pipeline, elapsed);
    }

    /// Caller-driven pass; runs even when faulted.
    fn manual_pass(&self, elapsed_secs: Option<f64>) -> Result<Arc<Snapshot>, TelemetryError> {
        let mut pipeline = self.pipeline.lock();
        let elapsed = elapsed_secs.unwrap_or_else(|| pipeline.started_at.elapsed().as_secs_f64());
        self.publish(&mut pipeline, elapsed)
    }

    fn publish(
        &self,
        pipeline: &mut Pipeline,
        elapsed_secs: f64,
    ) -> Result<Arc<Snapshot>, TelemetryError> {
        match pipeline.run_at(elapsed_secs) {
            Ok(snapshot) => {
                if pipeline.failure.take().is_some() {
                    info!("telemetry pipeline recovered");
                }
                debug!(
                    sequence = snapshot.sequence,
                    prediction = %snapshot.prediction,
                    "published snapshot"
                );
                self.latest.send_replace(Some(snapshot.clone()));
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "telemetry pass failed");
                pipeline.failure = Some(e.to_string());
                Err(e)
            }
        }
    }
}

struct RunningTask {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Owns the telemetry pipeline and drives it on a timer.
///
/// The driver holds the only copy of the pipeline state (source, history,
/// start time); several drivers can run side by side. Readers get whole
/// snapshots through [`TickDriver::latest_snapshot`] or a watch
/// [`subscription`](TickDriver::subscribe).
///
/// # Example
///
/// ```
/// use harvester_watch::{SensorKey, TickDriver, WaveSource};
///
/// # tokio_test::block_on(async {
/// let mut driver = TickDriver::new(Box::new(WaveSource::new()));
/// driver.start();
///
/// let snapshot = driver.latest_snapshot().unwrap();
/// assert_eq!(snapshot.sequence, 1);
/// assert_eq!(driver.history(SensorKey::HydraulicPressure).len(), 1);
///
/// driver.stop();
/// # });
/// ```
pub struct TickDriver {
    shared: Arc<Shared>,
    interval: Duration,
    description: String,
    task: Option<RunningTask>,
}

impl std::fmt::Debug for TickDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickDriver")
            .field("interval", &self.interval)
            .field("description", &self.description)
            .field("state", &self.state())
            .finish()
    }
}

impl TickDriver {
    /// Create a driver with default sensors, bands, history limits and a
    /// one second interval.
    pub fn new(source: Box<dyn TelemetrySource>) -> Self {
        Self::builder().source(source).build()
    }

    /// Create a builder for configuring the driver.
    pub fn builder() -> TickDriverBuilder {
        TickDriverBuilder::new()
    }

    /// Build a driver from resolved settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, TelemetryError> {
        settings.validate()?;
        Ok(Self::builder()
            .source(settings.source.build(settings.noise_seed))
            .sensors(settings.sensor_table()?)
            .bands(settings.bands)
            .interval(settings.tick_interval)
            .history_limits(settings.history_capacity, settings.history_epsilon)
            .build())
    }

    pub fn state(&self) -> DriverState {
        match self.task {
            Some(_) => DriverState::Running,
            None => DriverState::Idle,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Description of the underlying source.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Start the periodic pipeline.
    ///
    /// Runs one pass immediately, then one per interval. Must be called from
    /// within a tokio runtime. Does nothing if already running.
    pub fn start(&mut self) {
        if self.task.is_some() {
            return;
        }

        self.shared.pipeline.lock().started_at = Instant::now();
        // A failure left over from an earlier run does not block the first pass.
        let _ = self.shared.manual_pass(None);

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let shared = self.shared.clone();
        let period = self.interval;

        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        shared.scheduled_pass();
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        info!(interval = ?period, source = %self.description, "tick driver started");
        self.task = Some(RunningTask { stop_tx, handle });
    }

    /// Stop the periodic pipeline and cancel the pending timer.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.stop_tx.send(true);
            task.handle.abort();
            info!("tick driver stopped");
        }
    }

    /// Re-run the pipeline once, clearing a pending failure on success.
    pub fn retry(&self) -> Result<Arc<Snapshot>, TelemetryError> {
        self.shared.manual_pass(None)
    }

    /// Run one pass at an explicit elapsed time.
    ///
    /// Used for deterministic, timer-free runs such as exports.
    pub fn tick_at(&self, elapsed_secs: f64) -> Result<Arc<Snapshot>, TelemetryError> {
        self.shared.manual_pass(Some(elapsed_secs))
    }

    /// Produce a fresh snapshot as a future.
    ///
    /// Resolves immediately; stands in for a call to a real backend.
    pub async fn fetch_sensor_data(&self) -> Result<Arc<Snapshot>, TelemetryError> {
        self.shared.manual_pass(None)
    }

    /// The most recently published snapshot.
    pub fn latest_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.shared.latest.borrow().clone()
    }

    /// Receive every newly published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.shared.latest.subscribe()
    }

    /// Copy of the stored history for one sensor.
    pub fn history(&self, key: SensorKey) -> Vec<HistoryPoint> {
        self.shared.pipeline.lock().history.get(key).iter().cloned().collect()
    }

    /// Copy of the whole history buffer.
    pub fn history_buffer(&self) -> HistoryBuffer {
        self.shared.pipeline.lock().history.clone()
    }

    /// Sensor configuration in use.
    pub fn sensors(&self) -> SensorTable {
        self.shared.pipeline.lock().sensors.clone()
    }

    /// Reason for the pending failure, if the last pass failed.
    pub fn failure(&self) -> Option<String> {
        self.shared.pipeline.lock().failure.clone()
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Builder for configuring a [`TickDriver`].
#[derive(Debug, Default)]
pub struct TickDriverBuilder {
    source: Option<Box<dyn TelemetrySource>>,
    sensors: Option<SensorTable>,
    bands: Option<Bands>,
    interval: Option<Duration>,
    history: Option<(usize, f64)>,
}

impl TickDriverBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reading source. Defaults to [`WaveSource`].
    pub fn source(mut self, source: Box<dyn TelemetrySource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the sensor table. Must already be validated.
    pub fn sensors(mut self, sensors: SensorTable) -> Self {
        self.sensors = Some(sensors);
        self
    }

    /// Set the classifier bands.
    pub fn bands(mut self, bands: Bands) -> Self {
        self.bands = Some(bands);
        self
    }

    /// Set the tick interval (default: 1 second).
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Set history capacity and epsilon.
    pub fn history_limits(mut self, capacity: usize, epsilon: f64) -> Self {
        self.history = Some((capacity, epsilon));
        self
    }

    /// Build the driver in the idle state.
    pub fn build(self) -> TickDriver {
        let source = self.source.unwrap_or_else(|| Box::new(WaveSource::new()));
        let description = source.description().to_string();
        let history = match self.history {
            Some((capacity, epsilon)) => HistoryBuffer::with_limits(capacity, epsilon),
            None => HistoryBuffer::new(),
        };

        let pipeline = Pipeline {
            source,
            sensors: self.sensors.unwrap_or_default(),
            bands: self.bands.unwrap_or_default(),
            history,
            started_at: Instant::now(),
            sequence: 0,
            failure: None,
        };
        let (latest, _) = watch::channel(None);

        TickDriver {
            shared: Arc::new(Shared {
                pipeline: Mutex::new(pipeline),
                latest,
            }),
            interval: self.interval.unwrap_or(Duration::from_secs(1)),
            description,
            task: None,
        }
    }
}
