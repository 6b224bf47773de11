use std::sync::Arc;
use std::time::Duration;

use iotwatch_analyser::{AlertTransition, DEFAULT_TRANSITION, Rgb, alert_colour, to_animated_fraction};
use iotwatch_api::models::{AlertBand, ReadingSet};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::error::{MonitorError, RegistryError};
use crate::registry::{SensorRegistry, SensorTypeDescriptor};
use crate::task::TaskGuard;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorOptions {
    /// Time between two classifications of the selected sensor
    pub poll_interval: Duration,
    /// Duration of the colour animation after a band change
    pub transition: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            transition: DEFAULT_TRANSITION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Observing { sensor: String },
}

impl MonitorState {
    pub fn sensor(&self) -> Option<&str> {
        match self {
            MonitorState::Idle => None,
            MonitorState::Observing { sensor } => Some(sensor),
        }
    }
}

/// What the alert ring currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertView {
    pub sensor: Option<String>,
    pub band: AlertBand,
    pub transition: AlertTransition,
    pub started_at: Instant,
}

impl AlertView {
    /// Resting at the normal position with nothing selected.
    pub fn idle(now: Instant) -> Self {
        Self {
            sensor: None,
            band: AlertBand::Normal,
            transition: AlertTransition::settled(to_animated_fraction(AlertBand::Normal)),
            started_at: now,
        }
    }

    pub fn target(&self) -> f64 {
        self.transition.target()
    }

    pub fn fraction_at(&self, now: Instant) -> f64 {
        self.transition
            .value_at(now.saturating_duration_since(self.started_at))
    }

    pub fn colour_at(&self, now: Instant) -> Rgb {
        alert_colour(self.fraction_at(now))
    }

    pub fn is_settled_at(&self, now: Instant) -> bool {
        self.transition
            .is_settled(now.saturating_duration_since(self.started_at))
    }

    // Returns whether anything visible changed
    fn observe(&mut self, sensor: &str, band: AlertBand, duration: Duration, now: Instant) -> bool {
        if self.sensor.as_deref() == Some(sensor) && self.band == band {
            return false;
        }

        let elapsed = now.saturating_duration_since(self.started_at);
        self.transition = self
            .transition
            .retarget(elapsed, to_animated_fraction(band), duration);
        self.sensor = Some(sensor.to_string());
        self.band = band;
        self.started_at = now;

        true
    }
}

fn current_band(
    descriptor: &SensorTypeDescriptor,
    readings: &watch::Receiver<Arc<ReadingSet>>,
) -> Option<AlertBand> {
    // An inactive sensor has no reading and rests at its minimum
    let raw = readings
        .borrow()
        .get(descriptor.name())
        .map(|reading| reading.raw_value)
        .unwrap_or(descriptor.min());

    match descriptor.classify(raw) {
        Ok(band) => Some(band),
        Err(e) => {
            tracing::warn!("Cannot classify {} reading {}: {}", descriptor.name(), raw, e);
            None
        }
    }
}

/// Follows the alert band of one selected sensor.
///
/// While a sensor is selected a polling task re-classifies the latest published
/// reading every `poll_interval`. It never waits on the simulator and only
/// reads whatever set was published last.
pub struct AlertMonitor {
    registry: Arc<SensorRegistry>,
    readings: watch::Receiver<Arc<ReadingSet>>,
    options: MonitorOptions,
    sender: Arc<watch::Sender<AlertView>>,
    task: Option<TaskGuard>,
    state: MonitorState,
}

impl AlertMonitor {
    pub fn new(
        registry: Arc<SensorRegistry>,
        readings: watch::Receiver<Arc<ReadingSet>>,
        options: MonitorOptions,
    ) -> Result<Self, MonitorError> {
        if options.poll_interval.is_zero() {
            return Err(MonitorError::ZeroInterval);
        }

        let (sender, _) = watch::channel(AlertView::idle(Instant::now()));

        Ok(Self {
            registry,
            readings,
            options,
            sender: Arc::new(sender),
            task: None,
            state: MonitorState::Idle,
        })
    }

    /// Starts observing `name`, replacing any previous selection.
    ///
    /// Must be called from within a tokio runtime.
    pub fn select(&mut self, name: &str) -> Result<(), RegistryError> {
        let descriptor = self.registry.by_name(name)?.clone();

        self.task = None;
        self.state = MonitorState::Observing {
            sensor: descriptor.name().to_string(),
        };

        let transition = self.options.transition;
        if let Some(band) = current_band(&descriptor, &self.readings) {
            let now = Instant::now();
            self.sender
                .send_if_modified(|view| view.observe(descriptor.name(), band, transition, now));
        }

        tracing::info!("Observing alert level of {}", descriptor.name());

        let period = self.options.poll_interval;
        let readings = self.readings.clone();
        let sender = Arc::clone(&self.sender);

        self.task = Some(TaskGuard::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let Some(band) = current_band(&descriptor, &readings) else {
                    continue;
                };

                let now = Instant::now();
                if sender.send_if_modified(|view| view.observe(descriptor.name(), band, transition, now)) {
                    tracing::debug!(sensor = descriptor.name(), %band, "alert band changed");
                }
            }
        }));

        Ok(())
    }

    /// Stops observing and snaps the ring back to the normal position.
    pub fn deselect(&mut self) {
        self.task = None;

        if self.state == MonitorState::Idle {
            return;
        }

        self.state = MonitorState::Idle;
        self.sender.send_replace(AlertView::idle(Instant::now()));

        tracing::info!("Alert monitor idle");
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn view(&self) -> AlertView {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AlertView> {
        self.sender.subscribe()
    }

    pub fn is_polling(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}
