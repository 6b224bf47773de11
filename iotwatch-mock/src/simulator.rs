use std::sync::Arc;
use std::time::Duration;

use iotwatch_api::models::{ReadingSet, SensorReading, SensorStatus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Bernoulli, Distribution};
use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::error::SimulatorError;
use crate::registry::{SensorRegistry, SensorTypeDescriptor};
use crate::task::TaskGuard;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_ACTIVE_PROBABILITY: f64 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorOptions {
    /// Time between two refresh cycles
    pub refresh_interval: Duration,
    /// Chance of a sensor being reported active in a cycle
    pub active_probability: f64,
    /// Fixed RNG seed, random when absent
    pub seed: Option<u64>,
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            active_probability: DEFAULT_ACTIVE_PROBABILITY,
            seed: None,
        }
    }
}

/// Draws readings for sensor descriptors.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: StdRng,
    status: Bernoulli,
}

impl Sampler {
    pub fn new(active_probability: f64, seed: Option<u64>) -> Result<Self, SimulatorError> {
        let status = Bernoulli::new(active_probability)
            .map_err(|_| SimulatorError::InvalidProbability(active_probability))?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self { rng, status })
    }

    /// Uniform sample over the descriptor's inclusive range.
    pub fn sample(&mut self, descriptor: &SensorTypeDescriptor) -> SensorReading {
        let raw_value = self.rng.random_range(descriptor.min()..=descriptor.max());
        let status = if self.status.sample(&mut self.rng) {
            SensorStatus::Active
        } else {
            SensorStatus::Inactive
        };

        SensorReading {
            name: descriptor.name().to_string(),
            value: descriptor.format(raw_value),
            raw_value,
            unit: descriptor.unit().to_string(),
            status,
        }
    }

    pub fn sample_all(&mut self, descriptors: &[SensorTypeDescriptor]) -> Vec<SensorReading> {
        descriptors
            .iter()
            .map(|descriptor| self.sample(descriptor))
            .collect()
    }

    /// Independent sampler for a background task, seeded from this one.
    fn fork(&mut self) -> Self {
        Self {
            rng: StdRng::from_rng(&mut self.rng),
            status: self.status,
        }
    }
}

/// Periodically regenerates readings for the active sensor set.
///
/// Every refresh replaces the published [`ReadingSet`] as a whole. Readers
/// either poll [`Simulator::current_readings`] or hold a receiver from
/// [`Simulator::subscribe`].
pub struct Simulator {
    registry: Arc<SensorRegistry>,
    options: SimulatorOptions,
    sampler: Sampler,
    sender: Arc<watch::Sender<Arc<ReadingSet>>>,
    task: Option<TaskGuard>,
    active_count: usize,
}

impl Simulator {
    pub fn new(registry: Arc<SensorRegistry>, options: SimulatorOptions) -> Result<Self, SimulatorError> {
        if options.refresh_interval.is_zero() {
            return Err(SimulatorError::ZeroInterval);
        }

        let sampler = Sampler::new(options.active_probability, options.seed)?;
        let (sender, _) = watch::channel(Arc::new(ReadingSet::empty()));

        Ok(Self {
            registry,
            options,
            sampler,
            sender: Arc::new(sender),
            task: None,
            active_count: 0,
        })
    }

    pub fn registry(&self) -> &Arc<SensorRegistry> {
        &self.registry
    }

    pub fn sample(&mut self, descriptor: &SensorTypeDescriptor) -> SensorReading {
        self.sampler.sample(descriptor)
    }

    /// Replaces the active set with the first `count` sensors of the registry.
    ///
    /// Previous readings are discarded and a fresh set is published right away.
    /// With at least one active sensor a refresh task is started; it must be
    /// called from within a tokio runtime in that case.
    pub fn activate(&mut self, count: usize) {
        self.task = None;

        let active = self.registry.active(count).to_vec();
        self.active_count = active.len();

        let initial = ReadingSet::new(0, OffsetDateTime::now_utc(), self.sampler.sample_all(&active));
        self.sender.send_replace(Arc::new(initial));

        if active.is_empty() {
            tracing::info!("no sensors requested, simulator idle");
            return;
        }

        tracing::info!(
            "simulating {} sensor(s) every {:?}",
            active.len(),
            self.options.refresh_interval
        );

        let period = self.options.refresh_interval;
        let sender = Arc::clone(&self.sender);
        let mut sampler = self.sampler.fork();

        self.task = Some(TaskGuard::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut cycle = 0;
            loop {
                interval.tick().await;
                cycle += 1;

                let set = ReadingSet::new(cycle, OffsetDateTime::now_utc(), sampler.sample_all(&active));
                tracing::debug!(cycle, sensors = set.len(), "refreshed sensor readings");

                sender.send_replace(Arc::new(set));
            }
        }));
    }

    /// Stops the refresh task and clears the published readings.
    pub fn stop(&mut self) {
        let was_running = self.task.take().is_some();
        self.active_count = 0;

        self.sender
            .send_replace(Arc::new(ReadingSet::new(0, OffsetDateTime::now_utc(), Vec::new())));

        if was_running {
            tracing::info!("simulator stopped");
        }
    }

    pub fn current_readings(&self) -> Arc<ReadingSet> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ReadingSet>> {
        self.sender.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::sleep;

    use super::*;

    fn simulator(seed: u64) -> Simulator {
        Simulator::new(
            Arc::new(SensorRegistry::default()),
            SimulatorOptions {
                seed: Some(seed),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_samples_stay_in_range() {
        let registry = SensorRegistry::default();
        let mut sampler = Sampler::new(DEFAULT_ACTIVE_PROBABILITY, Some(7)).unwrap();

        for descriptor in registry.all() {
            for _ in 0..2000 {
                let reading = sampler.sample(descriptor);
                assert!(
                    reading.raw_value >= descriptor.min() && reading.raw_value <= descriptor.max(),
                    "{} out of range: {}",
                    descriptor.name(),
                    reading.raw_value
                );
                assert_eq!(reading.name, descriptor.name());
                assert_eq!(reading.unit, descriptor.unit());
                assert_eq!(reading.value, descriptor.format(reading.raw_value));
            }
        }
    }

    #[test]
    fn test_chemical_reading_keeps_raw_value() {
        let registry = SensorRegistry::default();
        let chemical = registry.by_name("Chemical").unwrap();
        let mut sampler = Sampler::new(DEFAULT_ACTIVE_PROBABILITY, Some(11)).unwrap();

        let reading = sampler.sample(chemical);

        assert!(reading.value.starts_with("pH "));
        assert_eq!(reading.value, format!("pH {:.1}", reading.raw_value));
    }

    #[test]
    fn test_status_follows_probability() {
        let descriptor = SensorTypeDescriptor::new("Gas", "ppm", 0.0, 50.0).unwrap();
        let mut sampler = Sampler::new(DEFAULT_ACTIVE_PROBABILITY, Some(3)).unwrap();

        let active = (0..10_000)
            .filter(|_| sampler.sample(&descriptor).status.is_active())
            .count();

        assert!((6_500..=7_500).contains(&active), "active count {active}");

        let mut always = Sampler::new(1.0, Some(3)).unwrap();
        let mut never = Sampler::new(0.0, Some(3)).unwrap();
        assert!(always.sample(&descriptor).status.is_active());
        assert!(!never.sample(&descriptor).status.is_active());
    }

    #[test]
    fn test_invalid_options() {
        let registry = Arc::new(SensorRegistry::default());

        assert!(matches!(
            Simulator::new(
                Arc::clone(&registry),
                SimulatorOptions {
                    active_probability: 1.5,
                    ..Default::default()
                }
            ),
            Err(SimulatorError::InvalidProbability(_))
        ));
        assert!(matches!(
            Simulator::new(
                registry,
                SimulatorOptions {
                    refresh_interval: Duration::ZERO,
                    ..Default::default()
                }
            ),
            Err(SimulatorError::ZeroInterval)
        ));
    }

    #[test]
    fn test_activate_zero_outside_runtime() {
        let mut simulator = simulator(1);

        simulator.activate(0);

        assert!(simulator.current_readings().is_empty());
        assert!(!simulator.is_running());
        assert_eq!(simulator.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activate_three() {
        let mut simulator = simulator(2);

        simulator.activate(3);

        let readings = simulator.current_readings();
        assert_eq!(
            readings.names().collect::<Vec<_>>(),
            vec!["Luminosity", "Temperature", "Humidity/Water"]
        );
        assert_eq!(readings.cycle, 0);
        assert!(simulator.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_activate_more_than_registry() {
        let mut simulator = simulator(4);

        simulator.activate(8);

        assert_eq!(simulator.current_readings().len(), 6);
        assert_eq!(simulator.active_count(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_every_interval() {
        let mut simulator = simulator(5);
        let start = Instant::now();

        simulator.activate(2);
        let mut receiver = simulator.subscribe();
        receiver.borrow_and_update();

        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow_and_update().cycle, 1);
        assert!(start.elapsed() >= DEFAULT_REFRESH_INTERVAL);
        assert!(start.elapsed() < DEFAULT_REFRESH_INTERVAL * 2);

        receiver.changed().await.unwrap();
        let set = receiver.borrow_and_update().clone();
        assert_eq!(set.cycle, 2);
        assert_eq!(set.len(), 2);
        assert!(start.elapsed() >= DEFAULT_REFRESH_INTERVAL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reactivate_replaces_set() {
        let mut simulator = simulator(6);

        simulator.activate(6);
        sleep(Duration::from_secs(12)).await;
        assert_eq!(simulator.current_readings().cycle, 2);

        simulator.activate(2);
        let readings = simulator.current_readings();
        assert_eq!(readings.cycle, 0);
        assert_eq!(readings.names().collect::<Vec<_>>(), vec!["Luminosity", "Temperature"]);

        sleep(Duration::from_secs(6)).await;
        let readings = simulator.current_readings();
        assert_eq!(readings.cycle, 1);
        assert_eq!(readings.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activate_zero_stops_refresh() {
        let mut simulator = simulator(8);

        simulator.activate(4);
        assert!(simulator.is_running());

        simulator.activate(0);
        assert!(!simulator.is_running());

        let mut receiver = simulator.subscribe();
        receiver.borrow_and_update();

        sleep(Duration::from_secs(30)).await;
        assert!(!receiver.has_changed().unwrap());
        assert!(simulator.current_readings().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_and_drop_cancel_task() {
        let mut simulator = simulator(9);

        simulator.activate(3);
        let mut receiver = simulator.subscribe();

        simulator.stop();
        receiver.borrow_and_update();
        assert!(!simulator.is_running());
        assert!(simulator.current_readings().is_empty());

        sleep(Duration::from_secs(30)).await;
        assert!(!receiver.has_changed().unwrap());

        simulator.activate(3);
        let mut receiver = simulator.subscribe();
        receiver.borrow_and_update();
        drop(simulator);

        sleep(Duration::from_secs(30)).await;
        assert!(receiver.has_changed().is_err());
    }
}
