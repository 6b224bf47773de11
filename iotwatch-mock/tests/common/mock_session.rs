use std::io::Write;
use std::sync::Arc;

use iotwatch_mock::monitor::{AlertMonitor, MonitorOptions};
use iotwatch_mock::registry::SensorRegistry;
use iotwatch_mock::simulator::{Simulator, SimulatorOptions};
use tempfile::NamedTempFile;

pub struct MockSession {
    pub registry: Arc<SensorRegistry>,
    pub simulator: Simulator,
    pub monitor: AlertMonitor,
}

impl MockSession {
    pub fn new(seed: u64) -> Self {
        let registry = Arc::new(SensorRegistry::default());
        let simulator = Simulator::new(
            Arc::clone(&registry),
            SimulatorOptions {
                active_probability: 1.0,
                seed: Some(seed),
                ..Default::default()
            },
        )
        .unwrap();
        let monitor = AlertMonitor::new(Arc::clone(&registry), simulator.subscribe(), MonitorOptions::default()).unwrap();

        Self {
            registry,
            simulator,
            monitor,
        }
    }
}

pub fn write_profile(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}
