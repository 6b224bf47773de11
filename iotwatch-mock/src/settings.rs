use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use std::{env, fs, io};

use serde::{Deserialize, Serialize};

use crate::monitor::MonitorOptions;
use crate::simulator::SimulatorOptions;

/// Environment variable naming a settings file that replaces the defaults.
pub const CONFIG_ENV: &str = "IOTWATCH_CONFIG";

const DEFAULT_CONFIG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../", "configs/default.toml"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulator {
    pub refresh_interval_ms: u64,
    pub active_probability: f64,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monitor {
    pub poll_interval_ms: u64,
    pub transition_ms: u64,
    /// Sensor to observe on start, the first available one when absent
    pub sensor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    pub alert_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub simulator: Simulator,
    pub monitor: Monitor,
    pub history: History,
    pub profile: Profile,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let content = match env::var(CONFIG_ENV) {
            Ok(path) => fs::read_to_string(Self::normalize_path(&path)?)?,
            Err(_) => DEFAULT_CONFIG.to_string(),
        };

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, Box<dyn Error>> {
        let mut settings: Settings = toml::from_str(content)?;

        settings.profile.path = Self::normalize_path(&settings.profile.path)?
            .to_string_lossy()
            .to_string();

        Ok(settings)
    }

    pub fn simulator_options(&self) -> SimulatorOptions {
        SimulatorOptions {
            refresh_interval: Duration::from_millis(self.simulator.refresh_interval_ms),
            active_probability: self.simulator.active_probability,
            seed: self.simulator.seed,
        }
    }

    pub fn monitor_options(&self) -> MonitorOptions {
        MonitorOptions {
            poll_interval: Duration::from_millis(self.monitor.poll_interval_ms),
            transition: Duration::from_millis(self.monitor.transition_ms),
        }
    }

    fn normalize_path(path: &str) -> io::Result<PathBuf> {
        let path_buf = PathBuf::from(path);

        Ok(if path_buf.is_absolute() {
            path_buf
        } else {
            env::current_dir()?.join(path_buf)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::monitor::DEFAULT_POLL_INTERVAL;
    use crate::simulator::{DEFAULT_ACTIVE_PROBABILITY, DEFAULT_REFRESH_INTERVAL};

    #[test]
    fn test_default_settings() {
        let settings = Settings::from_toml(DEFAULT_CONFIG).unwrap();

        assert_eq!(settings.logger.level, "info");
        assert_eq!(settings.history.alert_threshold, 50.0);
        assert_eq!(settings.monitor.sensor, None);
        assert!(Path::new(&settings.profile.path).is_absolute());

        let simulator = settings.simulator_options();
        assert_eq!(simulator.refresh_interval, DEFAULT_REFRESH_INTERVAL);
        assert_eq!(simulator.active_probability, DEFAULT_ACTIVE_PROBABILITY);
        assert_eq!(simulator.seed, None);

        let monitor = settings.monitor_options();
        assert_eq!(monitor.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(monitor.transition, Duration::from_millis(500));
    }

    #[test]
    fn test_override_settings() {
        let settings = Settings::from_toml(
            r#"
            [logger]
            level = "debug"

            [simulator]
            refresh_interval_ms = 250
            active_probability = 1.0
            seed = 42

            [monitor]
            poll_interval_ms = 100
            transition_ms = 0
            sensor = "Gas"

            [history]
            alert_threshold = 10.0

            [profile]
            path = "/tmp/profile.json"
            "#,
        )
        .unwrap();

        assert_eq!(settings.simulator_options().seed, Some(42));
        assert_eq!(settings.monitor.sensor.as_deref(), Some("Gas"));
        assert_eq!(settings.profile.path, "/tmp/profile.json");
        assert_eq!(settings.monitor_options().poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_incomplete_settings_are_rejected() {
        assert!(Settings::from_toml("[logger]\nlevel = \"info\"\n").is_err());
    }
}
