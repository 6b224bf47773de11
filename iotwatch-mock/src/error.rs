use std::io;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("Invalid range for sensor {name}: min {min} must be finite and below max {max}")]
    InvalidRange { name: String, min: f64, max: f64 },

    #[error("Unknown sensor name: {0}")]
    UnknownSensorName(String),

    #[error("Sensor name registered twice: {0}")]
    DuplicateName(String),

    #[error("Registry holds no sensor types")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulatorError {
    #[error("Active probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("Refresh interval must be greater than zero")]
    ZeroInterval,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MonitorError {
    #[error("Poll interval must be greater than zero")]
    ZeroInterval,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Failed to read profile: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse profile: {0}")]
    Parse(#[from] serde_json::Error),
}
