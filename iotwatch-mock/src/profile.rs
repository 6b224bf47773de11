use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

const FALLBACK_NAME: &str = "User";

/// Record of the logged-in user, as written by the account screens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionProfile {
    #[serde(rename = "nome", alias = "name", default)]
    pub name: Option<String>,
    /// Number of devices the user registered, may be missing or negative
    #[serde(rename = "quantidade", alias = "sensor_count", default)]
    pub sensor_count: Option<i64>,
}

impl SessionProfile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let content = fs::read_to_string(path)?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Like [`SessionProfile::load`] but logs the failure and returns an empty profile.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load session profile {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => FALLBACK_NAME,
        }
    }

    pub fn sensor_count(&self) -> u32 {
        self.sensor_count
            .map(|count| u32::try_from(count.max(0)).unwrap_or(u32::MAX))
            .unwrap_or(0)
    }
}

/// Sensor count of the stored profile, 0 whenever it cannot be read.
pub fn load_sensor_count(path: impl AsRef<Path>) -> u32 {
    SessionProfile::load_or_default(path).sensor_count()
}
