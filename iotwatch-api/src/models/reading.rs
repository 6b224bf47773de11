use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::slice;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    /// Sensor reported during the current cycle
    Active,
    /// Sensor is present but idle for the current cycle
    Inactive,
}

impl SensorStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, SensorStatus::Active)
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorStatus::Active => write!(f, "Active"),
            SensorStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Sensor name, unique within a registry
    pub name: String,
    /// Formatted value shown to the user
    pub value: String,
    /// Sample the display value was formatted from
    pub raw_value: f64,
    /// Display unit, may be empty
    pub unit: String,
    /// Activity status for this cycle
    pub status: SensorStatus,
}

/// One refresh cycle worth of readings, in registry order.
///
/// A set is always published and replaced as a whole, so a holder never sees
/// readings from two different cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingSet {
    /// Refresh cycle counter, 0 for the set produced on activation
    pub cycle: u64,
    /// Time the set was sampled
    pub sampled_at: OffsetDateTime,
    /// Readings of the active sensors
    pub readings: Vec<SensorReading>,
}

impl ReadingSet {
    pub fn new(cycle: u64, sampled_at: OffsetDateTime, readings: Vec<SensorReading>) -> Self {
        Self {
            cycle,
            sampled_at,
            readings,
        }
    }

    /// Set published before anything was sampled.
    pub fn empty() -> Self {
        Self::new(0, OffsetDateTime::UNIX_EPOCH, Vec::new())
    }

    pub fn get(&self, name: &str) -> Option<&SensorReading> {
        self.readings.iter().find(|reading| reading.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.readings.iter().map(|reading| reading.name.as_str())
    }

    pub fn iter(&self) -> slice::Iter<'_, SensorReading> {
        self.readings.iter()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl<'a> IntoIterator for &'a ReadingSet {
    type Item = &'a SensorReading;
    type IntoIter = slice::Iter<'a, SensorReading>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
