use std::collections::HashSet;

use iotwatch_analyser::{classify, ClassifyError};
use iotwatch_api::models::AlertBand;

use crate::error::RegistryError;

/// Renders a raw sample for display.
pub type Formatter = fn(f64) -> String;

#[derive(Debug, Clone)]
pub struct SensorTypeDescriptor {
    name: String,
    unit: String,
    min: f64,
    max: f64,
    formatter: Option<Formatter>,
}

impl SensorTypeDescriptor {
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        min: f64,
        max: f64,
    ) -> Result<Self, RegistryError> {
        let name = name.into();

        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(RegistryError::InvalidRange { name, min, max });
        }

        Ok(Self {
            name,
            unit: unit.into(),
            min,
            max,
            formatter: None,
        })
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Display string for a raw sample, one decimal place unless a formatter is set.
    pub fn format(&self, raw: f64) -> String {
        match self.formatter {
            Some(formatter) => formatter(raw),
            None => format!("{raw:.1}"),
        }
    }

    pub fn classify(&self, raw: f64) -> Result<AlertBand, ClassifyError> {
        classify(raw, self.min, self.max)
    }
}

impl PartialEq for SensorTypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.unit == other.unit
            && self.min == other.min
            && self.max == other.max
            && self.formatter.map(|f| f as usize) == other.formatter.map(|f| f as usize)
    }
}

fn format_ph(raw: f64) -> String {
    format!("pH {raw:.1}")
}

// Only used for the built-in table whose ranges are known to be valid
fn builtin(name: &str, unit: &str, min: f64, max: f64) -> SensorTypeDescriptor {
    SensorTypeDescriptor {
        name: name.to_string(),
        unit: unit.to_string(),
        min,
        max,
        formatter: None,
    }
}

/// Fixed, ordered list of the sensor kinds a session can activate.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRegistry {
    descriptors: Vec<SensorTypeDescriptor>,
}

impl SensorRegistry {
    pub fn new(descriptors: Vec<SensorTypeDescriptor>) -> Result<Self, RegistryError> {
        if descriptors.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut names = HashSet::new();
        for descriptor in &descriptors {
            if !names.insert(descriptor.name()) {
                return Err(RegistryError::DuplicateName(descriptor.name().to_string()));
            }
        }

        Ok(Self { descriptors })
    }

    pub fn all(&self) -> &[SensorTypeDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptor at `index`, wrapping around the end of the registry.
    pub fn by_index(&self, index: usize) -> &SensorTypeDescriptor {
        &self.descriptors[index % self.descriptors.len()]
    }

    pub fn by_name(&self, name: &str) -> Result<&SensorTypeDescriptor, RegistryError> {
        self.descriptors
            .iter()
            .find(|descriptor| descriptor.name() == name)
            .ok_or_else(|| RegistryError::UnknownSensorName(name.to_string()))
    }

    /// The first `count` descriptors, capped at the registry size.
    pub fn active(&self, count: usize) -> &[SensorTypeDescriptor] {
        &self.descriptors[..count.min(self.descriptors.len())]
    }
}

impl Default for SensorRegistry {
    fn default() -> Self {
        Self {
            descriptors: vec![
                builtin("Luminosity", "lux", 0.0, 1000.0),
                builtin("Temperature", "°C", 15.0, 35.0),
                builtin("Humidity/Water", "%", 0.0, 100.0),
                builtin("Chemical", "", 0.0, 14.0).with_formatter(format_ph),
                builtin("Fire", "events", 0.0, 1.0),
                builtin("Gas", "ppm", 0.0, 50.0),
            ],
        }
    }
}
