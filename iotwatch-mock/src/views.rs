use iotwatch_analyser::{MISSING_READING_SCORE, to_alert_score};
use iotwatch_api::models::{ReadingSet, SensorReading};
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::registry::SensorRegistry;

const NO_SENSORS: &str = "No sensors";
const BAR_WIDTH: usize = 10;

/// Entry of the sensor picker. The placeholder carries no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorOption {
    pub label: String,
    pub value: Option<String>,
}

impl SensorOption {
    pub fn is_placeholder(&self) -> bool {
        self.value.is_none()
    }
}

/// Picker entries for the first `count` sensors of the registry.
pub fn sensor_options(registry: &SensorRegistry, count: usize) -> Vec<SensorOption> {
    let options: Vec<_> = registry
        .active(count)
        .iter()
        .enumerate()
        .map(|(i, descriptor)| SensorOption {
            label: format!("{} (Sensor {})", descriptor.name(), i + 1),
            value: Some(descriptor.name().to_string()),
        })
        .collect();

    if options.is_empty() {
        return vec![SensorOption {
            label: NO_SENSORS.to_string(),
            value: None,
        }];
    }

    options
}

/// The first selectable option, if any.
pub fn default_selection(options: &[SensorOption]) -> Option<&str> {
    options.iter().find_map(|option| option.value.as_deref())
}

#[derive(Tabled, Serialize, Debug, Clone, PartialEq)]
pub struct SensorRow {
    #[tabled(rename = "Sensor")]
    pub name: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Unit")]
    pub unit: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl SensorRow {
    pub fn from_reading(reading: &SensorReading) -> Self {
        Self {
            name: reading.name.clone(),
            value: reading.value.clone(),
            unit: reading.unit.clone(),
            status: reading.status.to_string(),
        }
    }
}

pub fn sensor_rows(set: &ReadingSet) -> Vec<SensorRow> {
    set.iter().map(SensorRow::from_reading).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub name: String,
    pub score: f64,
}

/// History entry for the selected sensor, scored against an absolute threshold.
pub fn history_rows(selection: Option<&str>, set: &ReadingSet, threshold: f64) -> Vec<HistoryRow> {
    let Some(selected) = selection else {
        return Vec::new();
    };

    let score = set
        .get(selected)
        .map(|reading| to_alert_score(reading.raw_value, threshold))
        .unwrap_or(MISSING_READING_SCORE);

    vec![HistoryRow {
        name: selected.to_lowercase(),
        score,
    }]
}

#[derive(Tabled, Serialize, Debug)]
struct HistoryTableRow {
    #[tabled(rename = "Sensor")]
    name: String,
    #[tabled(rename = "Alert")]
    alert: String,
    #[tabled(rename = "Level")]
    level: String,
}

impl HistoryTableRow {
    fn from_row(row: &HistoryRow) -> Self {
        Self {
            name: row.name.clone(),
            alert: format!("{:.0}%", row.score * 100.0),
            level: bar(row.score),
        }
    }
}

fn bar(score: f64) -> String {
    let filled = ((score.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);

    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn render_sensor_table(set: &ReadingSet) -> String {
    if set.is_empty() {
        return "No active sensors.".to_string();
    }

    Table::new(sensor_rows(set)).to_string()
}

pub fn render_history_table(rows: &[HistoryRow]) -> String {
    if rows.is_empty() {
        return "No sensor selected.".to_string();
    }

    Table::new(rows.iter().map(HistoryTableRow::from_row)).to_string()
}
