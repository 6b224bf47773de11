use iotwatch_api::models::AlertBand;

/// Normalized position from which a reading is a warning.
pub const WARNING_THRESHOLD: f64 = 0.5;
/// Normalized position from which a reading is critical.
pub const CRITICAL_THRESHOLD: f64 = 0.8;

/// Absolute threshold used by the history view, independent of the sensor range.
pub const DEFAULT_ALERT_THRESHOLD: f64 = 50.0;
/// History score shown while the selected sensor has no reading yet.
pub const MISSING_READING_SCORE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    #[error("Reading is not a finite number: {0}")]
    NonFiniteValue(f64),

    #[error("Invalid range: min {min} must be finite and below max {max}")]
    InvalidRange { min: f64, max: f64 },
}

/// Position of `raw` inside `[min, max]`.
///
/// The result is not clamped: a reading below `min` gives a negative position
/// and one above `max` a position greater than one.
pub fn normalize(raw: f64, min: f64, max: f64) -> Result<f64, ClassifyError> {
    if !(min.is_finite() && max.is_finite() && min < max) {
        return Err(ClassifyError::InvalidRange { min, max });
    }

    if !raw.is_finite() {
        return Err(ClassifyError::NonFiniteValue(raw));
    }

    Ok((raw - min) / (max - min))
}

pub fn classify(raw: f64, min: f64, max: f64) -> Result<AlertBand, ClassifyError> {
    normalize(raw, min, max).map(band_for)
}

/// Band of an already normalized position.
pub fn band_for(normalized: f64) -> AlertBand {
    if normalized >= CRITICAL_THRESHOLD {
        AlertBand::Critical
    } else if normalized >= WARNING_THRESHOLD {
        AlertBand::Warning
    } else {
        AlertBand::Normal
    }
}

/// Control value driving the alert colour: green at 0.0, yellow at 0.5, red at 1.0.
pub fn to_animated_fraction(band: AlertBand) -> f64 {
    match band {
        AlertBand::Normal => 0.0,
        AlertBand::Warning => 0.5,
        AlertBand::Critical => 1.0,
    }
}

/// Coarse score used for the history progress bar.
///
/// Compares the raw value against an absolute threshold, ignoring the sensor
/// range, so a sensor whose domain never exceeds the threshold always scores 0.5.
/// This intentionally differs from [`classify`].
pub fn to_alert_score(raw: f64, threshold: f64) -> f64 {
    if raw > threshold {
        1.0
    } else {
        0.5
    }
}
