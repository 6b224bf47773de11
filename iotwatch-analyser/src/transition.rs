use std::time::Duration;

use crate::easing::ease;

/// Time taken to move the alert colour to a new band.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(500);

/// Eased move of the alert fraction from one value to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertTransition {
    from: f64,
    to: f64,
    duration: Duration,
}

impl AlertTransition {
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// Transition that already rests at `value`.
    pub fn settled(value: f64) -> Self {
        Self::new(value, value, Duration::ZERO)
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn value_at(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }

        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * ease(progress)
    }

    pub fn is_settled(&self, elapsed: Duration) -> bool {
        self.from == self.to || elapsed >= self.duration
    }

    /// New transition towards `to`, starting from the value shown after `elapsed`.
    pub fn retarget(&self, elapsed: Duration, to: f64, duration: Duration) -> Self {
        Self::new(self.value_at(elapsed), to, duration)
    }
}

impl Default for AlertTransition {
    fn default() -> Self {
        Self::settled(0.0)
    }
}
