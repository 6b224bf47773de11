pub mod classifier;
pub mod colour;
pub mod easing;
pub mod transition;

pub use classifier::{
    classify, normalize, to_alert_score, to_animated_fraction, ClassifyError,
    CRITICAL_THRESHOLD, DEFAULT_ALERT_THRESHOLD, MISSING_READING_SCORE, WARNING_THRESHOLD,
};
pub use colour::{alert_colour, Rgb};
pub use transition::{AlertTransition, DEFAULT_TRANSITION};
