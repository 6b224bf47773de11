use core::fmt;

use serde::{Deserialize, Serialize};

/// Discrete alert level of a reading, ordered from least to most severe.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertBand {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl AlertBand {
    pub const ALL: [AlertBand; 3] = [AlertBand::Normal, AlertBand::Warning, AlertBand::Critical];

    pub fn label(&self) -> &'static str {
        match self {
            AlertBand::Normal => "normal",
            AlertBand::Warning => "warning",
            AlertBand::Critical => "critical",
        }
    }
}

impl fmt::Display for AlertBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
