//! Narrative heat classification for a market sector.

use crate::NarrativeMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Momentum ratio above which a sector counts as HOT (given enough volume).
pub const HOT_MOMENTUM: f64 = 1.5;

/// Momentum ratio above which a sector counts as WARMING.
pub const WARMING_MOMENTUM: f64 = 1.2;

/// Last observed heat of a narrative sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SectorState {
    Cool,
    Warming,
    Hot,
    /// Nothing observed yet.
    #[default]
    Unknown,
}

impl SectorState {
    /// Classify narrative metrics against the social-volume threshold.
    ///
    /// HOT needs both momentum above [`HOT_MOMENTUM`] and social volume above
    /// `social_threshold`; WARMING needs only momentum above
    /// [`WARMING_MOMENTUM`]. Everything else is COOL.
    pub fn classify(metrics: &NarrativeMetrics, social_threshold: f64) -> Self {
        if metrics.momentum > HOT_MOMENTUM && metrics.social_volume > social_threshold {
            SectorState::Hot
        } else if metrics.momentum > WARMING_MOMENTUM {
            SectorState::Warming
        } else {
            SectorState::Cool
        }
    }

    /// True for the states that are worth telling anyone about.
    #[inline]
    pub fn is_heated(self) -> bool {
        matches!(self, SectorState::Hot | SectorState::Warming)
    }

    /// Whether moving from `previous` to `self` should raise an alert.
    ///
    /// Only a change into HOT or WARMING alerts; staying put or cooling down
    /// never does.
    #[inline]
    pub fn alerts_from(self, previous: SectorState) -> bool {
        self != previous && self.is_heated()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectorState::Cool => "COOL",
            SectorState::Warming => "WARMING",
            SectorState::Hot => "HOT",
            SectorState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for SectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
