//! Pure mapping from a detection result to what the results card shows.

use crate::domain::{Classification, DetectionResult};

/// Color family of the result badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Fire.
    Red,
    /// Smoke.
    Amber,
    /// No fire.
    Green,
    /// Undetermined.
    Neutral,
}

/// Content of the results card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsCard {
    /// Nothing to show.
    Hidden,
    /// Skeleton placeholder while an analysis runs.
    Loading,
    /// A finished result.
    Ready {
        /// Badge text.
        label: String,
        /// Badge color family.
        tone: Tone,
        /// Fill of the confidence bar, in `0..=100`.
        confidence: u8,
        /// Creation time of the result.
        timestamp: String,
        /// Risk advisory line, absent for an undetermined result.
        advisory: Option<&'static str>,
    },
}

/// Advisory shown for a fire verdict.
pub const FIRE_ADVISORY: &str = "⚠ High risk detected! Immediate action recommended.";
/// Advisory shown for a smoke verdict.
pub const SMOKE_ADVISORY: &str = "⚠ Potential risk detected. Further investigation needed.";
/// Advisory shown for a no-fire verdict.
pub const NO_FIRE_ADVISORY: &str = "✓ No immediate risk detected.";

/// Decides what the results card displays.
///
/// Loading wins over any stale result.
#[must_use]
pub fn present_results(result: Option<&DetectionResult>, is_loading: bool) -> ResultsCard {
    if is_loading {
        return ResultsCard::Loading;
    }
    let Some(result) = result else {
        return ResultsCard::Hidden;
    };

    let (label, tone, advisory) = match result.status {
        Some(Classification::Fire) => ("Fire", Tone::Red, Some(FIRE_ADVISORY)),
        Some(Classification::Smoke) => ("Smoke", Tone::Amber, Some(SMOKE_ADVISORY)),
        Some(Classification::NoFire) => ("No Fire", Tone::Green, Some(NO_FIRE_ADVISORY)),
        None => ("Undetermined", Tone::Neutral, None),
    };

    ResultsCard::Ready {
        label: label.to_string(),
        tone,
        confidence: result.confidence.min(100),
        timestamp: result.timestamp.clone(),
        advisory,
    }
}
