//! Detection verdicts and results.
//!
//! A classifier produces a [`Verdict`]; the lifecycle controller stamps it
//! with a time and the [`ImageRef`] of the analyzed file to form the single
//! live [`DetectionResult`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a live preview handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PreviewId(pub u64);

impl fmt::Display for PreviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preview-{}", self.0)
    }
}

/// What the classifier saw in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Open flame detected.
    Fire,
    /// Smoke without visible flame.
    Smoke,
    /// Neither fire nor smoke.
    NoFire,
}

impl Classification {
    /// Display label used on the result badge.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Smoke => "Smoke",
            Self::NoFire => "No Fire",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw classifier output.
///
/// `status` is `None` when the classifier could not decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Detected class, if any.
    pub status: Option<Classification>,
    /// Confidence as an integer percentage.
    pub confidence: u8,
}

/// Non-owning reference to the image an analysis ran on.
///
/// Points at the preview handle owned by intake; it never keeps the handle
/// alive on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Preview handle this reference resolves through.
    pub preview_id: PreviewId,
    /// Path of the accepted file.
    pub path: String,
    /// File name for display.
    pub name: String,
}

/// Outcome of one completed analysis.
///
/// Immutable once created; replaced wholesale by the next analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionResult {
    /// Detected class, `None` for an undetermined result.
    pub status: Option<Classification>,
    /// Confidence, clamped to `0..=100`.
    pub confidence: u8,
    /// Human-readable local creation time.
    pub timestamp: String,
    /// The analyzed image.
    pub image: ImageRef,
}

impl DetectionResult {
    /// Builds a result from a verdict, clamping the confidence to a percentage.
    #[must_use]
    pub fn from_verdict(verdict: Verdict, timestamp: String, image: ImageRef) -> Self {
        Self {
            status: verdict.status,
            confidence: verdict.confidence.min(100),
            timestamp,
            image,
        }
    }
}

/// Formats a local time the way results display it, e.g. `3/14/2025, 2:05:09 PM`.
#[must_use]
pub fn format_timestamp(at: &chrono::DateTime<chrono::Local>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn image() -> ImageRef {
        ImageRef {
            preview_id: PreviewId(1),
            path: "/host/forest.jpg".to_string(),
            name: "forest.jpg".to_string(),
        }
    }

    #[test]
    fn confidence_is_clamped_to_a_percentage() {
        let verdict = Verdict {
            status: Some(Classification::Fire),
            confidence: 140,
        };
        let result = DetectionResult::from_verdict(verdict, String::new(), image());
        assert_eq!(result.confidence, 100);
    }

    #[test]
    fn timestamp_uses_twelve_hour_clock() {
        let at = chrono::Local
            .with_ymd_and_hms(2025, 3, 14, 14, 5, 9)
            .single()
            .expect("unambiguous local time");
        assert_eq!(format_timestamp(&at), "3/14/2025, 2:05:09 PM");
    }

    #[test]
    fn no_fire_label_has_a_space() {
        assert_eq!(Classification::NoFire.to_string(), "No Fire");
    }
}
