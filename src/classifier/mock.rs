//! Random stand-in for a real fire/smoke model.
//!
//! Reproduces the behavior of the placeholder the interface shipped with:
//! a fixed latency followed by a random verdict. Latency is paced in steps
//! so that progress, cancellation and the deadline all work as they would
//! against a real backend.

use super::{CancellationToken, Classifier, ImageInput};
use crate::domain::{AnalysisError, Classification, Verdict};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default simulated inference latency.
pub const DEFAULT_LATENCY_MS: u64 = 3000;

/// Default pacing step; progress is reported after each one.
pub const DEFAULT_STEP_MS: u64 = 100;

/// Tunables for [`MockClassifier`], sent to the worker at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockSettings {
    /// Total simulated latency.
    pub latency_ms: u64,
    /// Pacing step.
    pub step_ms: u64,
    /// Probability in `[0, 1]` that an analysis fails after the delay.
    pub failure_rate: f64,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            latency_ms: DEFAULT_LATENCY_MS,
            step_ms: DEFAULT_STEP_MS,
            failure_rate: 0.0,
            seed: None,
        }
    }
}

/// Classifier that sleeps, then draws a random verdict.
pub struct MockClassifier {
    settings: MockSettings,
    rng: StdRng,
    sleep: fn(Duration),
}

impl MockClassifier {
    /// Creates a classifier from settings, seeding from entropy when no seed is set.
    #[must_use]
    pub fn new(settings: MockSettings) -> Self {
        let rng = settings
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            settings,
            rng,
            sleep: std::thread::sleep,
        }
    }

    /// Replaces the sleep function, letting tests pace without waiting.
    #[must_use]
    pub fn with_sleeper(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> &MockSettings {
        &self.settings
    }

    fn step_count(&self) -> u64 {
        if self.settings.latency_ms == 0 {
            0
        } else if self.settings.step_ms == 0 {
            1
        } else {
            self.settings.latency_ms.div_ceil(self.settings.step_ms)
        }
    }

    fn step_duration(&self) -> Duration {
        let step = if self.settings.step_ms == 0 {
            self.settings.latency_ms
        } else {
            self.settings.step_ms.min(self.settings.latency_ms)
        };
        Duration::from_millis(step)
    }

    /// Draws a verdict: 30% fire, then an even split between smoke and no fire.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn draw(&mut self) -> Verdict {
        let status = if self.rng.gen::<f64>() > 0.7 {
            Classification::Fire
        } else if self.rng.gen::<f64>() > 0.5 {
            Classification::Smoke
        } else {
            Classification::NoFire
        };

        // f64 rounding can land exactly on 100.0 for draws just below 1.0
        let confidence = (70.0 + self.rng.gen::<f64>() * 30.0).floor().min(99.0) as u8;

        Verdict {
            status: Some(status),
            confidence,
        }
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new(MockSettings::default())
    }
}

impl std::fmt::Debug for MockClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockClassifier")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Classifier for MockClassifier {
    fn name(&self) -> &'static str {
        "mock"
    }

    #[allow(clippy::cast_possible_truncation)]
    fn classify(
        &mut self,
        image: &ImageInput,
        cancel: &CancellationToken,
        progress: &mut dyn FnMut(u8),
    ) -> Result<Verdict, AnalysisError> {
        if image.bytes.is_empty() {
            return Err(AnalysisError::EmptyImage);
        }
        cancel.check()?;

        let steps = self.step_count();
        let step = self.step_duration();
        for done in 1..=steps {
            (self.sleep)(step);
            cancel.check()?;
            progress((done * 100 / steps) as u8);
        }
        if steps == 0 {
            progress(100);
        }

        if self.settings.failure_rate > 0.0 && self.rng.gen::<f64>() < self.settings.failure_rate {
            return Err(AnalysisError::Classifier(
                "simulated inference failure".to_string(),
            ));
        }

        let verdict = self.draw();
        tracing::debug!(
            image = %image.name,
            status = ?verdict.status,
            confidence = verdict.confidence,
            "mock verdict drawn"
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_sleep(_: Duration) {}

    fn input() -> ImageInput {
        ImageInput {
            name: "forest.jpg".to_string(),
            kind: None,
            bytes: vec![0xFF, 0xD8, 0xFF],
        }
    }

    fn instant(seed: u64) -> MockClassifier {
        MockClassifier::new(MockSettings {
            latency_ms: 0,
            seed: Some(seed),
            ..MockSettings::default()
        })
    }

    #[test]
    fn confidence_stays_between_70_and_99() {
        let mut classifier = instant(7);
        let token = CancellationToken::new();
        for _ in 0..5_000 {
            let verdict = classifier
                .classify(&input(), &token, &mut |_| {})
                .expect("mock never fails at rate 0");
            assert!((70..=99).contains(&verdict.confidence), "{}", verdict.confidence);
            assert!(verdict.status.is_some());
        }
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn distribution_approximates_thirty_thirty_five_thirty_five() {
        const RUNS: usize = 20_000;
        let mut classifier = instant(42);
        let token = CancellationToken::new();
        let mut counts: HashMap<Classification, usize> = HashMap::new();
        for _ in 0..RUNS {
            let verdict = classifier
                .classify(&input(), &token, &mut |_| {})
                .expect("classify");
            *counts.entry(verdict.status.expect("status")).or_default() += 1;
        }

        let share = |c| *counts.get(&c).unwrap_or(&0) as f64 / RUNS as f64;
        assert!((share(Classification::Fire) - 0.30).abs() < 0.02);
        assert!((share(Classification::Smoke) - 0.35).abs() < 0.02);
        assert!((share(Classification::NoFire) - 0.35).abs() < 0.02);
    }

    #[test]
    fn progress_is_paced_to_the_full_latency() {
        let mut classifier = MockClassifier::new(MockSettings {
            seed: Some(1),
            ..MockSettings::default()
        })
        .with_sleeper(no_sleep);
        let mut reported = Vec::new();
        classifier
            .classify(&input(), &CancellationToken::new(), &mut |p| reported.push(p))
            .expect("classify");

        assert_eq!(reported.len(), 30);
        assert!(reported.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(reported.last(), Some(&100));
    }

    #[test]
    fn zero_latency_still_reports_completion() {
        let mut reported = Vec::new();
        instant(3)
            .classify(&input(), &CancellationToken::new(), &mut |p| reported.push(p))
            .expect("classify");
        assert_eq!(reported, vec![100]);
    }

    #[test]
    fn cancelled_token_stops_before_any_progress() {
        let token = CancellationToken::new();
        token.cancel();
        let mut reported = Vec::new();
        let err = MockClassifier::default()
            .with_sleeper(no_sleep)
            .classify(&input(), &token, &mut |p| reported.push(p))
            .expect_err("cancelled");
        assert_eq!(err, AnalysisError::Cancelled);
        assert!(reported.is_empty());
    }

    #[test]
    fn expired_deadline_times_out() {
        let token = CancellationToken::with_timeout(Duration::ZERO);
        let err = MockClassifier::default()
            .with_sleeper(no_sleep)
            .classify(&input(), &token, &mut |_| {})
            .expect_err("timed out");
        assert!(matches!(err, AnalysisError::TimedOut { .. }));
    }

    #[test]
    fn empty_image_is_rejected() {
        let empty = ImageInput {
            bytes: Vec::new(),
            ..input()
        };
        let err = instant(1)
            .classify(&empty, &CancellationToken::new(), &mut |_| {})
            .expect_err("empty");
        assert_eq!(err, AnalysisError::EmptyImage);
    }

    #[test]
    fn certain_failure_rate_always_fails() {
        let mut classifier = MockClassifier::new(MockSettings {
            latency_ms: 0,
            failure_rate: 1.0,
            seed: Some(9),
            ..MockSettings::default()
        });
        let err = classifier
            .classify(&input(), &CancellationToken::new(), &mut |_| {})
            .expect_err("fails");
        assert!(matches!(err, AnalysisError::Classifier(_)));
    }
}
