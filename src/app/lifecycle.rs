//! Upload/detection lifecycle controller.
//!
//! Owns the single [`UploadStatus`], the analysis ticket, progress and the
//! live [`DetectionResult`]. Every status change goes through
//! [`LifecycleController::transition`], which refuses edges the status enum
//! does not allow and leaves state untouched when it does.
//!
//! # Tickets
//!
//! Each [`begin`](LifecycleController::begin) issues a fresh request id. Worker
//! responses carry it back; anything addressed to an older ticket is stale and
//! ignored. This is what keeps a late verdict from a replaced file from
//! landing on the new one.
//!
//! # Watchdog
//!
//! The worker enforces the analysis deadline itself. As a backstop the
//! controller accumulates elapsed time from plugin ticks and fails the
//! analysis once `timeout + grace` has passed without a verdict.

use crate::domain::error::{EmberwatchError, Result};
use crate::domain::{AnalysisError, DetectionResult, ImageRef, UploadStatus, Verdict};

/// Default deadline for one analysis.
pub const DEFAULT_ANALYSIS_TIMEOUT_MS: u64 = 30_000;

/// Extra time the plugin waits past the deadline before giving up itself.
pub const WATCHDOG_GRACE_MS: u64 = 2_000;

/// How an analysis ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    /// A result is now available.
    Success,
    /// The analysis failed.
    Failure(AnalysisError),
}

/// The idle → uploading → success/error state machine.
#[derive(Debug, Clone)]
pub struct LifecycleController {
    status: UploadStatus,
    request_seq: u64,
    active_request: Option<u64>,
    progress: u8,
    result: Option<DetectionResult>,
    image: Option<ImageRef>,
    elapsed_ms: u64,
    timeout_ms: u64,
    grace_ms: u64,
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYSIS_TIMEOUT_MS)
    }
}

impl LifecycleController {
    /// Creates an idle controller with the given analysis deadline.
    #[must_use]
    pub const fn new(timeout_ms: u64) -> Self {
        Self {
            status: UploadStatus::Idle,
            request_seq: 0,
            active_request: None,
            progress: 0,
            result: None,
            image: None,
            elapsed_ms: 0,
            timeout_ms,
            grace_ms: WATCHDOG_GRACE_MS,
        }
    }

    fn transition(&mut self, to: UploadStatus) -> Result<()> {
        if !self.status.can_transition_to(to) {
            return Err(EmberwatchError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        tracing::debug!(from = ?self.status, ?to, "lifecycle transition");
        self.status = to;
        Ok(())
    }

    /// Starts analyzing `image`, returning the ticket the worker must echo.
    ///
    /// From `Error` the controller first passes through `Idle`. Progress and
    /// the watchdog clock restart at zero and any previous result is dropped.
    ///
    /// # Parameters
    ///
    /// * `image` - Reference to the preview intake just accepted
    ///
    /// # Returns
    ///
    /// The new request id. Ids increase monotonically for the lifetime of
    /// the controller.
    ///
    /// # Errors
    ///
    /// Returns [`EmberwatchError::InvalidTransition`] while an analysis is
    /// running or a result is shown.
    ///
    /// # Example
    ///
    /// ```rust
    /// use emberwatch::app::LifecycleController;
    /// use emberwatch::domain::{ImageRef, PreviewId, UploadStatus};
    ///
    /// let mut lifecycle = LifecycleController::default();
    /// let image = ImageRef { preview_id: PreviewId(1), path: "/host/a.png".into(), name: "a.png".into() };
    /// let ticket = lifecycle.begin(image.clone())?;
    /// assert_eq!(lifecycle.status(), UploadStatus::Uploading);
    /// assert_eq!(lifecycle.active_request(), Some(ticket));
    /// assert!(lifecycle.begin(image).is_err());
    /// # Ok::<(), emberwatch::EmberwatchError>(())
    /// ```
    pub fn begin(&mut self, image: ImageRef) -> Result<u64> {
        if self.status == UploadStatus::Error {
            self.reset()?;
        }
        self.transition(UploadStatus::Uploading)?;

        self.request_seq += 1;
        self.active_request = Some(self.request_seq);
        self.progress = 0;
        self.elapsed_ms = 0;
        self.result = None;
        tracing::info!(request_id = self.request_seq, image = %image.name, "analysis started");
        self.image = Some(image);
        Ok(self.request_seq)
    }

    fn is_current(&self, request_id: u64) -> bool {
        self.status == UploadStatus::Uploading && self.active_request == Some(request_id)
    }

    /// Records classifier progress for `request_id`.
    ///
    /// Progress never decreases and is capped at 100. Reports for a stale
    /// ticket, or arriving while nothing is running, are dropped.
    ///
    /// # Parameters
    ///
    /// * `request_id` - Ticket echoed by the worker
    /// * `percent` - Reported progress; values above 100 are capped
    ///
    /// # Returns
    ///
    /// `true` if the displayed value changed and the pane should re-render.
    pub fn record_progress(&mut self, request_id: u64, percent: u8) -> bool {
        if !self.is_current(request_id) {
            tracing::trace!(request_id, percent, "stale progress ignored");
            return false;
        }
        let percent = percent.min(100);
        if percent <= self.progress {
            return false;
        }
        self.progress = percent;
        true
    }

    /// Settles the analysis behind `request_id`.
    ///
    /// On success the controller moves to `Success`, stores a
    /// [`DetectionResult`] stamped with `timestamp` and pins progress at 100.
    /// On failure it moves to `Error` and clears progress and result.
    ///
    /// # Parameters
    ///
    /// * `request_id` - Ticket echoed by the worker
    /// * `outcome` - The classifier's verdict or error
    /// * `timestamp` - Display time for the result
    ///
    /// # Returns
    ///
    /// How the analysis settled, or `None` when the ticket is stale or
    /// nothing is running. State is untouched in the `None` case.
    pub fn complete(
        &mut self,
        request_id: u64,
        outcome: std::result::Result<Verdict, AnalysisError>,
        timestamp: String,
    ) -> Option<Settled> {
        if !self.is_current(request_id) {
            tracing::debug!(request_id, active = ?self.active_request, "stale completion ignored");
            return None;
        }

        match outcome {
            Ok(verdict) => {
                let image = self.image.clone()?;
                self.transition(UploadStatus::Success).ok()?;
                let result = DetectionResult::from_verdict(verdict, timestamp, image);
                tracing::info!(
                    request_id,
                    status = ?result.status,
                    confidence = result.confidence,
                    "analysis succeeded"
                );
                self.result = Some(result);
                self.progress = 100;
                self.active_request = None;
                Some(Settled::Success)
            }
            Err(error) => Some(self.fail(error)),
        }
    }

    fn fail(&mut self, error: AnalysisError) -> Settled {
        if let Err(e) = self.transition(UploadStatus::Error) {
            tracing::error!(error = %e, "cannot fail analysis");
        }
        tracing::warn!(request_id = ?self.active_request, error = %error, "analysis failed");
        self.active_request = None;
        self.progress = 0;
        self.result = None;
        Settled::Failure(error)
    }

    /// Returns to `Idle`, dropping the result and zeroing progress.
    ///
    /// Resetting while already idle is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EmberwatchError::InvalidTransition`] while uploading.
    pub fn reset(&mut self) -> Result<()> {
        if self.status != UploadStatus::Idle {
            self.transition(UploadStatus::Idle)?;
        }
        self.active_request = None;
        self.progress = 0;
        self.elapsed_ms = 0;
        self.result = None;
        self.image = None;
        Ok(())
    }

    /// Advances the watchdog clock by `elapsed_ms`.
    ///
    /// Returns the failure if the analysis just ran out of time.
    pub fn advance_clock(&mut self, elapsed_ms: u64) -> Option<Settled> {
        if self.status != UploadStatus::Uploading {
            return None;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms <= self.timeout_ms.saturating_add(self.grace_ms) {
            return None;
        }
        Some(self.fail(AnalysisError::TimedOut {
            after_ms: self.timeout_ms,
        }))
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> UploadStatus {
        self.status
    }

    /// Displayed progress in `0..=100`.
    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
    }

    /// The live result; only present in `Success`.
    #[must_use]
    pub const fn result(&self) -> Option<&DetectionResult> {
        self.result.as_ref()
    }

    /// Image of the current or last analysis.
    #[must_use]
    pub const fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    /// Ticket of the running analysis.
    #[must_use]
    pub const fn active_request(&self) -> Option<u64> {
        self.active_request
    }

    /// Whether an analysis is running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == UploadStatus::Uploading
    }

    /// Analysis deadline.
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Time accumulated on the watchdog clock.
    #[must_use]
    pub const fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Classification, PreviewId};

    fn image(id: u64) -> ImageRef {
        ImageRef {
            preview_id: PreviewId(id),
            path: format!("/host/{id}.jpg"),
            name: format!("{id}.jpg"),
        }
    }

    fn fire(confidence: u8) -> Verdict {
        Verdict {
            status: Some(Classification::Fire),
            confidence,
        }
    }

    #[test]
    fn success_path_goes_through_uploading() {
        let mut lifecycle = LifecycleController::default();
        let id = lifecycle.begin(image(1)).expect("begin");
        assert_eq!(lifecycle.status(), UploadStatus::Uploading);
        assert!(lifecycle.result().is_none());

        let settled = lifecycle.complete(id, Ok(fire(87)), "now".to_string());
        assert_eq!(settled, Some(Settled::Success));
        assert_eq!(lifecycle.status(), UploadStatus::Success);
        assert_eq!(lifecycle.progress(), 100);

        let result = lifecycle.result().expect("result");
        assert_eq!(result.confidence, 87);
        assert_eq!(result.image, image(1));
    }

    #[test]
    fn failure_leaves_no_result_and_zero_progress() {
        let mut lifecycle = LifecycleController::default();
        let id = lifecycle.begin(image(1)).expect("begin");
        lifecycle.record_progress(id, 40);

        let settled = lifecycle.complete(id, Err(AnalysisError::EmptyImage), String::new());
        assert_eq!(settled, Some(Settled::Failure(AnalysisError::EmptyImage)));
        assert_eq!(lifecycle.status(), UploadStatus::Error);
        assert_eq!(lifecycle.progress(), 0);
        assert!(lifecycle.result().is_none());
    }

    #[test]
    fn begin_is_refused_while_busy_or_showing_a_result() {
        let mut lifecycle = LifecycleController::default();
        let id = lifecycle.begin(image(1)).expect("begin");

        let err = lifecycle.begin(image(2)).expect_err("busy");
        assert!(matches!(
            err,
            EmberwatchError::InvalidTransition {
                from: UploadStatus::Uploading,
                to: UploadStatus::Uploading
            }
        ));
        assert_eq!(lifecycle.active_request(), Some(id));

        lifecycle.complete(id, Ok(fire(80)), String::new());
        assert!(lifecycle.begin(image(2)).is_err());
        assert_eq!(lifecycle.status(), UploadStatus::Success);
    }

    #[test]
    fn begin_after_error_passes_through_idle() {
        let mut lifecycle = LifecycleController::default();
        let first = lifecycle.begin(image(1)).expect("begin");
        lifecycle.complete(first, Err(AnalysisError::Cancelled), String::new());

        let second = lifecycle.begin(image(2)).expect("retry");
        assert!(second > first);
        assert_eq!(lifecycle.image(), Some(&image(2)));
    }

    #[test]
    fn reset_is_refused_while_uploading() {
        let mut lifecycle = LifecycleController::default();
        lifecycle.begin(image(1)).expect("begin");
        assert!(lifecycle.reset().is_err());
        assert_eq!(lifecycle.status(), UploadStatus::Uploading);
    }

    #[test]
    fn reset_drops_result_and_progress() {
        let mut lifecycle = LifecycleController::default();
        let id = lifecycle.begin(image(1)).expect("begin");
        lifecycle.complete(id, Ok(fire(90)), String::new());

        lifecycle.reset().expect("reset");
        assert_eq!(lifecycle.status(), UploadStatus::Idle);
        assert_eq!(lifecycle.progress(), 0);
        assert!(lifecycle.result().is_none());
        assert!(lifecycle.image().is_none());
        lifecycle.reset().expect("idle reset is a no-op");
    }

    #[test]
    fn progress_is_monotonic_and_capped() {
        let mut lifecycle = LifecycleController::default();
        let id = lifecycle.begin(image(1)).expect("begin");

        assert!(lifecycle.record_progress(id, 30));
        assert!(!lifecycle.record_progress(id, 20));
        assert_eq!(lifecycle.progress(), 30);
        assert!(lifecycle.record_progress(id, 250));
        assert_eq!(lifecycle.progress(), 100);
    }

    #[test]
    fn stale_tickets_are_ignored() {
        let mut lifecycle = LifecycleController::default();
        let old = lifecycle.begin(image(1)).expect("begin");
        lifecycle.complete(old, Err(AnalysisError::Cancelled), String::new());
        let new = lifecycle.begin(image(2)).expect("begin");

        assert!(!lifecycle.record_progress(old, 90));
        assert_eq!(lifecycle.complete(old, Ok(fire(99)), String::new()), None);
        assert_eq!(lifecycle.status(), UploadStatus::Uploading);
        assert_eq!(lifecycle.active_request(), Some(new));
    }

    #[test]
    fn completion_without_a_running_analysis_is_ignored() {
        let mut lifecycle = LifecycleController::default();
        assert_eq!(lifecycle.complete(1, Ok(fire(80)), String::new()), None);
        assert_eq!(lifecycle.status(), UploadStatus::Idle);
    }

    #[test]
    fn watchdog_fails_after_timeout_plus_grace() {
        let mut lifecycle = LifecycleController::new(1_000);
        lifecycle.begin(image(1)).expect("begin");

        assert_eq!(lifecycle.advance_clock(1_000 + WATCHDOG_GRACE_MS), None);
        assert_eq!(
            lifecycle.advance_clock(1),
            Some(Settled::Failure(AnalysisError::TimedOut { after_ms: 1_000 }))
        );
        assert_eq!(lifecycle.status(), UploadStatus::Error);
        assert_eq!(lifecycle.advance_clock(10_000), None);
    }
}
