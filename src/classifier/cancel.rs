//! Cooperative cancellation for in-flight analyses.
//!
//! The flag is a [`tokio_util::sync::CancellationToken`], so cancelling a
//! parent reaches every child. The deadline sits beside it and is checked on
//! the same call.

use crate::domain::AnalysisError;
use std::time::{Duration, Instant};

/// Shared cancel flag plus optional deadline, checked by classifiers between steps.
///
/// Clones share the flag: cancelling any clone cancels them all. Tokens made
/// with [`child_with_timeout`](Self::child_with_timeout) are also cancelled
/// when their parent is.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: tokio_util::sync::CancellationToken,
    deadline: Option<(Instant, Duration)>,
}

impl CancellationToken {
    /// Creates a token that is only cancelled explicitly.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a token that also expires `budget` from now.
    ///
    /// # Example
    ///
    /// ```rust
    /// use emberwatch::classifier::CancellationToken;
    /// use std::time::Duration;
    ///
    /// let token = CancellationToken::with_timeout(Duration::from_secs(30));
    /// assert!(token.check().is_ok());
    /// ```
    #[must_use]
    pub fn with_timeout(budget: Duration) -> Self {
        Self::new().child_with_timeout(budget)
    }

    /// Creates a child that expires `budget` from now and is cancelled with `self`.
    ///
    /// Cancelling the child leaves the parent untouched.
    #[must_use]
    pub fn child_with_timeout(&self, budget: Duration) -> Self {
        Self {
            flag: self.flag.child_token(),
            deadline: Some((Instant::now() + budget, budget)),
        }
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.cancel();
    }

    /// Returns `true` once this token, a clone, or a parent was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.is_cancelled()
    }

    /// Fails with `Cancelled` or `TimedOut` if the analysis must stop.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Cancelled`] after an explicit cancel and
    /// [`AnalysisError::TimedOut`] once the deadline has passed.
    pub fn check(&self) -> Result<(), AnalysisError> {
        if self.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        if let Some((deadline, budget)) = self.deadline {
            if Instant::now() >= deadline {
                return Err(AnalysisError::TimedOut {
                    after_ms: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
                });
            }
        }
        Ok(())
    }
}
