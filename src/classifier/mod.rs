//! Classifier boundary.
//!
//! The lifecycle controller never calls a model directly. It asks the worker
//! to run whatever [`Classifier`] is installed there, so a real model or a
//! remote service can replace [`MockClassifier`] without touching the rest
//! of the plugin.
//!
//! A classifier receives:
//! - the image bytes and declared kind ([`ImageInput`])
//! - a [`CancellationToken`] it must check between units of work
//! - a progress callback taking a percentage in `0..=100`
//!
//! # Example
//!
//! ```rust
//! use emberwatch::classifier::{CancellationToken, Classifier, ImageInput, MockClassifier, MockSettings};
//!
//! let mut classifier = MockClassifier::new(MockSettings { latency_ms: 0, ..Default::default() });
//! let image = ImageInput { name: "forest.jpg".into(), kind: None, bytes: vec![1, 2, 3] };
//! let verdict = classifier.classify(&image, &CancellationToken::new(), &mut |_| {})?;
//! assert!((70..=99).contains(&verdict.confidence));
//! # Ok::<(), emberwatch::domain::AnalysisError>(())
//! ```

pub mod cancel;
pub mod mock;

pub use cancel::CancellationToken;
pub use mock::{MockClassifier, MockSettings};

use crate::domain::{AnalysisError, ImageKind, Verdict};

/// Image handed to a classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// File name, for logging.
    pub name: String,
    /// Kind declared by the file extension, if known.
    pub kind: Option<ImageKind>,
    /// Raw encoded bytes.
    pub bytes: Vec<u8>,
}

/// A fire/smoke detector.
///
/// Implementations must return promptly with [`AnalysisError::Cancelled`] or
/// [`AnalysisError::TimedOut`] once `cancel.check()` fails, and should call
/// `progress` with non-decreasing values ending at 100 on success.
pub trait Classifier: Send {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// Classifies one image.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalysisError`] on cancellation, timeout, unusable input
    /// or an inference failure.
    fn classify(
        &mut self,
        image: &ImageInput,
        cancel: &CancellationToken,
        progress: &mut dyn FnMut(u8),
    ) -> Result<Verdict, AnalysisError>;
}
