//! Transient toasts that dismiss themselves.
//!
//! Time is advanced explicitly by the plugin's tick, so expiry is
//! deterministic under test.

use std::collections::VecDeque;

/// Default time a toast stays visible.
pub const DEFAULT_TOAST_MS: u64 = 4000;

/// Maximum toasts kept at once; pushing more drops the oldest.
pub const MAX_VISIBLE: usize = 3;

/// Visual flavor of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Something finished well.
    Success,
    /// Something failed or was refused.
    Error,
    /// Neutral information.
    Info,
}

/// One visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Unique id within this queue.
    pub id: u64,
    /// Flavor.
    pub kind: ToastKind,
    /// Text shown to the user.
    pub message: String,
    /// Time left before dismissal.
    pub remaining_ms: u64,
}

/// Queue of live toasts, oldest first.
#[derive(Debug, Clone)]
pub struct Notifications {
    toasts: VecDeque<Toast>,
    next_id: u64,
    lifetime_ms: u64,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_MS)
    }
}

impl Notifications {
    /// Creates an empty queue whose toasts live `lifetime_ms`.
    #[must_use]
    pub const fn new(lifetime_ms: u64) -> Self {
        Self {
            toasts: VecDeque::new(),
            next_id: 1,
            lifetime_ms,
        }
    }

    /// Shows a toast and returns its id.
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let message = message.into();
        tracing::debug!(id, ?kind, %message, "toast shown");
        self.toasts.push_back(Toast {
            id,
            kind,
            message,
            remaining_ms: self.lifetime_ms,
        });
        while self.toasts.len() > MAX_VISIBLE {
            self.toasts.pop_front();
        }
        id
    }

    /// Shows a success toast.
    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message)
    }

    /// Shows an error toast.
    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message)
    }

    /// Shows an informational toast.
    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Info, message)
    }

    /// Ages every toast by `elapsed_ms` and drops expired ones.
    ///
    /// Returns `true` if any toast was dismissed.
    pub fn advance(&mut self, elapsed_ms: u64) -> bool {
        let before = self.toasts.len();
        for toast in &mut self.toasts {
            toast.remaining_ms = toast.remaining_ms.saturating_sub(elapsed_ms);
        }
        self.toasts.retain(|t| t.remaining_ms > 0);
        before != self.toasts.len()
    }

    /// Dismisses a toast early. Returns `true` if it was live.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        before != self.toasts.len()
    }

    /// Live toasts, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    /// Whether no toast is showing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Configured lifetime.
    #[must_use]
    pub const fn lifetime_ms(&self) -> u64 {
        self.lifetime_ms
    }
}
