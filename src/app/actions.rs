//! Side effects requested by the event handler.
//!
//! [`handle_event`](crate::app::handle_event) never touches the host. It
//! returns actions, and the plugin shim executes them in order.

use crate::worker::WorkerMessage;

/// Commands executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Posts a request to the background worker.
    PostToWorker(WorkerMessage),

    /// Asks the host for a `Timer` event after `seconds`.
    ///
    /// Drives toast expiry and the analysis watchdog. At most one tick is
    /// pending at a time.
    ScheduleTick {
        /// Delay before the tick.
        seconds: f64,
    },
}
