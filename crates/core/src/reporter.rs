//! Injected progress-reporting capability.
//!
//! Pipeline stages report informational messages through this seam instead
//! of a process-wide console, which keeps the pipeline host-agnostic and
//! lets tests capture the message stream.

use std::fmt;

use tracing::info;

/// Receives informational messages at each pipeline stage. A pure side
/// channel, not part of the data contract.
pub trait Reporter {
    /// Deliver one progress message.
    fn report(&self, message: &str);
}

/// Default reporter: forwards messages to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, message: &str) {
        info!("{message}");
    }
}

/// Discards all messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _message: &str) {}
}

impl fmt::Debug for dyn Reporter + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Reporter")
    }
}
