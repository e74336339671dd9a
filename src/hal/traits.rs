use crate::error::SyncError;
use crate::hal::types::DetectedEvent;
use async_trait::async_trait;
use std::time::Duration;

/// Trait implemented by audio output backends that can sound a tone.
///
/// Implementations apply their own fade-in/fade-out envelope so a short
/// burst does not produce audible clicks; the scheduler only picks the
/// frequency and duration.
#[async_trait]
pub trait ToneEmitter: Send {
    /// Sound a tone at `frequency_hz` for `duration`.
    ///
    /// Emission is fire-and-forget from the scheduler's point of view:
    /// once triggered it runs to completion and is never cancelled.
    async fn emit(&mut self, frequency_hz: f64, duration: Duration) -> Result<(), SyncError>;
}

/// Trait implemented by audio input backends that expose frequency-domain
/// peaks of the current microphone signal.
#[async_trait]
pub trait SpectralAnalyzer: Send {
    /// Peaks present at the current instant, with observation timestamps.
    ///
    /// Returns an empty vector when nothing is audible; fails with
    /// [`SyncError::AudioDevice`] if the input stream is unavailable.
    async fn poll(&mut self) -> Result<Vec<DetectedEvent>, SyncError>;
}
