use tokio::time::Instant;

/// One frequency peak reported by the spectral analyzer for a single
/// sampling instant. Consumed within the same beat iteration that
/// produced it.
#[derive(Debug, Clone, Copy)]
pub struct DetectedEvent {
    pub frequency_hz: f64,
    pub magnitude_db: f64,
    /// When the analyzer observed the peak.
    pub observed_at: Instant,
}
