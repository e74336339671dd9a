use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session timing and detection parameters.
///
/// Defaults match the reference scheme: 240 BPM (250 ms beats), a budget of
/// 12 beats (three full cycles through four roles), 100 ms tone bursts, and
/// a 10 ms cooperative poll interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Tempo of the beat schedule.
    pub bpm: u32,
    /// Total number of beats before the session stops on its own.
    pub beat_budget: u64,
    /// Length of each emitted tone burst, in milliseconds.
    pub tone_duration_ms: u64,
    /// Wall-clock poll granularity of the beat loop, in milliseconds.
    pub poll_interval_ms: u64,
    /// Analyzer peaks at or below this magnitude are ignored.
    pub magnitude_threshold_db: f64,
    /// Minimum spacing between any two assigned frequencies.
    pub min_frequency_separation_hz: f64,
    /// Analyzer sample rate, used to derive the frequency match tolerance.
    pub sample_rate: f64,
    /// Analyzer FFT size, used to derive the frequency match tolerance.
    pub fft_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            bpm: 240,
            beat_budget: 12,
            tone_duration_ms: 100,
            poll_interval_ms: 10,
            magnitude_threshold_db: -50.0,
            min_frequency_separation_hz: 25.0,
            sample_rate: 48_000.0,
            fft_size: 2048,
        }
    }
}

impl SyncConfig {
    /// Time between consecutive beat slots.
    pub fn beat_interval(&self) -> Duration {
        Duration::from_millis(60_000 / self.bpm as u64)
    }

    pub fn tone_duration(&self) -> Duration {
        Duration::from_millis(self.tone_duration_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Half-band within which an analyzer peak is attributed to a role.
    ///
    /// Raw analyzer bins rarely land exactly on a target frequency, so the
    /// tolerance is one bin width of the configured analyzer.
    pub fn frequency_tolerance_hz(&self) -> f64 {
        self.sample_rate / self.fft_size as f64
    }
}
