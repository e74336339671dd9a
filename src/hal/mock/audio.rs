use crate::error::SyncError;
use crate::hal::traits::{SpectralAnalyzer, ToneEmitter};
use crate::hal::types::DetectedEvent;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// One recorded tone emission.
#[derive(Debug, Clone, Copy)]
pub struct Emission {
    pub frequency_hz: f64,
    pub duration: Duration,
    pub at: Instant,
}

/// Tone emitter that records every emission instead of producing sound.
///
/// The shared log handle survives the session taking ownership of the
/// emitter, so tests can inspect what was emitted and when.
pub struct SimulatedToneEmitter {
    log: Arc<Mutex<Vec<Emission>>>,
    available: bool,
}

impl SimulatedToneEmitter {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            available: true,
        }
    }

    /// Emitter whose output device is missing; every emit fails.
    pub fn unavailable() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            available: false,
        }
    }

    /// Handle to the emission log, valid after the emitter is boxed away.
    pub fn log(&self) -> Arc<Mutex<Vec<Emission>>> {
        Arc::clone(&self.log)
    }
}

impl Default for SimulatedToneEmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToneEmitter for SimulatedToneEmitter {
    async fn emit(&mut self, frequency_hz: f64, duration: Duration) -> Result<(), SyncError> {
        if !self.available {
            return Err(SyncError::AudioDevice("output device unavailable".into()));
        }
        self.log.lock().unwrap().push(Emission {
            frequency_hz,
            duration,
            at: Instant::now(),
        });
        Ok(())
    }
}

/// Analyzer that replays a per-poll script of detected events.
///
/// The session queries the analyzer exactly once per beat slot, so poll
/// index `n` corresponds to slot `n`. Unscripted polls return silence.
pub struct ScriptedAnalyzer {
    script: HashMap<u64, Vec<DetectedEvent>>,
    polls: u64,
    available: bool,
}

impl ScriptedAnalyzer {
    pub fn new() -> Self {
        Self {
            script: HashMap::new(),
            polls: 0,
            available: true,
        }
    }

    /// Analyzer whose input device is missing; every poll fails.
    pub fn unavailable() -> Self {
        Self {
            script: HashMap::new(),
            polls: 0,
            available: false,
        }
    }

    /// Script a peak to be reported on poll `poll` (= beat slot).
    /// Events on the same poll are returned in insertion order.
    pub fn beep_at(
        &mut self,
        poll: u64,
        frequency_hz: f64,
        magnitude_db: f64,
        observed_at: Instant,
    ) -> &mut Self {
        self.script.entry(poll).or_default().push(DetectedEvent {
            frequency_hz,
            magnitude_db,
            observed_at,
        });
        self
    }
}

impl Default for ScriptedAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpectralAnalyzer for ScriptedAnalyzer {
    async fn poll(&mut self) -> Result<Vec<DetectedEvent>, SyncError> {
        if !self.available {
            return Err(SyncError::AudioDevice("input device unavailable".into()));
        }
        let events = self.script.get(&self.polls).cloned().unwrap_or_default();
        self.polls += 1;
        Ok(events)
    }
}
