pub mod reports;
pub mod state;

pub use reports::OffsetReport;
pub use state::SessionState;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::hal::traits::{SpectralAnalyzer, ToneEmitter};
use crate::hal::types::DetectedEvent;
use crate::roles::{FrequencyPlan, Role};
use reports::signed_offset_ms;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info};

/// Cloneable handle for requesting a session stop from another task.
///
/// Stopping is idempotent; the loop observes the request on its next poll
/// and schedules no further beats. It cannot cancel an emission already
/// in flight.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What a finished session produced.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    /// Ordered offset reports collected by a coordinator. Always empty for
    /// participants and for runs where nothing matching was heard.
    pub reports: Vec<OffsetReport>,
    /// Beat slots actually processed before the session ended.
    pub beats_played: u64,
    /// True when a stop request ended the run before the beat budget.
    pub stopped_early: bool,
}

/// A single synchronization session: drives the fixed-tempo beat schedule,
/// emits on owned slots, and (as coordinator) turns detected beeps into
/// per-participant offset reports.
///
/// The session exclusively owns its audio collaborators and all mutable
/// state; the only external mutation during a run is a [`StopHandle`]
/// request. A session runs once and is consumed by [`SyncSession::run`].
pub struct SyncSession {
    config: SyncConfig,
    plan: FrequencyPlan,
    local_role: Role,
    local_frequency_hz: f64,
    emitter: Box<dyn ToneEmitter>,
    analyzer: Box<dyn SpectralAnalyzer>,
    state: SessionState,
    beat: u64,
    stop: Arc<AtomicBool>,
    reports: Vec<OffsetReport>,
    report_tx: Option<mpsc::UnboundedSender<OffsetReport>>,
}

impl SyncSession {
    /// Start a session in the coordinator role.
    pub fn coordinator(
        config: SyncConfig,
        plan: FrequencyPlan,
        emitter: Box<dyn ToneEmitter>,
        analyzer: Box<dyn SpectralAnalyzer>,
    ) -> Result<Self, SyncError> {
        Self::start(Role::Coordinator, config, plan, emitter, analyzer)
    }

    /// Start a session in the given participant role.
    pub fn participant(
        index: u8,
        config: SyncConfig,
        plan: FrequencyPlan,
        emitter: Box<dyn ToneEmitter>,
        analyzer: Box<dyn SpectralAnalyzer>,
    ) -> Result<Self, SyncError> {
        Self::start(Role::Participant(index), config, plan, emitter, analyzer)
    }

    fn start(
        local_role: Role,
        config: SyncConfig,
        plan: FrequencyPlan,
        emitter: Box<dyn ToneEmitter>,
        analyzer: Box<dyn SpectralAnalyzer>,
    ) -> Result<Self, SyncError> {
        if config.bpm == 0 {
            return Err(SyncError::Config("bpm must be positive".into()));
        }
        if config.beat_budget == 0 {
            return Err(SyncError::Config("beat budget must be positive".into()));
        }
        if config.poll_interval_ms == 0 {
            return Err(SyncError::Config("poll interval must be positive".into()));
        }

        // Configuration failures must keep the session from ever
        // becoming active.
        let local_frequency_hz = plan.frequency_for(local_role)?;

        let state = SessionState::Idle;
        let active = SessionState::Active { role: local_role };
        debug_assert!(state.can_transition_to(&active));

        info!(
            role = %local_role,
            frequency_hz = local_frequency_hz,
            bpm = config.bpm,
            beat_budget = config.beat_budget,
            "sync session active"
        );

        Ok(Self {
            config,
            plan,
            local_role,
            local_frequency_hz,
            emitter,
            analyzer,
            state: active,
            beat: 0,
            stop: Arc::new(AtomicBool::new(false)),
            reports: Vec::new(),
            report_tx: None,
        })
    }

    /// Handle that lets another task request a stop.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.stop))
    }

    /// Stream each offset report to `tx` as it is produced, in addition to
    /// accumulating it in the session outcome.
    pub fn on_offset_report(&mut self, tx: mpsc::UnboundedSender<OffsetReport>) {
        self.report_tx = Some(tx);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn local_role(&self) -> Role {
        self.local_role
    }

    /// Drive the beat schedule to completion.
    ///
    /// Returns when the beat budget is exhausted or a stop was requested.
    /// A failing audio collaborator ends the session immediately with the
    /// device error; offsets collected up to that point are discarded.
    pub async fn run(mut self) -> Result<SessionOutcome, SyncError> {
        let started_at = Instant::now();
        let result = self.drive(started_at).await;
        self.state = SessionState::Stopped;

        match result {
            Ok(()) => {
                let stopped_early = self.beat < self.config.beat_budget;
                info!(
                    beats_played = self.beat,
                    reports = self.reports.len(),
                    stopped_early,
                    "sync session stopped"
                );
                Ok(SessionOutcome {
                    reports: self.reports,
                    beats_played: self.beat,
                    stopped_early,
                })
            }
            Err(e) => {
                error!(error = %e, beat = self.beat, "sync session aborted");
                Err(e)
            }
        }
    }

    /// Cooperative poll loop: bounded work per iteration, one slot
    /// processed at most, then an async sleep yields to other tasks.
    async fn drive(&mut self, started_at: Instant) -> Result<(), SyncError> {
        let beat_interval = self.config.beat_interval();

        while self.beat < self.config.beat_budget {
            if self.stop.load(Ordering::Relaxed) {
                debug!(beat = self.beat, "stop requested");
                break;
            }

            let expected = started_at + beat_interval * self.beat as u32;
            if Instant::now() >= expected {
                self.play_slot(self.beat, expected).await?;
                self.beat += 1;
            }

            sleep(self.config.poll_interval()).await;
        }

        Ok(())
    }

    /// Process one beat slot: emit if the slot is ours, then listen.
    async fn play_slot(&mut self, slot: u64, expected: Instant) -> Result<(), SyncError> {
        let owner = self.plan.owner_of(slot);

        if owner == self.local_role {
            debug!(slot, frequency_hz = self.local_frequency_hz, "emitting beat tone");
            self.emitter
                .emit(self.local_frequency_hz, self.config.tone_duration())
                .await?;
        }

        // Participants poll too (keeps the loop shape identical and leaves
        // room for participant-side diagnostics) but discard the events.
        let events = self.analyzer.poll().await?;
        if self.local_role == Role::Coordinator {
            self.collect_offsets(slot, expected, events);
        }

        Ok(())
    }

    /// Attribute detected events to roles and record their offsets.
    fn collect_offsets(&mut self, slot: u64, expected: Instant, events: Vec<DetectedEvent>) {
        let tolerance = self.config.frequency_tolerance_hz();
        let mut reported: Vec<Role> = Vec::new();

        for event in events {
            if event.magnitude_db <= self.config.magnitude_threshold_db {
                continue;
            }
            let Some(role) = self.plan.role_within(event.frequency_hz, tolerance) else {
                continue;
            };
            // Hearing our own beep is not a reportable offset.
            if role == self.local_role {
                continue;
            }
            // One physical beep can show up in adjacent bins; keep the
            // earliest match per role per slot.
            if reported.contains(&role) {
                continue;
            }
            reported.push(role);

            let offset_ms = signed_offset_ms(event.observed_at, expected);
            let report = OffsetReport { role, slot, offset_ms };
            debug!(role = %role, slot, offset_ms, "offset report");

            if let Some(tx) = &self.report_tx {
                // A dropped receiver only disables streaming.
                let _ = tx.send(report);
            }
            self.reports.push(report);
        }
    }
}
