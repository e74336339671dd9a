use crate::roles::Role;
use thiserror::Error;

/// Errors produced by the sync core.
///
/// Configuration variants are raised while building a session and prevent it
/// from ever becoming active. `AudioDevice` is raised by the collaborator
/// contracts during a run and is fatal to the session.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Microphone or speaker unavailable, or permission denied.
    #[error("audio device unavailable: {0}")]
    AudioDevice(String),

    /// Role has no frequency assignment in the plan.
    #[error("no frequency assigned for {0}")]
    UnknownRole(Role),

    /// Role appears more than once in the plan.
    #[error("{0} assigned more than once")]
    DuplicateRole(Role),

    /// Frequency is not a positive finite number.
    #[error("invalid frequency {frequency_hz} Hz for {role}")]
    InvalidFrequency { role: Role, frequency_hz: f64 },

    /// Two assigned frequencies are too close to distinguish.
    #[error("{a} and {b} are {separation_hz:.2} Hz apart (minimum {required_hz:.2} Hz)")]
    FrequencySpacing {
        a: Role,
        b: Role,
        separation_hz: f64,
        required_hz: f64,
    },

    /// Frequency plan has no assignments.
    #[error("frequency plan is empty")]
    EmptyPlan,

    /// Session configuration rejected.
    #[error("invalid configuration: {0}")]
    Config(String),
}
