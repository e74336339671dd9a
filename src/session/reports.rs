use crate::roles::Role;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// One inferred timing offset for a participant's beep.
///
/// `offset_ms` is signed: positive means the beep arrived after the slot's
/// expected time (the device runs late), negative means it arrived early.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffsetReport {
    pub role: Role,
    pub slot: u64,
    pub offset_ms: f64,
}

/// Signed distance from `expected` to `observed`, in milliseconds.
pub(crate) fn signed_offset_ms(observed: Instant, expected: Instant) -> f64 {
    if observed >= expected {
        observed.duration_since(expected).as_secs_f64() * 1_000.0
    } else {
        -(expected.duration_since(observed).as_secs_f64() * 1_000.0)
    }
}
