use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical identity of a device in a sync session, bound 1:1 to a
/// detection frequency for the lifetime of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Coordinator,
    Participant(u8),
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Coordinator => write!(f, "coordinator"),
            Role::Participant(n) => write!(f, "participant {}", n),
        }
    }
}

/// One role/frequency pair in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleFrequency {
    pub role: Role,
    pub frequency_hz: f64,
}

/// Ordered mapping from role to detection frequency.
///
/// The order of assignments defines beat-slot ownership: slot `s` belongs to
/// the role at index `s % role_count`. Validated on construction so that no
/// two roles share a frequency band; lookups in both directions succeed for
/// every assigned role afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyPlan {
    assignments: Vec<RoleFrequency>,
}

impl FrequencyPlan {
    /// Build a plan from ordered assignments, rejecting duplicate roles,
    /// non-positive frequencies, and pairs closer than `min_separation_hz`.
    pub fn new(
        assignments: Vec<RoleFrequency>,
        min_separation_hz: f64,
    ) -> Result<Self, SyncError> {
        if assignments.is_empty() {
            return Err(SyncError::EmptyPlan);
        }

        for (i, a) in assignments.iter().enumerate() {
            if !a.frequency_hz.is_finite() || a.frequency_hz <= 0.0 {
                return Err(SyncError::InvalidFrequency {
                    role: a.role,
                    frequency_hz: a.frequency_hz,
                });
            }
            for b in &assignments[i + 1..] {
                if a.role == b.role {
                    return Err(SyncError::DuplicateRole(a.role));
                }
                let separation = (a.frequency_hz - b.frequency_hz).abs();
                if separation < min_separation_hz {
                    return Err(SyncError::FrequencySpacing {
                        a: a.role,
                        b: b.role,
                        separation_hz: separation,
                        required_hz: min_separation_hz,
                    });
                }
            }
        }

        Ok(Self { assignments })
    }

    /// Reference four-device plan: coordinator on A4, participants on
    /// B4/C4/D4. Slot order starts at the coordinator.
    pub fn default_quartet(min_separation_hz: f64) -> Result<Self, SyncError> {
        Self::new(
            vec![
                RoleFrequency { role: Role::Coordinator, frequency_hz: 440.00 },
                RoleFrequency { role: Role::Participant(1), frequency_hz: 493.88 },
                RoleFrequency { role: Role::Participant(2), frequency_hz: 523.25 },
                RoleFrequency { role: Role::Participant(3), frequency_hz: 587.33 },
            ],
            min_separation_hz,
        )
    }

    /// Frequency assigned to `role`. Total over assigned roles.
    pub fn frequency_for(&self, role: Role) -> Result<f64, SyncError> {
        self.assignments
            .iter()
            .find(|a| a.role == role)
            .map(|a| a.frequency_hz)
            .ok_or(SyncError::UnknownRole(role))
    }

    /// Exact-match reverse lookup. Real spectral data is quantized, so
    /// callers matching analyzer output should use [`Self::role_within`].
    pub fn role_for(&self, frequency_hz: f64) -> Option<Role> {
        self.assignments
            .iter()
            .find(|a| a.frequency_hz == frequency_hz)
            .map(|a| a.role)
    }

    /// Tolerance-band reverse lookup: the role whose assigned frequency is
    /// nearest to `frequency_hz` and within `tolerance_hz` of it.
    pub fn role_within(&self, frequency_hz: f64, tolerance_hz: f64) -> Option<Role> {
        self.assignments
            .iter()
            .map(|a| (a.role, (a.frequency_hz - frequency_hz).abs()))
            .filter(|(_, distance)| *distance <= tolerance_hz)
            .min_by(|(_, x), (_, y)| x.total_cmp(y))
            .map(|(role, _)| role)
    }

    /// Role that owns beat slot `slot` under round-robin scheduling.
    pub fn owner_of(&self, slot: u64) -> Role {
        self.assignments[(slot % self.role_count() as u64) as usize].role
    }

    pub fn role_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.assignments.iter().map(|a| a.role)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.assignments.iter().any(|a| a.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(pairs: &[(Role, f64)]) -> Result<FrequencyPlan, SyncError> {
        FrequencyPlan::new(
            pairs
                .iter()
                .map(|&(role, frequency_hz)| RoleFrequency { role, frequency_hz })
                .collect(),
            25.0,
        )
    }

    #[test]
    fn test_empty_plan_rejected() {
        assert!(matches!(plan(&[]), Err(SyncError::EmptyPlan)));
    }

    #[test]
    fn test_duplicate_role_rejected() {
        let result = plan(&[
            (Role::Coordinator, 440.0),
            (Role::Participant(1), 500.0),
            (Role::Participant(1), 560.0),
        ]);
        assert!(matches!(
            result,
            Err(SyncError::DuplicateRole(Role::Participant(1)))
        ));
    }

    #[test]
    fn test_close_frequencies_rejected() {
        let result = plan(&[(Role::Coordinator, 440.0), (Role::Participant(1), 450.0)]);
        assert!(matches!(result, Err(SyncError::FrequencySpacing { .. })));
    }

    #[test]
    fn test_non_positive_frequency_rejected() {
        let result = plan(&[(Role::Coordinator, 0.0)]);
        assert!(matches!(result, Err(SyncError::InvalidFrequency { .. })));
    }

    #[test]
    fn test_default_quartet_is_valid() {
        let plan = FrequencyPlan::default_quartet(25.0).unwrap();
        assert_eq!(plan.role_count(), 4);
        assert_eq!(plan.owner_of(0), Role::Coordinator);
    }
}
