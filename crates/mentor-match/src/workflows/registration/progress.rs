use serde::Serialize;

use super::domain::Role;
use super::steps::StepId;

/// Visual status of one entry in the step indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    Completed,
    Active,
    Inactive,
    /// The profile step of the branch that was not taken; rendered struck
    /// through rather than merely upcoming.
    InactiveSpecific,
}

impl StepStatus {
    pub const fn label(self) -> &'static str {
        match self {
            StepStatus::Completed => "completed",
            StepStatus::Active => "active",
            StepStatus::Inactive => "inactive",
            StepStatus::InactiveSpecific => "inactive-specific",
        }
    }
}

/// Derived view of one step for the progress indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepProgress {
    pub step: StepId,
    pub label: &'static str,
    pub position: u8,
    pub status: StepStatus,
}

/// Pure projection of controller state onto the four-step indicator. No
/// state of its own: the same `(current, role)` pair always yields the
/// same statuses.
pub fn project(current: StepId, role: Option<Role>) -> Vec<StepProgress> {
    StepId::ALL
        .into_iter()
        .map(|step| {
            let mut status = if step.position() < current.position() {
                StepStatus::Completed
            } else if step == current {
                StepStatus::Active
            } else {
                StepStatus::Inactive
            };

            // The branch not matching the chosen role is forced to
            // inactive-specific regardless of its numeric position.
            match (step, role) {
                (StepId::MentorProfile, Some(Role::Mentee))
                | (StepId::MenteeProfile, Some(Role::Mentor)) => {
                    status = StepStatus::InactiveSpecific;
                }
                _ => {}
            }

            StepProgress {
                step,
                label: step.label(),
                position: step.position(),
                status,
            }
        })
        .collect()
}
