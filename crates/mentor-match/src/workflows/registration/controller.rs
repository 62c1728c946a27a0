use serde::{Deserialize, Serialize};

use super::domain::{AnswerRecord, GeoPoint, Role};
use super::enrichment::AddressQuery;
use super::steps::{StepId, StepUpdate, ValidationError};

/// Wizard-level failures. Validation errors are folded in so callers see a
/// single error surface for "this interaction was rejected".
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("this update belongs to the {found} step, but the wizard is on {expected}")]
    StepMismatch { expected: StepId, found: StepId },
    #[error("the {0} step is terminal; submit instead of advancing")]
    TerminalStep(StepId),
    #[error("the address must be verified before leaving the {0} step")]
    AddressUnresolved(StepId),
    #[error("submission is only available from the {0} step")]
    NotAtTerminalStep(StepId),
}

/// Transition table for the branching step graph, keyed by the current
/// step and the stored role.
fn next_step(current: StepId, role: Option<Role>) -> Result<StepId, WizardError> {
    match (current, role) {
        (StepId::Basic, Some(Role::Mentor)) => Ok(StepId::MentorProfile),
        (StepId::Basic, Some(Role::Mentee)) => Ok(StepId::MenteeProfile),
        (StepId::Basic, None) => Err(ValidationError::RoleRequired.into()),
        (StepId::MentorProfile | StepId::MenteeProfile, _) => Ok(StepId::Scheduling),
        (StepId::Scheduling, _) => Err(WizardError::TerminalStep(StepId::Scheduling)),
    }
}

fn previous_step(current: StepId, role: Option<Role>) -> Option<StepId> {
    match current {
        StepId::Basic => None,
        StepId::MentorProfile | StepId::MenteeProfile => Some(StepId::Basic),
        StepId::Scheduling => Some(match role {
            Some(Role::Mentor) => StepId::MentorProfile,
            _ => StepId::MenteeProfile,
        }),
    }
}

/// Owns the answer record and the current position in the step graph.
///
/// The controller is deliberately free of I/O: the enrichment gate and the
/// submission transformer are driven by the registration service, which
/// feeds resolved coordinates back in through [`WizardController::set_coordinates`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardController {
    record: AnswerRecord,
    current: StepId,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    pub fn new() -> Self {
        Self {
            record: AnswerRecord::default(),
            current: StepId::Basic,
        }
    }

    pub fn current_step(&self) -> StepId {
        self.current
    }

    pub fn record(&self) -> &AnswerRecord {
        &self.record
    }

    pub fn role(&self) -> Option<Role> {
        self.record.role
    }

    /// Validate a page's update and merge it into the record. The record is
    /// untouched when validation fails.
    pub fn apply(&mut self, update: StepUpdate) -> Result<(), WizardError> {
        let found = update.step_id();
        if found != self.current {
            return Err(WizardError::StepMismatch {
                expected: self.current,
                found,
            });
        }
        update.validate(&self.record)?;
        update.merge_into(&mut self.record);
        Ok(())
    }

    /// Move to the next step per the branch rule. Leaving `Basic` requires
    /// a chosen role and resolved coordinates.
    pub fn advance(&mut self) -> Result<StepId, WizardError> {
        let next = next_step(self.current, self.record.role)?;
        if self.current == StepId::Basic && self.record.coordinates.is_none() {
            return Err(WizardError::AddressUnresolved(StepId::Basic));
        }
        self.current = next;
        Ok(next)
    }

    /// Step backwards; a no-op on the first page.
    pub fn go_back(&mut self) -> StepId {
        if let Some(previous) = previous_step(self.current, self.record.role) {
            self.current = previous;
        }
        self.current
    }

    /// Query for the enrichment gate, or `None` when the current address
    /// triple has already been resolved.
    pub fn pending_address(&self) -> Option<AddressQuery> {
        if self.record.coordinates.is_some() {
            return None;
        }
        Some(AddressQuery::from_record(&self.record))
    }

    pub fn set_coordinates(&mut self, point: GeoPoint) {
        self.record.coordinates = Some(point);
    }

    /// Guard used by the submission path: the record may only be consumed
    /// from the terminal step.
    pub fn ensure_terminal(&self) -> Result<(), WizardError> {
        if self.current == StepId::Scheduling {
            Ok(())
        } else {
            Err(WizardError::NotAtTerminalStep(StepId::Scheduling))
        }
    }
}
