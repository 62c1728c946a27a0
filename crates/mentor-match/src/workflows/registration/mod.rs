//! Multi-step registration wizard for the mentor/mentee matching program.
//!
//! One evolving answer record per session, a branching step graph keyed on
//! the chosen role, an address enrichment gate on the first page, and a
//! final transformation into the role-specific wire payload with a local
//! CSV snapshot.

pub mod blackout;
pub mod catalog;
pub mod controller;
pub mod domain;
pub mod enrichment;
pub mod progress;
pub mod router;
pub mod service;
pub mod session;
pub mod steps;
pub mod submission;

#[cfg(test)]
mod tests;

pub use controller::{WizardController, WizardError};
pub use domain::{
    AnswerRecord, AvailabilitySlot, ChoiceSet, Day, GeoPoint, Role, StateCode, TimeSlot,
};
pub use enrichment::{AddressQuery, GeocodeError, GeocodeGateway, NominatimClient};
pub use progress::{project, StepProgress, StepStatus};
pub use router::registration_router;
pub use service::{
    RegistrationService, RegistrationServiceError, SessionView, SubmissionOutcome,
};
pub use session::{
    AuthError, AuthGateway, SessionId, SessionRepository, SessionStoreError, WizardSession,
};
pub use steps::{
    BasicInfoUpdate, MenteeProfileUpdate, MentorProfileUpdate, SchedulingUpdate, StepId,
    StepUpdate, ValidationError, MIN_AVAILABILITY_SELECTIONS,
};
pub use submission::{
    csv_snapshot, FileSnapshotSink, HttpRegistrationClient, RegistrationError, RegistrationGateway,
    RegistrationPayload, RegistrationReceipt, SelectionValue, SnapshotError, SnapshotSink,
    SubmissionDefaults, TransformError,
};
