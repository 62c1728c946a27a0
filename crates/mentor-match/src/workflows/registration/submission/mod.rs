//! Submission transformer: maps the completed answer record into the
//! role-specific wire shape, writes the local CSV snapshot, and talks to
//! the remote registration service.

pub mod export;
pub mod payload;
pub mod remote;

pub use export::{
    csv_snapshot, FileSnapshotSink, SnapshotError, SnapshotSink, ARRAY_JOIN_SEPARATOR,
};
pub use payload::{
    ContactProfile, MenteeRegistration, MentorRegistration, RegistrationPayload, SelectionValue,
    SubmissionDefaults, TransformError,
};
pub use remote::{
    render_detail, HttpRegistrationClient, RegistrationError, RegistrationGateway,
    RegistrationReceipt,
};
