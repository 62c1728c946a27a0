use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::controller::WizardError;
use super::domain::Role;
use super::enrichment::{GeocodeError, GeocodeGateway};
use super::progress::{self, StepProgress};
use super::session::{
    next_session_id, AuthGateway, SessionId, SessionRepository, SessionStoreError, WizardSession,
};
use super::steps::{SchedulingUpdate, StepId, StepUpdate};
use super::submission::{
    csv_snapshot, RegistrationError, RegistrationGateway, RegistrationPayload, RegistrationReceipt,
    SnapshotSink, TransformError,
};

/// Snapshot of a session handed back after every interaction: where the
/// wizard is, and the derived progress indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub current_step: StepId,
    pub steps: Vec<StepProgress>,
}

/// Result of a confirmed submission. The hosted session is gone by the
/// time the caller sees this.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionOutcome {
    pub session_id: SessionId,
    pub role: Role,
    pub snapshot: &'static str,
    pub receipt: RegistrationReceipt,
}

/// Error raised by the registration service.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationServiceError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Session(#[from] SessionStoreError),
    #[error("{}", .0.user_message())]
    Geocode(#[from] GeocodeError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Submission(#[from] RegistrationError),
    #[error("another operation is already in progress for this session")]
    Busy,
}

/// Service hosting wizard sessions: merges page updates, runs the
/// enrichment gate on the first step, resolves branching, and drives the
/// submission transformer on the terminal step.
pub struct RegistrationService<S, G, R> {
    sessions: Arc<S>,
    geocoder: Arc<G>,
    registrar: Arc<R>,
    snapshots: Box<dyn SnapshotSink>,
    auth: Box<dyn AuthGateway>,
}

impl<S, G, R> RegistrationService<S, G, R>
where
    S: SessionRepository + 'static,
    G: GeocodeGateway + 'static,
    R: RegistrationGateway + 'static,
{
    pub fn new(
        sessions: Arc<S>,
        geocoder: Arc<G>,
        registrar: Arc<R>,
        snapshots: Box<dyn SnapshotSink>,
        auth: Box<dyn AuthGateway>,
    ) -> Self {
        Self {
            sessions,
            geocoder,
            registrar,
            snapshots,
            auth,
        }
    }

    /// Start an empty wizard session.
    pub fn open(&self) -> Result<SessionView, RegistrationServiceError> {
        let session = WizardSession::new(next_session_id());
        let view = view_of(&session);
        self.sessions.insert(session)?;
        info!(session = %view.session_id, "registration session opened");
        Ok(view)
    }

    /// Current progress projection for a session.
    pub fn progress(&self, id: &SessionId) -> Result<SessionView, RegistrationServiceError> {
        let session = self.fetch(id)?;
        Ok(view_of(&session))
    }

    /// Merge a page's validated update and move to the next step. On the
    /// first step this also runs the enrichment gate; any gate failure
    /// blocks the transition but keeps the merged answers.
    pub async fn advance(
        &self,
        id: &SessionId,
        update: StepUpdate,
    ) -> Result<SessionView, RegistrationServiceError> {
        let mut session = self.fetch(id)?;
        if session.in_flight {
            return Err(RegistrationServiceError::Busy);
        }

        session.controller.apply(update)?;

        if session.controller.current_step() == StepId::Basic {
            if let Some(query) = session.controller.pending_address() {
                session.in_flight = true;
                self.sessions.update(session.clone())?;

                let resolved = self.geocoder.resolve(&query).await;
                session.in_flight = false;
                match resolved {
                    Ok(point) => session.controller.set_coordinates(point),
                    Err(err) => {
                        warn!(session = %session.id, error = %err, "address enrichment failed");
                        self.sessions.update(session)?;
                        return Err(err.into());
                    }
                }
            }
        }

        let advanced = session.controller.advance();
        self.sessions.update(session.clone())?;
        let step = advanced?;
        info!(session = %session.id, step = %step, "wizard advanced");
        Ok(view_of(&session))
    }

    /// Step backwards; a no-op on the first page.
    pub fn go_back(&self, id: &SessionId) -> Result<SessionView, RegistrationServiceError> {
        let mut session = self.fetch(id)?;
        if session.in_flight {
            return Err(RegistrationServiceError::Busy);
        }
        session.controller.go_back();
        self.sessions.update(session.clone())?;
        Ok(view_of(&session))
    }

    /// Final submit from the terminal step: merge the scheduling page,
    /// produce the role-specific payload, write the CSV snapshot, call the
    /// remote endpoint, and end the session on success.
    ///
    /// The snapshot is written before the remote call and is deliberately
    /// not removed when the call fails.
    pub async fn submit(
        &self,
        id: &SessionId,
        update: SchedulingUpdate,
    ) -> Result<SubmissionOutcome, RegistrationServiceError> {
        let mut session = self.fetch(id)?;
        if session.in_flight {
            return Err(RegistrationServiceError::Busy);
        }

        session.controller.ensure_terminal()?;
        session.controller.apply(StepUpdate::Scheduling(update))?;

        let payload = RegistrationPayload::from_record(session.controller.record())?;
        let filename = payload.snapshot_filename();
        match csv_snapshot(&payload) {
            Ok(document) => {
                if let Err(err) = self.snapshots.persist(filename, &document) {
                    warn!(session = %session.id, error = %err, "csv snapshot not persisted");
                }
            }
            Err(err) => warn!(session = %session.id, error = %err, "csv snapshot not rendered"),
        }

        session.in_flight = true;
        self.sessions.update(session.clone())?;

        let dispatched = match &payload {
            RegistrationPayload::Mentor(mentor) => self.registrar.register_mentor(mentor).await,
            RegistrationPayload::Mentee(mentee) => self.registrar.register_mentee(mentee).await,
        };

        match dispatched {
            Ok(receipt) => {
                if let Err(err) = self.auth.logout(&session.id) {
                    warn!(session = %session.id, error = %err, "logout after submission failed");
                }
                self.sessions.remove(&session.id)?;
                info!(session = %session.id, role = %payload.role(), "registration submitted");
                Ok(SubmissionOutcome {
                    session_id: session.id,
                    role: payload.role(),
                    snapshot: filename,
                    receipt,
                })
            }
            Err(err) => {
                session.in_flight = false;
                self.sessions.update(session)?;
                Err(err.into())
            }
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<WizardSession, RegistrationServiceError> {
        Ok(self
            .sessions
            .fetch(id)?
            .ok_or(SessionStoreError::NotFound)?)
    }
}

fn view_of(session: &WizardSession) -> SessionView {
    let current = session.controller.current_step();
    SessionView {
        session_id: session.id.clone(),
        current_step: current,
        steps: progress::project(current, session.controller.role()),
    }
}
