use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::controller::WizardController;

/// Identifier wrapper for hosted wizard sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("reg-{id:06}"))
}

/// One hosted wizard session: the controller plus an in-flight marker used
/// to keep the two network suspension points (enrichment, submission) from
/// running re-entrantly for the same applicant.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardSession {
    pub id: SessionId,
    pub controller: WizardController,
    pub in_flight: bool,
}

impl WizardSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            controller: WizardController::new(),
            in_flight: false,
        }
    }
}

/// Storage abstraction for live sessions so the service module can be
/// exercised in isolation.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, session: WizardSession) -> Result<(), SessionStoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<WizardSession>, SessionStoreError>;
    fn update(&self, session: WizardSession) -> Result<(), SessionStoreError>;
    fn remove(&self, id: &SessionId) -> Result<(), SessionStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// The authentication collaborator. The wizard only ever needs one thing
/// from it: ending the applicant's session after a confirmed submission.
pub trait AuthGateway: Send + Sync {
    fn logout(&self, session: &SessionId) -> Result<(), AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("logout failed: {0}")]
    Logout(String),
}
