use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use mentor_match::workflows::registration::{
    AuthError, AuthGateway, SessionId, SessionRepository, SessionStoreError, WizardSession,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Live wizard sessions held in process memory; the answer record is
/// deliberately not persisted across restarts.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    records: Arc<Mutex<HashMap<SessionId, WizardSession>>>,
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, session: WizardSession) -> Result<(), SessionStoreError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        guard.insert(session.id.clone(), session);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<WizardSession>, SessionStoreError> {
        let guard = self.records.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, session: WizardSession) -> Result<(), SessionStoreError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        if guard.contains_key(&session.id) {
            guard.insert(session.id.clone(), session);
            Ok(())
        } else {
            Err(SessionStoreError::NotFound)
        }
    }

    fn remove(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        guard.remove(id);
        Ok(())
    }
}

/// Auth collaborator for deployments where the upstream identity provider
/// handles the actual session teardown: record the logout and move on.
#[derive(Default, Clone)]
pub(crate) struct LoggingAuthGateway;

impl AuthGateway for LoggingAuthGateway {
    fn logout(&self, session: &SessionId) -> Result<(), AuthError> {
        info!(%session, "applicant session ended after submission");
        Ok(())
    }
}
