use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::workflows::registration::domain::{
    AvailabilitySlot, ChoiceSet, Day, GeoPoint, MentorBackground, MentoringReason, Role, StateCode,
    TimeSlot,
};
use crate::workflows::registration::enrichment::{AddressQuery, GeocodeError, GeocodeGateway};
use crate::workflows::registration::service::RegistrationService;
use crate::workflows::registration::session::{
    AuthError, AuthGateway, SessionId, SessionRepository, SessionStoreError, WizardSession,
};
use crate::workflows::registration::steps::{
    BasicInfoUpdate, MenteeProfileUpdate, MentorProfileUpdate, SchedulingUpdate,
};
use crate::workflows::registration::submission::{
    MenteeRegistration, MentorRegistration, RegistrationError, RegistrationGateway,
    RegistrationPayload, RegistrationReceipt, SnapshotError, SnapshotSink,
};

pub(super) fn basic_update(role: Option<Role>) -> BasicInfoUpdate {
    BasicInfoUpdate {
        email: "jordan@example.org".to_string(),
        name: "Jordan Rivera".to_string(),
        age_bracket: Some(4),
        phone_number: "515-555-0112".to_string(),
        address_line: "123 Grand Ave".to_string(),
        city: "Des Moines".to_string(),
        state: Some(StateCode::parse("IA").expect("valid state")),
        zipcode: "50309".to_string(),
        ethnicities: ChoiceSet::from_iter([2, 5]),
        session_preferences: ChoiceSet::from_iter([1, 3]),
        ethnicity_preference: Some(4),
        gender_identities: ChoiceSet::from_iter([2]),
        gender_preference: Some(2),
        contact_methods: ChoiceSet::from_iter([1, 3]),
        role,
    }
}

pub(super) fn mentor_update() -> MentorProfileUpdate {
    MentorProfileUpdate {
        background: Some(MentorBackground::Professional),
        academic_level: None,
        professional_title: "Process Engineer".to_string(),
        current_employer: "Prairie Labs".to_string(),
        mentoring_reason: Some(MentoringReason::GiveBack),
        capacity: 1,
    }
}

pub(super) fn mentee_update() -> MenteeProfileUpdate {
    MenteeProfileUpdate {
        grade: Some(7),
        reasons: ChoiceSet::from_iter([1, 3]),
        reasons_other: String::new(),
        interests: ChoiceSet::from_iter([1, 6]),
        interests_other: String::new(),
    }
}

pub(super) fn slots(count: usize) -> BTreeSet<AvailabilitySlot> {
    let mut selected = BTreeSet::new();
    'outer: for day in Day::ALL {
        for slot in TimeSlot::ALL {
            if selected.len() == count {
                break 'outer;
            }
            selected.insert(AvailabilitySlot::new(day, slot));
        }
    }
    selected
}

pub(super) fn scheduling_update(count: usize) -> SchedulingUpdate {
    SchedulingUpdate {
        availability: slots(count),
        unavailable_dates: "20250704, 20251220-20260102".to_string(),
    }
}

pub(super) fn coordinates() -> GeoPoint {
    GeoPoint {
        latitude: 41.5868,
        longitude: -93.625,
    }
}

#[derive(Default)]
pub(super) struct MemorySessions {
    records: Mutex<HashMap<SessionId, WizardSession>>,
}

impl MemorySessions {
    pub(super) fn contains(&self, id: &SessionId) -> bool {
        self.records
            .lock()
            .expect("session mutex poisoned")
            .contains_key(id)
    }
}

impl SessionRepository for MemorySessions {
    fn insert(&self, session: WizardSession) -> Result<(), SessionStoreError> {
        self.records
            .lock()
            .expect("session mutex poisoned")
            .insert(session.id.clone(), session);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<WizardSession>, SessionStoreError> {
        Ok(self
            .records
            .lock()
            .expect("session mutex poisoned")
            .get(id)
            .cloned())
    }

    fn update(&self, session: WizardSession) -> Result<(), SessionStoreError> {
        self.records
            .lock()
            .expect("session mutex poisoned")
            .insert(session.id.clone(), session);
        Ok(())
    }

    fn remove(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        self.records
            .lock()
            .expect("session mutex poisoned")
            .remove(id);
        Ok(())
    }
}

/// Scripted geocoder: resolves, finds nothing, or fails in transit.
pub(super) enum GeocodeScript {
    Resolve(GeoPoint),
    NotFound,
    Transport,
}

pub(super) struct ScriptedGeocoder {
    script: GeocodeScript,
    calls: AtomicUsize,
}

impl ScriptedGeocoder {
    pub(super) fn new(script: GeocodeScript) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl GeocodeGateway for ScriptedGeocoder {
    async fn resolve(&self, _query: &AddressQuery) -> Result<GeoPoint, GeocodeError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match &self.script {
            GeocodeScript::Resolve(point) => Ok(*point),
            GeocodeScript::NotFound => Err(GeocodeError::NotFound),
            GeocodeScript::Transport => {
                Err(GeocodeError::Transport("connection refused".to_string()))
            }
        }
    }
}

/// Scripted registrar: accepts everything or rejects with a detail string.
pub(super) enum RegistrarScript {
    Accept,
    Reject { status: u16, detail: String },
}

#[derive(Clone)]
pub(super) struct ScriptedRegistrar {
    script: Arc<RegistrarScript>,
    submitted: Arc<Mutex<Vec<RegistrationPayload>>>,
}

impl ScriptedRegistrar {
    pub(super) fn new(script: RegistrarScript) -> Self {
        Self {
            script: Arc::new(script),
            submitted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(super) fn submitted(&self) -> Vec<RegistrationPayload> {
        self.submitted
            .lock()
            .expect("registrar mutex poisoned")
            .clone()
    }

    fn dispatch(
        &self,
        payload: RegistrationPayload,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        self.submitted
            .lock()
            .expect("registrar mutex poisoned")
            .push(payload);
        match self.script.as_ref() {
            RegistrarScript::Accept => Ok(RegistrationReceipt {
                status: 201,
                body: json!({ "registered": true }),
            }),
            RegistrarScript::Reject { status, detail } => Err(RegistrationError::Rejected {
                status: *status,
                message: detail.clone(),
            }),
        }
    }
}

#[async_trait]
impl RegistrationGateway for ScriptedRegistrar {
    async fn register_mentor(
        &self,
        payload: &MentorRegistration,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        self.dispatch(RegistrationPayload::Mentor(payload.clone()))
    }

    async fn register_mentee(
        &self,
        payload: &MenteeRegistration,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        self.dispatch(RegistrationPayload::Mentee(payload.clone()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySnapshots {
    docs: Arc<Mutex<Vec<(String, String)>>>,
}

impl MemorySnapshots {
    pub(super) fn documents(&self) -> Vec<(String, String)> {
        self.docs.lock().expect("snapshot mutex poisoned").clone()
    }
}

impl SnapshotSink for MemorySnapshots {
    fn persist(&self, filename: &str, contents: &str) -> Result<(), SnapshotError> {
        self.docs
            .lock()
            .expect("snapshot mutex poisoned")
            .push((filename.to_string(), contents.to_string()));
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAuth {
    ended: Arc<Mutex<Vec<SessionId>>>,
}

impl MemoryAuth {
    pub(super) fn ended(&self) -> Vec<SessionId> {
        self.ended.lock().expect("auth mutex poisoned").clone()
    }
}

impl AuthGateway for MemoryAuth {
    fn logout(&self, session: &SessionId) -> Result<(), AuthError> {
        self.ended
            .lock()
            .expect("auth mutex poisoned")
            .push(session.clone());
        Ok(())
    }
}

pub(super) struct Harness {
    pub(super) service: RegistrationService<MemorySessions, ScriptedGeocoder, ScriptedRegistrar>,
    pub(super) sessions: Arc<MemorySessions>,
    pub(super) geocoder: Arc<ScriptedGeocoder>,
    pub(super) registrar: ScriptedRegistrar,
    pub(super) snapshots: MemorySnapshots,
    pub(super) auth: MemoryAuth,
}

pub(super) fn harness(geocode: GeocodeScript, registrar: RegistrarScript) -> Harness {
    let sessions = Arc::new(MemorySessions::default());
    let geocoder = Arc::new(ScriptedGeocoder::new(geocode));
    let registrar = ScriptedRegistrar::new(registrar);
    let snapshots = MemorySnapshots::default();
    let auth = MemoryAuth::default();

    let service = RegistrationService::new(
        sessions.clone(),
        geocoder.clone(),
        Arc::new(registrar.clone()),
        Box::new(snapshots.clone()),
        Box::new(auth.clone()),
    );

    Harness {
        service,
        sessions,
        geocoder,
        registrar,
        snapshots,
        auth,
    }
}
