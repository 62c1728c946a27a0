//! Integration scenarios for the registration wizard, driven through the
//! public service facade the way the HTTP layer and the CLI use it.

mod common {
    use std::collections::BTreeSet;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use mentor_match::workflows::registration::submission::{
        MenteeRegistration, MentorRegistration,
    };
    use mentor_match::workflows::registration::{
        AuthError, AuthGateway, AvailabilitySlot, BasicInfoUpdate, ChoiceSet, Day, GeoPoint,
        GeocodeError, GeocodeGateway, MenteeProfileUpdate, MentorProfileUpdate,
        RegistrationError, RegistrationGateway, RegistrationPayload, RegistrationReceipt,
        RegistrationService, Role, SchedulingUpdate, SessionId, SessionRepository,
        SessionStoreError, SnapshotError, SnapshotSink, StateCode, TimeSlot, WizardSession,
    };

    pub(crate) use mentor_match::workflows::registration::enrichment::AddressQuery;

    #[derive(Default)]
    pub(crate) struct Sessions {
        records: Mutex<std::collections::HashMap<SessionId, WizardSession>>,
    }

    impl Sessions {
        pub(crate) fn contains(&self, id: &SessionId) -> bool {
            self.records.lock().expect("lock").contains_key(id)
        }
    }

    impl SessionRepository for Sessions {
        fn insert(&self, session: WizardSession) -> Result<(), SessionStoreError> {
            self.records
                .lock()
                .expect("lock")
                .insert(session.id.clone(), session);
            Ok(())
        }

        fn fetch(&self, id: &SessionId) -> Result<Option<WizardSession>, SessionStoreError> {
            Ok(self.records.lock().expect("lock").get(id).cloned())
        }

        fn update(&self, session: WizardSession) -> Result<(), SessionStoreError> {
            self.records
                .lock()
                .expect("lock")
                .insert(session.id.clone(), session);
            Ok(())
        }

        fn remove(&self, id: &SessionId) -> Result<(), SessionStoreError> {
            self.records.lock().expect("lock").remove(id);
            Ok(())
        }
    }

    pub(crate) struct Geocoder {
        pub(crate) answer: Result<GeoPoint, &'static str>,
    }

    #[async_trait]
    impl GeocodeGateway for Geocoder {
        async fn resolve(&self, _query: &AddressQuery) -> Result<GeoPoint, GeocodeError> {
            match self.answer {
                Ok(point) => Ok(point),
                Err("not-found") => Err(GeocodeError::NotFound),
                Err(reason) => Err(GeocodeError::Transport(reason.to_string())),
            }
        }
    }

    #[derive(Clone, Default)]
    pub(crate) struct Registrar {
        pub(crate) reject_with: Option<(u16, &'static str)>,
        pub(crate) seen: Arc<Mutex<Vec<RegistrationPayload>>>,
    }

    impl Registrar {
        fn answer(
            &self,
            payload: RegistrationPayload,
        ) -> Result<RegistrationReceipt, RegistrationError> {
            self.seen.lock().expect("lock").push(payload);
            match self.reject_with {
                Some((status, detail)) => Err(RegistrationError::Rejected {
                    status,
                    message: detail.to_string(),
                }),
                None => Ok(RegistrationReceipt {
                    status: 200,
                    body: json!({ "ok": true }),
                }),
            }
        }
    }

    #[async_trait]
    impl RegistrationGateway for Registrar {
        async fn register_mentor(
            &self,
            payload: &MentorRegistration,
        ) -> Result<RegistrationReceipt, RegistrationError> {
            self.answer(RegistrationPayload::Mentor(payload.clone()))
        }

        async fn register_mentee(
            &self,
            payload: &MenteeRegistration,
        ) -> Result<RegistrationReceipt, RegistrationError> {
            self.answer(RegistrationPayload::Mentee(payload.clone()))
        }
    }

    #[derive(Clone, Default)]
    pub(crate) struct Snapshots {
        pub(crate) docs: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl SnapshotSink for Snapshots {
        fn persist(&self, filename: &str, contents: &str) -> Result<(), SnapshotError> {
            self.docs
                .lock()
                .expect("lock")
                .push((filename.to_string(), contents.to_string()));
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    pub(crate) struct Auth {
        pub(crate) ended: Arc<Mutex<Vec<SessionId>>>,
    }

    impl AuthGateway for Auth {
        fn logout(&self, session: &SessionId) -> Result<(), AuthError> {
            self.ended.lock().expect("lock").push(session.clone());
            Ok(())
        }
    }

    pub(crate) struct World {
        pub(crate) service: RegistrationService<Sessions, Geocoder, Registrar>,
        pub(crate) sessions: Arc<Sessions>,
        pub(crate) registrar: Registrar,
        pub(crate) snapshots: Snapshots,
        pub(crate) auth: Auth,
    }

    pub(crate) fn world(
        geocode: Result<GeoPoint, &'static str>,
        reject_with: Option<(u16, &'static str)>,
    ) -> World {
        let sessions = Arc::new(Sessions::default());
        let registrar = Registrar {
            reject_with,
            seen: Arc::default(),
        };
        let snapshots = Snapshots::default();
        let auth = Auth::default();
        let service = RegistrationService::new(
            sessions.clone(),
            Arc::new(Geocoder { answer: geocode }),
            Arc::new(registrar.clone()),
            Box::new(snapshots.clone()),
            Box::new(auth.clone()),
        );
        World {
            service,
            sessions,
            registrar,
            snapshots,
            auth,
        }
    }

    pub(crate) fn des_moines() -> GeoPoint {
        GeoPoint {
            latitude: 41.5868,
            longitude: -93.625,
        }
    }

    pub(crate) fn basic(role: Role) -> BasicInfoUpdate {
        BasicInfoUpdate {
            email: "sam@example.org".to_string(),
            name: "Sam Okafor".to_string(),
            age_bracket: Some(5),
            phone_number: "515-555-0147".to_string(),
            address_line: "900 Keosauqua Way".to_string(),
            city: "Des Moines".to_string(),
            state: Some(StateCode::parse("IA").expect("valid state")),
            zipcode: "50309".to_string(),
            ethnicities: ChoiceSet::from_iter([4]),
            session_preferences: ChoiceSet::from_iter([2, 4]),
            ethnicity_preference: Some(2),
            gender_identities: ChoiceSet::from_iter([1]),
            gender_preference: Some(4),
            contact_methods: ChoiceSet::from_iter([1]),
            role: Some(role),
        }
    }

    pub(crate) fn mentor_page() -> MentorProfileUpdate {
        MentorProfileUpdate {
            professional_title: "Data Analyst".to_string(),
            current_employer: "Cornfield Analytics".to_string(),
            ..MentorProfileUpdate::default()
        }
    }

    pub(crate) fn mentee_page() -> MenteeProfileUpdate {
        MenteeProfileUpdate {
            grade: Some(6),
            reasons: ChoiceSet::from_iter([2]),
            interests: ChoiceSet::from_iter([3, 8]),
            interests_other: "Chess".to_string(),
            ..MenteeProfileUpdate::default()
        }
    }

    pub(crate) fn three_slots() -> SchedulingUpdate {
        let mut availability = BTreeSet::new();
        availability.insert(AvailabilitySlot::new(Day::Monday, TimeSlot::SevenToNineAm));
        availability.insert(AvailabilitySlot::new(Day::Thursday, TimeSlot::ThreeToFivePm));
        availability.insert(AvailabilitySlot::new(Day::Sunday, TimeSlot::SevenToNinePm));
        SchedulingUpdate {
            availability,
            unavailable_dates: String::new(),
        }
    }
}

mod scenarios {
    use super::common::*;
    use mentor_match::workflows::registration::{
        RegistrationPayload, Role, SelectionValue, StepId, StepUpdate,
    };

    #[tokio::test]
    async fn untouched_capacity_reaches_the_backend_as_one() {
        let world = world(Ok(des_moines()), None);
        let opened = world.service.open().expect("opens");
        let id = opened.session_id;

        world
            .service
            .advance(&id, StepUpdate::Basic(basic(Role::Mentor)))
            .await
            .expect("basic");
        world
            .service
            .advance(&id, StepUpdate::MentorProfile(mentor_page()))
            .await
            .expect("profile");
        world
            .service
            .submit(&id, three_slots())
            .await
            .expect("submits");

        let seen = world.registrar.seen.lock().expect("lock").clone();
        match seen.as_slice() {
            [RegistrationPayload::Mentor(mentor)] => {
                assert_eq!(mentor.willing_to_advise, 1);
                assert_eq!(mentor.contact.role, Role::Mentor);
            }
            other => panic!("expected one mentor payload, got {}", other.len()),
        }
        assert_eq!(world.auth.ended.lock().expect("lock").len(), 1);
        assert!(!world.sessions.contains(&id));
    }

    #[tokio::test]
    async fn the_other_interest_text_rides_along_with_the_ids() {
        let world = world(Ok(des_moines()), None);
        let opened = world.service.open().expect("opens");
        let id = opened.session_id;

        world
            .service
            .advance(&id, StepUpdate::Basic(basic(Role::Mentee)))
            .await
            .expect("basic");
        world
            .service
            .advance(&id, StepUpdate::MenteeProfile(mentee_page()))
            .await
            .expect("profile");
        world
            .service
            .submit(&id, three_slots())
            .await
            .expect("submits");

        let seen = world.registrar.seen.lock().expect("lock").clone();
        match seen.as_slice() {
            [RegistrationPayload::Mentee(mentee)] => {
                assert!(mentee
                    .interests
                    .contains(&SelectionValue::Text("Chess".to_string())));
                assert!(mentee.interests.contains(&SelectionValue::Id(3)));
            }
            _ => panic!("expected one mentee payload"),
        }
    }

    #[tokio::test]
    async fn zero_geocode_results_pin_the_wizard_to_the_first_page() {
        let world = world(Err("not-found"), None);
        let opened = world.service.open().expect("opens");
        let id = opened.session_id;

        let error = world
            .service
            .advance(&id, StepUpdate::Basic(basic(Role::Mentor)))
            .await
            .expect_err("blocked");
        assert_eq!(
            error.to_string(),
            "address could not be verified: address not found"
        );
        assert_eq!(
            world.service.progress(&id).expect("live").current_step,
            StepId::Basic
        );
    }

    #[tokio::test]
    async fn a_rejected_submission_keeps_the_session_and_its_snapshot() {
        let world = world(Ok(des_moines()), Some((422, "email already registered")));
        let opened = world.service.open().expect("opens");
        let id = opened.session_id;

        world
            .service
            .advance(&id, StepUpdate::Basic(basic(Role::Mentee)))
            .await
            .expect("basic");
        world
            .service
            .advance(&id, StepUpdate::MenteeProfile(mentee_page()))
            .await
            .expect("profile");

        let error = world
            .service
            .submit(&id, three_slots())
            .await
            .expect_err("rejected");
        assert_eq!(error.to_string(), "email already registered");

        let docs = world.snapshots.docs.lock().expect("lock").clone();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].0, "mentee_form_data.csv");
        assert!(docs[0].1.starts_with("\"email\""));
        assert!(world.auth.ended.lock().expect("lock").is_empty());
        assert!(world.sessions.contains(&id));
    }

    #[tokio::test]
    async fn the_snapshot_document_quotes_every_cell() {
        let world = world(Ok(des_moines()), None);
        let opened = world.service.open().expect("opens");
        let id = opened.session_id;

        let mut page = basic(Role::Mentee);
        page.name = "O\"Brien".to_string();
        world
            .service
            .advance(&id, StepUpdate::Basic(page))
            .await
            .expect("basic");
        world
            .service
            .advance(&id, StepUpdate::MenteeProfile(mentee_page()))
            .await
            .expect("profile");
        world
            .service
            .submit(&id, three_slots())
            .await
            .expect("submits");

        let docs = world.snapshots.docs.lock().expect("lock").clone();
        let data_row = docs[0].1.lines().nth(1).expect("data row").to_string();
        assert!(data_row.contains("\"O\"\"Brien\""));
        assert!(data_row.contains("\"3; 8; Chess\""));
        assert!(data_row
            .contains("\"Monday-7am to 9am; Thursday-3pm to 5pm; Sunday-7pm to 9pm\""));
    }
}
