use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Args, ValueEnum};
use mentor_match::error::AppError;
use mentor_match::workflows::registration::enrichment::AddressQuery;
use mentor_match::workflows::registration::submission::{
    MenteeRegistration, MentorRegistration,
};
use mentor_match::workflows::registration::{
    AvailabilitySlot, BasicInfoUpdate, ChoiceSet, Day, FileSnapshotSink, GeoPoint, GeocodeError,
    GeocodeGateway, MenteeProfileUpdate, MentorProfileUpdate, RegistrationError,
    RegistrationGateway, RegistrationReceipt, RegistrationService, Role, SchedulingUpdate,
    SessionView, StateCode, StepUpdate, TimeSlot,
};

use crate::infra::{InMemorySessionRepository, LoggingAuthGateway};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Which branch of the wizard to walk
    #[arg(long, value_enum, default_value = "mentee")]
    pub(crate) role: DemoRole,
    /// Directory receiving the CSV snapshot (defaults to the current directory)
    #[arg(long)]
    pub(crate) snapshot_dir: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub(crate) enum DemoRole {
    Mentor,
    #[default]
    Mentee,
}

impl From<DemoRole> for Role {
    fn from(value: DemoRole) -> Self {
        match value {
            DemoRole::Mentor => Role::Mentor,
            DemoRole::Mentee => Role::Mentee,
        }
    }
}

/// Geocoder standing in for the address-search service so the demo never
/// leaves the machine.
struct CannedGeocoder;

#[async_trait]
impl GeocodeGateway for CannedGeocoder {
    async fn resolve(&self, query: &AddressQuery) -> Result<GeoPoint, GeocodeError> {
        println!("  resolving address: {}", query.free_text());
        Ok(GeoPoint {
            latitude: 41.5868,
            longitude: -93.625,
        })
    }
}

/// Registrar that prints the outgoing payload instead of POSTing it.
struct DryRunRegistrar;

impl DryRunRegistrar {
    fn accept<P: serde::Serialize>(
        &self,
        role: Role,
        payload: &P,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        let body = serde_json::to_string_pretty(payload)
            .map_err(|err| RegistrationError::Transport(err.to_string()))?;
        println!("  would POST to /{}/register:\n{body}", role.label());
        Ok(RegistrationReceipt {
            status: 200,
            body: serde_json::json!({ "dry_run": true }),
        })
    }
}

#[async_trait]
impl RegistrationGateway for DryRunRegistrar {
    async fn register_mentor(
        &self,
        payload: &MentorRegistration,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        self.accept(Role::Mentor, payload)
    }

    async fn register_mentee(
        &self,
        payload: &MenteeRegistration,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        self.accept(Role::Mentee, payload)
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { role, snapshot_dir } = args;
    let role = Role::from(role);
    let snapshot_dir = snapshot_dir.unwrap_or_else(|| PathBuf::from("."));

    println!("Registration wizard demo ({role})");

    let service = RegistrationService::new(
        Arc::new(InMemorySessionRepository::default()),
        Arc::new(CannedGeocoder),
        Arc::new(DryRunRegistrar),
        Box::new(FileSnapshotSink::new(snapshot_dir.clone())),
        Box::new(LoggingAuthGateway),
    );

    let view = service.open().map_err(AppError::from)?;
    let session_id = view.session_id.clone();
    render_progress(&view);

    let view = service
        .advance(&session_id, StepUpdate::Basic(sample_basic(role)))
        .await?;
    render_progress(&view);

    let profile = match role {
        Role::Mentor => StepUpdate::MentorProfile(sample_mentor()),
        Role::Mentee => StepUpdate::MenteeProfile(sample_mentee()),
    };
    let view = service.advance(&session_id, profile).await?;
    render_progress(&view);

    let outcome = service.submit(&session_id, sample_scheduling()).await?;
    println!(
        "Submitted {} registration; snapshot written to {}",
        outcome.role,
        snapshot_dir.join(outcome.snapshot).display()
    );

    Ok(())
}

fn render_progress(view: &SessionView) {
    println!("Step: {}", view.current_step.label());
    for entry in &view.steps {
        println!(
            "  {}. {:<21} {}",
            entry.position,
            entry.label,
            entry.status.label()
        );
    }
}

fn sample_basic(role: Role) -> BasicInfoUpdate {
    BasicInfoUpdate {
        email: "taylor@example.org".to_string(),
        name: "Taylor Reyes".to_string(),
        age_bracket: Some(3),
        phone_number: "515-555-0172".to_string(),
        address_line: "1200 Locust St".to_string(),
        city: "Des Moines".to_string(),
        state: StateCode::parse("IA").ok(),
        zipcode: "50309".to_string(),
        ethnicities: ChoiceSet::from_iter([5]),
        session_preferences: ChoiceSet::from_iter([2, 5]),
        ethnicity_preference: Some(4),
        gender_identities: ChoiceSet::from_iter([2]),
        gender_preference: Some(4),
        contact_methods: ChoiceSet::from_iter([1, 2]),
        role: Some(role),
    }
}

fn sample_mentor() -> MentorProfileUpdate {
    MentorProfileUpdate {
        professional_title: "Robotics Engineer".to_string(),
        current_employer: "Heartland Dynamics".to_string(),
        capacity: 2,
        ..MentorProfileUpdate::default()
    }
}

fn sample_mentee() -> MenteeProfileUpdate {
    MenteeProfileUpdate {
        grade: Some(8),
        reasons: ChoiceSet::from_iter([1, 3]),
        interests: ChoiceSet::from_iter([1, 6, 8]),
        interests_other: "Rocketry".to_string(),
        ..MenteeProfileUpdate::default()
    }
}

fn sample_scheduling() -> SchedulingUpdate {
    let mut update = SchedulingUpdate::default();
    for (day, slot) in [
        (Day::Tuesday, TimeSlot::FiveToSevenPm),
        (Day::Thursday, TimeSlot::SevenToNinePm),
        (Day::Saturday, TimeSlot::NineToElevenAm),
    ] {
        update.availability.insert(AvailabilitySlot::new(day, slot));
    }
    update.unavailable_dates = "20251224-20260101".to_string();
    update
}
