use serde::Serialize;

use super::super::catalog::{MENTEE_INTERESTS, MENTEE_REASONS};
use super::super::domain::{
    AcademicLevel, AnswerRecord, AvailabilitySlot, MentorBackground, MentoringReason, Role,
    StateCode,
};

/// System-assigned fields attached to every registration, hoisted out of
/// the transformer so the contract is visible and testable on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionDefaults {
    pub match_pair_ids: Vec<String>,
    pub is_available_for_matching: bool,
    pub mentoring_sessions_completed: u32,
}

impl Default for SubmissionDefaults {
    fn default() -> Self {
        Self {
            match_pair_ids: Vec::new(),
            is_available_for_matching: true,
            mentoring_sessions_completed: 0,
        }
    }
}

/// A value inside a mentee multi-select after "Other…" expansion: the
/// stable option ids, optionally followed by the literal escape text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SelectionValue {
    Id(u8),
    Text(String),
}

/// Contact and demographic base shared by both wire shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactProfile {
    pub email: String,
    pub name: String,
    pub age_bracket: Option<u8>,
    pub phone_number: String,
    pub address_line_1: String,
    pub city: String,
    pub state: Option<StateCode>,
    pub zipcode: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ethnicities: Vec<u8>,
    pub ethnicity_preference: Option<u8>,
    pub gender: Vec<u8>,
    pub gender_preference: Option<u8>,
    pub methods: Vec<u8>,
    pub session_preferences: Vec<u8>,
    pub role: Role,
}

/// Wire shape POSTed to the mentor registration endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentorRegistration {
    #[serde(flatten)]
    pub contact: ContactProfile,
    pub steam_background: Option<MentorBackground>,
    pub academic_level: Option<AcademicLevel>,
    pub professional_title: String,
    pub current_employer: String,
    pub reasons_for_mentoring: Option<MentoringReason>,
    pub willing_to_advise: u8,
    pub availability: Vec<AvailabilitySlot>,
    pub unavailable_dates: String,
    #[serde(flatten)]
    pub defaults: SubmissionDefaults,
}

/// Wire shape POSTed to the mentee registration endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenteeRegistration {
    #[serde(flatten)]
    pub contact: ContactProfile,
    pub grade: Option<u8>,
    pub reasons_for_mentoring: Vec<SelectionValue>,
    pub interests: Vec<SelectionValue>,
    pub availability: Vec<AvailabilitySlot>,
    pub unavailable_dates: String,
    #[serde(flatten)]
    pub defaults: SubmissionDefaults,
}

/// Exactly one of the two wire shapes, chosen by the stored role.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationPayload {
    Mentor(MentorRegistration),
    Mentee(MenteeRegistration),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("cannot build a registration payload without a chosen role")]
    RoleMissing,
}

impl RegistrationPayload {
    /// Consume a completed answer record into the role-specific shape.
    pub fn from_record(record: &AnswerRecord) -> Result<Self, TransformError> {
        let role = record.role.ok_or(TransformError::RoleMissing)?;
        let contact = contact_profile(record, role);
        let availability: Vec<AvailabilitySlot> = record.availability.iter().copied().collect();

        match role {
            Role::Mentor => Ok(Self::Mentor(MentorRegistration {
                contact,
                steam_background: record.mentor.background,
                academic_level: record.mentor.academic_level,
                professional_title: record.mentor.professional_title.clone(),
                current_employer: record.mentor.current_employer.clone(),
                reasons_for_mentoring: record.mentor.mentoring_reason,
                willing_to_advise: record.mentor.capacity,
                availability,
                unavailable_dates: record.unavailable_dates.clone(),
                defaults: SubmissionDefaults::default(),
            })),
            Role::Mentee => Ok(Self::Mentee(MenteeRegistration {
                contact,
                grade: record.mentee.grade,
                reasons_for_mentoring: expand_other(
                    &record.mentee.reasons,
                    MENTEE_REASONS.other_id(),
                    &record.mentee.reasons_other,
                ),
                interests: expand_other(
                    &record.mentee.interests,
                    MENTEE_INTERESTS.other_id(),
                    &record.mentee.interests_other,
                ),
                availability,
                unavailable_dates: record.unavailable_dates.clone(),
                defaults: SubmissionDefaults::default(),
            })),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            RegistrationPayload::Mentor(_) => Role::Mentor,
            RegistrationPayload::Mentee(_) => Role::Mentee,
        }
    }

    /// Filename of the local CSV snapshot for this shape.
    pub fn snapshot_filename(&self) -> &'static str {
        match self {
            RegistrationPayload::Mentor(_) => "mentor_form_data.csv",
            RegistrationPayload::Mentee(_) => "mentee_form_data.csv",
        }
    }
}

fn contact_profile(record: &AnswerRecord, role: Role) -> ContactProfile {
    ContactProfile {
        email: record.email.clone(),
        name: record.name.clone(),
        age_bracket: record.age_bracket,
        phone_number: record.phone_number.clone(),
        address_line_1: record.address_line.clone(),
        city: record.city.clone(),
        state: record.state.clone(),
        zipcode: record.zipcode.clone(),
        latitude: record.coordinates.map(|point| point.latitude),
        longitude: record.coordinates.map(|point| point.longitude),
        ethnicities: record.ethnicities.iter().collect(),
        ethnicity_preference: record.ethnicity_preference,
        gender: record.gender_identities.iter().collect(),
        gender_preference: record.gender_preference,
        methods: record.contact_methods.iter().collect(),
        session_preferences: record.session_preferences.iter().collect(),
        role,
    }
}

/// Keep the numeric selections as-is; when the "Other…" sentinel is
/// present, append the escape text verbatim (behavior preserved from the
/// production form, which uploads the typed text alongside the ids).
fn expand_other(
    selections: &super::super::domain::ChoiceSet,
    other_id: Option<u8>,
    other_text: &str,
) -> Vec<SelectionValue> {
    let mut values: Vec<SelectionValue> = selections.iter().map(SelectionValue::Id).collect();
    if let Some(other) = other_id {
        if selections.contains(other) {
            values.push(SelectionValue::Text(other_text.to_string()));
        }
    }
    values
}
