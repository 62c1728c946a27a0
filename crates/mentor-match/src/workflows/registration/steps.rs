use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::blackout::parse_blackout_dates;
use super::catalog::{
    AGE_BRACKETS, CONTACT_METHODS, ETHNICITIES, GENDER_IDENTITIES, GRADE_LEVELS, MATCH_PREFERENCES,
    MENTEE_INTERESTS, MENTEE_REASONS, OptionCatalog, SESSION_PREFERENCES,
};
use super::domain::{
    AcademicLevel, AnswerRecord, AvailabilitySlot, CAPACITY_MAX, CAPACITY_MIN, ChoiceSet,
    MentorBackground, MentoringReason, Role, StateCode,
};

/// Minimum number of availability slots required before submission.
pub const MIN_AVAILABILITY_SELECTIONS: usize = 3;

/// The wizard's pages, in visual order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Basic,
    MentorProfile,
    MenteeProfile,
    Scheduling,
}

impl StepId {
    pub const ALL: [StepId; 4] = [
        StepId::Basic,
        StepId::MentorProfile,
        StepId::MenteeProfile,
        StepId::Scheduling,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            StepId::Basic => "Basic Info",
            StepId::MentorProfile => "Mentor Profile",
            StepId::MenteeProfile => "Mentee Profile",
            StepId::Scheduling => "Calendar Availability",
        }
    }

    /// 1-based position in the progress indicator.
    pub const fn position(self) -> u8 {
        match self {
            StepId::Basic => 1,
            StepId::MentorProfile => 2,
            StepId::MenteeProfile => 3,
            StepId::Scheduling => 4,
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Step-local validation failures. These block navigation and are rendered
/// inline; no network is involved.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please select a role (mentor or mentee) before continuing")]
    RoleRequired,
    #[error("the selected role cannot be changed after it has been chosen")]
    RoleImmutable,
    #[error("please enter a valid email address")]
    InvalidEmail,
    #[error("unknown {field} choice: {id}")]
    UnknownChoice { field: &'static str, id: u8 },
    #[error("please select at least {required} timeslots ({selected} selected)")]
    InsufficientAvailability { selected: usize, required: usize },
    #[error("unavailable dates could not be read: {0}")]
    InvalidBlackoutDates(String),
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}

pub fn is_valid_email(candidate: &str) -> bool {
    email_pattern().is_match(candidate)
}

fn check_single(
    catalog: &OptionCatalog,
    selection: Option<u8>,
) -> Result<(), ValidationError> {
    match selection {
        Some(id) if !catalog.contains(id) => Err(ValidationError::UnknownChoice {
            field: catalog.name(),
            id,
        }),
        _ => Ok(()),
    }
}

fn check_multi(catalog: &OptionCatalog, selections: &ChoiceSet) -> Result<(), ValidationError> {
    for id in selections.iter() {
        if !catalog.contains(id) {
            return Err(ValidationError::UnknownChoice {
                field: catalog.name(),
                id,
            });
        }
    }
    Ok(())
}

/// Field subset owned by the Basic Info page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicInfoUpdate {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age_bracket: Option<u8>,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address_line: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: Option<StateCode>,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default)]
    pub ethnicities: ChoiceSet,
    #[serde(default)]
    pub session_preferences: ChoiceSet,
    #[serde(default)]
    pub ethnicity_preference: Option<u8>,
    #[serde(default)]
    pub gender_identities: ChoiceSet,
    #[serde(default)]
    pub gender_preference: Option<u8>,
    #[serde(default)]
    pub contact_methods: ChoiceSet,
    #[serde(default)]
    pub role: Option<Role>,
}

impl BasicInfoUpdate {
    fn validate(&self, record: &AnswerRecord) -> Result<(), ValidationError> {
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        check_single(&AGE_BRACKETS, self.age_bracket)?;
        check_multi(&ETHNICITIES, &self.ethnicities)?;
        check_multi(&SESSION_PREFERENCES, &self.session_preferences)?;
        check_single(&MATCH_PREFERENCES, self.ethnicity_preference)?;
        check_multi(&GENDER_IDENTITIES, &self.gender_identities)?;
        check_single(&MATCH_PREFERENCES, self.gender_preference)?;
        check_multi(&CONTACT_METHODS, &self.contact_methods)?;

        if let (Some(existing), Some(requested)) = (record.role, self.role) {
            if existing != requested {
                return Err(ValidationError::RoleImmutable);
            }
        }

        Ok(())
    }

    fn merge_into(self, record: &mut AnswerRecord) {
        let previous_address = (
            record.address_line.clone(),
            record.city.clone(),
            record.state.clone(),
            record.zipcode.clone(),
        );

        record.email = self.email;
        record.name = self.name;
        record.age_bracket = self.age_bracket;
        record.phone_number = self.phone_number;
        record.address_line = self.address_line;
        record.city = self.city;
        record.state = self.state;
        record.zipcode = self.zipcode;
        record.ethnicities = self.ethnicities;
        record.session_preferences = self.session_preferences;
        record.ethnicity_preference = self.ethnicity_preference;
        record.gender_identities = self.gender_identities;
        record.gender_preference = self.gender_preference;
        record.contact_methods = self.contact_methods;
        if record.role.is_none() {
            record.role = self.role;
        }

        // Any change to the address triple invalidates the derived
        // coordinates; the enrichment gate must run again.
        let current_address = (
            record.address_line.clone(),
            record.city.clone(),
            record.state.clone(),
            record.zipcode.clone(),
        );
        if previous_address != current_address {
            record.coordinates = None;
        }
    }
}

/// Field subset owned by the Mentor Profile page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentorProfileUpdate {
    #[serde(default)]
    pub background: Option<MentorBackground>,
    #[serde(default)]
    pub academic_level: Option<AcademicLevel>,
    #[serde(default)]
    pub professional_title: String,
    #[serde(default)]
    pub current_employer: String,
    #[serde(default)]
    pub mentoring_reason: Option<MentoringReason>,
    #[serde(default = "default_capacity")]
    pub capacity: u8,
}

fn default_capacity() -> u8 {
    CAPACITY_MIN
}

impl MentorProfileUpdate {
    fn merge_into(self, record: &mut AnswerRecord) {
        record.mentor.background = self.background;
        record.mentor.academic_level = self.academic_level;
        record.mentor.professional_title = self.professional_title;
        record.mentor.current_employer = self.current_employer;
        record.mentor.mentoring_reason = self.mentoring_reason;
        record.mentor.capacity = self.capacity.clamp(CAPACITY_MIN, CAPACITY_MAX);
    }
}

/// Field subset owned by the Mentee Profile page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenteeProfileUpdate {
    #[serde(default)]
    pub grade: Option<u8>,
    #[serde(default)]
    pub reasons: ChoiceSet,
    #[serde(default)]
    pub reasons_other: String,
    #[serde(default)]
    pub interests: ChoiceSet,
    #[serde(default)]
    pub interests_other: String,
}

impl MenteeProfileUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        check_single(&GRADE_LEVELS, self.grade)?;
        check_multi(&MENTEE_REASONS, &self.reasons)?;
        check_multi(&MENTEE_INTERESTS, &self.interests)?;
        Ok(())
    }

    fn merge_into(self, record: &mut AnswerRecord) {
        record.mentee.grade = self.grade;
        record.mentee.reasons = self.reasons;
        record.mentee.interests = self.interests;

        // The escape text is only meaningful while its sentinel is
        // selected; deselecting "Other…" clears it.
        let reasons_other = MENTEE_REASONS.other_id().expect("reasons catalog sentinel");
        record.mentee.reasons_other = if record.mentee.reasons.contains(reasons_other) {
            self.reasons_other
        } else {
            String::new()
        };

        let interests_other = MENTEE_INTERESTS
            .other_id()
            .expect("interests catalog sentinel");
        record.mentee.interests_other = if record.mentee.interests.contains(interests_other) {
            self.interests_other
        } else {
            String::new()
        };
    }
}

/// Field subset owned by the Calendar Availability page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulingUpdate {
    #[serde(default)]
    pub availability: BTreeSet<AvailabilitySlot>,
    #[serde(default)]
    pub unavailable_dates: String,
}

impl SchedulingUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.availability.len() < MIN_AVAILABILITY_SELECTIONS {
            return Err(ValidationError::InsufficientAvailability {
                selected: self.availability.len(),
                required: MIN_AVAILABILITY_SELECTIONS,
            });
        }
        parse_blackout_dates(&self.unavailable_dates)
            .map_err(|err| ValidationError::InvalidBlackoutDates(err.to_string()))?;
        Ok(())
    }

    fn merge_into(self, record: &mut AnswerRecord) {
        record.availability = self.availability;
        record.unavailable_dates = self.unavailable_dates;
    }
}

/// A validated page's worth of field changes, tagged by the step it
/// belongs to so the controller can reject updates for the wrong page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepUpdate {
    Basic(BasicInfoUpdate),
    MentorProfile(MentorProfileUpdate),
    MenteeProfile(MenteeProfileUpdate),
    Scheduling(SchedulingUpdate),
}

impl StepUpdate {
    pub const fn step_id(&self) -> StepId {
        match self {
            StepUpdate::Basic(_) => StepId::Basic,
            StepUpdate::MentorProfile(_) => StepId::MentorProfile,
            StepUpdate::MenteeProfile(_) => StepId::MenteeProfile,
            StepUpdate::Scheduling(_) => StepId::Scheduling,
        }
    }

    pub fn validate(&self, record: &AnswerRecord) -> Result<(), ValidationError> {
        match self {
            StepUpdate::Basic(update) => update.validate(record),
            StepUpdate::MentorProfile(_) => Ok(()),
            StepUpdate::MenteeProfile(update) => update.validate(),
            StepUpdate::Scheduling(update) => update.validate(),
        }
    }

    /// The typed reducer: write this page's fields into the record.
    /// Callers must have validated first.
    pub(crate) fn merge_into(self, record: &mut AnswerRecord) {
        match self {
            StepUpdate::Basic(update) => update.merge_into(record),
            StepUpdate::MentorProfile(update) => update.merge_into(record),
            StepUpdate::MenteeProfile(update) => update.merge_into(record),
            StepUpdate::Scheduling(update) => update.merge_into(record),
        }
    }
}
