use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Role the applicant signs up for; chosen on the first page and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Mentor,
    Mentee,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Mentor => "mentor",
            Role::Mentee => "mentee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Two-letter postal codes accepted by the state selector (50 states plus DC).
const US_STATE_CODES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Validated two-letter US state code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCode(String);

impl StateCode {
    pub fn parse(raw: &str) -> Result<Self, StateCodeError> {
        let normalized = raw.trim().to_ascii_uppercase();
        if US_STATE_CODES.contains(&normalized.as_str()) {
            Ok(Self(normalized))
        } else {
            Err(StateCodeError(raw.trim().to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("'{0}' is not a recognized US state code")]
pub struct StateCodeError(String);

impl Serialize for StateCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StateCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        StateCode::parse(&raw).map_err(D::Error::custom)
    }
}

/// Coordinate pair resolved by the address enrichment gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Unordered set of numeric option ids; toggling twice restores the prior value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceSet(BTreeSet<u8>);

impl ChoiceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: u8) {
        if !self.0.remove(&id) {
            self.0.insert(id);
        }
    }

    pub fn insert(&mut self, id: u8) {
        self.0.insert(id);
    }

    pub fn contains(&self, id: u8) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u8> for ChoiceSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Days of the availability grid, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

/// Two-hour meeting windows offered for every day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeSlot {
    SevenToNineAm,
    NineToElevenAm,
    ElevenToOnePm,
    OneToThreePm,
    ThreeToFivePm,
    FiveToSevenPm,
    SevenToNinePm,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 7] = [
        TimeSlot::SevenToNineAm,
        TimeSlot::NineToElevenAm,
        TimeSlot::ElevenToOnePm,
        TimeSlot::OneToThreePm,
        TimeSlot::ThreeToFivePm,
        TimeSlot::FiveToSevenPm,
        TimeSlot::SevenToNinePm,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            TimeSlot::SevenToNineAm => "7am to 9am",
            TimeSlot::NineToElevenAm => "9am to 11am",
            TimeSlot::ElevenToOnePm => "11am to 1pm",
            TimeSlot::OneToThreePm => "1pm to 3pm",
            TimeSlot::ThreeToFivePm => "3pm to 5pm",
            TimeSlot::FiveToSevenPm => "5pm to 7pm",
            TimeSlot::SevenToNinePm => "7pm to 9pm",
        }
    }
}

/// One cell of the 7x7 availability grid. Serialized in the wire format the
/// matching backend expects, e.g. `Monday-7am to 9am`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AvailabilitySlot {
    pub day: Day,
    pub slot: TimeSlot,
}

impl AvailabilitySlot {
    pub const fn new(day: Day, slot: TimeSlot) -> Self {
        Self { day, slot }
    }
}

impl fmt::Display for AvailabilitySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day.label(), self.slot.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("'{0}' is not a valid availability slot (expected '<Day>-<window>')")]
pub struct ParseSlotError(String);

impl FromStr for AvailabilitySlot {
    type Err = ParseSlotError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (day_part, slot_part) = raw
            .split_once('-')
            .ok_or_else(|| ParseSlotError(raw.to_string()))?;
        let day = Day::ALL
            .into_iter()
            .find(|day| day.label() == day_part)
            .ok_or_else(|| ParseSlotError(raw.to_string()))?;
        let slot = TimeSlot::ALL
            .into_iter()
            .find(|slot| slot.label() == slot_part)
            .ok_or_else(|| ParseSlotError(raw.to_string()))?;
        Ok(Self { day, slot })
    }
}

impl Serialize for AvailabilitySlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AvailabilitySlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// STEAM background claimed by a mentor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MentorBackground {
    Professional,
    Student,
}

impl MentorBackground {
    pub const fn label(self) -> &'static str {
        match self {
            MentorBackground::Professional => "Professional",
            MentorBackground::Student => "Student",
        }
    }
}

/// Academic standing of a mentor, mirroring the intake form options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcademicLevel {
    #[serde(rename = "High School Freshman")]
    HighSchoolFreshman,
    #[serde(rename = "High School Sophomore")]
    HighSchoolSophomore,
    #[serde(rename = "High School Junior")]
    HighSchoolJunior,
    #[serde(rename = "High School Senior")]
    HighSchoolSenior,
    #[serde(rename = "College Undergraduate")]
    CollegeUndergraduate,
    #[serde(rename = "Graduate School")]
    GraduateSchool,
    #[serde(rename = "Graduated / Working Professional")]
    WorkingProfessional,
}

impl AcademicLevel {
    pub const fn label(self) -> &'static str {
        match self {
            AcademicLevel::HighSchoolFreshman => "High School Freshman",
            AcademicLevel::HighSchoolSophomore => "High School Sophomore",
            AcademicLevel::HighSchoolJunior => "High School Junior",
            AcademicLevel::HighSchoolSenior => "High School Senior",
            AcademicLevel::CollegeUndergraduate => "College Undergraduate",
            AcademicLevel::GraduateSchool => "Graduate School",
            AcademicLevel::WorkingProfessional => "Graduated / Working Professional",
        }
    }
}

/// Why a mentor is volunteering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MentoringReason {
    #[serde(rename = "Give back to community")]
    GiveBack,
    #[serde(rename = "Volunteer hours")]
    VolunteerHours,
    Other,
}

impl MentoringReason {
    pub const fn label(self) -> &'static str {
        match self {
            MentoringReason::GiveBack => "Give back to community",
            MentoringReason::VolunteerHours => "Volunteer hours",
            MentoringReason::Other => "Other",
        }
    }
}

pub const CAPACITY_MIN: u8 = 1;
pub const CAPACITY_MAX: u8 = 10;

/// Mentor-only slice of the answer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorProfile {
    pub background: Option<MentorBackground>,
    pub academic_level: Option<AcademicLevel>,
    pub professional_title: String,
    pub current_employer: String,
    pub mentoring_reason: Option<MentoringReason>,
    pub capacity: u8,
}

impl Default for MentorProfile {
    fn default() -> Self {
        Self {
            background: None,
            academic_level: None,
            professional_title: String::new(),
            current_employer: String::new(),
            mentoring_reason: None,
            capacity: CAPACITY_MIN,
        }
    }
}

/// Mentee-only slice of the answer record. The `*_other` text fields are
/// paired with the highest-numbered "Other…" option of their choice set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenteeProfile {
    pub grade: Option<u8>,
    pub reasons: ChoiceSet,
    pub reasons_other: String,
    pub interests: ChoiceSet,
    pub interests_other: String,
}

/// The single evolving record holding every questionnaire answer for one
/// wizard session. Owned exclusively by the wizard controller; step
/// definitions only hand back typed updates to merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub email: String,
    pub name: String,
    pub age_bracket: Option<u8>,
    pub phone_number: String,
    pub address_line: String,
    pub city: String,
    pub state: Option<StateCode>,
    pub zipcode: String,
    pub coordinates: Option<GeoPoint>,
    pub ethnicities: ChoiceSet,
    pub session_preferences: ChoiceSet,
    pub ethnicity_preference: Option<u8>,
    pub gender_identities: ChoiceSet,
    pub gender_preference: Option<u8>,
    pub contact_methods: ChoiceSet,
    pub role: Option<Role>,
    pub mentor: MentorProfile,
    pub mentee: MenteeProfile,
    pub availability: BTreeSet<AvailabilitySlot>,
    pub unavailable_dates: String,
}
