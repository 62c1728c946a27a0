//! Single-row CSV snapshot of a registration payload.
//!
//! The snapshot mirrors the wire payload: the header row lists fields in
//! insertion order, every value is double-quoted, embedded quotes are
//! doubled, arrays are joined with `"; "`, and absent values render as
//! empty strings.

use std::path::PathBuf;

use super::payload::{
    ContactProfile, MenteeRegistration, MentorRegistration, RegistrationPayload, SelectionValue,
    SubmissionDefaults,
};

/// Separator used when an array value is flattened into one CSV cell.
pub const ARRAY_JOIN_SEPARATOR: &str = "; ";

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("could not write csv snapshot: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not persist csv snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv snapshot was not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Where finished snapshots end up. The production sink writes files; the
/// tests capture documents in memory.
pub trait SnapshotSink: Send + Sync {
    fn persist(&self, filename: &str, contents: &str) -> Result<(), SnapshotError>;
}

/// Writes snapshots into a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSnapshotSink {
    dir: PathBuf,
}

impl FileSnapshotSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SnapshotSink for FileSnapshotSink {
    fn persist(&self, filename: &str, contents: &str) -> Result<(), SnapshotError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(filename), contents)?;
        Ok(())
    }
}

/// Render the two-line CSV document for a payload.
pub fn csv_snapshot(payload: &RegistrationPayload) -> Result<String, SnapshotError> {
    let rows = match payload {
        RegistrationPayload::Mentor(mentor) => mentor_rows(mentor),
        RegistrationPayload::Mentee(mentee) => mentee_rows(mentee),
    };

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());
    writer.write_record(rows.iter().map(|(name, _)| *name))?;
    writer.write_record(rows.iter().map(|(_, value)| value.as_str()))?;
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|err| SnapshotError::Io(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn contact_rows(contact: &ContactProfile) -> Vec<(&'static str, String)> {
    vec![
        ("email", contact.email.clone()),
        ("name", contact.name.clone()),
        ("age_bracket", opt_number(contact.age_bracket)),
        ("phone_number", contact.phone_number.clone()),
        ("address_line_1", contact.address_line_1.clone()),
        ("city", contact.city.clone()),
        (
            "state",
            contact
                .state
                .as_ref()
                .map(|state| state.as_str().to_string())
                .unwrap_or_default(),
        ),
        ("zipcode", contact.zipcode.clone()),
        ("latitude", opt_float(contact.latitude)),
        ("longitude", opt_float(contact.longitude)),
        ("ethnicities", join_ids(&contact.ethnicities)),
        (
            "ethnicity_preference",
            opt_number(contact.ethnicity_preference),
        ),
        ("gender", join_ids(&contact.gender)),
        ("gender_preference", opt_number(contact.gender_preference)),
        ("methods", join_ids(&contact.methods)),
        ("session_preferences", join_ids(&contact.session_preferences)),
        ("role", contact.role.label().to_string()),
    ]
}

fn defaults_rows(defaults: &SubmissionDefaults) -> Vec<(&'static str, String)> {
    vec![
        (
            "match_pair_ids",
            defaults.match_pair_ids.join(ARRAY_JOIN_SEPARATOR),
        ),
        (
            "is_available_for_matching",
            defaults.is_available_for_matching.to_string(),
        ),
        (
            "mentoring_sessions_completed",
            defaults.mentoring_sessions_completed.to_string(),
        ),
    ]
}

fn mentor_rows(mentor: &MentorRegistration) -> Vec<(&'static str, String)> {
    let mut rows = contact_rows(&mentor.contact);
    rows.push((
        "steam_background",
        mentor
            .steam_background
            .map(|background| background.label().to_string())
            .unwrap_or_default(),
    ));
    rows.push((
        "academic_level",
        mentor
            .academic_level
            .map(|level| level.label().to_string())
            .unwrap_or_default(),
    ));
    rows.push(("professional_title", mentor.professional_title.clone()));
    rows.push(("current_employer", mentor.current_employer.clone()));
    rows.push((
        "reasons_for_mentoring",
        mentor
            .reasons_for_mentoring
            .map(|reason| reason.label().to_string())
            .unwrap_or_default(),
    ));
    rows.push(("willing_to_advise", mentor.willing_to_advise.to_string()));
    rows.push(("availability", join_slots(&mentor.availability)));
    rows.push(("unavailable_dates", mentor.unavailable_dates.clone()));
    rows.extend(defaults_rows(&mentor.defaults));
    rows
}

fn mentee_rows(mentee: &MenteeRegistration) -> Vec<(&'static str, String)> {
    let mut rows = contact_rows(&mentee.contact);
    rows.push(("grade", opt_number(mentee.grade)));
    rows.push((
        "reasons_for_mentoring",
        join_values(&mentee.reasons_for_mentoring),
    ));
    rows.push(("interests", join_values(&mentee.interests)));
    rows.push(("availability", join_slots(&mentee.availability)));
    rows.push(("unavailable_dates", mentee.unavailable_dates.clone()));
    rows.extend(defaults_rows(&mentee.defaults));
    rows
}

fn opt_number(value: Option<u8>) -> String {
    value.map(|id| id.to_string()).unwrap_or_default()
}

fn opt_float(value: Option<f64>) -> String {
    value.map(|float| float.to_string()).unwrap_or_default()
}

fn join_ids(ids: &[u8]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(ARRAY_JOIN_SEPARATOR)
}

fn join_values(values: &[SelectionValue]) -> String {
    values
        .iter()
        .map(|value| match value {
            SelectionValue::Id(id) => id.to_string(),
            SelectionValue::Text(text) => text.clone(),
        })
        .collect::<Vec<_>>()
        .join(ARRAY_JOIN_SEPARATOR)
}

fn join_slots(slots: &[super::super::domain::AvailabilitySlot]) -> String {
    slots
        .iter()
        .map(|slot| slot.to_string())
        .collect::<Vec<_>>()
        .join(ARRAY_JOIN_SEPARATOR)
}
