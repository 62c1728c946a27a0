//! Fixed option catalogs backing the numerically coded questionnaire fields.
//!
//! Every option carries a stable integer id. When a catalog offers an
//! "Other…" escape hatch it is always the highest id, and selecting it
//! unlocks a paired free-text field on the form.

/// A single selectable option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    pub id: u8,
    pub label: &'static str,
}

const fn option(id: u8, label: &'static str) -> ChoiceOption {
    ChoiceOption { id, label }
}

/// A named, ordered set of options with stable ids.
#[derive(Debug, Clone, Copy)]
pub struct OptionCatalog {
    name: &'static str,
    options: &'static [ChoiceOption],
}

impl OptionCatalog {
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn options(&self) -> &'static [ChoiceOption] {
        self.options
    }

    pub fn contains(&self, id: u8) -> bool {
        self.options.iter().any(|opt| opt.id == id)
    }

    pub fn label_for(&self, id: u8) -> Option<&'static str> {
        self.options
            .iter()
            .find(|opt| opt.id == id)
            .map(|opt| opt.label)
    }

    /// Id of the "Other…" sentinel, if this catalog carries one. By
    /// construction the sentinel is the last (highest-id) option.
    pub fn other_id(&self) -> Option<u8> {
        self.options
            .last()
            .filter(|opt| opt.label.starts_with("Other"))
            .map(|opt| opt.id)
    }

    pub fn is_other(&self, id: u8) -> bool {
        self.other_id() == Some(id)
    }
}

pub const AGE_BRACKETS: OptionCatalog = OptionCatalog {
    name: "age bracket",
    options: &[
        option(1, "9-13"),
        option(2, "13-18"),
        option(3, "18-22"),
        option(4, "22-30"),
        option(5, "30-40"),
        option(6, "40-50"),
        option(7, "50-60"),
        option(8, "60+"),
    ],
};

pub const ETHNICITIES: OptionCatalog = OptionCatalog {
    name: "ethnicity",
    options: &[
        option(1, "American Indian or Alaska Native"),
        option(2, "Asian: Includes Chinese, Japanese, Filipino, Korean, South Asian, and Vietnamese"),
        option(3, "South Asian: Includes Indian, Pakistan, Sri Lankan, Bangaladesh"),
        option(4, "Black or African American: Includes Jamaican, Nigerian, Haitian, and Ethiopian"),
        option(5, "Hispanic or Latino: Includes Puerto Rican, Mexican, Cuban, Salvadoran, and Colombian"),
        option(6, "Middle Eastern or North African: Includes Lebanese, Iranian, Egyptian, Moroccan, Israeli, and Palestinian"),
        option(7, "Native Hawaiian or Pacific Islander: Includes Samoan, Guamanian, Chamorro, and Tongan"),
        option(8, "White or European: Includes German, Irish, English, Italian, Polish, and French"),
        option(9, "Other…"),
    ],
};

pub const SESSION_PREFERENCES: OptionCatalog = OptionCatalog {
    name: "session type preference",
    options: &[
        option(1, "Homework Help"),
        option(2, "Exposure to STEAM in general"),
        option(3, "College guidance"),
        option(4, "Career guidance"),
        option(5, "Explore a particular field"),
        option(6, "Other: text"),
    ],
};

/// Shared by the ethnicity- and gender-matching preference questions.
pub const MATCH_PREFERENCES: OptionCatalog = OptionCatalog {
    name: "match preference",
    options: &[
        option(1, "Prefer ONLY to be matched within that similarity"),
        option(2, "Prefer it, but available to others as needed"),
        option(3, "Prefer NOT to be matched within that similarity"),
        option(4, "Do not have a preference. Either is fine."),
        option(5, "Other…"),
    ],
};

pub const GENDER_IDENTITIES: OptionCatalog = OptionCatalog {
    name: "gender identity",
    options: &[
        option(1, "Cisgender Male"),
        option(2, "Cisgender Female"),
        option(3, "Transgender Male"),
        option(4, "Transgender Female"),
        option(5, "Prefer not to disclose"),
        option(6, "Other…"),
    ],
};

pub const CONTACT_METHODS: OptionCatalog = OptionCatalog {
    name: "contact method",
    options: &[
        option(1, "Web Conference (i.e. Zoom Conference)"),
        option(2, "In Person"),
        option(3, "Hybrid (Both In Person and web)"),
        option(4, "Other..."),
    ],
};

pub const GRADE_LEVELS: OptionCatalog = OptionCatalog {
    name: "grade",
    options: &[
        option(1, "5th grade"),
        option(2, "6th grade"),
        option(3, "7th grade"),
        option(4, "8th grade"),
        option(5, "9th grade"),
        option(6, "10th grade"),
        option(7, "11th grade"),
        option(8, "12th grade"),
        option(9, "College Freshman"),
        option(10, "College Sophomore"),
        option(11, "College Junior"),
        option(12, "College Senior"),
        option(13, "Graduate Student"),
    ],
};

pub const MENTEE_REASONS: OptionCatalog = OptionCatalog {
    name: "reason for wanting a mentor",
    options: &[
        option(1, "Career Exploration"),
        option(2, "Do better in school"),
        option(3, "Learn about STEAM"),
        option(4, "Other…"),
    ],
};

pub const MENTEE_INTERESTS: OptionCatalog = OptionCatalog {
    name: "interest",
    options: &[
        option(1, "Science"),
        option(2, "Dance"),
        option(3, "Math"),
        option(4, "Music"),
        option(5, "Building"),
        option(6, "Robotics"),
        option(7, "Art"),
        option(8, "Other…"),
    ],
};
