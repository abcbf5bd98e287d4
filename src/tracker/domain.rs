use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates;

/// Store-assigned identifier. Ids start at 1 and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub u32);

impl ApplicationId {
    pub const FIRST: Self = Self(1);

    /// `None` once the id space is used up.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApplicationId {
    type Err = ParseIntError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim().parse::<u32>().map(Self)
    }
}

/// One tracked job application as held by the store and written to the backing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: ApplicationId,
    pub company: String,
    pub position: String,
    pub reference_number: String,
    pub application_date: NaiveDate,
    pub status: String,
    pub application_method: String,
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
    pub notes: String,
    pub contact_person: String,
    pub contact_email: String,
}

impl JobApplication {
    pub fn normalized_status(&self) -> ApplicationStatus {
        ApplicationStatus::from_text(&self.status)
    }

    pub(crate) fn status_matches(&self, status: &str) -> bool {
        self.status.to_lowercase() == status.to_lowercase()
    }

    /// Case-insensitive substring match on company, position or reference number.
    pub(crate) fn matches_term(&self, needle_lowercase: &str) -> bool {
        [&self.company, &self.position, &self.reference_number]
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle_lowercase))
    }
}

/// Every field of a [`JobApplication`] except the id, with dates already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub company: String,
    pub position: String,
    pub reference_number: String,
    pub application_date: NaiveDate,
    pub closing_date: Option<NaiveDate>,
    pub application_method: String,
    pub status: String,
    pub contact_person: String,
    pub contact_email: String,
    pub notes: String,
}

impl NewApplication {
    pub(crate) fn into_application(self, id: ApplicationId) -> JobApplication {
        JobApplication {
            id,
            company: self.company,
            position: self.position,
            reference_number: self.reference_number,
            application_date: self.application_date,
            status: self.status,
            application_method: self.application_method,
            closing_date: self.closing_date,
            notes: self.notes,
            contact_person: self.contact_person,
            contact_email: self.contact_email,
        }
    }
}

/// Raw text as typed by the user, before the date policy is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationForm {
    pub company: String,
    pub position: String,
    pub reference_number: String,
    pub application_date: String,
    pub closing_date: String,
    pub application_method: String,
    pub status: String,
    pub contact_person: String,
    pub contact_email: String,
    pub notes: String,
}

impl ApplicationForm {
    /// Resolve the raw dates: an unparseable application date becomes `today`, an unparseable
    /// closing date is left unset.
    pub fn resolve(self, today: NaiveDate) -> NewApplication {
        NewApplication {
            application_date: dates::application_date_or_today(&self.application_date, today),
            closing_date: dates::closing_date_or_none(&self.closing_date),
            company: self.company,
            position: self.position,
            reference_number: self.reference_number,
            application_method: self.application_method,
            status: self.status,
            contact_person: self.contact_person,
            contact_email: self.contact_email,
            notes: self.notes,
        }
    }
}

/// Conventional application statuses. Stored text is never rewritten; this is a read-side view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ApplicationStatus {
    Applied,
    Interview,
    Rejected,
    Offered,
    Other,
}

impl ApplicationStatus {
    pub const fn known() -> [Self; 4] {
        [Self::Applied, Self::Interview, Self::Rejected, Self::Offered]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interview => "Interview",
            Self::Rejected => "Rejected",
            Self::Offered => "Offered",
            Self::Other => "Other",
        }
    }

    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        Self::known()
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(trimmed))
            .unwrap_or(Self::Other)
    }

    /// `Applied/Interview/Rejected/Offered`, for prompts and help text.
    pub fn prompt_choices() -> String {
        Self::known()
            .iter()
            .map(|status| status.label())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
