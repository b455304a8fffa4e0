// src/dtos/time_entry.rs
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::time_entry::{EntryInput, EntryStatus, TimeEntry, TimeEntryDetail};

/// Create/edit form on the user dashboard. Everything arrives as text so a
/// bad value turns into a flash message instead of a rejected request.
#[derive(Debug, Default, Deserialize)]
pub struct EntryForm {
    pub duration: Option<String>,
    pub date: Option<String>,
    pub comment: Option<String>,
    pub project_id: Option<String>,
    pub entry_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryFormError {
    MissingFields,
    InvalidDuration(String),
    InvalidDate(String),
    InvalidProject(String),
    InvalidEntry(String),
}

impl fmt::Display for EntryFormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryFormError::MissingFields => write!(f, "All fields are required"),
            EntryFormError::InvalidDuration(raw) => write!(f, "invalid duration '{raw}', expected a positive number of hours"),
            EntryFormError::InvalidDate(raw) => write!(f, "invalid date '{raw}', expected YYYY-MM-DD"),
            EntryFormError::InvalidProject(raw) => write!(f, "invalid project '{raw}'"),
            EntryFormError::InvalidEntry(raw) => write!(f, "invalid entry '{raw}'"),
        }
    }
}

impl EntryFormError {
    /// Text shown to the user.
    pub fn flash_message(&self) -> String {
        match self {
            EntryFormError::MissingFields => self.to_string(),
            other => format!("Save failed: {other}"),
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl EntryForm {
    /// The entry being edited, if any. A blank `entry_id` means "create".
    pub fn entry_id(&self) -> Result<Option<i64>, EntryFormError> {
        match present(&self.entry_id) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|_| EntryFormError::InvalidEntry(raw.to_string())),
        }
    }

    /// Checks presence, parses duration, date (blank means `today`) and project.
    pub fn validate(&self, today: NaiveDate) -> Result<EntryInput, EntryFormError> {
        let (Some(duration), Some(comment), Some(project_id)) = (
            present(&self.duration),
            present(&self.comment),
            present(&self.project_id),
        ) else {
            return Err(EntryFormError::MissingFields);
        };

        let duration = match duration.parse::<f64>() {
            Ok(hours) if hours.is_finite() && hours > 0.0 => hours,
            _ => return Err(EntryFormError::InvalidDuration(duration.to_string())),
        };

        let date = match present(&self.date) {
            None => today,
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| EntryFormError::InvalidDate(raw.to_string()))?,
        };

        let project_id = project_id
            .parse::<i64>()
            .map_err(|_| EntryFormError::InvalidProject(project_id.to_string()))?;

        Ok(EntryInput {
            duration,
            date,
            comment: comment.to_string(),
            project_id,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TimeEntryResponse {
    pub id: i64,
    pub date: NaiveDate,
    pub duration: f64,
    pub comment: String,
    pub status: Option<EntryStatus>,
    pub user_id: i64,
    pub user_name: String,
    pub project_id: i64,
    pub project_name: String,
    pub project_archived: bool,
}

impl From<TimeEntryDetail> for TimeEntryResponse {
    fn from(entry: TimeEntryDetail) -> Self {
        Self {
            status: entry.status(),
            id: entry.id,
            date: entry.date,
            duration: entry.duration,
            comment: entry.comment,
            user_id: entry.user_id,
            user_name: entry.user_name,
            project_id: entry.project_id,
            project_name: entry.project_name,
            project_archived: entry.project_archived,
        }
    }
}

/// Entry loaded into the edit form.
#[derive(Debug, Serialize)]
pub struct EditableEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub duration: f64,
    pub comment: String,
    pub project_id: i64,
    pub status: Option<EntryStatus>,
}

impl From<TimeEntry> for EditableEntry {
    fn from(entry: TimeEntry) -> Self {
        Self {
            status: entry.status(),
            id: entry.id,
            date: entry.date,
            duration: entry.duration,
            comment: entry.comment,
            project_id: entry.project_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn form(duration: &str, date: &str, comment: &str, project: &str) -> EntryForm {
        EntryForm {
            duration: Some(duration.into()),
            date: Some(date.into()),
            comment: Some(comment.into()),
            project_id: Some(project.into()),
            entry_id: None,
        }
    }

    #[test]
    fn blank_date_defaults_to_today() {
        let input = form("2.5", "", "design review", "3").validate(today()).unwrap();
        assert_eq!(input.duration, 2.5);
        assert_eq!(input.date, today());
        assert_eq!(input.comment, "design review");
        assert_eq!(input.project_id, 3);
    }

    #[test]
    fn explicit_date_is_parsed() {
        let input = form("1", "2024-02-29", "x", "1").validate(today()).unwrap();
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn missing_fields_are_reported_first() {
        assert_eq!(form("", "", "x", "1").validate(today()), Err(EntryFormError::MissingFields));
        assert_eq!(form("1", "", "  ", "1").validate(today()), Err(EntryFormError::MissingFields));
        assert_eq!(EntryForm::default().validate(today()), Err(EntryFormError::MissingFields));
    }

    #[test]
    fn duration_must_be_positive_number() {
        for bad in ["abc", "0", "-1.5", "NaN", "inf"] {
            assert!(
                matches!(form(bad, "", "x", "1").validate(today()), Err(EntryFormError::InvalidDuration(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn bad_date_and_project_are_rejected() {
        assert!(matches!(form("1", "01.02.2024", "x", "1").validate(today()), Err(EntryFormError::InvalidDate(_))));
        assert!(matches!(form("1", "2024-13-01", "x", "1").validate(today()), Err(EntryFormError::InvalidDate(_))));
        assert!(matches!(form("1", "", "x", "web").validate(today()), Err(EntryFormError::InvalidProject(_))));
    }

    #[test]
    fn flash_messages() {
        assert_eq!(EntryFormError::MissingFields.flash_message(), "All fields are required");
        assert!(EntryFormError::InvalidDuration("x".into()).flash_message().starts_with("Save failed: "));
    }

    #[test]
    fn entry_id_parsing() {
        let mut f = form("1", "", "x", "1");
        assert_eq!(f.entry_id(), Ok(None));
        f.entry_id = Some(" 12 ".into());
        assert_eq!(f.entry_id(), Ok(Some(12)));
        f.entry_id = Some("twelve".into());
        assert!(f.entry_id().is_err());
    }
}
