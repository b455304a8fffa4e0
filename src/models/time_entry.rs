use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

/// Admin approval marker. An unset status is `None` at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Ok,
    NotOk,
}

impl EntryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryStatus::Ok => "ok",
            EntryStatus::NotOk => "not_ok",
        }
    }

    /// Parses the admin form value, where an empty string resets the status.
    pub fn parse_optional(raw: &str) -> Result<Option<EntryStatus>, UnknownStatus> {
        match raw.trim() {
            "" => Ok(None),
            other => other.parse().map(Some),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status '{}'", self.0)
    }
}

impl FromStr for EntryStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(EntryStatus::Ok),
            "not_ok" => Ok(EntryStatus::NotOk),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

fn decode_status(raw: Option<&str>) -> Option<EntryStatus> {
    raw.and_then(|s| s.parse().ok())
}

#[derive(Debug, Clone, FromRow)]
pub struct TimeEntry {
    pub id: i64,
    pub duration: f64,
    pub date: NaiveDate,
    pub comment: String,
    pub status: Option<String>,
    pub user_id: i64,
    pub project_id: i64,
}

impl TimeEntry {
    pub fn status(&self) -> Option<EntryStatus> {
        decode_status(self.status.as_deref())
    }
}

/// Entry joined with the names an admin or an export needs.
#[derive(Debug, Clone, FromRow)]
pub struct TimeEntryDetail {
    pub id: i64,
    pub duration: f64,
    pub date: NaiveDate,
    pub comment: String,
    pub status: Option<String>,
    pub user_id: i64,
    pub user_name: String,
    pub project_id: i64,
    pub project_name: String,
    pub project_archived: bool,
}

impl TimeEntryDetail {
    pub fn status(&self) -> Option<EntryStatus> {
        decode_status(self.status.as_deref())
    }
}

/// Validated content of a create or edit submission.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInput {
    pub duration: f64,
    pub date: NaiveDate,
    pub comment: String,
    pub project_id: i64,
}

const ENTRY_COLUMNS: &str = "id, duration, date, comment, status, user_id, project_id";

const DETAIL_SELECT: &str = r#"SELECT t.id, t.duration, t.date, t.comment, t.status,
        t.user_id, u.name AS user_name,
        t.project_id, p.name AS project_name, p.archived AS project_archived
    FROM time_entries t
    JOIN users u ON u.id = t.user_id
    JOIN projects p ON p.id = t.project_id"#;

impl TimeEntry {
    pub async fn create(db: &SqlitePool, user_id: i64, input: &EntryInput) -> Result<TimeEntry, sqlx::Error> {
        sqlx::query_as::<_, TimeEntry>(&format!(
            "INSERT INTO time_entries (duration, date, comment, user_id, project_id) \
             VALUES (?, ?, ?, ?, ?) RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(input.duration)
        .bind(input.date)
        .bind(&input.comment)
        .bind(user_id)
        .bind(input.project_id)
        .fetch_one(db)
        .await
    }

    /// Rewrites an entry owned by `user_id`; the status is kept. `None` when
    /// the entry does not exist or belongs to somebody else.
    pub async fn update_owned(
        db: &SqlitePool,
        user_id: i64,
        entry_id: i64,
        input: &EntryInput,
    ) -> Result<Option<TimeEntry>, sqlx::Error> {
        sqlx::query_as::<_, TimeEntry>(&format!(
            "UPDATE time_entries SET duration = ?, date = ?, comment = ?, project_id = ? \
             WHERE id = ? AND user_id = ? RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(input.duration)
        .bind(input.date)
        .bind(&input.comment)
        .bind(input.project_id)
        .bind(entry_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_owned(db: &SqlitePool, user_id: i64, entry_id: i64) -> Result<Option<TimeEntry>, sqlx::Error> {
        sqlx::query_as::<_, TimeEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM time_entries WHERE id = ? AND user_id = ?"
        ))
        .bind(entry_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn delete_owned(db: &SqlitePool, user_id: i64, entry_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM time_entries WHERE id = ? AND user_id = ?")
            .bind(entry_id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Returns false when no entry has that id.
    pub async fn set_status(db: &SqlitePool, entry_id: i64, status: Option<EntryStatus>) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE time_entries SET status = ? WHERE id = ?")
            .bind(status.map(EntryStatus::as_str))
            .bind(entry_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn list_for_user(db: &SqlitePool, user_id: i64) -> Result<Vec<TimeEntryDetail>, sqlx::Error> {
        sqlx::query_as::<_, TimeEntryDetail>(&format!(
            "{DETAIL_SELECT} WHERE t.user_id = ? ORDER BY t.date DESC, t.id DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    /// Newest first, for the admin dashboard.
    pub async fn list_all(db: &SqlitePool) -> Result<Vec<TimeEntryDetail>, sqlx::Error> {
        sqlx::query_as::<_, TimeEntryDetail>(&format!("{DETAIL_SELECT} ORDER BY t.date DESC, t.id DESC"))
            .fetch_all(db)
            .await
    }

    /// Oldest first, for the CSV export.
    pub async fn list_for_export(db: &SqlitePool) -> Result<Vec<TimeEntryDetail>, sqlx::Error> {
        sqlx::query_as::<_, TimeEntryDetail>(&format!("{DETAIL_SELECT} ORDER BY t.date ASC, t.id ASC"))
            .fetch_all(db)
            .await
    }
}
