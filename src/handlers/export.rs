// src/handlers/export.rs
use axum::{
    extract::{Extension, State},
    response::{IntoResponse, Response},
};
use http::header;
use tracing::{info, instrument};

use crate::error::AppError;
use crate::middleware::auth::AdminContext;
use crate::models::project::{ArchivedProjectReport, Project};
use crate::models::time_entry::{TimeEntry, TimeEntryDetail};
use crate::state::AppState;

const ENTRY_HEADER: [&str; 6] = ["Date", "Duration(h)", "User", "Project", "Comment", "Status"];
const ARCHIVED_HEADER: [&str; 3] = ["Project name", "Total hours", "Assigned users"];

/// Hours with at least one decimal, so whole numbers read `2.0`.
pub fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{hours:.1}")
    } else {
        format!("{hours}")
    }
}

pub fn entries_csv(entries: &[TimeEntryDetail]) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(ENTRY_HEADER)?;
    for entry in entries {
        let date = entry.date.format("%Y-%m-%d").to_string();
        let hours = format_hours(entry.duration);
        let status = entry.status().map(|s| s.as_str()).unwrap_or("");
        wtr.write_record([
            date.as_str(),
            hours.as_str(),
            entry.user_name.as_str(),
            entry.project_name.as_str(),
            entry.comment.as_str(),
            status,
        ])?;
    }
    wtr.into_inner().map_err(|e| e.into_error().into())
}

pub fn archived_projects_csv(reports: &[ArchivedProjectReport]) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(ARCHIVED_HEADER)?;
    for report in reports {
        let hours = format_hours(report.total_hours);
        let users = report.assigned_users.join(", ");
        wtr.write_record([report.name.as_str(), hours.as_str(), users.as_str()])?;
    }
    wtr.into_inner().map_err(|e| e.into_error().into())
}

fn csv_attachment(filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

// GET /admin/export_csv
#[instrument(skip_all)]
pub async fn export_csv(
    State(state): State<AppState>,
    _admin: Extension<AdminContext>,
) -> Result<Response, AppError> {
    let entries = TimeEntry::list_for_export(&state.db_pool).await?;
    let body = entries_csv(&entries)?;
    info!(rows = entries.len(), "time entries exported");
    Ok(csv_attachment("time_entries.csv", body))
}

// GET /admin/export_archived_projects_csv
#[instrument(skip_all)]
pub async fn export_archived_projects_csv(
    State(state): State<AppState>,
    _admin: Extension<AdminContext>,
) -> Result<Response, AppError> {
    let reports = Project::archived_report(&state.db_pool).await?;
    let body = archived_projects_csv(&reports)?;
    info!(rows = reports.len(), "archived projects exported");
    Ok(csv_attachment("archived_projects.csv", body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn detail(duration: f64, comment: &str, status: Option<&str>) -> TimeEntryDetail {
        TimeEntryDetail {
            id: 1,
            duration,
            date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            comment: comment.into(),
            status: status.map(str::to_string),
            user_id: 1,
            user_name: "Alice".into(),
            project_id: 1,
            project_name: "Website".into(),
            project_archived: false,
        }
    }

    #[test]
    fn hours_formatting() {
        assert_eq!(format_hours(2.5), "2.5");
        assert_eq!(format_hours(2.0), "2.0");
        assert_eq!(format_hours(0.25), "0.25");
    }

    #[test]
    fn entries_csv_layout() {
        let csv = entries_csv(&[
            detail(2.5, "design review", Some("ok")),
            detail(1.0, "call, then notes", None),
        ])
        .unwrap();
        let text = String::from_utf8(csv).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Date,Duration(h),User,Project,Comment,Status");
        assert_eq!(lines[1], "2024-05-17,2.5,Alice,Website,design review,ok");
        assert_eq!(lines[2], "2024-05-17,1.0,Alice,Website,\"call, then notes\",");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn archived_csv_joins_users() {
        let csv = archived_projects_csv(&[ArchivedProjectReport {
            name: "Website".into(),
            total_hours: 3.5,
            assigned_users: vec!["Alice".into(), "Bob".into()],
        }])
        .unwrap();
        let text = String::from_utf8(csv).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Project name,Total hours,Assigned users");
        assert_eq!(lines[1], "Website,3.5,\"Alice, Bob\"");
    }

    #[test]
    fn empty_exports_still_have_headers() {
        let text = String::from_utf8(entries_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["Date,Duration(h),User,Project,Comment,Status"]);
    }
}
