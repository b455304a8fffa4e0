use serde::{Deserialize, Serialize};

use crate::auth::session::Flash;
use crate::dtos::time_entry::TimeEntryResponse;
use crate::dtos::user::UserSummary;
use crate::models::project::Project;

#[derive(Debug, Deserialize)]
pub struct AdminLoginForm {
    #[serde(default)]
    pub password: String,
}

/// POST /admin/dashboard. `action` picks the operation:
/// `assign_projects` uses `user_id` + repeated `project_ids`,
/// `set_status` uses `entry_id` + `status`. A form without `action`
/// but with `entry_id` is a status form.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardActionForm {
    pub action: Option<String>,
    pub user_id: Option<String>,
    #[serde(default)]
    pub project_ids: Vec<String>,
    pub entry_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub flashes: Vec<Flash>,
    pub users: Vec<UserSummary>,
    pub projects: Vec<Project>,
    pub active_projects: Vec<Project>,
    pub entries: Vec<TimeEntryResponse>,
}
