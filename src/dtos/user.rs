use serde::{Deserialize, Serialize};

use crate::auth::session::Flash;
use crate::dtos::time_entry::{EditableEntry, TimeEntryResponse};
use crate::models::project::Project;

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UserLoginForm {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct UserLoginQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserDashboardQuery {
    pub edit: Option<String>,
}

/// User row on the admin dashboard; the token is never echoed back.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub project_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct UserDashboard {
    pub flashes: Vec<Flash>,
    pub user: UserProfile,
    pub projects: Vec<Project>,
    pub entries: Vec<TimeEntryResponse>,
    pub editing: Option<EditableEntry>,
}
