use serde::Serialize;

use crate::auth::session::Flash;

#[derive(Debug, Serialize)]
pub struct IndexPage {
    pub name: &'static str,
    pub admin_login: &'static str,
    pub user_login: &'static str,
}

/// Shared by the admin and user login pages.
#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub flashes: Vec<Flash>,
    pub action: &'static str,
    pub field: &'static str,
}
