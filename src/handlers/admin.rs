// src/handlers/admin.rs
use std::collections::HashMap;

use axum::{
    extract::{Extension, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::Form;
use tracing::{info, instrument, warn};

use crate::auth::session::{Flash, Session};
use crate::auth::token::{admin_password_matches, generate_user_token};
use crate::dtos::admin::{AdminDashboard, AdminLoginForm, DashboardActionForm};
use crate::dtos::page::LoginPage;
use crate::dtos::project::CreateProjectForm;
use crate::dtos::user::{CreateUserForm, UserSummary};
use crate::error::{is_unique_violation, AppError};
use crate::middleware::auth::AdminContext;
use crate::models::project::{ArchiveOutcome, Assignment, Project};
use crate::models::time_entry::{EntryStatus, TimeEntry};
use crate::models::user::User;
use crate::state::AppState;

const DASHBOARD: &str = "/admin/dashboard";

// GET /admin/login
#[instrument(skip_all)]
pub async fn login_page(mut session: Session) -> Response {
    let page = LoginPage {
        flashes: session.take_flashes(),
        action: "/admin/login",
        field: "password",
    };
    (session, Json(page)).into_response()
}

// POST /admin/login
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<AdminLoginForm>,
) -> Response {
    if admin_password_matches(&form.password, &state.config.admin_password) {
        info!("admin logged in");
        session.set_admin(true);
        return session.redirect(DASHBOARD);
    }

    warn!("admin login with wrong password");
    session.flash(Flash::danger("Wrong password"));
    session.redirect("/admin/login")
}

// GET /admin/logout
#[instrument(skip_all)]
pub async fn logout(mut session: Session) -> Response {
    session.set_admin(false);
    session.redirect("/")
}

// GET /admin/dashboard
#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    _admin: Extension<AdminContext>,
    mut session: Session,
) -> Result<Response, AppError> {
    let db = &state.db_pool;
    let users = User::list(db).await?;
    let projects = Project::list(db).await?;
    let entries = TimeEntry::list_all(db).await?;

    let mut assigned: HashMap<i64, Vec<i64>> = HashMap::new();
    for (user_id, project_id) in Assignment::list_active(db).await? {
        assigned.entry(user_id).or_default().push(project_id);
    }

    let page = AdminDashboard {
        flashes: session.take_flashes(),
        users: users
            .into_iter()
            .map(|u| UserSummary {
                project_ids: assigned.remove(&u.id).unwrap_or_default(),
                id: u.id,
                name: u.name,
            })
            .collect(),
        active_projects: projects.iter().filter(|p| !p.archived).cloned().collect(),
        projects,
        entries: entries.into_iter().map(Into::into).collect(),
    };

    Ok((session, Json(page)).into_response())
}

// POST /admin/dashboard - assignment and status forms
#[instrument(skip(state, session))]
pub async fn dashboard_action(
    State(state): State<AppState>,
    _admin: Extension<AdminContext>,
    mut session: Session,
    Form(form): Form<DashboardActionForm>,
) -> Result<Response, AppError> {
    let action = form.action.as_deref().map(str::trim).filter(|a| !a.is_empty());
    match action {
        Some("assign_projects") => assign_projects(&state, &mut session, &form).await?,
        Some("set_status") => set_status(&state, &mut session, &form).await?,
        None if form.entry_id.is_some() => set_status(&state, &mut session, &form).await?,
        other => {
            warn!(action = ?other, "unknown dashboard action");
            session.flash(Flash::danger("Unknown action"));
        }
    }
    Ok(session.redirect(DASHBOARD))
}

fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

async fn assign_projects(
    state: &AppState,
    session: &mut Session,
    form: &DashboardActionForm,
) -> Result<(), AppError> {
    let user = match parse_id(form.user_id.as_deref()) {
        Some(id) => User::find(&state.db_pool, id).await?,
        None => None,
    };
    let Some(user) = user else {
        session.flash(Flash::danger("User not found"));
        return Ok(());
    };

    let project_ids: Vec<i64> = form
        .project_ids
        .iter()
        .filter_map(|raw| raw.trim().parse().ok())
        .collect();

    let assigned = Assignment::replace_active(&state.db_pool, user.id, &project_ids).await?;
    info!(user_id = user.id, requested = project_ids.len(), assigned, "assignments replaced");
    session.flash(Flash::success(format!(
        "Projects for {} updated ({assigned} assigned).",
        user.name
    )));
    Ok(())
}

async fn set_status(
    state: &AppState,
    session: &mut Session,
    form: &DashboardActionForm,
) -> Result<(), AppError> {
    let Some(entry_id) = parse_id(form.entry_id.as_deref()) else {
        session.flash(Flash::danger("Entry not found"));
        return Ok(());
    };

    let status = match EntryStatus::parse_optional(form.status.as_deref().unwrap_or("")) {
        Ok(status) => status,
        Err(e) => {
            session.flash(Flash::danger(format!("Invalid status: {e}")));
            return Ok(());
        }
    };

    if TimeEntry::set_status(&state.db_pool, entry_id, status).await? {
        info!(entry_id, status = ?status, "status set");
        session.flash(Flash::success("Status updated."));
    } else {
        session.flash(Flash::danger("Entry not found"));
    }
    Ok(())
}

// POST /admin/add_user
#[instrument(skip(state, session))]
pub async fn add_user(
    State(state): State<AppState>,
    _admin: Extension<AdminContext>,
    mut session: Session,
    Form(form): Form<CreateUserForm>,
) -> Result<Response, AppError> {
    let name = form.name.trim();
    if name.is_empty() {
        session.flash(Flash::danger("Name is required"));
        return Ok(session.redirect(DASHBOARD));
    }

    let token = generate_user_token();
    match User::create(&state.db_pool, name, &token).await {
        Ok(user) => {
            info!(user_id = user.id, "user created");
            session.flash(Flash::success(format!(
                "User {} added. Token: {token}",
                user.name
            )));
        }
        Err(e) if is_unique_violation(&e) => {
            session.flash(Flash::danger(format!("User {name} already exists")));
        }
        Err(e) => return Err(e.into()),
    }
    Ok(session.redirect(DASHBOARD))
}

// POST /admin/add_project
#[instrument(skip(state, session))]
pub async fn add_project(
    State(state): State<AppState>,
    _admin: Extension<AdminContext>,
    mut session: Session,
    Form(form): Form<CreateProjectForm>,
) -> Result<Response, AppError> {
    let name = form.name.trim();
    if name.is_empty() {
        session.flash(Flash::danger("Project name is required"));
        return Ok(session.redirect(DASHBOARD));
    }

    match Project::create(&state.db_pool, name).await {
        Ok(project) => {
            info!(project_id = project.id, "project created");
            session.flash(Flash::success(format!("Project {} added.", project.name)));
        }
        Err(e) if is_unique_violation(&e) => {
            session.flash(Flash::danger(format!("Project {name} already exists")));
        }
        Err(e) => return Err(e.into()),
    }
    Ok(session.redirect(DASHBOARD))
}

// POST /admin/archive_project/{id}
#[instrument(skip(state, session))]
pub async fn archive_project(
    State(state): State<AppState>,
    _admin: Extension<AdminContext>,
    mut session: Session,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(Some(&raw_id)) else {
        session.flash(Flash::danger("Project not found"));
        return Ok(session.redirect(DASHBOARD));
    };
    let flash = match Project::archive(&state.db_pool, id).await? {
        ArchiveOutcome::Archived => {
            info!(project_id = id, "project archived");
            Flash::success("Project archived.")
        }
        ArchiveOutcome::AlreadyArchived => Flash::info("Project is already archived."),
        ArchiveOutcome::NotFound => Flash::danger("Project not found"),
    };
    session.flash(flash);
    Ok(session.redirect(DASHBOARD))
}
