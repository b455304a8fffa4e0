use axum::{
    extract::{Extension, Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::Form;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{error, info, instrument, warn};

use crate::auth::session::{Flash, Session};
use crate::dtos::page::LoginPage;
use crate::dtos::time_entry::{EditableEntry, EntryForm};
use crate::dtos::user::{UserDashboard, UserDashboardQuery, UserLoginForm, UserLoginQuery, UserProfile};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::project::Project;
use crate::models::time_entry::{EntryInput, TimeEntry};
use crate::models::user::User;
use crate::state::AppState;

const DASHBOARD: &str = "/user/dashboard";
const NOT_FOUND_OR_FORBIDDEN: &str = "Entry not found or not authorized";

// GET /user/login, also accepts ?token=... for one-click links
#[instrument(skip_all)]
pub async fn login_page(
    State(state): State<AppState>,
    mut session: Session,
    Query(query): Query<UserLoginQuery>,
) -> Result<Response, AppError> {
    if let Some(token) = query.token {
        return try_login(&state.db_pool, session, &token).await;
    }

    let page = LoginPage {
        flashes: session.take_flashes(),
        action: "/user/login",
        field: "token",
    };
    Ok((session, Json(page)).into_response())
}

// POST /user/login
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UserLoginForm>,
) -> Result<Response, AppError> {
    try_login(&state.db_pool, session, &form.token).await
}

async fn try_login(db: &SqlitePool, mut session: Session, token: &str) -> Result<Response, AppError> {
    match User::find_by_token(db, token).await? {
        Some(user) => {
            info!(user_id = user.id, "user logged in");
            session.set_user_id(Some(user.id));
            Ok(session.redirect(DASHBOARD))
        }
        None => {
            warn!("login with unknown token");
            session.flash(Flash::danger("Invalid token"));
            Ok(session.redirect("/user/login"))
        }
    }
}

// GET /user/logout
#[instrument(skip_all)]
pub async fn logout(mut session: Session) -> Response {
    session.set_user_id(None);
    session.redirect("/")
}

// GET /user/dashboard[?edit=<id>]
#[instrument(skip(state, session))]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut session: Session,
    Query(query): Query<UserDashboardQuery>,
) -> Result<Response, AppError> {
    let db = &state.db_pool;
    let mut flashes = session.take_flashes();

    let editing: Option<EditableEntry> = match query.edit.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => {
            let entry = match raw.parse::<i64>() {
                Ok(id) => TimeEntry::find_owned(db, auth.user_id, id).await?,
                Err(_) => None,
            };
            if entry.is_none() {
                flashes.push(Flash::danger(NOT_FOUND_OR_FORBIDDEN));
            }
            entry.map(Into::into)
        }
    };

    let projects = Project::list_active_for_user(db, auth.user_id).await?;
    let entries = TimeEntry::list_for_user(db, auth.user_id).await?;

    let page = UserDashboard {
        flashes,
        user: UserProfile {
            id: auth.user_id,
            name: auth.name,
        },
        projects,
        entries: entries.into_iter().map(Into::into).collect(),
        editing,
    };
    Ok((session, Json(page)).into_response())
}

enum SaveOutcome {
    Created(TimeEntry),
    Updated(TimeEntry),
    NotOwned,
    ProjectNotAllowed,
}

async fn persist_entry(
    db: &SqlitePool,
    user_id: i64,
    entry_id: Option<i64>,
    input: &EntryInput,
) -> Result<SaveOutcome, sqlx::Error> {
    let assigned = Project::is_active_assignment(db, user_id, input.project_id).await?;

    let Some(entry_id) = entry_id else {
        if !assigned {
            return Ok(SaveOutcome::ProjectNotAllowed);
        }
        return TimeEntry::create(db, user_id, input).await.map(SaveOutcome::Created);
    };

    let Some(existing) = TimeEntry::find_owned(db, user_id, entry_id).await? else {
        return Ok(SaveOutcome::NotOwned);
    };
    // An entry may keep its project after that project was archived or unassigned.
    if !assigned && existing.project_id != input.project_id {
        return Ok(SaveOutcome::ProjectNotAllowed);
    }

    Ok(match TimeEntry::update_owned(db, user_id, entry_id, input).await? {
        Some(entry) => SaveOutcome::Updated(entry),
        None => SaveOutcome::NotOwned,
    })
}

// POST /user/dashboard - create, or edit when entry_id is set
#[instrument(skip(state, session))]
pub async fn save_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut session: Session,
    Form(form): Form<EntryForm>,
) -> Response {
    let entry_id = match form.entry_id() {
        Ok(id) => id,
        Err(e) => {
            session.flash(Flash::danger(e.flash_message()));
            return session.redirect(DASHBOARD);
        }
    };
    let back = match entry_id {
        Some(id) => format!("{DASHBOARD}?edit={id}"),
        None => DASHBOARD.to_string(),
    };

    let input = match form.validate(Utc::now().date_naive()) {
        Ok(input) => input,
        Err(e) => {
            session.flash(Flash::danger(e.flash_message()));
            return session.redirect(&back);
        }
    };

    match persist_entry(&state.db_pool, auth.user_id, entry_id, &input).await {
        Ok(SaveOutcome::Created(entry)) => {
            info!(entry_id = entry.id, "time entry created");
            session.flash(Flash::success("Time entry saved."));
            session.redirect(DASHBOARD)
        }
        Ok(SaveOutcome::Updated(entry)) => {
            info!(entry_id = entry.id, "time entry updated");
            session.flash(Flash::success("Time entry updated."));
            session.redirect(DASHBOARD)
        }
        Ok(SaveOutcome::NotOwned) => {
            session.flash(Flash::danger(NOT_FOUND_OR_FORBIDDEN));
            session.redirect(DASHBOARD)
        }
        Ok(SaveOutcome::ProjectNotAllowed) => {
            session.flash(Flash::danger("Save failed: project is not available to you"));
            session.redirect(&back)
        }
        Err(e) => {
            error!(error = %e, "saving time entry failed");
            session.flash(Flash::danger(format!("Save failed: {e}")));
            session.redirect(&back)
        }
    }
}

// POST /user/delete_entry/{id}
#[instrument(skip(state, session))]
pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut session: Session,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let Ok(id) = raw_id.trim().parse::<i64>() else {
        session.flash(Flash::danger(NOT_FOUND_OR_FORBIDDEN));
        return Ok(session.redirect(DASHBOARD));
    };
    if TimeEntry::delete_owned(&state.db_pool, auth.user_id, id).await? {
        info!(entry_id = id, "time entry deleted");
        session.flash(Flash::success("Time entry deleted."));
    } else {
        session.flash(Flash::danger(NOT_FOUND_OR_FORBIDDEN));
    }
    Ok(session.redirect(DASHBOARD))
}
