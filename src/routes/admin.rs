use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use crate::handlers::admin::{
    add_project, add_user, archive_project, dashboard, dashboard_action, login, login_page, logout,
};
use crate::handlers::export::{export_archived_projects_csv, export_csv};
use crate::middleware::auth::require_admin;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let open = Router::new()
        .route("/admin/login", get(login_page).post(login))
        .route("/admin/logout", get(logout));

    let protected = Router::new()
        .route("/admin/dashboard", get(dashboard).post(dashboard_action))
        .route("/admin/add_user", post(add_user))
        .route("/admin/add_project", post(add_project))
        .route("/admin/archive_project/{id}", post(archive_project))
        .route("/admin/export_csv", get(export_csv))
        .route("/admin/export_archived_projects_csv", get(export_archived_projects_csv))
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    open.merge(protected)
}
