use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use crate::handlers::user::{dashboard, delete_entry, login, login_page, logout, save_entry};
use crate::middleware::auth::require_user;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let open = Router::new()
        .route("/user/login", get(login_page).post(login))
        .route("/user/logout", get(logout));

    let protected = Router::new()
        .route("/user/dashboard", get(dashboard).post(save_entry))
        .route("/user/delete_entry/{id}", post(delete_entry))
        .route_layer(middleware::from_fn_with_state(state, require_user));

    open.merge(protected)
}
