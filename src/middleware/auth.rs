use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::auth::session::Session;
use crate::error::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// Principal of a request that passed `require_user`.
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user_id: i64,
    pub name: String,
}

/// Marker for requests that passed `require_admin`.
#[derive(Clone, Copy, Debug)]
pub struct AdminContext;

pub async fn require_admin(session: Session, mut req: Request<Body>, next: Next) -> Response {
    if !session.is_admin() {
        tracing::debug!(path = %req.uri().path(), "admin session required");
        return session.redirect("/admin/login");
    }

    req.extensions_mut().insert(AdminContext);
    next.run(req).await
}

pub async fn require_user(
    State(state): State<AppState>,
    mut session: Session,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(user_id) = session.user_id() else {
        return session.redirect("/user/login");
    };

    let user = match User::find(&state.db_pool, user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(user_id, "session refers to a missing user");
            session.set_user_id(None);
            return session.redirect("/user/login");
        }
        Err(e) => return AppError::db(e).into_response(),
    };

    req.extensions_mut().insert(AuthContext {
        user_id: user.id,
        name: user.name,
    });

    next.run(req).await
}
