use axum::Json;

use crate::dtos::page::IndexPage;

// GET /
pub async fn index() -> Json<IndexPage> {
    Json(IndexPage {
        name: "timetrack",
        admin_login: "/admin/login",
        user_login: "/user/login",
    })
}

// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
