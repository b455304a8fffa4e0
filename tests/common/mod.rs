#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use timetrack::auth::session::SESSION_COOKIE;
use timetrack::config::AppConfig;
use timetrack::database::connect_in_memory;
use timetrack::routes::build_app;
use timetrack::state::AppState;

pub const ADMIN_PASSWORD: &str = "secret";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("json body")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("utf8 body")
    }
}

pub async fn spawn_state() -> AppState {
    let db = connect_in_memory().await.expect("in-memory database");
    AppState::new(db, AppConfig::for_tests())
}

/// One browser: shares the app, keeps its own session cookie.
#[derive(Clone)]
pub struct Client {
    app: Router,
    pub cookie: Option<String>,
}

impl Client {
    pub fn new(state: &AppState) -> Self {
        Self { app: build_app(state.clone()), cookie: None }
    }

    pub async fn send(&mut self, method: Method, uri: &str, form: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };

        let res = self
            .app
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("infallible");

        for value in res.headers().get_all(header::SET_COOKIE) {
            let value = value.to_str().expect("cookie header");
            if value.starts_with(&format!("{SESSION_COOKIE}=")) {
                let pair = value.split(';').next().unwrap_or_default();
                self.cookie = Some(pair.to_string());
            }
        }

        let status = res.status();
        let headers = res.headers().clone();
        let body = res.into_body().collect().await.expect("body").to_bytes().to_vec();
        TestResponse { status, headers, body }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, form: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(form)).await
    }

    pub async fn login_admin(&mut self) {
        let res = self.post("/admin/login", &format!("password={ADMIN_PASSWORD}")).await;
        assert_eq!(res.status, StatusCode::SEE_OTHER);
        assert_eq!(res.location(), "/admin/dashboard");
    }

    /// Creates a user through the admin form and returns the token from the flash.
    pub async fn create_user(&mut self, name: &str) -> String {
        let res = self.post("/admin/add_user", &format!("name={name}")).await;
        assert_eq!(res.location(), "/admin/dashboard");
        let page = self.get("/admin/dashboard").await.json();
        let message = page["flashes"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|f| f["message"].as_str())
            .find(|m| m.contains("Token: "))
            .expect("token flash")
            .to_string();
        message.rsplit("Token: ").next().unwrap().to_string()
    }

    pub async fn create_project(&mut self, name: &str) -> i64 {
        self.post("/admin/add_project", &format!("name={name}")).await;
        let page = self.get("/admin/dashboard").await.json();
        page["projects"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["name"] == name)
            .and_then(|p| p["id"].as_i64())
            .expect("project id")
    }

    pub async fn user_id(&mut self, name: &str) -> i64 {
        let page = self.get("/admin/dashboard").await.json();
        page["users"]
            .as_array()
            .unwrap()
            .iter()
            .find(|u| u["name"] == name)
            .and_then(|u| u["id"].as_i64())
            .expect("user id")
    }

    pub async fn assign(&mut self, user_id: i64, project_ids: &[i64]) {
        let mut form = format!("action=assign_projects&user_id={user_id}");
        for id in project_ids {
            form.push_str(&format!("&project_ids={id}"));
        }
        let res = self.post("/admin/dashboard", &form).await;
        assert_eq!(res.location(), "/admin/dashboard");
    }

    pub async fn login_user(&mut self, token: &str) {
        let res = self.post("/user/login", &format!("token={token}")).await;
        assert_eq!(res.status, StatusCode::SEE_OTHER);
        assert_eq!(res.location(), "/user/dashboard");
    }

    pub async fn flash_messages(&mut self, uri: &str) -> Vec<String> {
        let page = self.get(uri).await.json();
        page["flashes"]
            .as_array()
            .map(|flashes| {
                flashes
                    .iter()
                    .filter_map(|f| f["message"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
