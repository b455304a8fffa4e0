//! Cookie backed session: who is logged in plus pending flash messages.
//!
//! The whole session lives client side in one signed cookie. Handlers take a
//! [`Session`] as an extractor, mutate it, and hand it back as part of the
//! response so the cookie is re-issued.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, IntoResponseParts, Redirect, Response, ResponseParts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{sign_token, verify_token, SessionKeys};
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "timetrack_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashCategory {
    Success,
    Info,
    Danger,
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self { category: FlashCategory::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { category: FlashCategory::Info, message: message.into() }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self { category: FlashCategory::Danger, message: message.into() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub flashes: Vec<Flash>,
}

pub struct Session {
    data: SessionData,
    keys: SessionKeys,
    ttl_hours: i64,
}

impl Session {
    pub fn new(data: SessionData, keys: SessionKeys, ttl_hours: i64) -> Self {
        Self { data, keys, ttl_hours }
    }

    pub fn is_admin(&self) -> bool {
        self.data.admin
    }

    pub fn set_admin(&mut self, admin: bool) {
        self.data.admin = admin;
    }

    pub fn user_id(&self) -> Option<i64> {
        self.data.user_id
    }

    pub fn set_user_id(&mut self, user_id: Option<i64>) {
        self.data.user_id = user_id;
    }

    pub fn flash(&mut self, flash: Flash) {
        self.data.flashes.push(flash);
    }

    /// Drains pending flashes; call this when rendering a page.
    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.data.flashes)
    }

    /// 303 redirect that re-issues the session cookie.
    pub fn redirect(self, to: &str) -> Response {
        (self, Redirect::to(to)).into_response()
    }

    fn cookie(&self) -> Option<Cookie<'static>> {
        match sign_token(&self.data, &self.keys, self.ttl_hours) {
            Ok(token) => Some(
                Cookie::build((SESSION_COOKIE, token))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .build(),
            ),
            Err(e) => {
                tracing::error!(error = %e, "could not write session cookie");
                None
            }
        }
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let data = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| match verify_token(cookie.value(), &state.session_keys) {
                Ok(data) => Some(data),
                Err(e) => {
                    tracing::debug!(error = %e, "ignoring invalid session cookie");
                    None
                }
            })
            .unwrap_or_default();

        Ok(Session::new(
            data,
            state.session_keys.clone(),
            state.config.session_ttl_hours,
        ))
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let jar = match self.cookie() {
            Some(cookie) => CookieJar::new().add(cookie),
            None => CookieJar::new(),
        };
        jar.into_response_parts(res)
    }
}
