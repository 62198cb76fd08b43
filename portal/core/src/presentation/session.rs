// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! Identity and session plumbing applied to every portal route.
//!
//! Authentication itself happens upstream (an external identity-provider
//! integration fronts this service); by the time a request arrives here the
//! authenticated subject is carried in a trusted header. This layer:
//!
//! 1. rejects requests with no authenticated subject,
//! 2. binds (or mints) the session cookie and builds the per-request
//!    [`SessionManager`] handle,
//! 3. refreshes the cached user-data claims from the facade when the session
//!    has none, redirecting subjects without a portal account to the external
//!    account-creation URL,
//! 4. exposes [`Principal`] and the session handle to handlers through request
//!    extensions.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Redirect, Response};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::session_manager::{JourneySessions, SessionManager, JOURNEY_SESSION_KEY};
use crate::presentation::error::{AppError, ErrorResponse};
use crate::presentation::AppState;

/// Header the upstream authentication proxy sets to the verified subject.
pub const AUTH_SUBJECT_HEADER: &str = "x-authenticated-user";

/// The authenticated subject for the current request.
#[derive(Debug, Clone)]
pub struct Principal {
    pub email: String,
}

/// Parse the session id out of the request's cookie header, if present.
pub fn session_id_from_cookies(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == cookie_name {
            Uuid::parse_str(value.trim()).ok()
        } else {
            None
        }
    })
}

fn session_cookie(cookie_name: &str, session_id: Uuid) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{cookie_name}={session_id}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .ok()
}

/// Middleware wrapping every portal route (not the health endpoint).
pub async fn identity_and_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(subject) = request
        .headers()
        .get(AUTH_SUBJECT_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
    else {
        warn!("request without authenticated subject header");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                code: "unauthenticated",
                message: "Sign in to use this service",
            }),
        )
            .into_response();
    };

    let cookie_name = &state.config.session.cookie_name;
    let existing_id = session_id_from_cookies(request.headers(), cookie_name);
    let session_id = existing_id.unwrap_or_else(Uuid::new_v4);
    let minted = existing_id.is_none();

    let sessions: Arc<JourneySessions> = Arc::new(SessionManager::new(
        state.store.clone(),
        session_id,
        JOURNEY_SESSION_KEY,
        state.config.session.idle_timeout(),
    ));

    // Refresh the cached identity claims when the session carries none.
    let response = match ensure_user_data(&state, &sessions, &subject).await {
        Ok(true) => {
            request.extensions_mut().insert(Principal { email: subject });
            request.extensions_mut().insert(sessions);
            next.run(request).await
        }
        Ok(false) => {
            debug!(subject = %subject, "subject has no portal account, redirecting");
            Redirect::to(&state.config.urls.account_creation).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    };

    attach_cookie(response, minted, cookie_name, session_id)
}

/// Returns whether the session now carries user-data claims.
async fn ensure_user_data(
    state: &AppState,
    sessions: &JourneySessions,
    subject: &str,
) -> anyhow::Result<bool> {
    let session = sessions.get_session().await?;
    if session.as_ref().is_some_and(|s| s.user_data.is_some()) {
        return Ok(true);
    }

    match state.accounts.resolve_user_data(subject).await? {
        Some((user_data, is_compliance_scheme)) => {
            sessions
                .update_session(|s| {
                    s.user_data = Some(user_data.clone());
                    s.is_compliance_scheme = is_compliance_scheme;
                })
                .await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn attach_cookie(
    mut response: Response,
    minted: bool,
    cookie_name: &str,
    session_id: Uuid,
) -> Response {
    if minted {
        if let Some(value) = session_cookie(cookie_name, session_id) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}
