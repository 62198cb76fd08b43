// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! # Journey Access Middleware
//!
//! The enforcement point for the wizard state machine: a page carrying
//! [`JourneyAccess`] metadata is reachable only if its path token is already in
//! the relevant journey log. Users who deep-link or skip ahead are redirected
//! to the step they should be on.
//!
//! ```text
//! request → identity/session layer → JourneyAccess extension → journey_access
//!             └─ ManageAccount        → account_management.journey
//!             └─ ManagePermissions*   → session item keyed by the route GUID
//! ```
//!
//! All membership checks are exact string equality on whole tokens; permission
//! journeys log `"{page}/{id}"` tokens so two concurrent delegation wizards
//! never satisfy each other's checks.

use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;
use uuid::Uuid;

use crate::application::session_manager::JourneySessions;
use crate::domain::journey::{check_access, AccessDecision, JourneyType};
use crate::domain::session::JourneySession;
use crate::presentation::error::AppError;
use crate::presentation::pages;

/// Per-route metadata naming the journey a page belongs to. The Rust analog of
/// an endpoint attribute: attached with a route-level `Extension` layer.
#[derive(Debug, Clone)]
pub struct JourneyAccess {
    pub journey_type: JourneyType,
    pub page: &'static str,
}

impl JourneyAccess {
    pub fn manage_account(page: &'static str) -> Self {
        Self {
            journey_type: JourneyType::ManageAccount,
            page,
        }
    }

    pub fn permissions(page: &'static str) -> Self {
        Self {
            journey_type: JourneyType::ManagePermissions,
            page,
        }
    }

    pub fn permissions_start(page: &'static str) -> Self {
        Self {
            journey_type: JourneyType::ManagePermissionsStart,
            page,
        }
    }
}

/// Route-bound GUID for permission journeys: the trailing path segment.
fn route_id(request: &Request) -> Option<Uuid> {
    let last = request.uri().path().trim_end_matches('/').rsplit('/').next()?;
    Uuid::parse_str(last).ok()
}

pub async fn journey_access(request: Request, next: Next) -> Response {
    // No metadata on the endpoint: pass through.
    let Some(access) = request.extensions().get::<JourneyAccess>().cloned() else {
        return next.run(request).await;
    };
    let Some(sessions) = request.extensions().get::<Arc<JourneySessions>>().cloned() else {
        return next.run(request).await;
    };

    let session = match sessions.get_session().await {
        Ok(session) => session.unwrap_or_default(),
        Err(err) => return AppError::from(err).into_response(),
    };

    match access.journey_type {
        JourneyType::ManageAccount => check_manage_account(&session, &access, request, next).await,
        JourneyType::ManagePermissionsStart | JourneyType::ManagePermissions => {
            check_manage_permissions(&session, &access, request, next).await
        }
    }
}

async fn check_manage_account(
    session: &JourneySession,
    access: &JourneyAccess,
    request: Request,
    next: Next,
) -> Response {
    let journey = &session.account_management.journey;
    match check_access(journey, access.page, pages::manage_account::MANAGE) {
        AccessDecision::Allow => next.run(request).await,
        AccessDecision::RedirectTo(page) => {
            debug!(requested = access.page, redirect = %page, "journey access denied");
            Redirect::to(&pages::manage_account_url(&page)).into_response()
        }
    }
}

async fn check_manage_permissions(
    session: &JourneySession,
    access: &JourneyAccess,
    request: Request,
    next: Next,
) -> Response {
    // Permission journeys require a route-bound GUID before anything else.
    let Some(id) = route_id(&request) else {
        return Redirect::to(&pages::manage_account_url(pages::manage_account::MANAGE))
            .into_response();
    };

    // Start pages are reachable unconditionally once an id is present.
    if access.journey_type == JourneyType::ManagePermissionsStart {
        return next.run(request).await;
    }

    let first_page = pages::permissions_url(pages::manage_permissions::CHANGE, id);
    let Some(item) = session.permission_management.item(id) else {
        return Redirect::to(&first_page).into_response();
    };
    if item.journey.is_empty() {
        return Redirect::to(&first_page).into_response();
    }

    let token = pages::permission_token(access.page, id);
    if item.journey.contains(&token) {
        return next.run(request).await;
    }
    match item.journey.last() {
        Some(last) => {
            debug!(requested = %token, redirect = %last, "permission journey access denied");
            Redirect::to(&format!("{}/{last}", pages::MANAGE_PERMISSIONS_BASE)).into_response()
        }
        None => Redirect::to(&first_page).into_response(),
    }
}
