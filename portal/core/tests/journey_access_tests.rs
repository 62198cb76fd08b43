// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! End-to-end checks of the journey-access rules through the real router:
//! identity layer, session cookie, and redirect behavior.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use portal_core::infrastructure::config::PortalConfig;
use portal_core::infrastructure::facade::mock::MockFacadeService;
use portal_core::infrastructure::session_store::InMemorySessionStore;
use portal_core::presentation::{app, AppState};

const SUBJECT: &str = "sam.porter@example.com";

fn test_app() -> Router {
    let state = AppState::with_parts(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(MockFacadeService::new()),
        PortalConfig::local(),
    );
    app(state)
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    form_body: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-authenticated-user", SUBJECT);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match form_body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    router.clone().oneshot(request).await.unwrap()
}

fn session_cookie(response: &Response) -> String {
    let raw = response
        .headers()
        .get(SET_COOKIE)
        .expect("session cookie should be set")
        .to_str()
        .unwrap();
    raw.split(';').next().unwrap().to_string()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .expect("redirect should carry a location")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn health_needs_no_authentication() {
    let router = test_app();
    let response = router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn requests_without_a_subject_are_rejected() {
    let router = test_app();
    let response = router
        .clone()
        .oneshot(
            Request::get("/manage-account/manage")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn first_request_mints_a_session_cookie() {
    let router = test_app();
    let response = send(&router, Method::GET, "/manage-account/manage", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).starts_with("portal-session="));
}

#[tokio::test]
async fn skipping_ahead_redirects_to_last_visited_page() {
    let router = test_app();
    let manage = send(&router, Method::GET, "/manage-account/manage", None, None).await;
    let cookie = session_cookie(&manage);

    // Journey is ["manage"]: deep-linking two steps ahead bounces to "manage".
    let response = send(
        &router,
        Method::GET,
        "/manage-account/team-member-permissions",
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/manage-account/manage");

    // After visiting the email step the redirect target follows the journey.
    send(
        &router,
        Method::GET,
        "/manage-account/team-member-email",
        Some(&cookie),
        None,
    )
    .await;
    let response = send(
        &router,
        Method::GET,
        "/manage-account/team-member-permissions",
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/manage-account/team-member-email");
}

#[tokio::test]
async fn walking_the_wizard_reaches_each_step() {
    let router = test_app();
    let manage = send(&router, Method::GET, "/manage-account/manage", None, None).await;
    let cookie = session_cookie(&manage);

    send(
        &router,
        Method::GET,
        "/manage-account/team-member-email",
        Some(&cookie),
        None,
    )
    .await;
    let submitted = send(
        &router,
        Method::POST,
        "/manage-account/team-member-email",
        Some(&cookie),
        Some("email=new.member%40example.com"),
    )
    .await;
    assert_eq!(submitted.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&submitted), "/manage-account/team-member-permissions");

    let next = send(
        &router,
        Method::GET,
        "/manage-account/team-member-permissions",
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(next.status(), StatusCode::OK);
}

#[tokio::test]
async fn invalid_email_fails_validation_inline() {
    let router = test_app();
    let manage = send(&router, Method::GET, "/manage-account/manage", None, None).await;
    let cookie = session_cookie(&manage);

    let response = send(
        &router,
        Method::POST,
        "/manage-account/team-member-email",
        Some(&cookie),
        Some("email=not-an-email"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let errors: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(errors["errors"][0]["field"], "email");
}

#[tokio::test]
async fn fresh_permission_journey_redirects_to_its_start_page() {
    let router = test_app();
    let manage = send(&router, Method::GET, "/manage-account/manage", None, None).await;
    let cookie = session_cookie(&manage);
    let id = Uuid::new_v4();

    let response = send(
        &router,
        Method::GET,
        &format!("/manage-permissions/declaration/{id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/manage-permissions/change/{id}"));
}

#[tokio::test]
async fn permission_start_page_is_reachable_without_prior_state() {
    let router = test_app();
    let manage = send(&router, Method::GET, "/manage-account/manage", None, None).await;
    let cookie = session_cookie(&manage);
    let id = Uuid::new_v4();

    let response = send(
        &router,
        Method::GET,
        &format!("/manage-permissions/change/{id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn delegated_choice_walks_the_nomination_wizard() {
    let router = test_app();
    let manage = send(&router, Method::GET, "/manage-account/manage", None, None).await;
    let cookie = session_cookie(&manage);
    let id = Uuid::new_v4();

    send(
        &router,
        Method::GET,
        &format!("/manage-permissions/change/{id}"),
        Some(&cookie),
        None,
    )
    .await;

    // Skipping to the relationship step before choosing is bounced back.
    let early = send(
        &router,
        Method::GET,
        &format!("/manage-permissions/relationship/{id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(early.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&early), format!("/manage-permissions/change/{id}"));

    let chosen = send(
        &router,
        Method::POST,
        &format!("/manage-permissions/change/{id}"),
        Some(&cookie),
        Some("permission=delegated"),
    )
    .await;
    assert_eq!(chosen.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&chosen),
        format!("/manage-permissions/relationship/{id}")
    );

    let relationship = send(
        &router,
        Method::GET,
        &format!("/manage-permissions/relationship/{id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(relationship.status(), StatusCode::OK);
}

#[tokio::test]
async fn two_permission_journeys_do_not_satisfy_each_other() {
    let router = test_app();
    let manage = send(&router, Method::GET, "/manage-account/manage", None, None).await;
    let cookie = session_cookie(&manage);
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    send(
        &router,
        Method::GET,
        &format!("/manage-permissions/change/{first}"),
        Some(&cookie),
        None,
    )
    .await;
    send(
        &router,
        Method::POST,
        &format!("/manage-permissions/change/{first}"),
        Some(&cookie),
        Some("permission=delegated"),
    )
    .await;

    // The first wizard reached "relationship"; the second has no state at all.
    let response = send(
        &router,
        Method::GET,
        &format!("/manage-permissions/relationship/{second}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("/manage-permissions/change/{second}")
    );
}

#[tokio::test]
async fn sign_out_discards_the_session() {
    let router = test_app();
    let manage = send(&router, Method::GET, "/manage-account/manage", None, None).await;
    let cookie = session_cookie(&manage);

    send(
        &router,
        Method::GET,
        "/manage-account/team-member-email",
        Some(&cookie),
        None,
    )
    .await;
    let signed_out = send(
        &router,
        Method::POST,
        "/manage-account/sign-out",
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(signed_out.status(), StatusCode::SEE_OTHER);

    // The old cookie now maps to an empty session: the wizard starts over.
    let response = send(
        &router,
        Method::GET,
        "/manage-account/team-member-permissions",
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/manage-account/manage");
}
