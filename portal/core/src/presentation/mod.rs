// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! HTTP surface of the portal: route tree, shared state, middleware, and
//! handlers. Handlers return the JSON view models the rendered pages consume,
//! plus the redirects that drive the wizard flows.

pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod session;

use std::sync::Arc;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, MethodRouter};
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::application::account_service::AccountService;
use crate::infrastructure::config::PortalConfig;
use crate::infrastructure::facade::client::HttpFacadeService;
use crate::infrastructure::facade::mock::MockFacadeService;
use crate::infrastructure::facade::FacadeService;
use crate::infrastructure::session_store::{InMemorySessionStore, SessionStore};
use self::middleware::{journey_access, JourneyAccess};
use self::pages::{manage_account as ma_pages, manage_permissions as mp_pages};
use self::session::identity_and_session;

pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub facade: Arc<dyn FacadeService>,
    pub accounts: AccountService,
    pub config: Arc<PortalConfig>,
}

impl AppState {
    /// Wire up state from configuration, honoring the mock-facade flag.
    pub fn build(config: PortalConfig) -> anyhow::Result<Arc<Self>> {
        let facade: Arc<dyn FacadeService> = if config.features.use_mock_facade {
            Arc::new(MockFacadeService::new())
        } else {
            Arc::new(HttpFacadeService::new(config.facade.clone())?)
        };
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        Ok(Self::with_parts(store, facade, config))
    }

    /// Assemble state from explicit parts. Used by tests to inject doubles.
    pub fn with_parts(
        store: Arc<dyn SessionStore>,
        facade: Arc<dyn FacadeService>,
        config: PortalConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            accounts: AccountService::new(facade.clone()),
            facade,
            config: Arc::new(config),
        })
    }
}

/// Attach journey-access metadata and its enforcement to one route.
fn protected(
    route: MethodRouter<Arc<AppState>>,
    access: JourneyAccess,
) -> MethodRouter<Arc<AppState>> {
    // The extension layer is outermost so the enforcement middleware can read it.
    route
        .layer::<_, std::convert::Infallible>(from_fn(journey_access))
        .layer(Extension(access))
}

/// Build the portal router.
pub fn app(state: Arc<AppState>) -> Router {
    use self::handlers::{companies_house, manage_account, manage_permissions};

    let manage_account_routes = Router::new()
        .route("/manage", get(manage_account::manage))
        .route(
            "/team-member-email",
            get(manage_account::team_member_email).post(manage_account::submit_team_member_email),
        )
        .route(
            "/team-member-permissions",
            protected(
                get(manage_account::team_member_permissions)
                    .post(manage_account::submit_team_member_permissions),
                JourneyAccess::manage_account(ma_pages::TEAM_MEMBER_PERMISSIONS),
            ),
        )
        .route(
            "/team-member-details",
            protected(
                get(manage_account::team_member_details)
                    .post(manage_account::confirm_team_member_details),
                JourneyAccess::manage_account(ma_pages::TEAM_MEMBER_DETAILS),
            ),
        )
        .route(
            "/invitation-sent",
            protected(
                get(manage_account::invitation_sent),
                JourneyAccess::manage_account(ma_pages::INVITATION_SENT),
            ),
        )
        .route(
            "/remove-team-member/{person_id}",
            get(manage_account::remove_team_member),
        )
        .route(
            "/remove-team-member",
            protected(
                post(manage_account::confirm_remove_team_member),
                JourneyAccess::manage_account(ma_pages::REMOVE_TEAM_MEMBER),
            ),
        )
        .route("/sign-out", post(manage_account::sign_out));

    let manage_permissions_routes = Router::new()
        .route(
            "/change/{id}",
            protected(
                get(manage_permissions::change).post(manage_permissions::submit_change),
                JourneyAccess::permissions_start(mp_pages::CHANGE),
            ),
        )
        .route(
            "/relationship/{id}",
            protected(
                get(manage_permissions::relationship)
                    .post(manage_permissions::submit_relationship),
                JourneyAccess::permissions(mp_pages::RELATIONSHIP),
            ),
        )
        .route(
            "/job-title/{id}",
            protected(
                get(manage_permissions::job_title).post(manage_permissions::submit_job_title),
                JourneyAccess::permissions(mp_pages::JOB_TITLE),
            ),
        )
        .route(
            "/organisation/{id}",
            protected(
                get(manage_permissions::organisation)
                    .post(manage_permissions::submit_organisation),
                JourneyAccess::permissions(mp_pages::ORGANISATION),
            ),
        )
        .route(
            "/declaration/{id}",
            protected(
                get(manage_permissions::declaration)
                    .post(manage_permissions::submit_declaration),
                JourneyAccess::permissions(mp_pages::DECLARATION),
            ),
        )
        .route(
            "/confirmation/{id}",
            protected(
                get(manage_permissions::confirmation),
                JourneyAccess::permissions(mp_pages::CONFIRMATION),
            ),
        );

    let companies_house_routes = Router::new()
        .route(
            "/search",
            get(companies_house::search).post(companies_house::submit_search),
        )
        .route(
            "/confirm",
            get(companies_house::confirm).post(companies_house::submit_confirm),
        );

    let protected_tree = Router::new()
        .nest(pages::MANAGE_ACCOUNT_BASE, manage_account_routes)
        .nest(pages::MANAGE_PERMISSIONS_BASE, manage_permissions_routes)
        .nest(pages::COMPANIES_HOUSE_BASE, companies_house_routes)
        .layer(from_fn_with_state(state.clone(), identity_and_session));

    Router::new()
        .merge(protected_tree)
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
