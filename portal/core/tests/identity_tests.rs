// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! Identity-layer behavior for subjects the facade does not know about.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::LOCATION;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use uuid::Uuid;

use portal_core::domain::permission::PermissionType;
use portal_core::infrastructure::config::PortalConfig;
use portal_core::infrastructure::facade::types::{
    CompaniesHouseCompany, InvitationRequest, NominationRequest, OrganisationNameUpdate,
    TeamMember, UserAccount,
};
use portal_core::infrastructure::facade::{FacadeError, FacadeService};
use portal_core::infrastructure::session_store::InMemorySessionStore;
use portal_core::presentation::{app, AppState};

/// Facade double that has never heard of anyone.
struct NoAccountFacade;

#[async_trait]
impl FacadeService for NoAccountFacade {
    async fn get_user_account(&self, _: &str) -> Result<Option<UserAccount>, FacadeError> {
        Ok(None)
    }

    async fn get_team_members(&self, _: Uuid) -> Result<Vec<TeamMember>, FacadeError> {
        Ok(Vec::new())
    }

    async fn send_invitation(&self, _: Uuid, _: &InvitationRequest) -> Result<(), FacadeError> {
        Ok(())
    }

    async fn remove_team_member(&self, _: Uuid, _: Uuid) -> Result<(), FacadeError> {
        Ok(())
    }

    async fn update_permission_level(
        &self,
        _: Uuid,
        _: Uuid,
        _: PermissionType,
    ) -> Result<(), FacadeError> {
        Ok(())
    }

    async fn nominate_delegated_person(
        &self,
        _: Uuid,
        _: Uuid,
        _: &NominationRequest,
    ) -> Result<(), FacadeError> {
        Ok(())
    }

    async fn lookup_company(&self, _: &str) -> Result<Option<CompaniesHouseCompany>, FacadeError> {
        Ok(None)
    }

    async fn update_organisation_name(
        &self,
        _: Uuid,
        _: &OrganisationNameUpdate,
    ) -> Result<(), FacadeError> {
        Ok(())
    }
}

#[tokio::test]
async fn unknown_subject_is_sent_to_account_creation() {
    let config = PortalConfig::local();
    let account_creation = config.urls.account_creation.clone();
    let state = AppState::with_parts(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(NoAccountFacade),
        config,
    );
    let router = app(state);

    let response = router
        .oneshot(
            Request::get("/manage-account/manage")
                .header("x-authenticated-user", "nobody@example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(LOCATION).unwrap().to_str().unwrap(),
        account_creation
    );
}
