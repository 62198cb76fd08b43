// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! # Facade API Client Seam
//!
//! The portal carries no business data of its own; every read and write is
//! proxied to the downstream facade REST API. [`FacadeService`] is the seam:
//! the HTTP implementation lives in [`client`], and [`mock`] provides canned
//! data for local development.
//!
//! Error handling is deliberately flat (no structured taxonomy): expected
//! not-found responses surface as `Ok(None)`, everything else unexpected is a
//! [`FacadeError`] that bubbles up to the generic error response.

pub mod client;
pub mod mock;
pub mod types;

use async_trait::async_trait;
use reqwest::StatusCode;
use uuid::Uuid;

use crate::domain::permission::PermissionType;
use self::types::{
    CompaniesHouseCompany, InvitationRequest, NominationRequest, OrganisationNameUpdate,
    TeamMember, UserAccount,
};

/// Failures talking to the facade API.
#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    #[error("facade rejected the request as unauthorized")]
    Unauthorized,

    #[error("facade returned unexpected status {0}")]
    Unexpected(StatusCode),

    #[error("facade transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("facade token acquisition failed: {0}")]
    Token(String),
}

/// Typed surface of the downstream facade API.
#[async_trait]
pub trait FacadeService: Send + Sync {
    /// Look up the account for an authenticated subject. `None` when the user
    /// has not yet created a portal account.
    async fn get_user_account(&self, subject_email: &str) -> Result<Option<UserAccount>, FacadeError>;

    /// List the members of the organisation's team.
    async fn get_team_members(&self, organisation_id: Uuid) -> Result<Vec<TeamMember>, FacadeError>;

    /// Invite a new team member at the given permission level.
    async fn send_invitation(
        &self,
        organisation_id: Uuid,
        request: &InvitationRequest,
    ) -> Result<(), FacadeError>;

    /// Remove a person from the organisation.
    async fn remove_team_member(
        &self,
        organisation_id: Uuid,
        person_id: Uuid,
    ) -> Result<(), FacadeError>;

    /// Change a team member's permission level directly (Admin/Basic).
    async fn update_permission_level(
        &self,
        organisation_id: Uuid,
        person_id: Uuid,
        permission: PermissionType,
    ) -> Result<(), FacadeError>;

    /// Nominate a team member as a delegated person.
    async fn nominate_delegated_person(
        &self,
        organisation_id: Uuid,
        person_id: Uuid,
        request: &NominationRequest,
    ) -> Result<(), FacadeError>;

    /// Look up a company by its companies-house number. `None` when the number
    /// is not registered.
    async fn lookup_company(
        &self,
        company_number: &str,
    ) -> Result<Option<CompaniesHouseCompany>, FacadeError>;

    /// Update the organisation's registered name.
    async fn update_organisation_name(
        &self,
        organisation_id: Uuid,
        update: &OrganisationNameUpdate,
    ) -> Result<(), FacadeError>;
}
