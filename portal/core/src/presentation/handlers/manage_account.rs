// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! Manage-account wizard: the landing page, the team-member invitation flow,
//! team-member removal, and sign-out.
//!
//! Every GET records its page token in the journey; every successful POST
//! appends the next step's token before redirecting to it, which is what makes
//! the next page pass the journey-access check.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::{Extension, Form};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::session_manager::JourneySessions;
use crate::domain::permission::PermissionType;
use crate::domain::session::{AccountManagementSession, CompaniesHouseSession, UserData};
use crate::infrastructure::facade::types::TeamMember;
use crate::presentation::error::AppError;
use crate::presentation::forms::{required_email, validation_failed};
use crate::presentation::pages::manage_account::*;
use crate::presentation::pages::{companies_house_url, manage_account_url};
use crate::presentation::AppState;

/// Resolve the claims snapshot the identity layer guarantees is present.
fn user_data(session: &crate::domain::session::JourneySession) -> Result<UserData, AppError> {
    session
        .user_data
        .clone()
        .ok_or_else(|| AppError(anyhow::anyhow!("session has no user data past identity layer")))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageViewModel {
    pub first_name: String,
    pub last_name: String,
    pub organisation_name: Option<String>,
    pub permission: Option<PermissionType>,
    pub is_compliance_scheme: bool,
    pub manage_permissions_enabled: bool,
    pub team_members: Vec<TeamMember>,
    pub update_organisation_name_url: String,
}

/// Landing page. Restarts the manage-account wizard state.
pub async fn manage(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let session = sessions
        .update_session(|s| {
            s.account_management = AccountManagementSession::default();
            s.companies_house = CompaniesHouseSession::default();
            s.account_management.journey.visit(MANAGE);
        })
        .await?;
    let user = user_data(&session)?;

    let team_members = match user.organisation_id {
        Some(organisation_id) => state.facade.get_team_members(organisation_id).await?,
        None => Vec::new(),
    };

    Ok(Json(ManageViewModel {
        first_name: user.first_name,
        last_name: user.last_name,
        organisation_name: user.organisation_name,
        permission: user.permission,
        is_compliance_scheme: session.is_compliance_scheme,
        manage_permissions_enabled: state.config.features.manage_permissions_enabled,
        team_members,
        update_organisation_name_url: companies_house_url(
            crate::presentation::pages::companies_house::SEARCH,
        ),
    })
    .into_response())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberEmailViewModel {
    pub email: Option<String>,
}

pub async fn team_member_email(
    Extension(sessions): Extension<Arc<JourneySessions>>,
) -> Result<Response, AppError> {
    let session = sessions
        .update_session(|s| s.account_management.journey.visit(TEAM_MEMBER_EMAIL))
        .await?;
    Ok(Json(TeamMemberEmailViewModel {
        email: session.account_management.invited_email,
    })
    .into_response())
}

#[derive(Debug, Deserialize)]
pub struct TeamMemberEmailForm {
    #[serde(default)]
    pub email: String,
}

pub async fn submit_team_member_email(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    Form(form): Form<TeamMemberEmailForm>,
) -> Result<Response, AppError> {
    let mut errors = Vec::new();
    let email = required_email("email", &form.email, &mut errors);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    sessions
        .update_session(|s| {
            let journey = &mut s.account_management.journey;
            journey.visit(TEAM_MEMBER_EMAIL);
            journey.visit(TEAM_MEMBER_PERMISSIONS);
            s.account_management.invited_email = Some(email);
        })
        .await?;
    Ok(Redirect::to(&manage_account_url(TEAM_MEMBER_PERMISSIONS)).into_response())
}

/// Permission levels offered when inviting a team member. Approved/delegated
/// roles go through the nomination wizard instead.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvitePermissionChoice {
    Admin,
    Basic,
}

impl From<InvitePermissionChoice> for PermissionType {
    fn from(choice: InvitePermissionChoice) -> Self {
        match choice {
            InvitePermissionChoice::Admin => PermissionType::Admin,
            InvitePermissionChoice::Basic => PermissionType::Basic,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberPermissionsViewModel {
    pub email: String,
    pub selected: Option<PermissionType>,
}

pub async fn team_member_permissions(
    Extension(sessions): Extension<Arc<JourneySessions>>,
) -> Result<Response, AppError> {
    let session = sessions
        .update_session(|s| s.account_management.journey.visit(TEAM_MEMBER_PERMISSIONS))
        .await?;
    let Some(email) = session.account_management.invited_email else {
        return Ok(Redirect::to(&manage_account_url(TEAM_MEMBER_EMAIL)).into_response());
    };
    Ok(Json(TeamMemberPermissionsViewModel {
        email,
        selected: session.account_management.invited_permission,
    })
    .into_response())
}

#[derive(Debug, Deserialize)]
pub struct TeamMemberPermissionsForm {
    pub permission: InvitePermissionChoice,
}

pub async fn submit_team_member_permissions(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    Form(form): Form<TeamMemberPermissionsForm>,
) -> Result<Response, AppError> {
    sessions
        .update_session(|s| {
            let journey = &mut s.account_management.journey;
            journey.visit(TEAM_MEMBER_PERMISSIONS);
            journey.visit(TEAM_MEMBER_DETAILS);
            s.account_management.invited_permission = Some(form.permission.into());
        })
        .await?;
    Ok(Redirect::to(&manage_account_url(TEAM_MEMBER_DETAILS)).into_response())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberDetailsViewModel {
    pub email: String,
    pub permission: PermissionType,
}

/// Check-your-answers page for the invitation.
pub async fn team_member_details(
    Extension(sessions): Extension<Arc<JourneySessions>>,
) -> Result<Response, AppError> {
    let session = sessions
        .update_session(|s| s.account_management.journey.visit(TEAM_MEMBER_DETAILS))
        .await?;
    let account = &session.account_management;
    match (&account.invited_email, account.invited_permission) {
        (Some(email), Some(permission)) => Ok(Json(TeamMemberDetailsViewModel {
            email: email.clone(),
            permission,
        })
        .into_response()),
        _ => Ok(Redirect::to(&manage_account_url(TEAM_MEMBER_EMAIL)).into_response()),
    }
}

/// Final submission: send the invitation through the facade.
pub async fn confirm_team_member_details(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let session = sessions.get_session().await?.unwrap_or_default();
    let user = user_data(&session)?;
    let account = &session.account_management;

    let (Some(email), Some(permission)) = (&account.invited_email, account.invited_permission)
    else {
        return Ok(Redirect::to(&manage_account_url(TEAM_MEMBER_EMAIL)).into_response());
    };
    let Some(organisation_id) = user.organisation_id else {
        return Ok(Redirect::to(&manage_account_url(MANAGE)).into_response());
    };

    state
        .accounts
        .invite_team_member(organisation_id, user.person_id, email, permission)
        .await?;

    sessions
        .update_session(|s| {
            let journey = &mut s.account_management.journey;
            journey.visit(TEAM_MEMBER_DETAILS);
            journey.visit(INVITATION_SENT);
        })
        .await?;
    Ok(Redirect::to(&manage_account_url(INVITATION_SENT)).into_response())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationSentViewModel {
    pub email: Option<String>,
}

pub async fn invitation_sent(
    Extension(sessions): Extension<Arc<JourneySessions>>,
) -> Result<Response, AppError> {
    let session = sessions
        .update_session(|s| s.account_management.journey.visit(INVITATION_SENT))
        .await?;
    Ok(Json(InvitationSentViewModel {
        email: session.account_management.invited_email,
    })
    .into_response())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveTeamMemberViewModel {
    pub person_id: Uuid,
    pub member: Option<TeamMember>,
}

/// Entry page of the removal confirmation, reached from the manage page.
pub async fn remove_team_member(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    State(state): State<Arc<AppState>>,
    Path(person_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = sessions
        .update_session(|s| {
            s.account_management.journey.visit(REMOVE_TEAM_MEMBER);
            s.account_management.removal_target = Some(person_id);
        })
        .await?;
    let user = user_data(&session)?;

    let member = match user.organisation_id {
        Some(organisation_id) => state
            .facade
            .get_team_members(organisation_id)
            .await?
            .into_iter()
            .find(|m| m.person_id == person_id),
        None => None,
    };

    Ok(Json(RemoveTeamMemberViewModel { person_id, member }).into_response())
}

pub async fn confirm_remove_team_member(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let session = sessions.get_session().await?.unwrap_or_default();
    let user = user_data(&session)?;

    let (Some(organisation_id), Some(person_id)) = (
        user.organisation_id,
        session.account_management.removal_target,
    ) else {
        return Ok(Redirect::to(&manage_account_url(MANAGE)).into_response());
    };

    state
        .accounts
        .remove_team_member(organisation_id, person_id)
        .await?;
    sessions
        .update_session(|s| s.account_management.removal_target = None)
        .await?;
    Ok(Redirect::to(&manage_account_url(MANAGE)).into_response())
}

/// Explicit sign-out: drop the server-side session and leave.
pub async fn sign_out(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    sessions.remove_session().await?;
    Ok(Redirect::to(&state.config.urls.signed_out).into_response())
}
