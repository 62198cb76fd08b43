// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! Permission-delegation wizard. Every route is keyed by the GUID of the team
//! member whose permissions are being changed, and each delegation request
//! accumulates its answers in its own session item with an independent journey.
//!
//! Choosing Admin or Basic applies immediately through the facade; choosing
//! Delegated walks the nomination wizard (relationship, job title or
//! organisation name, declaration) before submitting the nomination.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::{Extension, Form};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::session_manager::JourneySessions;
use crate::domain::permission::PermissionType;
use crate::domain::session::{JourneySession, RelationshipWithOrganisation, UserData};
use crate::presentation::error::AppError;
use crate::presentation::forms::{required_text, validation_failed, MAX_TEXT_LENGTH};
use crate::presentation::pages::manage_permissions::*;
use crate::presentation::pages::{manage_account_url, permission_token, permissions_url};
use crate::presentation::AppState;

fn user_data(session: &JourneySession) -> Result<UserData, AppError> {
    session
        .user_data
        .clone()
        .ok_or_else(|| AppError(anyhow::anyhow!("session has no user data past identity layer")))
}

fn organisation_id(user: &UserData) -> Result<Uuid, Response> {
    user.organisation_id.ok_or_else(|| {
        Redirect::to(&manage_account_url(
            crate::presentation::pages::manage_account::MANAGE,
        ))
        .into_response()
    })
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangePermissionChoice {
    Admin,
    Basic,
    Delegated,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePermissionViewModel {
    pub id: Uuid,
    pub selected: Option<PermissionType>,
}

/// Wizard entry. Resets any previous journey for this id so the flow restarts.
pub async fn change(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    if !state.config.features.manage_permissions_enabled {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let session = sessions
        .update_session(|s| {
            let item = s.permission_management.item_or_create(id);
            item.journey.reset();
            item.journey.visit(&permission_token(CHANGE, id));
        })
        .await?;
    let selected = session
        .permission_management
        .item(id)
        .and_then(|item| item.selected_permission);

    Ok(Json(ChangePermissionViewModel { id, selected }).into_response())
}

#[derive(Debug, Deserialize)]
pub struct ChangePermissionForm {
    pub permission: ChangePermissionChoice,
}

pub async fn submit_change(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Form(form): Form<ChangePermissionForm>,
) -> Result<Response, AppError> {
    if !state.config.features.manage_permissions_enabled {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    match form.permission {
        ChangePermissionChoice::Delegated => {
            sessions
                .update_session(|s| {
                    let item = s.permission_management.item_or_create(id);
                    item.selected_permission = Some(PermissionType::Delegated);
                    item.journey.visit(&permission_token(CHANGE, id));
                    item.journey.visit(&permission_token(RELATIONSHIP, id));
                })
                .await?;
            Ok(Redirect::to(&permissions_url(RELATIONSHIP, id)).into_response())
        }
        choice => {
            let permission = match choice {
                ChangePermissionChoice::Admin => PermissionType::Admin,
                _ => PermissionType::Basic,
            };
            let session = sessions.get_session().await?.unwrap_or_default();
            let user = user_data(&session)?;
            let organisation_id = match organisation_id(&user) {
                Ok(id) => id,
                Err(redirect) => return Ok(redirect),
            };

            state
                .accounts
                .update_permission_level(organisation_id, id, permission)
                .await?;
            sessions
                .update_session(|s| {
                    let item = s.permission_management.item_or_create(id);
                    item.selected_permission = Some(permission);
                    item.journey.visit(&permission_token(CHANGE, id));
                    item.journey.visit(&permission_token(CONFIRMATION, id));
                })
                .await?;
            Ok(Redirect::to(&permissions_url(CONFIRMATION, id)).into_response())
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipChoice {
    Employment,
    Consultancy,
    ComplianceScheme,
}

impl From<RelationshipChoice> for RelationshipWithOrganisation {
    fn from(choice: RelationshipChoice) -> Self {
        match choice {
            RelationshipChoice::Employment => Self::Employment,
            RelationshipChoice::Consultancy => Self::Consultancy,
            RelationshipChoice::ComplianceScheme => Self::ComplianceScheme,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipViewModel {
    pub id: Uuid,
    pub selected: Option<RelationshipWithOrganisation>,
}

pub async fn relationship(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = sessions
        .update_session(|s| {
            if let Some(item) = s.permission_management.item_mut(id) {
                item.journey.visit(&permission_token(RELATIONSHIP, id));
            }
        })
        .await?;
    let selected = session
        .permission_management
        .item(id)
        .and_then(|item| item.relationship);
    Ok(Json(RelationshipViewModel { id, selected }).into_response())
}

#[derive(Debug, Deserialize)]
pub struct RelationshipForm {
    pub relationship: RelationshipChoice,
}

pub async fn submit_relationship(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    Path(id): Path<Uuid>,
    Form(form): Form<RelationshipForm>,
) -> Result<Response, AppError> {
    let relationship: RelationshipWithOrganisation = form.relationship.into();
    let next = match relationship {
        RelationshipWithOrganisation::Employment => JOB_TITLE,
        _ => ORGANISATION,
    };

    sessions
        .update_session(|s| {
            if let Some(item) = s.permission_management.item_mut(id) {
                item.relationship = Some(relationship);
                item.journey.visit(&permission_token(RELATIONSHIP, id));
                item.journey.visit(&permission_token(next, id));
            }
        })
        .await?;
    Ok(Redirect::to(&permissions_url(next, id)).into_response())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTitleViewModel {
    pub id: Uuid,
    pub job_title: Option<String>,
}

pub async fn job_title(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = sessions
        .update_session(|s| {
            if let Some(item) = s.permission_management.item_mut(id) {
                item.journey.visit(&permission_token(JOB_TITLE, id));
            }
        })
        .await?;
    let job_title = session
        .permission_management
        .item(id)
        .and_then(|item| item.job_title.clone());
    Ok(Json(JobTitleViewModel { id, job_title }).into_response())
}

#[derive(Debug, Deserialize)]
pub struct JobTitleForm {
    #[serde(default)]
    pub job_title: String,
}

pub async fn submit_job_title(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    Path(id): Path<Uuid>,
    Form(form): Form<JobTitleForm>,
) -> Result<Response, AppError> {
    let mut errors = Vec::new();
    let job_title = required_text("jobTitle", &form.job_title, MAX_TEXT_LENGTH, &mut errors);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    sessions
        .update_session(|s| {
            if let Some(item) = s.permission_management.item_mut(id) {
                item.job_title = Some(job_title);
                item.journey.visit(&permission_token(JOB_TITLE, id));
                item.journey.visit(&permission_token(DECLARATION, id));
            }
        })
        .await?;
    Ok(Redirect::to(&permissions_url(DECLARATION, id)).into_response())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationNameViewModel {
    pub id: Uuid,
    pub relationship: Option<RelationshipWithOrganisation>,
    pub organisation_name: Option<String>,
}

/// Name of the consultancy or compliance scheme, depending on the recorded
/// relationship.
pub async fn organisation(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = sessions
        .update_session(|s| {
            if let Some(item) = s.permission_management.item_mut(id) {
                item.journey.visit(&permission_token(ORGANISATION, id));
            }
        })
        .await?;
    let item = session.permission_management.item(id);
    let relationship = item.and_then(|i| i.relationship);
    let organisation_name = item.and_then(|i| match relationship {
        Some(RelationshipWithOrganisation::ComplianceScheme) => i.compliance_scheme_name.clone(),
        _ => i.consultancy_name.clone(),
    });
    Ok(Json(OrganisationNameViewModel {
        id,
        relationship,
        organisation_name,
    })
    .into_response())
}

#[derive(Debug, Deserialize)]
pub struct OrganisationNameForm {
    #[serde(default)]
    pub organisation_name: String,
}

pub async fn submit_organisation(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    Path(id): Path<Uuid>,
    Form(form): Form<OrganisationNameForm>,
) -> Result<Response, AppError> {
    let mut errors = Vec::new();
    let name = required_text(
        "organisationName",
        &form.organisation_name,
        MAX_TEXT_LENGTH,
        &mut errors,
    );
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    sessions
        .update_session(|s| {
            if let Some(item) = s.permission_management.item_mut(id) {
                match item.relationship {
                    Some(RelationshipWithOrganisation::ComplianceScheme) => {
                        item.compliance_scheme_name = Some(name)
                    }
                    _ => item.consultancy_name = Some(name),
                }
                item.journey.visit(&permission_token(ORGANISATION, id));
                item.journey.visit(&permission_token(DECLARATION, id));
            }
        })
        .await?;
    Ok(Redirect::to(&permissions_url(DECLARATION, id)).into_response())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationViewModel {
    pub id: Uuid,
    pub relationship: Option<RelationshipWithOrganisation>,
    pub job_title: Option<String>,
    pub consultancy_name: Option<String>,
    pub compliance_scheme_name: Option<String>,
}

pub async fn declaration(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = sessions
        .update_session(|s| {
            if let Some(item) = s.permission_management.item_mut(id) {
                item.journey.visit(&permission_token(DECLARATION, id));
            }
        })
        .await?;
    let item = session.permission_management.item(id);
    Ok(Json(DeclarationViewModel {
        id,
        relationship: item.and_then(|i| i.relationship),
        job_title: item.and_then(|i| i.job_title.clone()),
        consultancy_name: item.and_then(|i| i.consultancy_name.clone()),
        compliance_scheme_name: item.and_then(|i| i.compliance_scheme_name.clone()),
    })
    .into_response())
}

#[derive(Debug, Deserialize)]
pub struct DeclarationForm {
    #[serde(default)]
    pub full_name: String,
}

/// Final submission: record the declaration and nominate through the facade.
pub async fn submit_declaration(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Form(form): Form<DeclarationForm>,
) -> Result<Response, AppError> {
    let mut errors = Vec::new();
    let full_name = required_text("fullName", &form.full_name, MAX_TEXT_LENGTH, &mut errors);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    let session = sessions
        .update_session(|s| {
            if let Some(item) = s.permission_management.item_mut(id) {
                item.nominee_full_name = Some(full_name);
            }
        })
        .await?;
    let user = user_data(&session)?;
    let organisation_id = match organisation_id(&user) {
        Ok(org_id) => org_id,
        Err(redirect) => return Ok(redirect),
    };
    let Some(item) = session.permission_management.item(id) else {
        return Ok(Redirect::to(&permissions_url(CHANGE, id)).into_response());
    };

    state
        .accounts
        .nominate_delegated_person(organisation_id, item)
        .await?;

    sessions
        .update_session(|s| {
            if let Some(item) = s.permission_management.item_mut(id) {
                item.journey.visit(&permission_token(DECLARATION, id));
                item.journey.visit(&permission_token(CONFIRMATION, id));
            }
        })
        .await?;
    Ok(Redirect::to(&permissions_url(CONFIRMATION, id)).into_response())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationViewModel {
    pub id: Uuid,
    pub permission: Option<PermissionType>,
}

pub async fn confirmation(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = sessions
        .update_session(|s| {
            if let Some(item) = s.permission_management.item_mut(id) {
                item.journey.visit(&permission_token(CONFIRMATION, id));
            }
        })
        .await?;
    let permission = session
        .permission_management
        .item(id)
        .and_then(|item| item.selected_permission);
    Ok(Json(ConfirmationViewModel { id, permission }).into_response())
}
