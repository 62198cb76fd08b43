// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! Organisation-name change backed by companies-house lookups: search for the
//! company number, confirm the registered details, submit the new name.
//!
//! This flow guards its confirm step on the looked-up company being present in
//! the session rather than through the journey-access middleware; the sub-flow
//! has only one gate and the company snapshot is the state that matters.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::{Extension, Form};
use serde::{Deserialize, Serialize};

use crate::application::session_manager::JourneySessions;
use crate::domain::session::CompanySnapshot;
use crate::presentation::error::AppError;
use crate::presentation::forms::{required_company_number, validation_failed, FieldError};
use crate::presentation::pages::companies_house::*;
use crate::presentation::pages::{companies_house_url, manage_account_url};
use crate::presentation::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchViewModel {
    pub company_number: Option<String>,
}

pub async fn search(
    Extension(sessions): Extension<Arc<JourneySessions>>,
) -> Result<Response, AppError> {
    let session = sessions
        .update_session(|s| {
            s.companies_house.journey.reset();
            s.companies_house.journey.visit(SEARCH);
        })
        .await?;
    Ok(Json(SearchViewModel {
        company_number: session
            .companies_house
            .company
            .map(|company| company.company_number),
    })
    .into_response())
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub company_number: String,
}

pub async fn submit_search(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Result<Response, AppError> {
    let mut errors = Vec::new();
    let company_number = required_company_number("companyNumber", &form.company_number, &mut errors);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    // 404 from the facade is the expected "no such company" outcome.
    let Some(company) = state.facade.lookup_company(&company_number).await? else {
        return Ok(validation_failed(vec![FieldError::new(
            "companyNumber",
            "No company found for that registration number",
        )]));
    };

    let snapshot = CompanySnapshot {
        name: company.name,
        company_number: company.company_number,
        address_lines: company.registered_office.lines(),
    };
    sessions
        .update_session(|s| {
            s.companies_house.company = Some(snapshot);
            s.companies_house.journey.visit(SEARCH);
            s.companies_house.journey.visit(CONFIRM);
        })
        .await?;
    Ok(Redirect::to(&companies_house_url(CONFIRM)).into_response())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmViewModel {
    pub company: CompanySnapshot,
}

pub async fn confirm(
    Extension(sessions): Extension<Arc<JourneySessions>>,
) -> Result<Response, AppError> {
    let session = sessions.get_session().await?.unwrap_or_default();
    let Some(company) = session.companies_house.company else {
        return Ok(Redirect::to(&companies_house_url(SEARCH)).into_response());
    };
    Ok(Json(ConfirmViewModel { company }).into_response())
}

/// Apply the looked-up registered name to the organisation.
pub async fn submit_confirm(
    Extension(sessions): Extension<Arc<JourneySessions>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let session = sessions.get_session().await?.unwrap_or_default();
    let Some(company) = session.companies_house.company else {
        return Ok(Redirect::to(&companies_house_url(SEARCH)).into_response());
    };
    let Some(organisation_id) = session
        .user_data
        .as_ref()
        .and_then(|user| user.organisation_id)
    else {
        return Ok(Redirect::to(&manage_account_url(
            crate::presentation::pages::manage_account::MANAGE,
        ))
        .into_response());
    };

    state
        .accounts
        .update_organisation_name(organisation_id, &company.name, &company.company_number)
        .await?;

    sessions
        .update_session(|s| {
            if let Some(user) = s.user_data.as_mut() {
                user.organisation_name = Some(company.name.clone());
            }
            s.companies_house = Default::default();
        })
        .await?;
    Ok(Redirect::to(&manage_account_url(
        crate::presentation::pages::manage_account::MANAGE,
    ))
    .into_response())
}
