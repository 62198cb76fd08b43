// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! Resolves identity claims from the facade and submits completed wizard
//! outcomes back to it. Holds no state of its own; the session carries the
//! partial form data until the final submission.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::permission::{derive_permission, PermissionType};
use crate::domain::session::{PermissionManagementSessionItem, UserData};
use crate::infrastructure::facade::types::{
    InvitationRequest, NominationRequest, OrganisationNameUpdate,
};
use crate::infrastructure::facade::{FacadeError, FacadeService};

/// Inputs the declaration step must have accumulated before a nomination can be
/// submitted.
#[derive(Debug, thiserror::Error)]
pub enum NominationError {
    #[error("no relationship with the organisation was recorded")]
    MissingRelationship,
    #[error("no nominee declaration full name was recorded")]
    MissingDeclaration,
    #[error(transparent)]
    Facade(#[from] FacadeError),
}

#[derive(Clone)]
pub struct AccountService {
    facade: Arc<dyn FacadeService>,
}

impl AccountService {
    pub fn new(facade: Arc<dyn FacadeService>) -> Self {
        Self { facade }
    }

    /// Build the [`UserData`] claims snapshot for an authenticated subject.
    ///
    /// Returns `None` when the subject has no facade account at all; a user
    /// whose enrolments confer no permission still gets a snapshot, with
    /// `permission: None`.
    pub async fn resolve_user_data(
        &self,
        subject_email: &str,
    ) -> Result<Option<(UserData, bool)>, FacadeError> {
        let Some(account) = self.facade.get_user_account(subject_email).await? else {
            debug!(subject = %subject_email, "no facade account for subject");
            return Ok(None);
        };

        let organisation = account.organisations.first();
        let derived = organisation.and_then(|org| {
            derive_permission(org.person_id, org.person_role, &org.enrolments)
        });

        let user_data = UserData {
            id: account.id,
            person_id: organisation.map(|org| org.person_id).unwrap_or(account.id),
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            organisation_id: organisation.map(|org| org.id),
            organisation_name: organisation.map(|org| org.name.clone()),
            permission: derived.map(|(permission, _)| permission),
        };
        let is_compliance_scheme = organisation.map(|org| org.is_compliance_scheme).unwrap_or(false);

        Ok(Some((user_data, is_compliance_scheme)))
    }

    pub async fn invite_team_member(
        &self,
        organisation_id: Uuid,
        inviting_person_id: Uuid,
        email: &str,
        permission: PermissionType,
    ) -> Result<(), FacadeError> {
        let request = InvitationRequest {
            invited_user_email: email.to_string(),
            permission,
            inviting_person_id,
        };
        self.facade.send_invitation(organisation_id, &request).await?;
        info!(%organisation_id, "team member invitation submitted");
        Ok(())
    }

    pub async fn remove_team_member(
        &self,
        organisation_id: Uuid,
        person_id: Uuid,
    ) -> Result<(), FacadeError> {
        self.facade
            .remove_team_member(organisation_id, person_id)
            .await?;
        info!(%organisation_id, %person_id, "team member removed");
        Ok(())
    }

    pub async fn update_permission_level(
        &self,
        organisation_id: Uuid,
        person_id: Uuid,
        permission: PermissionType,
    ) -> Result<(), FacadeError> {
        self.facade
            .update_permission_level(organisation_id, person_id, permission)
            .await?;
        info!(%organisation_id, %person_id, %permission, "permission level updated");
        Ok(())
    }

    /// Submit the accumulated delegation wizard answers as a nomination.
    pub async fn nominate_delegated_person(
        &self,
        organisation_id: Uuid,
        item: &PermissionManagementSessionItem,
    ) -> Result<(), NominationError> {
        let relationship = item
            .relationship
            .ok_or(NominationError::MissingRelationship)?;
        let nominee_full_name = item
            .nominee_full_name
            .clone()
            .ok_or(NominationError::MissingDeclaration)?;

        let request = NominationRequest {
            relationship,
            job_title: item.job_title.clone(),
            consultancy_name: item.consultancy_name.clone(),
            compliance_scheme_name: item.compliance_scheme_name.clone(),
            nominee_full_name,
        };
        self.facade
            .nominate_delegated_person(organisation_id, item.id, &request)
            .await?;
        info!(%organisation_id, person_id = %item.id, "delegated person nominated");
        Ok(())
    }

    pub async fn update_organisation_name(
        &self,
        organisation_id: Uuid,
        name: &str,
        company_number: &str,
    ) -> Result<(), FacadeError> {
        let update = OrganisationNameUpdate {
            name: name.to_string(),
            company_number: company_number.to_string(),
        };
        self.facade
            .update_organisation_name(organisation_id, &update)
            .await?;
        info!(%organisation_id, "organisation name updated");
        Ok(())
    }
}
