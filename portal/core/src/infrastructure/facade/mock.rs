// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! Canned in-memory facade used for local development (and router tests).
//! Selected by the `use_mock_facade` feature flag.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::domain::permission::{
    Enrolment, EnrolmentStatus, PermissionType, PersonRole, APPROVED_PERSON_ROLE,
};
use crate::infrastructure::facade::types::{
    CompaniesHouseCompany, InvitationRequest, NominationRequest, OrganisationNameUpdate,
    RegisteredOffice, TeamMember, UserAccount, UserOrganisation,
};
use crate::infrastructure::facade::{FacadeError, FacadeService};

/// Company number the mock treats as unregistered.
pub const UNKNOWN_COMPANY_NUMBER: &str = "00000000";

pub struct MockFacadeService {
    organisation_id: Uuid,
    person_id: Uuid,
    team: RwLock<Vec<TeamMember>>,
}

impl MockFacadeService {
    pub fn new() -> Self {
        let person_id = Uuid::new_v4();
        Self {
            organisation_id: Uuid::new_v4(),
            person_id,
            team: RwLock::new(vec![
                TeamMember {
                    person_id: Uuid::new_v4(),
                    first_name: "Ashley".to_string(),
                    last_name: "Nguyen".to_string(),
                    email: "ashley.nguyen@example.com".to_string(),
                    permission: Some(PermissionType::Admin),
                },
                TeamMember {
                    person_id: Uuid::new_v4(),
                    first_name: "Priya".to_string(),
                    last_name: "Shah".to_string(),
                    email: "priya.shah@example.com".to_string(),
                    permission: Some(PermissionType::Basic),
                },
            ]),
        }
    }

    pub fn organisation_id(&self) -> Uuid {
        self.organisation_id
    }
}

impl Default for MockFacadeService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FacadeService for MockFacadeService {
    async fn get_user_account(
        &self,
        subject_email: &str,
    ) -> Result<Option<UserAccount>, FacadeError> {
        // Any authenticated subject gets an approved-person account against the
        // single mock organisation.
        Ok(Some(UserAccount {
            id: Uuid::new_v4(),
            first_name: "Sam".to_string(),
            last_name: "Porter".to_string(),
            email: subject_email.to_string(),
            organisations: vec![UserOrganisation {
                id: self.organisation_id,
                name: "Accord Recycling Ltd".to_string(),
                person_id: self.person_id,
                person_role: PersonRole::Admin,
                is_compliance_scheme: false,
                enrolments: vec![Enrolment {
                    service_role_key: APPROVED_PERSON_ROLE.to_string(),
                    status: EnrolmentStatus::Enrolled,
                }],
            }],
        }))
    }

    async fn get_team_members(
        &self,
        _organisation_id: Uuid,
    ) -> Result<Vec<TeamMember>, FacadeError> {
        Ok(self.team.read().await.clone())
    }

    async fn send_invitation(
        &self,
        organisation_id: Uuid,
        request: &InvitationRequest,
    ) -> Result<(), FacadeError> {
        info!(%organisation_id, email = %request.invited_user_email, "mock facade: invitation sent");
        let mut team = self.team.write().await;
        team.push(TeamMember {
            person_id: Uuid::new_v4(),
            first_name: "Invited".to_string(),
            last_name: "User".to_string(),
            email: request.invited_user_email.clone(),
            permission: None,
        });
        Ok(())
    }

    async fn remove_team_member(
        &self,
        organisation_id: Uuid,
        person_id: Uuid,
    ) -> Result<(), FacadeError> {
        info!(%organisation_id, %person_id, "mock facade: team member removed");
        self.team.write().await.retain(|m| m.person_id != person_id);
        Ok(())
    }

    async fn update_permission_level(
        &self,
        organisation_id: Uuid,
        person_id: Uuid,
        permission: PermissionType,
    ) -> Result<(), FacadeError> {
        info!(%organisation_id, %person_id, %permission, "mock facade: permission updated");
        let mut team = self.team.write().await;
        if let Some(member) = team.iter_mut().find(|m| m.person_id == person_id) {
            member.permission = Some(permission);
        }
        Ok(())
    }

    async fn nominate_delegated_person(
        &self,
        organisation_id: Uuid,
        person_id: Uuid,
        request: &NominationRequest,
    ) -> Result<(), FacadeError> {
        info!(
            %organisation_id,
            %person_id,
            nominee = %request.nominee_full_name,
            "mock facade: delegated person nominated"
        );
        let mut team = self.team.write().await;
        if let Some(member) = team.iter_mut().find(|m| m.person_id == person_id) {
            member.permission = Some(PermissionType::Delegated);
        }
        Ok(())
    }

    async fn lookup_company(
        &self,
        company_number: &str,
    ) -> Result<Option<CompaniesHouseCompany>, FacadeError> {
        if company_number == UNKNOWN_COMPANY_NUMBER {
            return Ok(None);
        }
        Ok(Some(CompaniesHouseCompany {
            name: format!("MOCK COMPANY {company_number} LIMITED"),
            company_number: company_number.to_string(),
            registered_office: RegisteredOffice {
                street: Some("1 Paper Mill Lane".to_string()),
                town: Some("Leeds".to_string()),
                postcode: Some("LS1 4AB".to_string()),
            },
        }))
    }

    async fn update_organisation_name(
        &self,
        organisation_id: Uuid,
        update: &OrganisationNameUpdate,
    ) -> Result<(), FacadeError> {
        info!(%organisation_id, name = %update.name, "mock facade: organisation renamed");
        Ok(())
    }
}
