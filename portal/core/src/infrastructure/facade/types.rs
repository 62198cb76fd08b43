// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! Wire DTOs for the facade API. The facade is a .NET service, so all JSON
//! bodies use camelCase member names.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::permission::{Enrolment, PermissionType, PersonRole};
use crate::domain::session::RelationshipWithOrganisation;

/// A signed-in user's account record, including organisation memberships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub organisations: Vec<UserOrganisation>,
}

/// One organisation the user belongs to, with their role and enrolments there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOrganisation {
    pub id: Uuid,
    pub name: String,
    pub person_id: Uuid,
    pub person_role: PersonRole,
    #[serde(default)]
    pub is_compliance_scheme: bool,
    #[serde(default)]
    pub enrolments: Vec<Enrolment>,
}

/// A member of the organisation's team as listed on the manage page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub person_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub permission: Option<PermissionType>,
}

/// Request body for inviting a new team member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationRequest {
    pub invited_user_email: String,
    pub permission: PermissionType,
    pub inviting_person_id: Uuid,
}

/// Request body for nominating a delegated person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NominationRequest {
    pub relationship: RelationshipWithOrganisation,
    pub job_title: Option<String>,
    pub consultancy_name: Option<String>,
    pub compliance_scheme_name: Option<String>,
    pub nominee_full_name: String,
}

/// Request body for updating an organisation's registered name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationNameUpdate {
    pub name: String,
    pub company_number: String,
}

/// Registered office address returned by companies-house lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredOffice {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
}

impl RegisteredOffice {
    /// Non-empty address lines in display order.
    pub fn lines(&self) -> Vec<String> {
        [&self.street, &self.town, &self.postcode]
            .into_iter()
            .filter_map(|line| line.clone())
            .collect()
    }
}

/// A company record from the facade's companies-house lookup endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompaniesHouseCompany {
    pub name: String,
    pub company_number: String,
    pub registered_office: RegisteredOffice,
}
