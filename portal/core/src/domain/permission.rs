// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! # Permission Derivation
//!
//! The one real piece of decision logic in the portal: computing a caller's
//! [`PermissionType`] from the enrolments the facade API returns for their
//! organisation membership.
//!
//! ## Priority
//!
//! 1. Any enrolment in `Invited` status, or no enrolments at all, yields **no
//!    permission** — invited-but-unconfirmed users are not yet authorized.
//! 2. An `Approved Person` service role wins over everything else.
//! 3. A `Delegated Person` service role comes next.
//! 4. Otherwise the permission falls back to the underlying person role:
//!    `Admin` → [`PermissionType::Admin`], `Employee` → [`PermissionType::Basic`].
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Service role key the facade uses for approved persons.
pub const APPROVED_PERSON_ROLE: &str = "Packaging.ApprovedPerson";
/// Service role key the facade uses for delegated persons.
pub const DELEGATED_PERSON_ROLE: &str = "Packaging.DelegatedPerson";

/// Derived authorization level for a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionType {
    Approved,
    Delegated,
    Admin,
    Basic,
}

impl std::fmt::Display for PermissionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "Approved"),
            Self::Delegated => write!(f, "Delegated"),
            Self::Admin => write!(f, "Admin"),
            Self::Basic => write!(f, "Basic"),
        }
    }
}

/// Role a person holds directly on the organisation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonRole {
    Admin,
    Employee,
}

/// Status of a person's registration against a service role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrolmentStatus {
    NotSet,
    Invited,
    Pending,
    Approved,
    Rejected,
    Enrolled,
}

/// A person's registration against a service role within an organisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrolment {
    pub service_role_key: String,
    pub status: EnrolmentStatus,
}

/// Derive the caller's permission and confirmed person id from their enrolments.
///
/// Returns `None` when the enrolment set is empty or any enrolment is still in
/// `Invited` status; an invitation that has not been accepted confers nothing.
pub fn derive_permission(
    person_id: Uuid,
    person_role: PersonRole,
    enrolments: &[Enrolment],
) -> Option<(PermissionType, Uuid)> {
    if enrolments.is_empty() {
        return None;
    }
    if enrolments
        .iter()
        .any(|e| e.status == EnrolmentStatus::Invited)
    {
        return None;
    }

    let has_role = |key: &str| enrolments.iter().any(|e| e.service_role_key == key);

    let permission = if has_role(APPROVED_PERSON_ROLE) {
        PermissionType::Approved
    } else if has_role(DELEGATED_PERSON_ROLE) {
        PermissionType::Delegated
    } else {
        match person_role {
            PersonRole::Admin => PermissionType::Admin,
            PersonRole::Employee => PermissionType::Basic,
        }
    };

    Some((permission, person_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrolment(role: &str, status: EnrolmentStatus) -> Enrolment {
        Enrolment {
            service_role_key: role.to_string(),
            status,
        }
    }

    #[test]
    fn empty_enrolments_yield_no_permission() {
        assert_eq!(
            derive_permission(Uuid::new_v4(), PersonRole::Admin, &[]),
            None
        );
    }

    #[test]
    fn any_invited_enrolment_yields_no_permission() {
        let enrolments = vec![
            enrolment(APPROVED_PERSON_ROLE, EnrolmentStatus::Enrolled),
            enrolment("Packaging.BasicUser", EnrolmentStatus::Invited),
        ];
        assert_eq!(
            derive_permission(Uuid::new_v4(), PersonRole::Admin, &enrolments),
            None
        );
    }

    #[test]
    fn approved_person_takes_precedence() {
        let person = Uuid::new_v4();
        let enrolments = vec![
            enrolment(DELEGATED_PERSON_ROLE, EnrolmentStatus::Enrolled),
            enrolment(APPROVED_PERSON_ROLE, EnrolmentStatus::NotSet),
        ];
        assert_eq!(
            derive_permission(person, PersonRole::Admin, &enrolments),
            Some((PermissionType::Approved, person))
        );
    }

    #[test]
    fn delegated_person_beats_person_role() {
        let person = Uuid::new_v4();
        let enrolments = vec![enrolment(DELEGATED_PERSON_ROLE, EnrolmentStatus::Enrolled)];
        assert_eq!(
            derive_permission(person, PersonRole::Admin, &enrolments),
            Some((PermissionType::Delegated, person))
        );
    }

    #[test]
    fn admin_person_role_falls_back_to_admin() {
        let person = Uuid::new_v4();
        let enrolments = vec![enrolment("Packaging.BasicUser", EnrolmentStatus::Enrolled)];
        assert_eq!(
            derive_permission(person, PersonRole::Admin, &enrolments),
            Some((PermissionType::Admin, person))
        );
    }

    #[test]
    fn employee_person_role_falls_back_to_basic() {
        let person = Uuid::new_v4();
        let enrolments = vec![enrolment("Packaging.BasicUser", EnrolmentStatus::Approved)];
        assert_eq!(
            derive_permission(person, PersonRole::Employee, &enrolments),
            Some((PermissionType::Basic, person))
        );
    }
}
