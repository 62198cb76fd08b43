// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! # Journey Session Aggregate
//!
//! Per-user, per-browser-session aggregate root. One [`JourneySession`] is
//! serialized as JSON into the distributed session store under the user's
//! session-cookie key and mutated through
//! [`crate::application::session_manager::SessionManager`] on every wizard step.
//!
//! ## Lifecycle
//!
//! ```text
//! first request without stored state
//!   └─ JourneySession::default()          ← created on demand
//!   └─ SessionManager::update_session(f)  ← read-modify-write on every mutation
//!   └─ SessionManager::remove_session()   ← explicit sign-out
//!        (idle-timeout expiry in the store behaves the same as removal)
//! ```
//!
//! ## Invariants
//!
//! - Each sub-session owns its own [`Journey`]; flows never share history.
//! - `user_data` is a cached snapshot of facade-resolved identity claims; it is
//!   refreshed by middleware when absent, never trusted beyond the session.
//! - Permission-management state is keyed by a GUID per delegation request so
//!   several delegations can be in flight in one browser session.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::journey::Journey;
use crate::domain::permission::PermissionType;

/// Snapshot of facade-resolved identity claims for the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub id: Uuid,
    pub person_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub organisation_id: Option<Uuid>,
    pub organisation_name: Option<String>,
    pub permission: Option<PermissionType>,
}

/// How a nominated delegated person is connected to the organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipWithOrganisation {
    Employment,
    Consultancy,
    ComplianceScheme,
}

/// State for one in-flight permission-delegation wizard, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionManagementSessionItem {
    /// Identifier of the team member whose permissions are being changed. Bound
    /// into every route of this wizard.
    pub id: Uuid,
    pub journey: Journey,
    pub selected_permission: Option<PermissionType>,
    pub relationship: Option<RelationshipWithOrganisation>,
    pub job_title: Option<String>,
    pub consultancy_name: Option<String>,
    pub compliance_scheme_name: Option<String>,
    pub nominee_full_name: Option<String>,
}

impl PermissionManagementSessionItem {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            journey: Journey::new(),
            selected_permission: None,
            relationship: None,
            job_title: None,
            consultancy_name: None,
            compliance_scheme_name: None,
            nominee_full_name: None,
        }
    }
}

/// All in-flight permission-delegation wizards for this session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionManagementSession {
    pub items: Vec<PermissionManagementSessionItem>,
}

impl PermissionManagementSession {
    pub fn item(&self, id: Uuid) -> Option<&PermissionManagementSessionItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: Uuid) -> Option<&mut PermissionManagementSessionItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Fetch the wizard state for `id`, creating it on first access.
    pub fn item_or_create(&mut self, id: Uuid) -> &mut PermissionManagementSessionItem {
        if let Some(pos) = self.items.iter().position(|item| item.id == id) {
            return &mut self.items[pos];
        }
        self.items.push(PermissionManagementSessionItem::new(id));
        // Just pushed, so the vec is non-empty.
        let last = self.items.len() - 1;
        &mut self.items[last]
    }
}

/// Accumulated manage-account wizard state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountManagementSession {
    pub journey: Journey,
    /// Email address of the team member being invited.
    pub invited_email: Option<String>,
    /// Permission level chosen for the invitee.
    pub invited_permission: Option<PermissionType>,
    /// Person queued for removal pending confirmation.
    pub removal_target: Option<Uuid>,
}

/// Registered company details copied out of a companies-house lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySnapshot {
    pub name: String,
    pub company_number: String,
    pub address_lines: Vec<String>,
}

/// State for the organisation-name-change flow backed by companies-house lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompaniesHouseSession {
    pub journey: Journey,
    pub company: Option<CompanySnapshot>,
}

/// Aggregate root for everything the portal remembers about one browser session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JourneySession {
    pub user_data: Option<UserData>,
    pub account_management: AccountManagementSession,
    pub permission_management: PermissionManagementSession,
    pub companies_house: CompaniesHouseSession,
    /// Whether the user's organisation operates as a compliance scheme.
    pub is_compliance_scheme: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_or_create_is_idempotent_per_id() {
        let mut session = PermissionManagementSession::default();
        let id = Uuid::new_v4();

        session.item_or_create(id).job_title = Some("Director".to_string());
        let item = session.item_or_create(id);
        assert_eq!(item.job_title.as_deref(), Some("Director"));
        assert_eq!(session.items.len(), 1);
    }

    #[test]
    fn items_with_distinct_ids_keep_independent_journeys() {
        let mut session = PermissionManagementSession::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        session.item_or_create(a).journey.visit(&format!("change/{a}"));
        session.item_or_create(b).journey.visit(&format!("change/{b}"));
        session
            .item_mut(a)
            .map(|item| item.journey.visit(&format!("relationship/{a}")));

        assert_eq!(session.item(a).map(|i| i.journey.pages().len()), Some(2));
        assert_eq!(session.item(b).map(|i| i.journey.pages().len()), Some(1));
    }

    #[test]
    fn session_serde_round_trip_preserves_fields() {
        let mut session = JourneySession::default();
        session.account_management.journey.visit("manage");
        session.account_management.invited_email = Some("new.member@example.com".to_string());
        session.is_compliance_scheme = true;

        let json = serde_json::to_vec(&session).expect("serialize");
        let restored: JourneySession = serde_json::from_slice(&json).expect("deserialize");
        assert_eq!(restored, session);
    }
}
