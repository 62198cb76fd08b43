// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! Page-path tokens and route bases for the wizard flows. Journey logs store
//! the bare tokens; redirects are built from the route base plus token.

pub const MANAGE_ACCOUNT_BASE: &str = "/manage-account";
pub const MANAGE_PERMISSIONS_BASE: &str = "/manage-permissions";
pub const COMPANIES_HOUSE_BASE: &str = "/companies-house";

pub mod manage_account {
    pub const MANAGE: &str = "manage";
    pub const TEAM_MEMBER_EMAIL: &str = "team-member-email";
    pub const TEAM_MEMBER_PERMISSIONS: &str = "team-member-permissions";
    pub const TEAM_MEMBER_DETAILS: &str = "team-member-details";
    pub const INVITATION_SENT: &str = "invitation-sent";
    pub const REMOVE_TEAM_MEMBER: &str = "remove-team-member";
}

pub mod manage_permissions {
    pub const CHANGE: &str = "change";
    pub const RELATIONSHIP: &str = "relationship";
    pub const JOB_TITLE: &str = "job-title";
    pub const ORGANISATION: &str = "organisation";
    pub const DECLARATION: &str = "declaration";
    pub const CONFIRMATION: &str = "confirmation";
}

pub mod companies_house {
    pub const SEARCH: &str = "search";
    pub const CONFIRM: &str = "confirm";
}

pub fn manage_account_url(page: &str) -> String {
    format!("{MANAGE_ACCOUNT_BASE}/{page}")
}

pub fn companies_house_url(page: &str) -> String {
    format!("{COMPANIES_HOUSE_BASE}/{page}")
}

/// Journey token for a permission-wizard page: `"{page}/{id}"`.
pub fn permission_token(page: &str, id: uuid::Uuid) -> String {
    format!("{page}/{id}")
}

pub fn permissions_url(page: &str, id: uuid::Uuid) -> String {
    format!("{MANAGE_PERMISSIONS_BASE}/{page}/{id}")
}
