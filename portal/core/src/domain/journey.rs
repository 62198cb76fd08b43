// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! # Journey Log
//!
//! Domain model for the wizard **journey**: the ordered log of page-path tokens a
//! user has legitimately visited within one guided multi-step flow.
//!
//! ## Lifecycle
//!
//! ```text
//! flow entry page (e.g. "manage")
//!   └─ Journey::reset() + Journey::visit(entry)
//!   └─ Journey::visit(page)        ← on every step render / form submit
//!         └─ check_access(journey, requested, first)  ← middleware gate
//! ```
//!
//! ## Invariants
//!
//! - The journey is append-only, except that revisiting an earlier page truncates
//!   everything **after** that page (forward history is discarded).
//! - Membership checks are exact string equality on whole tokens. No prefix or
//!   wildcard matching.
//! - A non-empty journey always has a well-defined "last visited" page, which is
//!   where a skipping user is sent back to.
use serde::{Deserialize, Serialize};

/// Which guided flow a protected endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JourneyType {
    /// The manage-account wizard (invitations, removals, organisation details).
    ManageAccount,
    /// An in-progress permission-delegation wizard step, keyed by a route GUID.
    ManagePermissions,
    /// The entry action of a permission-delegation wizard. Allowed through as soon
    /// as a route GUID is present, with no prior journey state required.
    ManagePermissionsStart,
}

/// Ordered log of visited page-path tokens within one sub-journey.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journey {
    pages: Vec<String>,
}

impl Journey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Exact-equality membership test on a whole page token.
    pub fn contains(&self, page: &str) -> bool {
        self.pages.iter().any(|p| p == page)
    }

    /// The most recently visited page, if any.
    pub fn last(&self) -> Option<&str> {
        self.pages.last().map(String::as_str)
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Record a page visit.
    ///
    /// Revisiting a page already in the log truncates everything after it, so a
    /// user stepping back through the wizard loses their forward history and must
    /// walk the remaining steps again. Visiting the current tail is a no-op.
    pub fn visit(&mut self, page: &str) {
        if let Some(pos) = self.pages.iter().position(|p| p == page) {
            self.pages.truncate(pos + 1);
        } else {
            self.pages.push(page.to_string());
        }
    }

    /// Drop all recorded history. Used by flow entry pages that restart a wizard.
    pub fn reset(&mut self) {
        self.pages.clear();
    }
}

/// Outcome of a journey access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// The requested page was legitimately reached.
    Allow,
    /// The user skipped ahead (or has no journey); send them to this page token.
    RedirectTo(String),
}

/// Decide whether `requested` is reachable given the recorded `journey`.
///
/// - empty journey → redirect to `first_page`
/// - `requested` not a member → redirect to the last visited page
/// - `requested` is a member → allow
pub fn check_access(journey: &Journey, requested: &str, first_page: &str) -> AccessDecision {
    if journey.contains(requested) {
        return AccessDecision::Allow;
    }
    match journey.last() {
        Some(last) => AccessDecision::RedirectTo(last.to_string()),
        None => AccessDecision::RedirectTo(first_page.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visit_appends_new_pages_in_order() {
        let mut journey = Journey::new();
        journey.visit("manage");
        journey.visit("team-member-email");
        journey.visit("team-member-permissions");
        assert_eq!(
            journey.pages(),
            ["manage", "team-member-email", "team-member-permissions"]
        );
    }

    #[test]
    fn revisiting_an_earlier_page_discards_forward_history() {
        let mut journey = Journey::new();
        journey.visit("manage");
        journey.visit("team-member-email");
        journey.visit("team-member-permissions");
        journey.visit("team-member-details");

        journey.visit("team-member-email");
        assert_eq!(journey.pages(), ["manage", "team-member-email"]);

        // The next step appends after the truncation point.
        journey.visit("team-member-permissions");
        assert_eq!(
            journey.pages(),
            ["manage", "team-member-email", "team-member-permissions"]
        );
    }

    #[test]
    fn revisiting_the_tail_is_a_noop() {
        let mut journey = Journey::new();
        journey.visit("manage");
        journey.visit("team-member-email");
        journey.visit("team-member-email");
        assert_eq!(journey.pages(), ["manage", "team-member-email"]);
    }

    #[test]
    fn access_allowed_for_visited_page() {
        let mut journey = Journey::new();
        journey.visit("manage");
        journey.visit("team-member-email");
        assert_eq!(
            check_access(&journey, "team-member-email", "manage"),
            AccessDecision::Allow
        );
    }

    #[test]
    fn access_redirects_to_last_visited_when_skipping_ahead() {
        let mut journey = Journey::new();
        journey.visit("manage");
        journey.visit("team-member-email");
        assert_eq!(
            check_access(&journey, "team-member-permissions", "manage"),
            AccessDecision::RedirectTo("team-member-email".to_string())
        );
    }

    #[test]
    fn access_redirects_to_first_page_on_empty_journey() {
        let journey = Journey::new();
        assert_eq!(
            check_access(&journey, "team-member-email", "manage"),
            AccessDecision::RedirectTo("manage".to_string())
        );
    }

    #[test]
    fn membership_is_exact_not_prefix() {
        let mut journey = Journey::new();
        journey.visit("team-member");
        assert_eq!(
            check_access(&journey, "team-member-email", "manage"),
            AccessDecision::RedirectTo("team-member".to_string())
        );
    }
}
